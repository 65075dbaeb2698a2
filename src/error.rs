//! Error types shared across the library.

/// Errors that can occur when querying HAL or classifying records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The category code is not part of the taxonomy
    #[error("'{0}' is not a valid category code")]
    InvalidCategory(String),

    /// A caller-supplied filter key or value cannot be expressed safely
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the HAL API
    #[error("HAL API returned status: {status}")]
    Api { status: u16 },

    /// Parsing error (malformed JSON or schema violation)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A record matched no taxonomy rule (schema drift - must surface, never drop)
    #[error("Unable to classify record '{hal_id}': {detail}")]
    Classification { hal_id: String, detail: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Parse(format!("URL: {}", err))
    }
}
