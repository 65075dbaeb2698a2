//! Typed HAL record schema and the search response envelope.
//!
//! HAL serves a partially-inconsistent schema: flag fields arrive as JSON
//! numbers, strings or booleans depending on the document, and title-ish
//! fields may be a plain string or a one-element array. All of that is
//! normalized at the deserialization boundary so the rest of the crate works
//! with plain `Option<u8>` / `Option<String>` values.

use serde::{Deserialize, Deserializer, Serialize};

/// HAL document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "ART")]
    Article,
    #[serde(rename = "COMM")]
    ConferencePaper,
    #[serde(rename = "COUV")]
    BookChapter,
    #[serde(rename = "DOUV")]
    EditedBook,
    #[serde(rename = "POSTER")]
    Poster,
    #[serde(rename = "THESE")]
    Thesis,
    #[serde(rename = "HDR")]
    Habilitation,
    #[serde(rename = "MEM")]
    MasterThesis,
    #[serde(rename = "REPORT")]
    Report,
    #[serde(rename = "UNDEFINED")]
    Undefined,
    #[serde(rename = "OTHER")]
    Other,
    #[serde(rename = "LECTURE")]
    Lecture,
    /// Anything the taxonomy does not know about (schema drift)
    #[serde(untagged)]
    Unknown(String),
}

/// One author entry, split from the `authIdHalFullName_fs` facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    /// idHAL, when the author has one (links to their CV page)
    pub idhal: Option<String>,
    pub full_name: String,
}

/// A single publication record fetched from the HAL search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// HAL identifier, e.g. "hal-02112233" (the only required field)
    #[serde(rename = "halId_s")]
    pub hal_id: String,

    #[serde(rename = "docType_s", default)]
    pub doc_type: Option<DocType>,

    /// 1 when the document targets a general audience
    #[serde(rename = "popularLevel_s", default, deserialize_with = "flag")]
    pub popular_level: Option<u8>,

    /// 0/1, only meaningful for articles
    #[serde(rename = "peerReviewing_s", default, deserialize_with = "flag")]
    pub peer_reviewing: Option<u8>,

    /// 2 = international, 3 = national
    #[serde(rename = "audience_s", default, deserialize_with = "flag")]
    pub audience: Option<u8>,

    /// 0/1, only meaningful for conference papers
    #[serde(rename = "invitedCommunication_s", default, deserialize_with = "flag")]
    pub invited_communication: Option<u8>,

    /// 0/1, only meaningful for conference papers
    #[serde(rename = "proceedings_s", default, deserialize_with = "flag")]
    pub proceedings: Option<u8>,

    /// Free-text comment; authors use it to force a category code
    #[serde(rename = "comment_s", default, deserialize_with = "string_or_first")]
    pub comment: Option<String>,

    #[serde(rename = "producedDateY_i", default)]
    pub produced_year: Option<i32>,

    /// `<idhal>_FacetSep_<full name>` facet entries, in author order
    #[serde(rename = "authIdHalFullName_fs", default)]
    pub auth_id_full_name: Vec<String>,

    #[serde(rename = "title_s", default, deserialize_with = "string_or_first")]
    pub title: Option<String>,

    #[serde(rename = "en_title_s", default, deserialize_with = "string_or_first")]
    pub en_title: Option<String>,

    #[serde(rename = "fr_title_s", default, deserialize_with = "string_or_first")]
    pub fr_title: Option<String>,

    /// Pre-rendered citation text with embedded link markup
    #[serde(rename = "citationRef_s", default)]
    pub citation_ref: Option<String>,

    #[serde(rename = "files_s", default)]
    pub files: Option<Vec<String>>,

    #[serde(rename = "fileMain_s", default)]
    pub file_main: Option<String>,

    #[serde(rename = "fileMainAnnex_s", default)]
    pub file_main_annex: Option<String>,

    #[serde(rename = "linkExtUrl_s", default)]
    pub link_ext_url: Option<String>,

    /// Preformatted BibTeX entry
    #[serde(rename = "label_bibtex", default)]
    pub bibtex: Option<String>,
}

impl Record {
    /// Authors in order, with idHAL when present
    ///
    /// Facet entries look like `mathieu-bredif_FacetSep_Mathieu Brédif`; an
    /// empty idHAL part means the author has no HAL profile.
    pub fn authors(&self) -> Vec<Author> {
        self.auth_id_full_name
            .iter()
            .map(|entry| {
                let (idhal, full_name) = match entry.split_once("_FacetSep_") {
                    Some((id, name)) => (id, name),
                    None => ("", entry.as_str()),
                };
                Author {
                    idhal: if idhal.is_empty() {
                        None
                    } else {
                        Some(idhal.to_string())
                    },
                    full_name: full_name.to_string(),
                }
            })
            .collect()
    }

    /// Display title: English, else French, else the generic title field
    pub fn display_title(&self) -> &str {
        self.en_title
            .as_deref()
            .or(self.fr_title.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    /// File/link URLs for this record
    ///
    /// `files_s` wins when present; otherwise the best single URL among the
    /// external link, the main file and the main annex.
    pub fn file_urls(&self) -> Vec<String> {
        if let Some(files) = &self.files {
            return files.clone();
        }
        self.link_ext_url
            .as_ref()
            .or(self.file_main.as_ref())
            .or(self.file_main_annex.as_ref())
            .map(|f| vec![f.clone()])
            .unwrap_or_default()
    }

    /// Record page on HAL
    pub fn hal_url(&self) -> String {
        format!("https://hal.archives-ouvertes.fr/{}", self.hal_id)
    }

    /// Production year used for ordering; missing years count as 0
    pub fn year_or_zero(&self) -> i32 {
        self.produced_year.unwrap_or(0)
    }
}

/// Sort records by production year, most recent first
///
/// Stable, so records of the same year keep their server order. Records with
/// no year sort last.
pub fn sort_by_year_desc(records: &mut [Record]) {
    records.sort_by_key(|r| std::cmp::Reverse(r.year_or_zero()));
}

/// Response envelope returned by the HAL search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "numFound", default)]
    pub num_found: usize,
    pub docs: Vec<Record>,
}

/// Accept a flag encoded as a number, a numeric string or a boolean
fn flag<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
        Bool(bool),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::Num(n)) => u8::try_from(n).ok(),
        Some(Raw::Bool(b)) => Some(u8::from(b)),
        Some(Raw::Str(s)) => s.trim().parse::<u8>().ok(),
    })
}

/// Accept a string or an array of strings (keeping the first element)
fn string_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(Raw::One(s)) => Some(s),
        Some(Raw::Many(v)) => v.into_iter().next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_from(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_record() {
        let rec = record_from(r#"{"halId_s": "hal-01234567"}"#);
        assert_eq!(rec.hal_id, "hal-01234567");
        assert!(rec.doc_type.is_none());
        assert!(rec.authors().is_empty());
        assert_eq!(rec.display_title(), "");
    }

    #[test]
    fn test_flag_accepts_number_string_and_bool() {
        let rec = record_from(
            r#"{"halId_s": "x", "popularLevel_s": "1", "peerReviewing_s": 1, "proceedings_s": false}"#,
        );
        assert_eq!(rec.popular_level, Some(1));
        assert_eq!(rec.peer_reviewing, Some(1));
        assert_eq!(rec.proceedings, Some(0));
    }

    #[test]
    fn test_title_as_array_or_string() {
        let rec = record_from(r#"{"halId_s": "x", "title_s": ["First", "Second"]}"#);
        assert_eq!(rec.title.as_deref(), Some("First"));
        let rec = record_from(r#"{"halId_s": "x", "title_s": "Only"}"#);
        assert_eq!(rec.title.as_deref(), Some("Only"));
    }

    #[test]
    fn test_display_title_preference() {
        let rec = record_from(
            r#"{"halId_s": "x", "title_s": "generic", "fr_title_s": "fr", "en_title_s": "en"}"#,
        );
        assert_eq!(rec.display_title(), "en");
        let rec = record_from(r#"{"halId_s": "x", "title_s": "generic", "fr_title_s": "fr"}"#);
        assert_eq!(rec.display_title(), "fr");
    }

    #[test]
    fn test_authors_facet_split() {
        let rec = record_from(
            r#"{"halId_s": "x", "authIdHalFullName_fs": ["jane-doe_FacetSep_Jane Doe", "_FacetSep_John Smith"]}"#,
        );
        let authors = rec.authors();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].idhal.as_deref(), Some("jane-doe"));
        assert_eq!(authors[0].full_name, "Jane Doe");
        assert!(authors[1].idhal.is_none());
        assert_eq!(authors[1].full_name, "John Smith");
    }

    #[test]
    fn test_doc_type_unknown_is_preserved() {
        let rec = record_from(r#"{"halId_s": "x", "docType_s": "PATENT"}"#);
        assert_eq!(rec.doc_type, Some(DocType::Unknown("PATENT".to_string())));
    }

    #[test]
    fn test_file_urls_fallback_chain() {
        let rec = record_from(
            r#"{"halId_s": "x", "files_s": ["a.pdf", "b.pdf"], "fileMain_s": "main.pdf"}"#,
        );
        assert_eq!(rec.file_urls(), vec!["a.pdf", "b.pdf"]);

        let rec = record_from(r#"{"halId_s": "x", "fileMain_s": "main.pdf"}"#);
        assert_eq!(rec.file_urls(), vec!["main.pdf"]);

        let rec = record_from(
            r#"{"halId_s": "x", "linkExtUrl_s": "ext.pdf", "fileMain_s": "main.pdf"}"#,
        );
        assert_eq!(rec.file_urls(), vec!["ext.pdf"]);

        let rec = record_from(r#"{"halId_s": "x"}"#);
        assert!(rec.file_urls().is_empty());
    }

    #[test]
    fn test_sort_by_year_desc_missing_years_last() {
        let mut records: Vec<Record> = [
            r#"{"halId_s": "a", "producedDateY_i": 2015}"#,
            r#"{"halId_s": "b"}"#,
            r#"{"halId_s": "c", "producedDateY_i": 2021}"#,
            r#"{"halId_s": "d", "producedDateY_i": 2015}"#,
        ]
        .iter()
        .map(|j| record_from(j))
        .collect();

        sort_by_year_desc(&mut records);
        let ids: Vec<&str> = records.iter().map(|r| r.hal_id.as_str()).collect();
        // Stable: "a" keeps its place ahead of "d" within 2015
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
    }
}
