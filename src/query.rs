//! Search query construction for the HAL API.
//!
//! Builds the `q` predicate and the `fq` filter clauses as structured URL
//! query pairs instead of splicing strings, so caller-supplied filter values
//! cannot break the query syntax.

use crate::error::Error;
use crate::models::{comment_exclusion_clause, Category};
use url::Url;

/// Fields requested from the search endpoint, fixed projection
pub const HAL_FIELDS: &str = "fileAnnexesFigure_s,invitedCommunication_s,proceedings_s,\
peerReviewing_s,audience_s,comment_s,popularLevel_s,halId_s,authIdHalFullName_fs,\
producedDateY_i,docType_s,files_s,fileMain_s,fileMainAnnex_s,linkExtUrl_s,\
title_s,en_title_s,fr_title_s,label_bibtex,citationRef_s";

/// Row cap, effectively unbounded for a single author's output
pub const DEFAULT_ROWS: usize = 10_000;

/// A search query against the HAL API
///
/// # Examples
///
/// ```
/// use halpub::models::Category;
/// use halpub::query::SearchQuery;
///
/// let query = SearchQuery::new()
///     .author("jane-doe")
///     .category(Category::InternationalJournalArticle)
///     .filter("producedDateY_i", "[2015 TO 2019]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    author_id: Option<String>,
    category: Option<Category>,
    filters: Vec<(String, String)>,
    rows: Option<usize>,
}

impl SearchQuery {
    /// Create an empty (match-all) query
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to documents of one author (idHAL)
    pub fn author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Restrict to one publication category
    ///
    /// Also excludes records whose comment tag names any known code, so the
    /// comment-override records are left to the dedicated merge query.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Add an arbitrary field filter, kept in insertion order
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Override the row cap
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn category_ref(&self) -> Option<Category> {
        self.category
    }

    /// The companion query catching comment-tag overrides for this category
    ///
    /// Same author and extra filters, no structured category constraint, plus
    /// a `comment_s:<code>` filter. `None` when the query has no category.
    pub(crate) fn to_comment_override(&self) -> Option<SearchQuery> {
        let category = self.category?;
        let mut query = self.clone();
        query.category = None;
        query
            .filters
            .push(("comment_s".to_string(), category.code().to_string()));
        Some(query)
    }

    /// The main `q` predicate
    fn predicate(&self) -> Result<String, Error> {
        match &self.author_id {
            Some(id) => {
                if id.chars().any(|c| c.is_control()) {
                    return Err(Error::InvalidFilter(
                        "author id contains control characters".to_string(),
                    ));
                }
                let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
                Ok(format!("authIdHal_s:\"{}\"", escaped))
            }
            None => Ok("*".to_string()),
        }
    }

    /// All `fq` clauses: category fragments, comment exclusion, extra filters
    fn filter_queries(&self) -> Result<Vec<String>, Error> {
        let mut clauses = Vec::new();
        if let Some(category) = self.category {
            clauses.extend(category.filter_clauses().iter().map(|c| c.to_string()));
            clauses.push(comment_exclusion_clause());
        }
        for (field, value) in &self.filters {
            if !is_valid_field_name(field) {
                return Err(Error::InvalidFilter(format!(
                    "'{}' is not a valid field name",
                    field
                )));
            }
            clauses.push(format!("{}:{}", field, escape_filter_value(value)?));
        }
        Ok(clauses)
    }

    /// Build the full request URL against the given endpoint
    pub fn build_url(&self, endpoint: &str) -> Result<Url, Error> {
        let mut url = Url::parse(endpoint)?;
        let rows = self.rows.unwrap_or(DEFAULT_ROWS);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &self.predicate()?);
            for clause in self.filter_queries()? {
                pairs.append_pair("fq", &clause);
            }
            pairs.append_pair("wt", "json");
            pairs.append_pair("rows", &rows.to_string());
            pairs.append_pair("fl", HAL_FIELDS);
        }
        Ok(url)
    }
}

fn is_valid_field_name(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape a caller-supplied filter value for the query syntax
///
/// Bare tokens and `[A TO B]` ranges pass through untouched (they are valid
/// query syntax on their own); anything else is double-quoted with `"` and
/// `\` escaped. Control characters are rejected outright.
pub fn escape_filter_value(value: &str) -> Result<String, Error> {
    if value.is_empty() {
        return Err(Error::InvalidFilter("empty filter value".to_string()));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidFilter(
            "filter value contains control characters".to_string(),
        ));
    }

    let is_bare_token = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*'));
    if is_bare_token {
        return Ok(value.to_string());
    }

    let is_range = value.starts_with('[')
        && value.ends_with(']')
        && value.contains(" TO ")
        && value[1..value.len() - 1].chars().all(|c| c != '[' && c != ']');
    if is_range {
        return Ok(value.to_string());
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Ok(format!("\"{}\"", escaped))
}
