//! Citation reference parsing.
//!
//! HAL delivers `citationRef_s` as pre-rendered markup in which links appear
//! as `<a href="URL">&#x27E8;label&#x27E9;</a>` (the labels wrapped in
//! mathematical angle brackets). Rendering needs those links separated out:
//! each one becomes an icon, and the remainder of the citation is shown as
//! text.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// One link embedded in a citation reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationLink {
    pub url: String,
    /// Host part of the URL, used for icon selection
    pub host: String,
    /// Label between the angle-bracket entities, e.g. a DOI
    pub label: String,
}

/// A citation reference split into plain markup and its embedded links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCitation {
    /// The citation with the link markup stripped
    pub text: String,
    /// Embedded links, in order of appearance
    pub links: Vec<CitationLink>,
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#". <a[^>]*href="(https?://([^"/]*)/[^"]*)"[^>]*>&#x27E8;([^<]*)&#x27E9;</a>"#)
            .expect("citation link pattern is valid")
    })
}

/// Extract and strip the embedded link markup from a citation reference
///
/// Zero or more link+label pairs are pulled out; whatever remains is treated
/// as plain citation markup.
pub fn parse_citation(citation: &str) -> ParsedCitation {
    let pattern = link_pattern();
    let mut text = citation.to_string();
    let mut links = Vec::new();

    while let Some(captures) = pattern.captures(&text) {
        let matched = captures.get(0).map(|m| m.range()).unwrap_or_default();
        links.push(CitationLink {
            url: captures[1].to_string(),
            host: captures[2].to_string(),
            label: captures[3].to_string(),
        });
        text.replace_range(matched, "");
    }

    ParsedCitation { text, links }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_links() {
        let parsed = parse_citation("Journal of Tests, 2021, 12 (3), pp.45-67");
        assert!(parsed.links.is_empty());
        assert_eq!(parsed.text, "Journal of Tests, 2021, 12 (3), pp.45-67");
    }

    #[test]
    fn test_single_doi_link() {
        let citation = "Journal of Tests, 2021. <a target=\"_blank\" href=\"https://dx.doi.org/10.1000/test\">&#x27E8;10.1000/test&#x27E9;</a>";
        let parsed = parse_citation(citation);
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].url, "https://dx.doi.org/10.1000/test");
        assert_eq!(parsed.links[0].host, "dx.doi.org");
        assert_eq!(parsed.links[0].label, "10.1000/test");
        assert_eq!(parsed.text, "Journal of Tests, 2021");
    }

    #[test]
    fn test_multiple_links_in_order() {
        let citation = "Conf. <a href=\"https://dx.doi.org/10.1/a\">&#x27E8;10.1/a&#x27E9;</a>. <a href=\"https://www.mdpi.com/x\">&#x27E8;mdpi&#x27E9;</a>";
        let parsed = parse_citation(citation);
        assert_eq!(parsed.links.len(), 2);
        assert_eq!(parsed.links[0].host, "dx.doi.org");
        assert_eq!(parsed.links[1].host, "www.mdpi.com");
        assert_eq!(parsed.text, "Conf");
    }

    #[test]
    fn test_plain_anchor_without_entities_is_kept() {
        // Only the angle-bracket-labelled links are link markup; anything
        // else stays in the citation text untouched.
        let citation = "See <a href=\"https://example.com/p\">here</a>, 2020";
        let parsed = parse_citation(citation);
        assert!(parsed.links.is_empty());
        assert_eq!(parsed.text, citation);
    }
}
