//! Publication taxonomy: category codes and their server-side filter fragments.
//!
//! The codes follow the classification scheme used by French research
//! evaluation (see <http://production-scientifique.bnf.fr/Annexe/cadre-de-classement>).
//! Each code maps to a set of `fq` filter clauses for the HAL search API.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// A publication category code
///
/// Declaration order matters: it drives the comment-exclusion filter and the
/// order of grouped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// PV - popular science
    #[serde(rename = "PV")]
    Popularization,
    /// ASCL - journal articles without peer review
    #[serde(rename = "ASCL")]
    ArticleWithoutPeerReview,
    /// ACL - peer-reviewed articles in international journals
    #[serde(rename = "ACL")]
    InternationalJournalArticle,
    /// ACLN - peer-reviewed articles in national journals
    #[serde(rename = "ACLN")]
    NationalJournalArticle,
    /// INV - invited conference talks
    #[serde(rename = "INV")]
    InvitedTalk,
    /// COM - conference talks without published proceedings
    #[serde(rename = "COM")]
    TalkWithoutProceedings,
    /// ACTI - international conference proceedings
    #[serde(rename = "ACTI")]
    InternationalProceedings,
    /// ACTN - national conference proceedings
    #[serde(rename = "ACTN")]
    NationalProceedings,
    /// OS - chapters in edited volumes
    #[serde(rename = "OS")]
    BookChapter,
    /// DO - edited volumes
    #[serde(rename = "DO")]
    EditedVolume,
    /// AFF - posters
    #[serde(rename = "AFF")]
    Poster,
    /// AP - reports and other documents
    #[serde(rename = "AP")]
    OtherPublication,
    /// TH - theses and habilitations
    #[serde(rename = "TH")]
    Thesis,
}

impl Category {
    /// All category codes, in declaration order
    pub const ALL: &'static [Category] = &[
        Category::Popularization,
        Category::ArticleWithoutPeerReview,
        Category::InternationalJournalArticle,
        Category::NationalJournalArticle,
        Category::InvitedTalk,
        Category::TalkWithoutProceedings,
        Category::InternationalProceedings,
        Category::NationalProceedings,
        Category::BookChapter,
        Category::EditedVolume,
        Category::Poster,
        Category::OtherPublication,
        Category::Thesis,
    ];

    /// The short code used in the HAL `comment_s` field and on the CLI
    pub fn code(&self) -> &'static str {
        match self {
            Category::Popularization => "PV",
            Category::ArticleWithoutPeerReview => "ASCL",
            Category::InternationalJournalArticle => "ACL",
            Category::NationalJournalArticle => "ACLN",
            Category::InvitedTalk => "INV",
            Category::TalkWithoutProceedings => "COM",
            Category::InternationalProceedings => "ACTI",
            Category::NationalProceedings => "ACTN",
            Category::BookChapter => "OS",
            Category::EditedVolume => "DO",
            Category::Poster => "AFF",
            Category::OtherPublication => "AP",
            Category::Thesis => "TH",
        }
    }

    /// Human-readable section heading
    pub fn label(&self) -> &'static str {
        match self {
            Category::Popularization => "Popular science",
            Category::ArticleWithoutPeerReview => "Non-peer-reviewed journal articles",
            Category::InternationalJournalArticle => "International peer-reviewed journal articles",
            Category::NationalJournalArticle => "National peer-reviewed journal articles",
            Category::InvitedTalk => "Invited talks",
            Category::TalkWithoutProceedings => "Conference talks without proceedings",
            Category::InternationalProceedings => "International conference proceedings",
            Category::NationalProceedings => "National conference proceedings",
            Category::BookChapter => "Book chapters",
            Category::EditedVolume => "Edited volumes",
            Category::Poster => "Posters",
            Category::OtherPublication => "Reports and other documents",
            Category::Thesis => "Theses and habilitations",
        }
    }

    /// Look up a category by its short code
    pub fn from_code(code: &str) -> Result<Category, Error> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or_else(|| Error::InvalidCategory(code.to_string()))
    }

    /// Server-side `fq` filter clauses selecting records of this category
    ///
    /// REPORT-like and THESE-like documents carry no `popularLevel_s` field in
    /// HAL, so `AP` and `TH` deliberately omit that clause.
    pub fn filter_clauses(&self) -> &'static [&'static str] {
        match self {
            Category::Popularization => &["popularLevel_s:1"],
            Category::ArticleWithoutPeerReview => {
                &["popularLevel_s:0", "docType_s:\"ART\"", "peerReviewing_s:0"]
            }
            Category::InternationalJournalArticle => &[
                "popularLevel_s:0",
                "docType_s:\"ART\"",
                "peerReviewing_s:1",
                "audience_s:2",
            ],
            Category::NationalJournalArticle => &[
                "popularLevel_s:0",
                "docType_s:\"ART\"",
                "peerReviewing_s:1",
                "audience_s:3",
            ],
            Category::InvitedTalk => &[
                "popularLevel_s:0",
                "docType_s:\"COMM\"",
                "invitedCommunication_s:1",
            ],
            Category::TalkWithoutProceedings => &[
                "popularLevel_s:0",
                "docType_s:\"COMM\"",
                "invitedCommunication_s:0",
                "proceedings_s:0",
            ],
            Category::InternationalProceedings => &[
                "popularLevel_s:0",
                "docType_s:\"COMM\"",
                "invitedCommunication_s:0",
                "proceedings_s:1",
                "audience_s:2",
            ],
            Category::NationalProceedings => &[
                "popularLevel_s:0",
                "docType_s:\"COMM\"",
                "invitedCommunication_s:0",
                "proceedings_s:1",
                "audience_s:3",
            ],
            Category::BookChapter => &["popularLevel_s:0", "docType_s:\"COUV\""],
            Category::EditedVolume => &["popularLevel_s:0", "docType_s:\"DOUV\""],
            Category::Poster => &["popularLevel_s:0", "docType_s:\"POSTER\""],
            Category::OtherPublication => {
                &["docType_s:(\"REPORT\" OR \"UNDEFINED\" OR \"OTHER\" OR \"LECTURE\")"]
            }
            Category::Thesis => &["docType_s:(\"THESE\" OR \"HDR\")"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Filter clause excluding any record whose comment tag names a known code
///
/// Appended to structured category queries so that explicitly-overridden
/// records are not counted twice by the merge.
pub fn comment_exclusion_clause() -> String {
    let codes: Vec<&str> = Category::ALL.iter().map(|c| c.code()).collect();
    format!("-comment_s:({})", codes.join(" OR "))
}
