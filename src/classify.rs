//! Record classification: maps each fetched record to exactly one category.
//!
//! The taxonomy is not fully derivable from a single HAL field, so the
//! classifier walks a priority-ordered decision tree over the document type
//! and its sub-attributes. The order is the contract; changing it changes
//! which category wins for records matching several rules.

use crate::error::Error;
use crate::models::{Category, DocType, Record};

/// Assign a category to a record
///
/// Pure and deterministic. Rules, first match wins:
///
/// 1. a comment tag equal to a known code is an explicit author override;
/// 2. `popularLevel == 1` is popular science regardless of document type;
/// 3. otherwise the document type decides, with sub-branches for conference
///    papers (invited / no proceedings / audience) and articles
///    (peer review / audience).
///
/// A record matching no rule (missing or unknown document type) is a
/// [`Error::Classification`] - schema drift must surface, never be dropped.
pub fn classify(record: &Record) -> Result<Category, Error> {
    if let Some(comment) = &record.comment {
        if let Ok(category) = Category::from_code(comment) {
            return Ok(category);
        }
    }

    if record.popular_level == Some(1) {
        return Ok(Category::Popularization);
    }

    match &record.doc_type {
        Some(DocType::BookChapter) => Ok(Category::BookChapter),
        Some(DocType::EditedBook) => Ok(Category::EditedVolume),
        Some(DocType::Poster) => Ok(Category::Poster),
        Some(DocType::Thesis) | Some(DocType::Habilitation) => Ok(Category::Thesis),
        Some(DocType::MasterThesis)
        | Some(DocType::Report)
        | Some(DocType::Undefined)
        | Some(DocType::Other)
        | Some(DocType::Lecture) => Ok(Category::OtherPublication),
        Some(DocType::ConferencePaper) => {
            if record.invited_communication == Some(1) {
                Ok(Category::InvitedTalk)
            } else if record.proceedings == Some(0) {
                Ok(Category::TalkWithoutProceedings)
            } else if record.audience == Some(2) {
                Ok(Category::InternationalProceedings)
            } else {
                Ok(Category::NationalProceedings)
            }
        }
        Some(DocType::Article) => {
            if record.peer_reviewing == Some(0) {
                Ok(Category::ArticleWithoutPeerReview)
            } else if record.audience == Some(2) {
                Ok(Category::InternationalJournalArticle)
            } else {
                Ok(Category::NationalJournalArticle)
            }
        }
        Some(DocType::Unknown(other)) => Err(Error::Classification {
            hal_id: record.hal_id.clone(),
            detail: format!("unknown document type '{}'", other),
        }),
        None => Err(Error::Classification {
            hal_id: record.hal_id.clone(),
            detail: "record has no document type".to_string(),
        }),
    }
}

/// Records bucketed by category, in taxonomy declaration order
///
/// Only categories with at least one record appear. Within a bucket, records
/// keep the order they were handed in.
#[derive(Debug, Default)]
pub struct GroupedRecords {
    groups: Vec<(Category, Vec<Record>)>,
}

impl GroupedRecords {
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Record])> {
        self.groups.iter().map(|(c, r)| (*c, r.as_slice()))
    }

    pub fn get(&self, category: Category) -> &[Record] {
        self.groups
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, r)| r.as_slice())
            .unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, r)| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Classify and bucket a record set
///
/// Fails on the first unclassifiable record; callers that want partial output
/// must filter beforehand.
pub fn group_by_category(records: Vec<Record>) -> Result<GroupedRecords, Error> {
    let mut buckets: Vec<Vec<Record>> = (0..Category::ALL.len()).map(|_| Vec::new()).collect();
    for record in records {
        let category = classify(&record)?;
        let idx = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        buckets[idx].push(record);
    }

    let groups = Category::ALL
        .iter()
        .zip(buckets)
        .filter(|(_, records)| !records.is_empty())
        .map(|(category, records)| (*category, records))
        .collect();
    Ok(GroupedRecords { groups })
}
