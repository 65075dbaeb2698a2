//! Core data structures: the publication taxonomy and the HAL record schema.

mod category;
mod record;

pub use category::{comment_exclusion_clause, Category};
pub use record::{sort_by_year_desc, Author, DocType, Record, ResponseBody, SearchResponse};
