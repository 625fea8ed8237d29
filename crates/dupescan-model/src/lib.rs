//! Data model for pairwise duplicate scanning.
//!
//! - [`ColumnSpec`]: how one column is compared
//! - [`DatasetDescription`]: the validated, ordered column list
//! - [`Record`] and [`Dataset`]: raw rows and the in-memory arena holding them

mod column;
mod description;
mod error;
mod record;

pub use column::ColumnSpec;
pub use description::DatasetDescription;
pub use error::{ColumnSpecIssue, DescriptionIssue, ModelError, Result};
pub use record::{Dataset, Record};
