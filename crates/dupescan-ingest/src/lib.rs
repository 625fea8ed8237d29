//! Input collaborators for dupescan.
//!
//! - [`load_description`]: read the XML column description
//! - [`load_dataset`]: read delimited rows into an in-memory [`dupescan_model::Dataset`]

mod description;
mod error;
mod options;
mod rows;

pub use description::{load_description, parse_description};
pub use error::{IngestError, Result};
pub use options::{CsvOptions, MAX_CSV_FILE_SIZE};
pub use rows::{check_file_size, load_dataset, read_dataset};
