//! Records and the dataset arena that owns them.

use serde::{Deserialize, Serialize};

use crate::description::DatasetDescription;
use crate::error::{ModelError, Result};

/// One row of raw values, one per column. `None` marks an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: Vec<Option<String>>,
}

impl Record {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(Option::as_deref)
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|value| Some(value.into())).collect(),
        }
    }
}

impl From<Vec<Option<String>>> for Record {
    fn from(values: Vec<Option<String>>) -> Self {
        Self { values }
    }
}

/// Every record of a dataset, held in memory and addressed by position.
#[derive(Debug, Clone)]
pub struct Dataset {
    description: DatasetDescription,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(description: DatasetDescription) -> Self {
        Self {
            description,
            records: Vec::new(),
        }
    }

    /// Build a dataset, rejecting the first record whose arity is wrong.
    pub fn from_records<I>(description: DatasetDescription, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut dataset = Self::new(description);
        for record in records {
            dataset.push(record)?;
        }
        Ok(dataset)
    }

    /// Append a record; returns its position.
    pub fn push(&mut self, record: Record) -> Result<usize> {
        let position = self.records.len();
        let expected = self.description.len();
        if record.len() != expected {
            return Err(ModelError::ArityMismatch {
                position,
                expected,
                found: record.len(),
            });
        }
        self.records.push(record);
        Ok(position)
    }

    pub fn description(&self) -> &DatasetDescription {
        &self.description
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of unordered pairs, `n * (n - 1) / 2`.
    pub fn pair_count(&self) -> u64 {
        let n = self.records.len() as u64;
        n * n.saturating_sub(1) / 2
    }
}
