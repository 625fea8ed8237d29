//! Column specifications.

use serde::Serialize;

use crate::error::{ColumnSpecIssue, ModelError, Result};

/// How one column of a dataset takes part in the comparison.
///
/// Identifier columns are never compared; they are carried along so that a
/// matched pair can be shown to a reader. Comparable columns contribute to
/// the aggregate score in proportion to their weight.
///
/// # Example
///
/// ```
/// use dupescan_model::ColumnSpec;
///
/// let name = ColumnSpec::comparable("name", 0.8)?
///     .with_match_case(false)
///     .with_ignore_diacritics(true);
/// assert!(!name.is_identifier());
/// assert_eq!(name.weight(), 0.8);
/// # Ok::<(), dupescan_model::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    name: String,
    identifier: bool,
    displayed: bool,
    match_case: bool,
    ignore_diacritics: bool,
    weight: f64,
    description: Option<String>,
}

impl ColumnSpec {
    /// A column scored with the given weight.
    ///
    /// Fails when `name` is empty or `weight` lies outside `[0, 1]`.
    pub fn comparable(name: impl Into<String>, weight: f64) -> Result<Self> {
        let name = validate_name(name.into())?;
        if !(0.0..=1.0).contains(&weight) {
            return Err(ModelError::InvalidColumnSpec {
                name,
                issue: ColumnSpecIssue::WeightOutOfRange(weight),
            });
        }
        Ok(Self {
            name,
            identifier: false,
            displayed: false,
            match_case: true,
            ignore_diacritics: false,
            weight,
            description: None,
        })
    }

    /// An identifier column: displayed, never compared.
    pub fn identifier(name: impl Into<String>) -> Result<Self> {
        let name = validate_name(name.into())?;
        Ok(Self {
            name,
            identifier: true,
            displayed: true,
            match_case: true,
            ignore_diacritics: false,
            weight: 0.0,
            description: None,
        })
    }

    #[must_use]
    pub fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    #[must_use]
    pub fn with_match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }

    #[must_use]
    pub fn with_ignore_diacritics(mut self, ignore_diacritics: bool) -> Self {
        self.ignore_diacritics = ignore_diacritics;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn match_case(&self) -> bool {
        self.match_case
    }

    pub fn ignore_diacritics(&self) -> bool {
        self.ignore_diacritics
    }

    /// Weight in `[0, 1]`; always 0 for identifier columns.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the column contributes to the aggregate score.
    pub fn is_scored(&self) -> bool {
        !self.identifier && self.weight > 0.0
    }

    /// Whether the column appears in reports.
    pub fn is_shown(&self) -> bool {
        self.identifier || self.displayed
    }
}

fn validate_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(ModelError::InvalidColumnSpec {
            name,
            issue: ColumnSpecIssue::EmptyName,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparable_defaults() {
        let column = ColumnSpec::comparable("city", 0.5).unwrap();
        assert!(!column.is_identifier());
        assert!(!column.is_displayed());
        assert!(column.match_case());
        assert!(!column.ignore_diacritics());
        assert!(column.is_scored());
        assert_eq!(column.description(), None);
    }

    #[test]
    fn identifier_defaults() {
        let column = ColumnSpec::identifier("id").unwrap();
        assert!(column.is_identifier());
        assert!(column.is_shown());
        assert_eq!(column.weight(), 0.0);
        assert!(!column.is_scored());
    }

    #[test]
    fn rejects_out_of_range_weight() {
        for weight in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = ColumnSpec::comparable("city", weight).unwrap_err();
            assert!(matches!(
                err,
                ModelError::InvalidColumnSpec {
                    issue: ColumnSpecIssue::WeightOutOfRange(_),
                    ..
                }
            ));
        }
        assert!(ColumnSpec::comparable("city", 0.0).is_ok());
        assert!(ColumnSpec::comparable("city", 1.0).is_ok());
    }

    #[test]
    fn rejects_blank_name() {
        let err = ColumnSpec::identifier("  ").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidColumnSpec {
                issue: ColumnSpecIssue::EmptyName,
                ..
            }
        ));
    }

    #[test]
    fn zero_weight_column_is_not_scored() {
        let column = ColumnSpec::comparable("notes", 0.0)
            .unwrap()
            .with_displayed(true);
        assert!(!column.is_scored());
        assert!(column.is_shown());
    }
}
