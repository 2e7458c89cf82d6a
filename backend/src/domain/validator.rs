//! Field-level validation accumulator.
//!
//! A [`Validator`] collects `(field, message)` pairs while a payload is
//! checked. The first message recorded for a field wins; later complaints
//! about the same field are dropped so clients see the earliest, most
//! specific failure. Validators are cheap and built fresh for every check.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde_json::{Map, Value};

/// Accumulates field-level validation failures in insertion order.
///
/// # Examples
/// ```
/// use movies::domain::Validator;
///
/// let mut validator = Validator::new();
/// validator.check(false, "title", "must be provided");
/// validator.check(false, "title", "must not be more than 500 bytes long");
/// let error = validator.ok().expect_err("title is invalid");
/// assert_eq!(error.get("title"), Some("must be provided"));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<(String, String)>,
}

impl Validator {
    /// Create an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless the field already has one.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.errors.iter().any(|(existing, _)| *existing == field) {
            return;
        }
        self.errors.push((field, message.into()));
    }

    /// Record `message` against `field` only when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    /// Whether no failures have been recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation.
    ///
    /// # Errors
    /// Returns [`ValidationError`] carrying every recorded failure when at
    /// least one check failed.
    pub fn ok(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Field-to-message mapping produced by a failed [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<(String, String)>,
}

impl ValidationError {
    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Iterate over `(field, message)` pairs in the order they were recorded.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// Number of fields that failed validation.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false for errors built by [`Validator::ok`].
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render the failures as a JSON object keyed by field name.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .errors
            .iter()
            .map(|(field, message)| (field.clone(), Value::String(message.clone())))
            .collect();
        Value::Object(map)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (index, (field, message)) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{field} {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Whether every value in `values` is distinct.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn empty_validator_is_ok() {
        let validator = Validator::new();
        assert!(validator.is_valid());
        assert!(validator.ok().is_ok());
    }

    #[rstest]
    fn first_message_for_a_field_wins() {
        let mut validator = Validator::new();
        validator.add_error("year", "must be provided");
        validator.add_error("year", "must not be in the future");

        let error = validator.ok().expect_err("year recorded");
        assert_eq!(error.len(), 1);
        assert_eq!(error.get("year"), Some("must be provided"));
    }

    #[rstest]
    #[case(true, 0)]
    #[case(false, 1)]
    fn check_records_only_failed_conditions(#[case] condition: bool, #[case] expected: usize) {
        let mut validator = Validator::new();
        validator.check(condition, "title", "must be provided");

        let recorded = validator.ok().map_or_else(|error| error.len(), |()| 0);
        assert_eq!(recorded, expected);
    }

    #[rstest]
    fn json_rendering_keeps_insertion_order() {
        let mut validator = Validator::new();
        validator.add_error("title", "must be provided");
        validator.add_error("genres", "must contain at least 1 genre");
        validator.add_error("year", "must be provided");

        let error = validator.ok().expect_err("three failures");
        let rendered = serde_json::to_string(&error.to_json()).expect("serialise");
        assert_eq!(
            rendered,
            r#"{"title":"must be provided","genres":"must contain at least 1 genre","year":"must be provided"}"#
        );
        assert_eq!(
            error.to_json(),
            json!({
                "title": "must be provided",
                "genres": "must contain at least 1 genre",
                "year": "must be provided",
            })
        );
    }

    #[rstest]
    fn display_lists_each_field() {
        let mut validator = Validator::new();
        validator.add_error("title", "must be provided");
        validator.add_error("year", "must not be in the future");

        let error = validator.ok().expect_err("two failures");
        assert_eq!(
            error.to_string(),
            "validation failed: title must be provided; year must not be in the future"
        );
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&["drama"], true)]
    #[case(&["drama", "war"], true)]
    #[case(&["a", "a"], false)]
    #[case(&["drama", "war", "drama"], false)]
    fn unique_detects_duplicates(#[case] values: &[&str], #[case] expected: bool) {
        assert_eq!(unique(values), expected);
    }
}
