//! Field-level validation of user input before it reaches a store.
//!
//! Validators are pure: they read a [`Values`] map and report every failing
//! field at once, so a form can be re-rendered with all messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::color::ColorPalette;
use crate::date::DateParser;
use crate::models::{
    RecurrenceBasedate, RecurrenceStatus, RecurrenceTimeframe, RecurrenceTrigger,
};
use crate::values::Values;

/// Maximum length of a category name.
pub const CATEGORY_NAME_MAX: usize = 50;

/// Maximum length of a task title.
pub const TASK_TITLE_MAX: usize = 65_535;

/// Maximum length of a task external reference.
pub const TASK_REFERENCE_MAX: usize = 50;

/// Failing fields and their messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Returns true when no field failed.
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Outcome of a validation.
pub type Validation = Result<(), ValidationErrors>;

fn required(values: &Values, field: &str, errors: &mut ValidationErrors, message: &str) {
    if values.text(field).is_none() {
        errors.add(field, message);
    }
}

fn integer(values: &Values, field: &str, errors: &mut ValidationErrors, message: &str) {
    if let Some(raw) = values.text(field) {
        if raw.trim().parse::<i64>().is_err() {
            errors.add(field, message);
        }
    }
}

fn max_length(values: &Values, field: &str, max: usize, errors: &mut ValidationErrors, message: &str) {
    if values.get(field).is_some_and(|v| v.chars().count() > max) {
        errors.add(field, message);
    }
}

/// Validates category input.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryValidator;

impl CategoryValidator {
    /// Rules for a new category: `project_id` and `name` are required.
    pub fn validate_creation(&self, values: &Values) -> Validation {
        let mut errors = ValidationErrors::new();
        required(values, "project_id", &mut errors, "The project id is required");
        required(values, "name", &mut errors, "The name is required");
        self.common_rules(values, &mut errors);
        errors.into_result()
    }

    /// Rules for an existing category: `id` and `name` are required.
    pub fn validate_modification(&self, values: &Values) -> Validation {
        let mut errors = ValidationErrors::new();
        required(values, "id", &mut errors, "The id is required");
        required(values, "name", &mut errors, "The name is required");
        self.common_rules(values, &mut errors);
        errors.into_result()
    }

    fn common_rules(&self, values: &Values, errors: &mut ValidationErrors) {
        integer(values, "id", errors, "The id must be an integer");
        integer(values, "project_id", errors, "The project id must be an integer");
        max_length(
            values,
            "name",
            CATEGORY_NAME_MAX,
            errors,
            &format!("The maximum length is {CATEGORY_NAME_MAX} characters"),
        );
    }
}

/// Validates task input.
#[derive(Debug, Clone, Default)]
pub struct TaskValidator {
    dates: DateParser,
    colors: ColorPalette,
}

impl TaskValidator {
    pub fn new(dates: DateParser) -> Self {
        Self {
            dates,
            colors: ColorPalette,
        }
    }

    /// Rules for a new task: `project_id` and `title` are required, ids must
    /// be integers, dates must parse and the color must exist.
    pub fn validate_creation(&self, values: &Values) -> Validation {
        let mut errors = ValidationErrors::new();
        required(values, "project_id", &mut errors, "The project is required");
        required(values, "title", &mut errors, "The title is required");

        for field in [
            "project_id",
            "column_id",
            "swimlane_id",
            "owner_id",
            "creator_id",
            "category_id",
            "priority",
        ] {
            integer(values, field, &mut errors, "This value must be an integer");
        }
        max_length(
            values,
            "title",
            TASK_TITLE_MAX,
            &mut errors,
            "The title is too long",
        );
        max_length(
            values,
            "reference",
            TASK_REFERENCE_MAX,
            &mut errors,
            &format!("The maximum length is {TASK_REFERENCE_MAX} characters"),
        );

        if let Some(color) = values.text("color_id") {
            if !self.colors.exists(color) {
                errors.add("color_id", "This value is not in the list");
            }
        }

        for field in ["date_due", "date_started"] {
            if let Some(date) = values.text(field) {
                if self.dates.parse_timestamp(date).is_none() {
                    errors.add(field, "Unable to parse this date");
                }
            }
        }

        errors.into_result()
    }

    /// Rules for the recurrence form: `id` is required and every recurrence
    /// field must be one of its known values.
    pub fn validate_edit_recurrence(&self, values: &Values) -> Validation {
        let mut errors = ValidationErrors::new();
        required(values, "id", &mut errors, "The id is required");
        integer(values, "id", &mut errors, "This value must be an integer");

        let choices: [(&str, fn(i64) -> bool); 4] = [
            ("recurrence_status", |v| RecurrenceStatus::from_db(v).is_some()),
            ("recurrence_trigger", |v| RecurrenceTrigger::from_db(v).is_some()),
            ("recurrence_timeframe", |v| RecurrenceTimeframe::from_db(v).is_some()),
            ("recurrence_basedate", |v| RecurrenceBasedate::from_db(v).is_some()),
        ];
        for (field, known) in choices {
            let Some(raw) = values.text(field) else {
                continue;
            };
            match raw.trim().parse::<i64>() {
                Ok(value) if known(value) => {}
                Ok(_) => errors.add(field, "This value is not in the list"),
                Err(_) => errors.add(field, "This value must be an integer"),
            }
        }

        if let Some(raw) = values.text("recurrence_factor") {
            match raw.trim().parse::<i64>() {
                Ok(factor) if factor >= 0 => {}
                Ok(_) => errors.add("recurrence_factor", "This value must be positive"),
                Err(_) => errors.add("recurrence_factor", "This value must be an integer"),
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation_requires_name() {
        let values = Values::new().with("project_id", 5).with("name", "");
        let errors = CategoryValidator.validate_creation(&values).unwrap_err();
        assert_eq!(errors.field("name"), ["The name is required"]);
        assert!(errors.field("project_id").is_empty());
    }

    #[test]
    fn test_category_creation_valid() {
        let values = Values::new().with("project_id", 5).with("name", "Bug");
        assert!(CategoryValidator.validate_creation(&values).is_ok());
    }

    #[test]
    fn test_category_name_length() {
        let values = Values::new().with("id", 1).with("name", "x".repeat(51));
        let errors = CategoryValidator.validate_modification(&values).unwrap_err();
        assert_eq!(errors.field("name").len(), 1);
        assert!(CategoryValidator
            .validate_modification(&Values::new().with("id", 1).with("name", "x".repeat(50)))
            .is_ok());
    }

    #[test]
    fn test_category_modification_requires_integer_id() {
        let values = Values::new().with("id", "abc").with("name", "Bug");
        let errors = CategoryValidator.validate_modification(&values).unwrap_err();
        assert_eq!(errors.field("id"), ["The id must be an integer"]);
    }

    #[test]
    fn test_task_creation_rules() {
        let validator = TaskValidator::default();
        let values = Values::new()
            .with("project_id", 1)
            .with("title", "Ship it")
            .with("color_id", "blue")
            .with("date_due", "2024-02-01");
        assert!(validator.validate_creation(&values).is_ok());

        let values = Values::new()
            .with("project_id", "one")
            .with("color_id", "plaid")
            .with("date_due", "someday");
        let errors = validator.validate_creation(&values).unwrap_err();
        assert!(!errors.field("title").is_empty());
        assert!(!errors.field("project_id").is_empty());
        assert!(!errors.field("color_id").is_empty());
        assert!(!errors.field("date_due").is_empty());
    }

    #[test]
    fn test_recurrence_rules() {
        let validator = TaskValidator::default();
        let values = Values::new()
            .with("id", 3)
            .with("recurrence_status", 1)
            .with("recurrence_trigger", 2)
            .with("recurrence_factor", 1)
            .with("recurrence_timeframe", 1)
            .with("recurrence_basedate", 0);
        assert!(validator.validate_edit_recurrence(&values).is_ok());

        let values = Values::new()
            .with("recurrence_trigger", 9)
            .with("recurrence_factor", "x");
        let errors = validator.validate_edit_recurrence(&values).unwrap_err();
        assert_eq!(errors.field("id"), ["The id is required"]);
        assert_eq!(errors.field("recurrence_trigger"), ["This value is not in the list"]);
        assert_eq!(errors.field("recurrence_factor"), ["This value must be an integer"]);
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "The name is required");
        errors.add("id", "The id is required");
        assert_eq!(
            errors.to_string(),
            "id: The id is required; name: The name is required"
        );
    }
}
