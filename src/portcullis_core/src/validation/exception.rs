use thiserror::Error;

use super::result::ValidationResult;

const DEFAULT_ERROR: &str = "Validation error";

/// Aborts an operation whose business rules failed, carrying the full result.
///
/// Failed logins are not reported this way; they are ordinary data in a
/// [`ValidationResult`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationException {
    result: ValidationResult,
    message: String,
}

impl ValidationException {
    pub fn new(result: ValidationResult) -> Self {
        let message = result.message();
        Self { result, message }
    }

    /// A single field-scoped error.
    pub fn create_for_field(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = ValidationResult::new();
        result.add_field_error(field_name, message);
        Self::new(result)
    }

    pub fn result(&self) -> &ValidationResult {
        &self.result
    }

    pub fn into_result(self) -> ValidationResult {
        self.result
    }
}

impl Default for ValidationException {
    fn default() -> Self {
        let mut result = ValidationResult::new();
        result.add_error(DEFAULT_ERROR);
        Self::new(result)
    }
}

impl From<ValidationResult> for ValidationException {
    fn from(result: ValidationResult) -> Self {
        Self::new(result)
    }
}

impl From<String> for ValidationException {
    fn from(message: String) -> Self {
        if message.is_empty() {
            return Self::default();
        }
        let mut result = ValidationResult::new();
        result.add_error(message);
        Self::new(result)
    }
}

impl From<&str> for ValidationException {
    fn from(message: &str) -> Self {
        Self::from(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_result_as_is() {
        let mut result = ValidationResult::new();
        result.add_error("one").add_field_error("Email", "two");
        let exception = ValidationException::from(result.clone());
        assert_eq!(exception.result(), &result);
        assert_eq!(exception.to_string(), "one; two");
    }

    #[test]
    fn string_becomes_single_error() {
        let exception = ValidationException::from("Member already exists");
        assert!(!exception.result().valid());
        assert_eq!(exception.result().message_list(), vec!["Member already exists"]);
    }

    #[test]
    fn empty_or_missing_message_uses_default() {
        for exception in [ValidationException::default(), ValidationException::from("")] {
            assert!(!exception.result().valid());
            assert_eq!(exception.to_string(), "Validation error");
        }
    }

    #[test]
    fn create_for_field_scopes_the_error() {
        let exception = ValidationException::create_for_field("Email", "Invalid email");
        let result = exception.into_result();
        assert_eq!(result.field_errors()["Email"].message, "Invalid email");
        assert_eq!(result.overall_message(), "");
    }
}
