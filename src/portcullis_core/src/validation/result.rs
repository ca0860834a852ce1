use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Contract violations raised while recording a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationResultError {
    #[error("Don't use a numeric code '{0}'. Use a string.")]
    NumericCode(String),
    #[error("Message codes must not be empty")]
    EmptyCode,
}

/// The kind of a message, rendered by forms as a CSS class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MessageType {
    #[default]
    Bad,
    Warning,
    Good,
    Required,
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Bad => "bad",
            MessageType::Warning => "warning",
            MessageType::Good => "good",
            MessageType::Required => "required",
            MessageType::Other(other) => other,
        }
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        match value {
            "bad" => MessageType::Bad,
            "warning" => MessageType::Warning,
            "good" => MessageType::Good,
            "required" => MessageType::Required,
            other => MessageType::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MessageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A de-duplication key for a message. Codes are identifiers, never counters,
/// so anything that parses as a number is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageCode(String);

impl MessageCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for MessageCode {
    type Error = ValidationResultError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ValidationResultError::EmptyCode);
        }
        if is_numeric(value) {
            return Err(ValidationResultError::NumericCode(value.to_owned()));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for MessageCode {
    type Error = ValidationResultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MessageCode::try_from(value.as_str())
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Integers, decimals and exponent notation count as numeric; `inf`/`nan` do not.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed.parse::<f64>().is_ok()
}

/// A message about to be recorded, with every optional attribute spelled out.
#[derive(Debug, Clone)]
pub struct ValidationMessage {
    message: String,
    field_name: Option<String>,
    message_type: MessageType,
    code: Option<String>,
    allow_html: bool,
}

impl ValidationMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_name: None,
            message_type: MessageType::Bad,
            code: None,
            allow_html: false,
        }
    }

    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn message_type(mut self, message_type: impl Into<MessageType>) -> Self {
        self.message_type = message_type.into();
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Marks the message as already containing HTML, so it is rendered unescaped.
    pub fn allow_html(mut self) -> Self {
        self.allow_html = true;
        self
    }

    fn into_entry(self) -> Result<ValidationEntry, ValidationResultError> {
        let code = self.code.map(MessageCode::try_from).transpose()?;
        Ok(ValidationEntry {
            message: self.message,
            field_name: self.field_name,
            message_type: self.message_type,
            code,
            allow_html: self.allow_html,
        })
    }
}

/// A recorded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationEntry {
    message: String,
    field_name: Option<String>,
    message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<MessageCode>,
    #[serde(skip)]
    allow_html: bool,
}

impl ValidationEntry {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    pub fn code(&self) -> Option<&MessageCode> {
        self.code.as_ref()
    }

    /// The message as it should be placed in markup.
    pub fn html_message(&self) -> String {
        if self.allow_html {
            self.message.clone()
        } else {
            escape_html(&self.message)
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Field-scoped message as returned by [`ValidationResult::field_errors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMessage<'a> {
    pub message: &'a str,
    pub message_type: &'a MessageType,
}

/// Validity flag plus an ordered list of messages, accumulated over one operation.
///
/// A fresh result is valid. Recording any error flips it to invalid for good; plain
/// messages never touch validity. Entries keep strict insertion order. Re-recording a
/// code replaces the earlier entry in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "valid")]
    is_valid: bool,
    #[serde(rename = "messages")]
    entries: Vec<ValidationEntry>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            entries: Vec::new(),
        }
    }

    pub fn valid(&self) -> bool {
        self.is_valid
    }

    pub fn entries(&self) -> &[ValidationEntry] {
        &self.entries
    }

    pub fn add_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.is_valid = false;
        self.push(ValidationEntry::plain(None, message.into(), MessageType::Bad))
    }

    pub fn add_field_error(
        &mut self,
        field_name: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.is_valid = false;
        self.push(ValidationEntry::plain(
            Some(field_name.into()),
            message.into(),
            MessageType::Bad,
        ))
    }

    pub fn add_message(
        &mut self,
        message: impl Into<String>,
        message_type: impl Into<MessageType>,
    ) -> &mut Self {
        self.push(ValidationEntry::plain(
            None,
            message.into(),
            message_type.into(),
        ))
    }

    pub fn add_field_message(
        &mut self,
        field_name: impl Into<String>,
        message: impl Into<String>,
        message_type: impl Into<MessageType>,
    ) -> &mut Self {
        self.push(ValidationEntry::plain(
            Some(field_name.into()),
            message.into(),
            message_type.into(),
        ))
    }

    /// Records an error with every attribute explicit. A bad code leaves the result untouched.
    pub fn record_error(
        &mut self,
        message: ValidationMessage,
    ) -> Result<&mut Self, ValidationResultError> {
        let entry = message.into_entry()?;
        self.is_valid = false;
        Ok(self.push(entry))
    }

    /// Records a message with every attribute explicit, without affecting validity.
    pub fn record_message(
        &mut self,
        message: ValidationMessage,
    ) -> Result<&mut Self, ValidationResultError> {
        let entry = message.into_entry()?;
        Ok(self.push(entry))
    }

    fn push(&mut self, entry: ValidationEntry) -> &mut Self {
        let existing = entry
            .code
            .as_ref()
            .and_then(|code| self.position_of(code));
        match existing {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        self
    }

    fn position_of(&self, code: &MessageCode) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.code.as_ref() == Some(code))
    }

    pub fn message_list(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.message()).collect()
    }

    pub fn code_list(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.code.as_ref().map(MessageCode::as_str))
            .collect()
    }

    /// Field-scoped messages keyed by field name; the last message per field wins.
    pub fn field_errors(&self) -> BTreeMap<&str, FieldMessage<'_>> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry.field_name().map(|field| {
                    (
                        field,
                        FieldMessage {
                            message: &entry.message,
                            message_type: &entry.message_type,
                        },
                    )
                })
            })
            .collect()
    }

    pub fn message(&self) -> String {
        self.message_list().join("; ")
    }

    /// Messages not tied to any field.
    pub fn overall_message(&self) -> String {
        self.entries
            .iter()
            .filter(|entry| entry.field_name.is_none())
            .map(ValidationEntry::message)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn starred_list(&self) -> String {
        format!(" * {}", self.message_list().join("\n * "))
    }

    /// Folds `other` into this result: valid only if both were, entries appended in order,
    /// coded entries from `other` replacing same-coded entries already here.
    pub fn combine_and(&mut self, other: ValidationResult) -> &mut Self {
        self.is_valid = self.is_valid && other.is_valid;
        for entry in other.entries {
            self.push(entry);
        }
        self
    }
}

impl ValidationEntry {
    fn plain(field_name: Option<String>, message: String, message_type: MessageType) -> Self {
        Self {
            message,
            field_name,
            message_type,
            code: None,
            allow_html: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn fresh_result_is_valid_and_empty() {
        let result = ValidationResult::new();
        assert!(result.valid());
        assert!(result.message_list().is_empty());
        assert_eq!(result.message(), "");
    }

    #[test]
    fn message_joins_with_semicolons() {
        let mut result = ValidationResult::new();
        result.add_error("A").add_error("B");
        assert_eq!(result.message(), "A; B");
    }

    #[test]
    fn numeric_codes_are_rejected() {
        let mut result = ValidationResult::new();
        for code in ["123", "1.5", " 42", "-7", "1e3"] {
            let err = result
                .record_error(ValidationMessage::new("numeric").code(code))
                .unwrap_err();
            assert_eq!(err, ValidationResultError::NumericCode(code.to_owned()));
        }
        assert!(result.valid());
        assert!(result.entries().is_empty());
    }

    #[test]
    fn non_numeric_lookalikes_are_accepted() {
        for code in ["dup", "e", "inf", "1a", "nan"] {
            assert!(MessageCode::try_from(code).is_ok(), "{code} should be accepted");
        }
    }

    #[test]
    fn same_code_overwrites_in_place() {
        let mut result = ValidationResult::new();
        result.add_error("first");
        result
            .record_error(ValidationMessage::new("original").code("dup"))
            .unwrap();
        result.add_error("last");
        result
            .record_error(ValidationMessage::new("replacement").code("dup"))
            .unwrap();

        assert_eq!(result.message_list(), vec!["first", "replacement", "last"]);
        assert_eq!(result.code_list(), vec!["dup"]);
    }

    #[test]
    fn messages_do_not_affect_validity() {
        let mut result = ValidationResult::new();
        result
            .add_message("note", MessageType::Good)
            .add_field_message("Email", "check spelling", "warning");
        assert!(result.valid());
        assert_eq!(result.message(), "note; check spelling");
    }

    #[test]
    fn combine_and_merges_validity_and_entries() {
        let mut a = ValidationResult::new();
        a.add_message("from a", MessageType::Good);
        a.record_message(ValidationMessage::new("a coded").code("shared"))
            .unwrap();

        let mut b = ValidationResult::new();
        b.add_error("from b");
        b.record_error(ValidationMessage::new("b coded").code("shared"))
            .unwrap();

        a.combine_and(b);

        assert!(!a.valid());
        assert_eq!(a.message_list(), vec!["from a", "b coded", "from b"]);
    }

    #[test]
    fn field_errors_keep_last_write_per_field() {
        let mut result = ValidationResult::new();
        result
            .add_field_error("Email", "missing")
            .add_error("global")
            .add_field_error("Email", "malformed")
            .add_field_message("Password", "weak", MessageType::Warning);

        let fields = result.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["Email"].message, "malformed");
        assert_eq!(fields["Password"].message_type, &MessageType::Warning);
        assert_eq!(result.overall_message(), "global");
    }

    #[test]
    fn starred_list_prefixes_each_message() {
        let mut result = ValidationResult::new();
        result.add_error("A").add_error("B");
        assert_eq!(result.starred_list(), " * A\n * B");
    }

    #[test]
    fn html_is_escaped_unless_allowed() {
        let mut result = ValidationResult::new();
        result.add_error("details don't <match>");
        result
            .record_error(ValidationMessage::new("<b>bold</b>").allow_html())
            .unwrap();

        let entries = result.entries();
        assert_eq!(entries[0].message(), "details don't <match>");
        assert_eq!(entries[0].html_message(), "details don&#039;t &lt;match&gt;");
        assert_eq!(entries[1].html_message(), "<b>bold</b>");
    }

    #[test]
    fn serializes_to_json() {
        let mut result = ValidationResult::new();
        result.add_field_error("Email", "required");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "messages": [
                    { "message": "required", "fieldName": "Email", "messageType": "bad" }
                ]
            })
        );
    }

    #[quickcheck]
    fn any_error_invalidates_for_good(messages: Vec<(String, bool)>) -> bool {
        let mut result = ValidationResult::new();
        let mut saw_error = false;
        for (message, is_error) in messages {
            if is_error {
                result.add_error(message);
                saw_error = true;
            } else {
                result.add_message(message, MessageType::Good);
            }
            if result.valid() == saw_error {
                return false;
            }
        }
        true
    }

    #[quickcheck]
    fn combine_and_is_logical_and(left_errors: u8, right_errors: u8) -> bool {
        let mut left = ValidationResult::new();
        for i in 0..left_errors % 4 {
            left.add_error(format!("left {i}"));
        }
        let mut right = ValidationResult::new();
        for i in 0..right_errors % 4 {
            right.add_error(format!("right {i}"));
        }
        let expected_valid = left.valid() && right.valid();
        let expected_len = left.entries().len() + right.entries().len();

        left.combine_and(right);
        left.valid() == expected_valid && left.entries().len() == expected_len
    }
}
