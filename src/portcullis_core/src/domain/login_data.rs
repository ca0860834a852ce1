use std::net::IpAddr;

use secrecy::Secret;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A submitted form value. Only a plain string is a usable identifier; lists and
/// maps show up when a client tampers with field names (`Email[]=...`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SubmittedValue {
    Scalar(String),
    List(Vec<Value>),
    Map(Map<String, Value>),
}

impl SubmittedValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            SubmittedValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_compound(&self) -> bool {
        !matches!(self, SubmittedValue::Scalar(_))
    }
}

impl From<&str> for SubmittedValue {
    fn from(value: &str) -> Self {
        SubmittedValue::Scalar(value.to_owned())
    }
}

impl From<String> for SubmittedValue {
    fn from(value: String) -> Self {
        SubmittedValue::Scalar(value)
    }
}

/// Credentials as submitted by a login form, plus the caller's address.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginData {
    #[serde(default, alias = "Email")]
    email: Option<SubmittedValue>,
    #[serde(default, alias = "Password")]
    password: Option<Secret<String>>,
    #[serde(skip)]
    ip: Option<IpAddr>,
}

impl LoginData {
    pub fn new(email: impl Into<SubmittedValue>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(Secret::new(password.into())),
            ip: None,
        }
    }

    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    pub fn submitted_email(&self) -> Option<&SubmittedValue> {
        self.email.as_ref()
    }

    /// The identifier to log in with, if a non-empty plain string was submitted.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_ref()
            .and_then(SubmittedValue::as_scalar)
            .filter(|email| !email.is_empty())
    }

    /// The submitted password; an absent field counts as empty.
    pub fn password(&self) -> Secret<String> {
        self.password
            .clone()
            .unwrap_or_else(|| Secret::new(String::new()))
    }

    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn deserializes_scalar_email() {
        let data: LoginData =
            serde_json::from_str(r#"{"Email": "a@example.com", "Password": "pw"}"#).unwrap();
        assert_eq!(data.email(), Some("a@example.com"));
        assert_eq!(data.password().expose_secret(), "pw");
    }

    #[test]
    fn compound_email_is_not_an_identifier() {
        let data: LoginData =
            serde_json::from_str(r#"{"email": ["a@example.com", "b@example.com"]}"#).unwrap();
        assert!(data.submitted_email().unwrap().is_compound());
        assert_eq!(data.email(), None);
        assert_eq!(data.password().expose_secret(), "");
    }

    #[test]
    fn empty_email_is_ignored() {
        let data = LoginData::new("", "secret");
        assert_eq!(data.email(), None);
    }
}
