use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The member field a login identifier is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueIdentifierField {
    #[default]
    #[serde(alias = "email")]
    Email,
    #[serde(alias = "username")]
    Username,
}

impl UniqueIdentifierField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueIdentifierField::Email => "Email",
            UniqueIdentifierField::Username => "Username",
        }
    }

    /// Storage column backing the field.
    pub fn column_name(&self) -> &'static str {
        match self {
            UniqueIdentifierField::Email => "email",
            UniqueIdentifierField::Username => "username",
        }
    }
}

impl fmt::Display for UniqueIdentifierField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UniqueIdentifierField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Email" | "email" => Ok(UniqueIdentifierField::Email),
            "Username" | "username" => Ok(UniqueIdentifierField::Username),
            other => Err(format!("Unknown identifier field: {other}")),
        }
    }
}
