use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{identifier::UniqueIdentifierField, lockout::LockoutPolicy};
use crate::validation::result::ValidationResult;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for MemberId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Every persisted column of a member, used to rebuild one from storage.
#[derive(Debug, Clone)]
pub struct MemberRecord {
    pub id: MemberId,
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub password_hash: Option<String>,
    pub salt: Option<String>,
    pub password_encryption: String,
    pub failed_login_count: u32,
    pub locked_out_until: Option<DateTime<Utc>>,
}

/// An account that can be logged in as.
#[derive(Debug, Clone)]
pub struct Member {
    id: MemberId,
    email: String,
    username: Option<String>,
    first_name: Option<String>,
    password_hash: Option<Secret<String>>,
    salt: Option<String>,
    password_encryption: String,
    failed_login_count: u32,
    locked_out_until: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(email: impl Into<String>, password_encryption: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            email: email.into(),
            username: None,
            first_name: None,
            password_hash: None,
            salt: None,
            password_encryption: password_encryption.into(),
            failed_login_count: 0,
            locked_out_until: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_locked_out_until(mut self, until: Option<DateTime<Utc>>) -> Self {
        self.locked_out_until = until;
        self
    }

    /// Replaces the stored credentials. The hash is produced by the encryptor named
    /// by `password_encryption`.
    pub fn set_password_hash(
        &mut self,
        hash: String,
        salt: Option<String>,
        password_encryption: impl Into<String>,
    ) {
        self.password_hash = Some(Secret::new(hash));
        self.salt = salt;
        self.password_encryption = password_encryption.into();
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn identifier(&self, field: UniqueIdentifierField) -> Option<&str> {
        match field {
            UniqueIdentifierField::Email => Some(&self.email),
            UniqueIdentifierField::Username => self.username.as_deref(),
        }
    }

    pub fn password_hash(&self) -> Option<&Secret<String>> {
        self.password_hash.as_ref()
    }

    pub fn has_password(&self) -> bool {
        self.password_hash
            .as_ref()
            .is_some_and(|hash| !hash.expose_secret().is_empty())
    }

    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    pub fn password_encryption(&self) -> &str {
        &self.password_encryption
    }

    pub fn failed_login_count(&self) -> u32 {
        self.failed_login_count
    }

    pub fn locked_out_until(&self) -> Option<DateTime<Utc>> {
        self.locked_out_until
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.locked_out_until.is_some_and(|until| now < until)
    }

    /// Adds an error to `result` if the member may not log in right now.
    pub fn validate_can_login(&self, result: &mut ValidationResult, now: DateTime<Utc>) {
        let Some(until) = self.locked_out_until.filter(|until| now < *until) else {
            return;
        };
        let seconds = (until - now).num_seconds().max(1);
        let minutes = (seconds + 59) / 60;
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        result.add_error(format!(
            "Your account has been temporarily disabled because of too many failed attempts at logging in. Please try again in {minutes} {unit}."
        ));
    }

    /// Counts a failed login, locking the account once the policy threshold is reached.
    pub fn register_failed_login(&mut self, policy: &LockoutPolicy, now: DateTime<Utc>) {
        if !policy.is_enabled() {
            return;
        }
        self.failed_login_count += 1;
        if self.failed_login_count >= policy.after_incorrect_logins {
            self.locked_out_until = Some(policy.locked_until(now));
            self.failed_login_count = 0;
        }
    }

    pub fn register_successful_login(&mut self) {
        self.failed_login_count = 0;
        self.locked_out_until = None;
    }

    /// Write-time rules for a single member. Uniqueness is checked by the store.
    ///
    /// The address format is only enforced on values containing `@`, so a bare login
    /// name such as the default admin's `admin` is accepted.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if self.email.trim().is_empty() {
            result.add_field_error("Email", "Email is required");
        } else if self.email.contains('@') && !EMAIL_PATTERN.is_match(&self.email) {
            result.add_field_error("Email", format!("'{}' is not a valid email", self.email));
        }
        if self.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            result.add_field_error("Username", "Username must not be blank");
        }
        result
    }
}

impl From<MemberRecord> for Member {
    fn from(record: MemberRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            username: record.username,
            first_name: record.first_name,
            password_hash: record.password_hash.map(Secret::new),
            salt: record.salt,
            password_encryption: record.password_encryption,
            failed_login_count: record.failed_login_count,
            locked_out_until: record.locked_out_until,
        }
    }
}
