use portcullis_core::{LockoutPolicy, UniqueIdentifierField};
use serde::Deserialize;

pub const DEFAULT_PASSWORD_ENCRYPTION: &str = "argon2id";

/// Behaviour switches for [`crate::MemberAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthenticatorConfig {
    /// Persist a login attempt row for every authentication call.
    pub login_recording: bool,
    pub unique_identifier_field: UniqueIdentifierField,
    /// Algorithm used for members created by the authenticator itself.
    pub default_password_encryption: String,
    pub lockout: LockoutPolicy,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            login_recording: false,
            unique_identifier_field: UniqueIdentifierField::Email,
            default_password_encryption: DEFAULT_PASSWORD_ENCRYPTION.to_string(),
            lockout: LockoutPolicy::default(),
        }
    }
}
