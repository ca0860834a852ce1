use secrecy::Secret;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::{login_data::LoginData, member::Member};

/// Length-independent timing is not promised, only content-independent timing.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptorError {
    #[error("No password encryptor found for algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("Password encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Port trait for one password hashing algorithm.
pub trait PasswordEncryptor: Send + Sync {
    fn encrypt(
        &self,
        password: &Secret<String>,
        salt: Option<&str>,
    ) -> Result<String, EncryptorError>;

    /// A fresh salt to store next to a new hash, for algorithms that keep it separately.
    fn salt(&self) -> Option<String> {
        None
    }

    /// Whether `password` matches the stored `hash`. Never short-circuits on content.
    fn check(
        &self,
        hash: &str,
        password: &Secret<String>,
        salt: Option<&str>,
        _member: &Member,
    ) -> bool {
        match self.encrypt(password, salt) {
            Ok(candidate) => constant_time_eq(hash, &candidate),
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthenticationEventKind {
    Succeeded,
    Failed,
    FailedUnknownUser,
}

impl AuthenticationEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            AuthenticationEventKind::Succeeded => "authenticationSucceeded",
            AuthenticationEventKind::Failed => "authenticationFailed",
            AuthenticationEventKind::FailedUnknownUser => "authenticationFailedUnknownUser",
        }
    }
}

/// What an audit observer is told about a finished authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticationEvent<'a> {
    pub kind: AuthenticationEventKind,
    pub member: Option<&'a Member>,
    pub data: &'a LoginData,
}

/// Port trait for audit listeners. Observers see the outcome but cannot change it.
pub trait AuthenticationObserver: Send + Sync {
    fn notify(&self, event: &AuthenticationEvent<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    struct Reversed;

    impl PasswordEncryptor for Reversed {
        fn encrypt(
            &self,
            password: &Secret<String>,
            salt: Option<&str>,
        ) -> Result<String, EncryptorError> {
            let reversed: String = password.expose_secret().chars().rev().collect();
            Ok(format!("{reversed}{}", salt.unwrap_or_default()))
        }
    }

    #[test]
    fn default_check_compares_encrypted_candidate() {
        let member = Member::new("a@example.com", "reversed");
        let password = Secret::new("abc".to_string());
        assert!(Reversed.check("cbaXY", &password, Some("XY"), &member));
        assert!(!Reversed.check("cba", &password, Some("XY"), &member));
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secrets"));
    }
}
