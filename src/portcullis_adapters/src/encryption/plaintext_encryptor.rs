use portcullis_core::{EncryptorError, PasswordEncryptor};
use secrecy::{ExposeSecret, Secret};

pub const NONE: &str = "none";

/// Stores passwords as given. Only for fixtures and legacy rows awaiting rehash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextEncryptor;

impl PasswordEncryptor for PlaintextEncryptor {
    fn encrypt(
        &self,
        password: &Secret<String>,
        _salt: Option<&str>,
    ) -> Result<String, EncryptorError> {
        Ok(password.expose_secret().clone())
    }
}
