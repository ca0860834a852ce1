use argon2::password_hash::{SaltString, rand_core};
use portcullis_core::{EncryptorError, PasswordEncryptor};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

pub const SHA256: &str = "sha256";

/// Hex SHA-256 over password then salt. Kept for members migrated from older systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Encryptor;

impl PasswordEncryptor for Sha256Encryptor {
    fn encrypt(
        &self,
        password: &Secret<String>,
        salt: Option<&str>,
    ) -> Result<String, EncryptorError> {
        let mut hasher = Sha256::new();
        hasher.update(password.expose_secret().as_bytes());
        hasher.update(salt.unwrap_or_default().as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    fn salt(&self) -> Option<String> {
        Some(SaltString::generate(&mut rand_core::OsRng).as_str().to_owned())
    }
}
