pub mod argon2_encryptor;
pub mod plaintext_encryptor;
pub mod sha256_encryptor;

pub use argon2_encryptor::{ARGON2ID, Argon2Encryptor};
pub use plaintext_encryptor::{NONE, PlaintextEncryptor};
pub use sha256_encryptor::{SHA256, Sha256Encryptor};

use portcullis_application::PasswordEncryptorRegistry;

/// Registry with every shipped algorithm.
pub fn default_registry() -> PasswordEncryptorRegistry {
    PasswordEncryptorRegistry::new()
        .with_encryptor(ARGON2ID, Argon2Encryptor::default())
        .with_encryptor(SHA256, Sha256Encryptor)
        .with_encryptor(NONE, PlaintextEncryptor)
}
