use std::collections::HashMap;
use std::sync::Arc;

use portcullis_core::{EncryptorError, Member, PasswordEncryptor};
use secrecy::Secret;

/// Password encryptors keyed by the algorithm identifier stored on each member.
#[derive(Clone, Default)]
pub struct PasswordEncryptorRegistry {
    encryptors: HashMap<String, Arc<dyn PasswordEncryptor>>,
}

impl PasswordEncryptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encryptor(
        mut self,
        algorithm: impl Into<String>,
        encryptor: impl PasswordEncryptor + 'static,
    ) -> Self {
        self.register(algorithm, encryptor);
        self
    }

    /// Registers `encryptor`, replacing any previous one for the same algorithm.
    pub fn register(
        &mut self,
        algorithm: impl Into<String>,
        encryptor: impl PasswordEncryptor + 'static,
    ) {
        self.encryptors.insert(algorithm.into(), Arc::new(encryptor));
    }

    pub fn for_algorithm(
        &self,
        algorithm: &str,
    ) -> Result<Arc<dyn PasswordEncryptor>, EncryptorError> {
        self.encryptors
            .get(algorithm)
            .cloned()
            .ok_or_else(|| EncryptorError::UnknownAlgorithm(algorithm.to_string()))
    }

    pub fn algorithms(&self) -> Vec<&str> {
        let mut algorithms: Vec<&str> = self.encryptors.keys().map(String::as_str).collect();
        algorithms.sort_unstable();
        algorithms
    }

    /// Hashes `password` with `algorithm` and stores the result on `member`.
    pub fn set_password(
        &self,
        member: &mut Member,
        algorithm: &str,
        password: &Secret<String>,
    ) -> Result<(), EncryptorError> {
        let encryptor = self.for_algorithm(algorithm)?;
        let salt = encryptor.salt();
        let hash = encryptor.encrypt(password, salt.as_deref())?;
        member.set_password_hash(hash, salt, algorithm);
        Ok(())
    }
}

impl std::fmt::Debug for PasswordEncryptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEncryptorRegistry")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}
