use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use portcullis_core::{EncryptorError, Member, PasswordEncryptor};
use secrecy::{ExposeSecret, Secret};

pub const ARGON2ID: &str = "argon2id";

/// Argon2id with PHC-formatted hashes; the salt lives inside the hash string.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Encryptor {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Default for Argon2Encryptor {
    fn default() -> Self {
        Self {
            m_cost: 15000,
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl Argon2Encryptor {
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        Self {
            m_cost,
            t_cost,
            p_cost,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, EncryptorError> {
        let params = Params::new(self.m_cost, self.t_cost, self.p_cost, None)
            .map_err(|e| EncryptorError::EncryptionFailed(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl PasswordEncryptor for Argon2Encryptor {
    fn encrypt(
        &self,
        password: &Secret<String>,
        _salt: Option<&str>,
    ) -> Result<String, EncryptorError> {
        let salt: SaltString = SaltString::generate(&mut rand_core::OsRng);
        self.hasher()?
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| EncryptorError::EncryptionFailed(e.to_string()))
    }

    fn check(
        &self,
        hash: &str,
        password: &Secret<String>,
        _salt: Option<&str>,
        _member: &Member,
    ) -> bool {
        let Ok(expected) = PasswordHash::new(hash) else {
            tracing::debug!("Stored hash is not a PHC string");
            return false;
        };
        let Ok(hasher) = self.hasher() else {
            return false;
        };
        hasher
            .verify_password(password.expose_secret().as_bytes(), &expected)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encryptor() -> Argon2Encryptor {
        Argon2Encryptor::with_params(1024, 1, 1)
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let member = Member::new("a@example.com", ARGON2ID);
        let password = Secret::new("s3cret-passphrase".to_string());
        let hash = encryptor().encrypt(&password, None).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(encryptor().check(&hash, &password, None, &member));
        assert!(!encryptor().check(
            &hash,
            &Secret::new("s3cret-passphrasE".to_string()),
            None,
            &member
        ));
    }

    #[test]
    fn malformed_hash_never_matches() {
        let member = Member::new("a@example.com", ARGON2ID);
        let password = Secret::new(String::new());
        assert!(!encryptor().check("", &password, None, &member));
        assert!(!encryptor().check("plaintext", &password, None, &member));
    }
}
