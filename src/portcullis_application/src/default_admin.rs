use portcullis_core::{
    Member, MemberStore, MemberStoreError, UniqueIdentifierField, constant_time_eq,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

pub const DEFAULT_ADMIN_FIRST_NAME: &str = "Default Admin";

#[derive(Debug, thiserror::Error)]
pub enum DefaultAdminError {
    #[error("No default admin has been configured")]
    NotConfigured,
    #[error("Member store error: {0}")]
    MemberStoreError(#[from] MemberStoreError),
}

/// Configured emergency login, valid whether or not a matching member row exists.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultAdminCredentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DefaultAdminService {
    credentials: Option<DefaultAdminCredentials>,
}

impl DefaultAdminService {
    pub fn new(credentials: Option<DefaultAdminCredentials>) -> Self {
        Self { credentials }
    }

    pub fn has_default_admin(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn is_default_admin(&self, email: Option<&str>) -> bool {
        match (&self.credentials, email) {
            (Some(credentials), Some(email)) => constant_time_eq(&credentials.username, email),
            _ => false,
        }
    }

    /// Both halves are always compared so the answer takes the same time whichever is wrong.
    pub fn is_default_admin_credentials(
        &self,
        email: Option<&str>,
        password: &Secret<String>,
    ) -> bool {
        let Some(credentials) = &self.credentials else {
            return false;
        };
        let username_matches = constant_time_eq(&credentials.username, email.unwrap_or_default());
        let password_matches = constant_time_eq(
            credentials.password.expose_secret(),
            password.expose_secret(),
        );
        username_matches & password_matches
    }

    /// The member backing the default admin, written to `store` on first use.
    #[tracing::instrument(name = "DefaultAdminService::find_or_create", skip_all)]
    pub async fn find_or_create_default_admin<M>(
        &self,
        store: &M,
        password_encryption: &str,
    ) -> Result<Member, DefaultAdminError>
    where
        M: MemberStore + ?Sized,
    {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(DefaultAdminError::NotConfigured)?;

        if let Some(admin) = store
            .find_by_identifier(UniqueIdentifierField::Email, &credentials.username)
            .await?
        {
            return Ok(admin);
        }

        tracing::info!("Creating default admin member");
        let admin = Member::new(credentials.username.clone(), password_encryption)
            .with_first_name(DEFAULT_ADMIN_FIRST_NAME);
        Ok(store.write(admin).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> DefaultAdminService {
        DefaultAdminService::new(Some(DefaultAdminCredentials {
            username: "admin@example.com".to_string(),
            password: Secret::new("letmein".to_string()),
        }))
    }

    #[test]
    fn recognises_admin_identifier() {
        let service = service();
        assert!(service.is_default_admin(Some("admin@example.com")));
        assert!(!service.is_default_admin(Some("someone@example.com")));
        assert!(!service.is_default_admin(None));
        assert!(!DefaultAdminService::default().is_default_admin(Some("admin@example.com")));
    }

    #[test]
    fn credentials_require_both_halves() {
        let service = service();
        let right = Secret::new("letmein".to_string());
        let wrong = Secret::new("letmeout".to_string());
        assert!(service.is_default_admin_credentials(Some("admin@example.com"), &right));
        assert!(!service.is_default_admin_credentials(Some("admin@example.com"), &wrong));
        assert!(!service.is_default_admin_credentials(Some("other@example.com"), &right));
        assert!(!service.is_default_admin_credentials(None, &right));
    }
}
