use config::{Config, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use portcullis_application::{AuthenticatorConfig, DefaultAdminCredentials};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::constants::{
    BASE_CONFIG_FILE, CONFIG_DIR, DEFAULT_ENVIRONMENT, DEFAULT_MAX_CONNECTIONS, env,
};

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

/// Everything the authenticator and its adapters read at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortcullisSettings {
    #[serde(default)]
    pub security: AuthenticatorConfig,
    #[serde(default)]
    pub default_admin: Option<DefaultAdminCredentials>,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

impl PortcullisSettings {
    /// Loads `config/base`, then `config/{PORTCULLIS_ENV}`, then `PORTCULLIS_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = std::env::var(env::ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("{CONFIG_DIR}/{BASE_CONFIG_FILE}")).required(false))
            .add_source(File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(File::from_str(json, FileFormat::Json)))
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.default_password_encryption.is_empty() {
            return Err(ConfigError::Message(
                "security.default_password_encryption cannot be empty".into(),
            ));
        }

        if let Some(admin) = &self.default_admin {
            if admin.username.is_empty() || admin.password.expose_secret().is_empty() {
                return Err(ConfigError::Message(
                    "default_admin needs both a username and a password".into(),
                ));
            }
        }

        if let Some(database) = &self.database {
            if database.max_connections == 0 {
                return Err(ConfigError::Message(
                    "database.max_connections must be greater than 0".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use portcullis_core::{LockoutPolicy, UniqueIdentifierField};

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = PortcullisSettings::from_json("{}").unwrap();
        assert_eq!(settings.security, AuthenticatorConfig::default());
        assert!(!settings.security.login_recording);
        assert!(settings.default_admin.is_none());
        assert!(settings.database.is_none());
    }

    #[test]
    fn reads_every_section() {
        let settings = PortcullisSettings::from_json(
            r#"{
                "security": {
                    "login_recording": true,
                    "unique_identifier_field": "Username",
                    "default_password_encryption": "sha256",
                    "lockout": { "after_incorrect_logins": 3 }
                },
                "default_admin": { "username": "admin", "password": "hunter2" },
                "database": { "url": "postgres://localhost/portcullis" }
            }"#,
        )
        .unwrap();

        assert!(settings.security.login_recording);
        assert_eq!(
            settings.security.unique_identifier_field,
            UniqueIdentifierField::Username
        );
        assert_eq!(
            settings.security.lockout,
            LockoutPolicy {
                after_incorrect_logins: 3,
                delay_minutes: 15
            }
        );
        let admin = settings.default_admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.password.expose_secret(), "hunter2");
        assert_eq!(
            settings.database.unwrap().max_connections,
            DEFAULT_MAX_CONNECTIONS
        );
    }

    #[test]
    fn rejects_half_configured_default_admin() {
        let err = PortcullisSettings::from_json(
            r#"{ "default_admin": { "username": "admin", "password": "" } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("default_admin"));
    }
}
