pub mod config;
pub mod default_admin;
pub mod encryptor_registry;
pub mod hooks;
pub mod member_authenticator;

pub use config::{AuthenticatorConfig, DEFAULT_PASSWORD_ENCRYPTION};
pub use default_admin::{DefaultAdminCredentials, DefaultAdminError, DefaultAdminService};
pub use encryptor_registry::PasswordEncryptorRegistry;
pub use hooks::AuthenticationHooks;
pub use member_authenticator::{
    AuthenticationError, AuthenticatorServices, MemberAuthenticator, NO_PASSWORD_MESSAGE,
    WRONG_CREDENTIALS_MESSAGE,
};
