use std::ops::BitOr;
use std::sync::{Arc, OnceLock};

use chrono::Utc;
use portcullis_core::{
    AuthenticationEvent, AuthenticationEventKind, EncryptorError, LoginAttempt,
    LoginAttemptStatus, LoginAttemptStore, LoginAttemptStoreError, LoginData, Member,
    MemberStore, MemberStoreError, PasswordEncryptor, SubmittedValue, ValidationResult,
};
use secrecy::{ExposeSecret, Secret};

use crate::{
    config::AuthenticatorConfig,
    default_admin::{DefaultAdminError, DefaultAdminService},
    encryptor_registry::PasswordEncryptorRegistry,
    hooks::AuthenticationHooks,
};

/// Shown for every credential mismatch, whether the account exists or not.
pub const WRONG_CREDENTIALS_MESSAGE: &str =
    "The provided details don't seem to be correct. Please try again.";
pub const NO_PASSWORD_MESSAGE: &str = "There is no password on this member.";

const TIMING_PLACEHOLDER_PASSWORD: &str = "portcullis-timing-placeholder";

/// Error types specific to the authenticator. A rejected login is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Bad email passed to MemberAuthenticator::authenticate(): {0}")]
    MalformedEmail(String),
    #[error("Member store error: {0}")]
    MemberStoreError(#[from] MemberStoreError),
    #[error("Login attempt store error: {0}")]
    LoginAttemptStoreError(#[from] LoginAttemptStoreError),
    #[error("Password encryptor error: {0}")]
    EncryptorError(#[from] EncryptorError),
    #[error("Default admin error: {0}")]
    DefaultAdminError(#[from] DefaultAdminError),
    #[error("Password check did not complete: {0}")]
    PasswordCheckError(String),
}

/// Bitmask of the services an authenticator offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorServices(u8);

impl AuthenticatorServices {
    pub const LOGIN: Self = Self(1);
    pub const LOGOUT: Self = Self(2);
    pub const CHANGE_PASSWORD: Self = Self(4);
    pub const RESET_PASSWORD: Self = Self(8);
    pub const CMS_LOGIN: Self = Self(16);
    pub const CHECK_PASSWORD: Self = Self(32);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AuthenticatorServices {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Authenticates members by identifier and password.
///
/// Every check runs to completion and every credential mismatch produces the same
/// message, so a caller cannot tell an unknown account from a wrong password.
pub struct MemberAuthenticator<M, A>
where
    M: MemberStore,
    A: LoginAttemptStore,
{
    member_store: M,
    attempt_store: A,
    encryptors: PasswordEncryptorRegistry,
    default_admin: DefaultAdminService,
    hooks: AuthenticationHooks,
    config: AuthenticatorConfig,
    timing_placeholder: OnceLock<Option<String>>,
}

impl<M, A> MemberAuthenticator<M, A>
where
    M: MemberStore,
    A: LoginAttemptStore,
{
    pub fn new(
        member_store: M,
        attempt_store: A,
        encryptors: PasswordEncryptorRegistry,
        default_admin: DefaultAdminService,
        config: AuthenticatorConfig,
    ) -> Self {
        Self {
            member_store,
            attempt_store,
            encryptors,
            default_admin,
            hooks: AuthenticationHooks::default(),
            config,
            timing_placeholder: OnceLock::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: AuthenticationHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut AuthenticationHooks {
        &mut self.hooks
    }

    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    pub fn member_store(&self) -> &M {
        &self.member_store
    }

    pub fn attempt_store(&self) -> &A {
        &self.attempt_store
    }

    pub fn encryptors(&self) -> &PasswordEncryptorRegistry {
        &self.encryptors
    }

    pub fn supported_services(&self) -> AuthenticatorServices {
        AuthenticatorServices::LOGIN
            | AuthenticatorServices::LOGOUT
            | AuthenticatorServices::CHANGE_PASSWORD
            | AuthenticatorServices::RESET_PASSWORD
            | AuthenticatorServices::CHECK_PASSWORD
    }

    /// Runs [`Self::authenticate`] against a fresh result and hands both back.
    pub async fn login(
        &self,
        data: &LoginData,
    ) -> Result<(Option<Member>, ValidationResult), AuthenticationError> {
        let mut result = ValidationResult::new();
        let member = self.authenticate(data, &mut result).await?;
        Ok((member, result))
    }

    /// Authenticates and records the attempt. Returns the member only when `result`
    /// is still valid; a rejected login is `Ok(None)`.
    #[tracing::instrument(name = "MemberAuthenticator::authenticate", skip_all)]
    pub async fn authenticate(
        &self,
        data: &LoginData,
        result: &mut ValidationResult,
    ) -> Result<Option<Member>, AuthenticationError> {
        let member = self.authenticate_member(data, result, None).await?;

        self.record_login_attempt(data, member.as_ref(), result.valid())
            .await?;

        if result.valid() {
            tracing::info!("Authentication succeeded");
            Ok(member)
        } else {
            tracing::info!("Authentication rejected");
            Ok(None)
        }
    }

    /// Resolves the member for `data` and checks its credentials, accumulating every
    /// failure into `result`. The resolved member is returned even when the check
    /// failed, so callers can attribute the attempt. `member` skips the lookup.
    #[tracing::instrument(name = "MemberAuthenticator::authenticate_member", skip_all)]
    pub async fn authenticate_member(
        &self,
        data: &LoginData,
        result: &mut ValidationResult,
        member: Option<Member>,
    ) -> Result<Option<Member>, AuthenticationError> {
        let email = data.email();
        let password = data.password();
        let now = Utc::now();
        let mut member = member;

        let as_default_admin = self.default_admin.is_default_admin(email);
        if as_default_admin {
            let admin = self
                .default_admin
                .find_or_create_default_admin(
                    &self.member_store,
                    &self.config.default_password_encryption,
                )
                .await?;
            admin.validate_can_login(result, now);
            if result.valid() {
                if self
                    .default_admin
                    .is_default_admin_credentials(email, &password)
                {
                    tracing::info!(member_id = %admin.id(), "Default admin logged in");
                    return Ok(Some(admin));
                }
                result.add_error(WRONG_CREDENTIALS_MESSAGE);
            }
            member = Some(admin);
        }

        if member.is_none() {
            if let Some(email) = email {
                member = self
                    .member_store
                    .find_by_identifier(self.config.unique_identifier_field, email)
                    .await?;
            }
        }

        match member.as_ref() {
            Some(member) if !as_default_admin => {
                self.check_password(member, &password, result).await?;
            }
            Some(_) => {}
            None => self.burn_unknown_member_check(&password).await,
        }

        let Some(member) = member else {
            // Nothing failed for an unknown account, so the result has to be invalidated here.
            if result.valid() {
                result.add_error(WRONG_CREDENTIALS_MESSAGE);
            }
            return Ok(None);
        };

        if result.valid() {
            self.member_store
                .register_successful_login(member.id())
                .await?;
        } else {
            self.member_store
                .register_failed_login(member.id(), &self.config.lockout, now)
                .await?;
        }

        Ok(Some(member))
    }

    /// Checks `password` against `member`, unless the member is locked out.
    ///
    /// Lockout short-circuits because it does not depend on the secret. Past that point
    /// every step runs, including the hash comparison for a member without a password.
    #[tracing::instrument(name = "MemberAuthenticator::check_password", skip_all, fields(member_id = %member.id()))]
    pub async fn check_password(
        &self,
        member: &Member,
        password: &Secret<String>,
        result: &mut ValidationResult,
    ) -> Result<(), AuthenticationError> {
        member.validate_can_login(result, Utc::now());
        if !result.valid() {
            return Ok(());
        }

        if self
            .default_admin
            .is_default_admin_credentials(Some(member.email()), password)
        {
            return Ok(());
        }

        if !member.has_password() {
            result.add_error(NO_PASSWORD_MESSAGE);
        }

        let encryptor = self.encryptors.for_algorithm(member.password_encryption())?;
        let hash = member
            .password_hash()
            .map(|hash| hash.expose_secret().clone())
            .unwrap_or_default();
        if !verify_password(encryptor, hash, password.clone(), member.clone()).await? {
            result.add_error(WRONG_CREDENTIALS_MESSAGE);
        }

        Ok(())
    }

    /// Spends roughly one hash verification when no member matched, so response time
    /// does not reveal whether the account exists.
    async fn burn_unknown_member_check(&self, password: &Secret<String>) {
        let algorithm = &self.config.default_password_encryption;
        let Ok(encryptor) = self.encryptors.for_algorithm(algorithm) else {
            return;
        };
        let placeholder = self.timing_placeholder.get_or_init(|| {
            let secret = Secret::new(TIMING_PLACEHOLDER_PASSWORD.to_string());
            let salt = encryptor.salt();
            encryptor.encrypt(&secret, salt.as_deref()).ok()
        });
        let Some(hash) = placeholder.clone() else {
            return;
        };
        let stand_in = Member::new(String::new(), algorithm.clone());
        if let Err(e) = verify_password(encryptor, hash, password.clone(), stand_in).await {
            tracing::warn!(error = %e, "Placeholder password check failed");
        }
    }

    #[tracing::instrument(name = "MemberAuthenticator::record_login_attempt", skip_all)]
    async fn record_login_attempt(
        &self,
        data: &LoginData,
        member: Option<&Member>,
        success: bool,
    ) -> Result<(), AuthenticationError> {
        if !self.config.login_recording {
            return Ok(());
        }

        let email = match data.submitted_email() {
            Some(SubmittedValue::Scalar(email)) => email.clone(),
            Some(other) => return Err(AuthenticationError::MalformedEmail(format!("{other:?}"))),
            None => String::new(),
        };

        let (status, kind) = match (success, member) {
            (true, Some(_)) => (LoginAttemptStatus::Success, AuthenticationEventKind::Succeeded),
            (false, Some(_)) => (LoginAttemptStatus::Failure, AuthenticationEventKind::Failed),
            (_, None) => (
                LoginAttemptStatus::Failure,
                AuthenticationEventKind::FailedUnknownUser,
            ),
        };

        self.hooks.notify(&AuthenticationEvent { kind, member, data });

        let ip = data.ip().map(|ip| ip.to_string()).unwrap_or_default();
        let attempt = LoginAttempt::new(status, member.map(Member::id), email, ip);
        self.attempt_store.write(attempt).await?;

        Ok(())
    }
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
async fn verify_password(
    encryptor: Arc<dyn PasswordEncryptor>,
    hash: String,
    candidate: Secret<String>,
    member: Member,
) -> Result<bool, AuthenticationError> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| encryptor.check(&hash, &candidate, member.salt(), &member))
    })
    .await
    .map_err(|e| AuthenticationError::PasswordCheckError(e.to_string()))
}
