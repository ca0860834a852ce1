use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    identifier::UniqueIdentifierField,
    lockout::LockoutPolicy,
    login_attempt::LoginAttempt,
    member::{Member, MemberId},
};
use crate::validation::exception::ValidationException;

// MemberStore port trait and errors
#[derive(Debug, Error)]
pub enum MemberStoreError {
    #[error("Member not found")]
    MemberNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationException),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for MemberStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MemberNotFound, Self::MemberNotFound) => true,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// First member whose `field` equals `value`, if any.
    async fn find_by_identifier(
        &self,
        field: UniqueIdentifierField,
        value: &str,
    ) -> Result<Option<Member>, MemberStoreError>;

    /// Inserts or updates a member. Business-rule violations abort with
    /// [`MemberStoreError::Validation`].
    async fn write(&self, member: Member) -> Result<Member, MemberStoreError>;

    /// Atomically applies [`Member::register_failed_login`] to the stored row.
    async fn register_failed_login(
        &self,
        id: MemberId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), MemberStoreError>;

    /// Atomically applies [`Member::register_successful_login`] to the stored row.
    async fn register_successful_login(&self, id: MemberId) -> Result<(), MemberStoreError>;
}

// LoginAttemptStore port trait and errors
#[derive(Debug, Error)]
pub enum LoginAttemptStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait LoginAttemptStore: Send + Sync {
    async fn write(&self, attempt: LoginAttempt) -> Result<(), LoginAttemptStoreError>;
}
