pub mod domain;
pub mod ports;
pub mod validation;

// Re-export commonly used types for convenience
pub use domain::{
    identifier::UniqueIdentifierField,
    lockout::LockoutPolicy,
    login_attempt::{LoginAttempt, LoginAttemptStatus},
    login_data::{LoginData, SubmittedValue},
    member::{Member, MemberId, MemberRecord},
};

pub use ports::{
    repositories::{LoginAttemptStore, LoginAttemptStoreError, MemberStore, MemberStoreError},
    services::{
        AuthenticationEvent, AuthenticationEventKind, AuthenticationObserver, EncryptorError,
        PasswordEncryptor, constant_time_eq,
    },
};

pub use validation::{
    exception::ValidationException,
    result::{
        FieldMessage, MessageCode, MessageType, ValidationEntry, ValidationMessage,
        ValidationResult, ValidationResultError,
    },
};
