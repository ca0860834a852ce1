//! # Portcullis - Member Authentication Library
//!
//! This is a facade crate that re-exports all public APIs from the portcullis components.
//! Use this crate to get access to all authentication functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! portcullis = { path = "../portcullis" }
//! ```
//!
//! ## Structure
//!
//! - **Validation**: `ValidationResult`, `ValidationException`
//! - **Core domain types**: `Member`, `LoginData`, `LoginAttempt`, etc.
//! - **Ports**: `MemberStore`, `LoginAttemptStore`, `PasswordEncryptor`, `AuthenticationObserver`
//! - **Application**: `MemberAuthenticator` and the services it orchestrates
//! - **Adapters**: in-memory and PostgreSQL stores, encryptors, settings, telemetry

// ============================================================================
// Validation
// ============================================================================

pub use portcullis_core::{
    FieldMessage, MessageCode, MessageType, ValidationEntry, ValidationException,
    ValidationMessage, ValidationResult, ValidationResultError,
};

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use portcullis_core::*;
}

pub use portcullis_core::{
    LockoutPolicy, LoginAttempt, LoginAttemptStatus, LoginData, Member, MemberId, MemberRecord,
    SubmittedValue, UniqueIdentifierField,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository and service trait definitions
pub mod ports {
    pub use portcullis_core::{
        AuthenticationEvent, AuthenticationEventKind, AuthenticationObserver, EncryptorError,
        LoginAttemptStore, LoginAttemptStoreError, MemberStore, MemberStoreError,
        PasswordEncryptor,
    };
}

pub use ports::{
    AuthenticationEvent, AuthenticationEventKind, AuthenticationObserver, LoginAttemptStore,
    MemberStore, PasswordEncryptor,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Authenticator and supporting services
pub mod application {
    pub use portcullis_application::*;
}

pub use portcullis_application::{
    AuthenticationError, AuthenticationHooks, AuthenticatorConfig, DefaultAdminCredentials,
    DefaultAdminService, MemberAuthenticator, PasswordEncryptorRegistry,
    WRONG_CREDENTIALS_MESSAGE,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use portcullis_adapters::persistence::*;
    }

    /// Password encryptor implementations
    pub mod encryption {
        pub use portcullis_adapters::encryption::*;
    }

    /// Audit observers
    pub mod audit {
        pub use portcullis_adapters::audit::*;
    }

    /// Configuration
    pub mod config {
        pub use portcullis_adapters::config::*;
    }

    /// Tracing setup
    pub mod telemetry {
        pub use portcullis_adapters::telemetry::*;
    }
}

pub use portcullis_adapters::{
    HashMapLoginAttemptStore, HashMapMemberStore, PostgresLoginAttemptStore, PostgresMemberStore,
    TracingAuditObserver, default_registry,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing store traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
