pub mod audit;
pub mod config;
pub mod encryption;
pub mod persistence;
pub mod telemetry;

pub use audit::TracingAuditObserver;
pub use encryption::default_registry;
pub use persistence::{
    HashMapLoginAttemptStore, HashMapMemberStore, PostgresLoginAttemptStore,
    PostgresMemberStore, run_migrations,
};
