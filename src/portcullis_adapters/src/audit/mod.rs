pub mod tracing_audit_observer;

pub use tracing_audit_observer::TracingAuditObserver;
