use portcullis_core::{AuthenticationEvent, AuthenticationEventKind, AuthenticationObserver};

/// Writes every authentication outcome to the `portcullis::audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditObserver;

impl AuthenticationObserver for TracingAuditObserver {
    fn notify(&self, event: &AuthenticationEvent<'_>) {
        let member_id = event.member.map(|member| member.id().to_string());
        let ip = event.data.ip().map(|ip| ip.to_string());
        match event.kind {
            AuthenticationEventKind::Succeeded => tracing::info!(
                target: "portcullis::audit",
                event = event.kind.name(),
                member_id = member_id.as_deref(),
                ip = ip.as_deref(),
                "Member authenticated"
            ),
            AuthenticationEventKind::Failed => tracing::warn!(
                target: "portcullis::audit",
                event = event.kind.name(),
                member_id = member_id.as_deref(),
                ip = ip.as_deref(),
                "Member failed to authenticate"
            ),
            AuthenticationEventKind::FailedUnknownUser => tracing::warn!(
                target: "portcullis::audit",
                event = event.kind.name(),
                ip = ip.as_deref(),
                "Authentication attempted for unknown member"
            ),
        }
    }
}
