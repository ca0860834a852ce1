use std::sync::Arc;

use portcullis_core::{AuthenticationEvent, AuthenticationEventKind, AuthenticationObserver};

/// Ordered audit observers, each listening to every event or to one kind.
#[derive(Clone, Default)]
pub struct AuthenticationHooks {
    observers: Vec<(Option<AuthenticationEventKind>, Arc<dyn AuthenticationObserver>)>,
}

impl AuthenticationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn AuthenticationObserver>) -> &mut Self {
        self.observers.push((None, observer));
        self
    }

    pub fn subscribe_to(
        &mut self,
        kind: AuthenticationEventKind,
        observer: Arc<dyn AuthenticationObserver>,
    ) -> &mut Self {
        self.observers.push((Some(kind), observer));
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invokes matching observers synchronously, in registration order.
    pub fn notify(&self, event: &AuthenticationEvent<'_>) {
        tracing::debug!(event = event.kind.name(), "Dispatching authentication event");
        for (kind, observer) in &self.observers {
            if kind.is_none_or(|kind| kind == event.kind) {
                observer.notify(event);
            }
        }
    }
}
