use std::sync::Arc;

use portcullis_core::{LoginAttempt, LoginAttemptStore, LoginAttemptStoreError};
use tokio::sync::RwLock;

#[derive(Default, Clone)]
pub struct HashMapLoginAttemptStore {
    attempts: Arc<RwLock<Vec<LoginAttempt>>>,
}

impl HashMapLoginAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded attempt, oldest first.
    pub async fn attempts(&self) -> Vec<LoginAttempt> {
        self.attempts.read().await.clone()
    }

    pub async fn attempts_for_email(&self, email: &str) -> Vec<LoginAttempt> {
        self.attempts
            .read()
            .await
            .iter()
            .filter(|attempt| attempt.email() == email)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl LoginAttemptStore for HashMapLoginAttemptStore {
    async fn write(&self, attempt: LoginAttempt) -> Result<(), LoginAttemptStoreError> {
        self.attempts.write().await.push(attempt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use portcullis_core::LoginAttemptStatus;

    use super::*;

    #[tokio::test]
    async fn keeps_attempts_in_order() {
        let store = HashMapLoginAttemptStore::new();
        for status in [LoginAttemptStatus::Failure, LoginAttemptStatus::Success] {
            store
                .write(LoginAttempt::new(status, None, "a@example.com", "127.0.0.1"))
                .await
                .unwrap();
        }
        store
            .write(LoginAttempt::new(
                LoginAttemptStatus::Failure,
                None,
                "b@example.com",
                "",
            ))
            .await
            .unwrap();

        let for_a = store.attempts_for_email("a@example.com").await;
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[1].status(), LoginAttemptStatus::Success);
        assert_eq!(store.attempts().await.len(), 3);
    }
}
