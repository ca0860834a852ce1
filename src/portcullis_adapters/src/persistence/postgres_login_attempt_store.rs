use portcullis_core::{LoginAttempt, LoginAttemptStore, LoginAttemptStoreError};
use sqlx::PgPool;

#[derive(Clone)]
pub struct PostgresLoginAttemptStore {
    pool: PgPool,
}

impl PostgresLoginAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresLoginAttemptStore { pool }
    }
}

#[async_trait::async_trait]
impl LoginAttemptStore for PostgresLoginAttemptStore {
    #[tracing::instrument(name = "Recording login attempt in PostgreSQL", skip_all)]
    async fn write(&self, attempt: LoginAttempt) -> Result<(), LoginAttemptStoreError> {
        let query = sqlx::query(
            r#"
                INSERT INTO login_attempts (id, member_id, email, ip, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(attempt.id())
        .bind(attempt.member_id().map(|id| id.as_uuid()))
        .bind(attempt.email())
        .bind(attempt.ip())
        .bind(attempt.status().as_str())
        .bind(attempt.created_at());

        query
            .execute(&self.pool)
            .await
            .map_err(|e| LoginAttemptStoreError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
