pub mod hashmap_login_attempt_store;
pub mod hashmap_member_store;
pub mod postgres_login_attempt_store;
pub mod postgres_member_store;

pub use hashmap_login_attempt_store::HashMapLoginAttemptStore;
pub use hashmap_member_store::HashMapMemberStore;
pub use postgres_login_attempt_store::PostgresLoginAttemptStore;
pub use postgres_member_store::PostgresMemberStore;

use sqlx::{PgPool, migrate::MigrateError};

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}
