use chrono::{DateTime, Utc};
use portcullis_core::{
    LockoutPolicy, Member, MemberId, MemberRecord, MemberStore, MemberStoreError,
    UniqueIdentifierField, ValidationException,
};
use secrecy::ExposeSecret;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

const MEMBER_COLUMNS: &str = "id, email, username, first_name, password_hash, salt, \
     password_encryption, failed_login_count, locked_out_until";

#[derive(Clone)]
pub struct PostgresMemberStore {
    pool: PgPool,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresMemberStore { pool }
    }
}

#[async_trait::async_trait]
impl MemberStore for PostgresMemberStore {
    #[tracing::instrument(name = "Finding member in PostgreSQL", skip_all, fields(field = %field))]
    async fn find_by_identifier(
        &self,
        field: UniqueIdentifierField,
        value: &str,
    ) -> Result<Option<Member>, MemberStoreError> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE {} = $1 ORDER BY created_at LIMIT 1",
            field.column_name()
        );

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(e.to_string()))?;

        row.as_ref()
            .map(member_from_row)
            .transpose()
            .map_err(|e| MemberStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Writing member to PostgreSQL", skip_all)]
    async fn write(&self, member: Member) -> Result<Member, MemberStoreError> {
        let result = member.validate();
        if !result.valid() {
            return Err(ValidationException::from(result).into());
        }

        let failed_login_count = i32::try_from(member.failed_login_count())
            .map_err(|e| MemberStoreError::UnexpectedError(e.to_string()))?;

        let query = sqlx::query(
            r#"
                INSERT INTO members (id, email, username, first_name, password_hash, salt,
                                     password_encryption, failed_login_count, locked_out_until)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (id) DO UPDATE SET
                    email = EXCLUDED.email,
                    username = EXCLUDED.username,
                    first_name = EXCLUDED.first_name,
                    password_hash = EXCLUDED.password_hash,
                    salt = EXCLUDED.salt,
                    password_encryption = EXCLUDED.password_encryption,
                    failed_login_count = EXCLUDED.failed_login_count,
                    locked_out_until = EXCLUDED.locked_out_until
            "#,
        )
        .bind(member.id().as_uuid())
        .bind(member.email())
        .bind(member.username())
        .bind(member.first_name())
        .bind(member.password_hash().map(|hash| hash.expose_secret().as_str()))
        .bind(member.salt())
        .bind(member.password_encryption())
        .bind(failed_login_count)
        .bind(member.locked_out_until());

        query.execute(&self.pool).await.map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.constraint() {
                    Some("members_email_key") => {
                        return MemberStoreError::from(ValidationException::create_for_field(
                            "Email",
                            "A member with this email already exists",
                        ));
                    }
                    Some("members_username_key") => {
                        return MemberStoreError::from(ValidationException::create_for_field(
                            "Username",
                            "A member with this username already exists",
                        ));
                    }
                    _ => {}
                }
            }
            MemberStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(member)
    }

    #[tracing::instrument(name = "Registering failed login in PostgreSQL", skip_all)]
    async fn register_failed_login(
        &self,
        id: MemberId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), MemberStoreError> {
        if !policy.is_enabled() {
            return Ok(());
        }
        let threshold = i32::try_from(policy.after_incorrect_logins).unwrap_or(i32::MAX);

        // Both CASE arms read the pre-update counter, so the row changes in one step.
        let query = sqlx::query(
            r#"
                UPDATE members
                SET failed_login_count = CASE
                        WHEN failed_login_count + 1 >= $2 THEN 0
                        ELSE failed_login_count + 1
                    END,
                    locked_out_until = CASE
                        WHEN failed_login_count + 1 >= $2 THEN $3
                        ELSE locked_out_until
                    END
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(threshold)
        .bind(policy.locked_until(now));

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(MemberStoreError::MemberNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Registering successful login in PostgreSQL", skip_all)]
    async fn register_successful_login(&self, id: MemberId) -> Result<(), MemberStoreError> {
        let query = sqlx::query(
            r#"
                UPDATE members
                SET failed_login_count = 0, locked_out_until = NULL
                WHERE id = $1
            "#,
        )
        .bind(id.as_uuid());

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| MemberStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(MemberStoreError::MemberNotFound);
        }

        Ok(())
    }
}

fn member_from_row(row: &PgRow) -> Result<Member, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let failed_login_count: i32 = row.try_get("failed_login_count")?;

    Ok(Member::from(MemberRecord {
        id: MemberId::from(id),
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        password_hash: row.try_get("password_hash")?,
        salt: row.try_get("salt")?,
        password_encryption: row.try_get("password_encryption")?,
        failed_login_count: u32::try_from(failed_login_count).unwrap_or_default(),
        locked_out_until: row.try_get("locked_out_until")?,
    }))
}
