use std::net::IpAddr;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use portcullis_adapters::{
    HashMapLoginAttemptStore, HashMapMemberStore, PostgresLoginAttemptStore, PostgresMemberStore,
    TracingAuditObserver, config::PortcullisSettings, default_registry, run_migrations,
    telemetry::init_tracing,
};
use portcullis_application::{AuthenticationHooks, DefaultAdminService, MemberAuthenticator};
use portcullis_core::{LoginAttemptStore, LoginData, MemberStore, ValidationResult};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

/// Runs one authentication against the configured storage and prints the result.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        return Err(eyre!("usage: portcullis-check <email> <password> [ip]"));
    };
    let ip = args
        .next()
        .map(|ip| ip.parse::<IpAddr>())
        .transpose()
        .wrap_err("Invalid client IP address")?;

    let settings = PortcullisSettings::load().wrap_err("Failed to load settings")?;

    let mut data = LoginData::new(email, password);
    if let Some(ip) = ip {
        data = data.with_ip(ip);
    }

    let result = match &settings.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(database.url.expose_secret())
                .await?;
            run_migrations(&pool).await?;

            authenticate(
                PostgresMemberStore::new(pool.clone()),
                PostgresLoginAttemptStore::new(pool),
                &settings,
                &data,
            )
            .await?
        }
        None => {
            tracing::warn!("No database configured, using in-memory storage");
            authenticate(
                HashMapMemberStore::new(),
                HashMapLoginAttemptStore::new(),
                &settings,
                &data,
            )
            .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn authenticate<M, A>(
    member_store: M,
    attempt_store: A,
    settings: &PortcullisSettings,
    data: &LoginData,
) -> Result<ValidationResult>
where
    M: MemberStore,
    A: LoginAttemptStore,
{
    let mut hooks = AuthenticationHooks::new();
    hooks.subscribe(Arc::new(TracingAuditObserver));

    let authenticator = MemberAuthenticator::new(
        member_store,
        attempt_store,
        default_registry(),
        DefaultAdminService::new(settings.default_admin.clone()),
        settings.security.clone(),
    )
    .with_hooks(hooks);

    let (member, result) = authenticator.login(data).await?;
    match member {
        Some(member) => tracing::info!(member_id = %member.id(), "Credentials accepted"),
        None => tracing::info!("Credentials rejected"),
    }

    Ok(result)
}
