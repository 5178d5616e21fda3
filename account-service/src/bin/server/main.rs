use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::ports::UserDirectory;
use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserDirectory;
use account_service::outbound::repositories::PostgresUserDirectory;
use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        salt_length = config.password.salt_length,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_settings(
        config.jwt.secret.as_bytes(),
        chrono::Duration::hours(config.jwt.expiration_hours),
        PasswordHasher::with_salt_length(config.password.salt_length),
    ));
    tracing::info!(
        token_ttl_hours = authenticator.token_ttl().num_hours(),
        "Authenticator ready"
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let directory = Arc::new(PostgresUserDirectory::new(pg_pool));
            serve(http_listener, directory, authenticator).await
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            let directory = Arc::new(InMemoryUserDirectory::new());
            serve(http_listener, directory, authenticator).await
        }
    }
}

async fn serve<UD: UserDirectory>(
    listener: TcpListener,
    directory: Arc<UD>,
    authenticator: Arc<Authenticator>,
) -> Result<(), anyhow::Error> {
    let auth_service = Arc::new(AuthService::new(directory, Arc::clone(&authenticator)));
    let http_application = create_router(auth_service, authenticator);

    axum::serve(listener, http_application).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
