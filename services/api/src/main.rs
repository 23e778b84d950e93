use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{AppState, config::ApiConfig, create_router};
use auth::{
    jwt::{JwtConfig, JwtService},
    mail::{MailConfig, build_mailer},
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting YaMDb API service");

    let api_config = ApiConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let jwt_config = JwtConfig::from_env().context("Failed to load JWT configuration")?;
    let mail_config = MailConfig::from_env().context("Failed to load mail configuration")?;
    let mailer = build_mailer(&mail_config)?;

    let app_state = AppState::new(
        pool,
        JwtService::new(jwt_config),
        mailer,
        api_config.page_size,
    );

    let app = create_router(app_state);

    let listener = TcpListener::bind(api_config.bind_address).await?;
    info!("API service listening on {}", api_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
