use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod docs;
mod error;
mod models;
mod repositories;
mod routes;
mod state;

use common::{
    config::ServerConfig,
    database::{Database, DatabaseConfig, health_check},
};
use tokio::net::TcpListener;

pub use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting todos service");

    let server_config = ServerConfig::from_env("TODOS", 8000)?;

    // Connect once before accepting traffic
    let db_config = DatabaseConfig::from_env("sqlite://todos.db")?;
    let database = Database::new(db_config, repositories::SCHEMA);
    let app_state = AppState::connect(database).await?;

    if health_check(app_state.database.connect().await?).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    info!("Todos service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Todos service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
