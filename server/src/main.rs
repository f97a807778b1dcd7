use clap::Parser;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use server::api::{AppState, app_router};
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "school-server", about = "Teacher registry — REST CRUD backend")]
struct Cli {
    /// Bind address for the REST API (overrides SCHOOL_BIND_ADDR)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Init structured logging (respects RUST_LOG; defaults to info)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("SCHOOL_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://school.db?mode=rwc".to_string());

    tracing::info!(database = %redact_db_url(&database_url), "connecting to database");

    let db = Database::connect(&database_url).await?;
    Migrator::up(&db, None).await?;

    tracing::info!("database initialized");

    let upload_dir =
        PathBuf::from(std::env::var("SCHOOL_UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

    let bind_addr = cli
        .bind
        .or_else(|| std::env::var("SCHOOL_BIND_ADDR").ok())
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let state = AppState { db, upload_dir };

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Teacher API online");

    axum::serve(listener, app_router(state)).await?;

    Ok(())
}

/// Strip credentials from a database URL for safe logging.
fn redact_db_url(url: &str) -> String {
    let base = url.split('?').next().unwrap_or(url);
    match (base.find("://"), base.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://****{}", &base[..scheme_end], &base[at..])
        }
        _ => base.to_string(),
    }
}
