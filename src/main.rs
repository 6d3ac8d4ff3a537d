//! Millwright - fleet maintenance tracker

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use millwright::{
    api::{build_router, AppState},
    config::{get_data_dir, load_config},
    db::init_database,
};

#[derive(Parser)]
#[command(name = "millwright")]
#[command(author = "Millwright Team")]
#[command(version = "0.1.0")]
#[command(about = "Fleet maintenance tracker with rotation scheduling and per-visit checklists")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Database path (defaults to the platform data dir)
    #[arg(short, long)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Millwright server
    Serve,
    /// Initialize the database
    Init,
    /// Show configuration info
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "millwright=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config();

    // Determine database path
    let db_path = cli
        .database
        .or(config.database.path.clone())
        .unwrap_or_else(|| get_data_dir().join("data.db").to_string_lossy().to_string());

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing database at: {}", db_path);
            let _pool = init_database(&db_path).await?;
            println!("Database initialized successfully!");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("Millwright Configuration");
            println!("========================");
            println!("Data directory: {}", get_data_dir().display());
            println!("Database path: {}", db_path);
            println!("Server: {}:{}", cli.host, cli.port);
            return Ok(());
        }
        _ => {}
    }

    run_server(&cli.host, cli.port, &db_path).await
}

async fn run_server(host: &str, port: u16, db_path: &str) -> anyhow::Result<()> {
    tracing::info!("Initializing database at: {}", db_path);
    let pool = init_database(db_path).await?;

    let app = build_router(AppState { pool });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Millwright listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
