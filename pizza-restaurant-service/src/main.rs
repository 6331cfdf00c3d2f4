use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizza_restaurant_service::handlers::{app, AppState};
use pizza_restaurant_service::store::SqliteStore;
use pizza_restaurant_service::{run_migrations, seed};

#[derive(Parser)]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DATABASE_URL", default_value = "app.db")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations and serve the HTTP API
    Serve {
        #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:5555")]
        bind: String,
    },
    /// Apply pending migrations and reset the database to the sample data
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let store = SqliteStore::new(cli.database_url);

    run_migrations(&mut store.connect()?)?;

    match cli.command {
        Commands::Serve { bind } => {
            let app = app(AppState::new(store));

            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Pizza restaurant service listening on {}", listener.local_addr()?);

            axum::serve(listener, app).await?;
        }
        Commands::Seed => {
            seed::run(&mut store.connect()?)?;
            info!("database seeded");
        }
    }

    Ok(())
}
