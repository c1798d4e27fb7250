mod config;
mod errors;
mod workbook;

mod database;
mod runner;
mod server;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server and background worker
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Database housekeeping
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    /// Create the database file and apply all migrations
    Init {
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Apply pending migrations
    Migrate {
        #[clap(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let config = Config::from_env();

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
        } => {
            let database_url = database
                .map(|path| database::get_database_url(Some(&path)))
                .unwrap_or_else(|| config.database_url.clone());

            let db = database::establish_connection(&database_url).await?;
            database::migrations::Migrator::up(&db, None).await?;
            info!("database ready at {}", database_url);

            server::serve(db, config, port, cors_origin.as_deref()).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } | DbCommands::Migrate { database } => {
                let database_url = database
                    .map(|path| database::get_database_url(Some(&path)))
                    .unwrap_or_else(|| config.database_url.clone());

                let db = database::establish_connection(&database_url).await?;
                database::migrations::Migrator::up(&db, None).await?;
                info!("migrations applied to {}", database_url);
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
