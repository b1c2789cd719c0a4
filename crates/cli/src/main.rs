mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use shelfscore_core::Dataset;
use shelfscore_storage::StorageBackend;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shelfscore")]
#[command(about = "Book catalogue with critic-score aggregation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
pub(crate) struct StoreArgs {
    /// SQLite database file
    #[arg(long, env = "SHELFSCORE_DB_PATH", global = true)]
    db_path: Option<PathBuf>,
    /// PostgreSQL connection string; used instead of SQLite when built with `postgres`
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,
    /// Seed dataset JSON; the embedded catalogue when absent
    #[arg(long, env = "SHELFSCORE_DATASET", global = true)]
    dataset: Option<PathBuf>,
}

/// Which ingestion run to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum RunTarget {
    Books,
    Reviews,
    All,
}

impl RunTarget {
    pub(crate) const fn path(self) -> &'static str {
        match self {
            Self::Books => "/api/ingest/books",
            Self::Reviews => "/api/ingest/reviews",
            Self::All => "/api/ingest/all",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "37880")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Replace books and/or reviews from the dataset
    Ingest {
        #[arg(value_enum)]
        target: RunTarget,
    },
    /// Recompute critic scores
    Recompute {
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// List books
    Books {
        #[arg(short, long)]
        genre: Option<String>,
        #[arg(short, long, default_value = "newest")]
        sort: String,
        #[arg(short, long, default_value = "20")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// Reviews of one book, newest first
    Reviews { id: String },
    Stats,
    /// Start an ingestion run on a running server
    Trigger {
        #[arg(value_enum)]
        target: RunTarget,
        #[arg(long, default_value = "http://127.0.0.1:37880")]
        endpoint: String,
    },
}

pub(crate) fn get_db_path(store: &StoreArgs) -> PathBuf {
    store.db_path.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shelfscore")
            .join("catalog.db")
    })
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set and the feature is built in, SQLite otherwise.
pub(crate) async fn open_storage(store: &StoreArgs) -> Result<StorageBackend> {
    #[cfg(feature = "postgres")]
    {
        if let Some(url) = store.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let backend = StorageBackend::new_postgres(url).await?;
            tracing::info!(backend = backend.kind(), "Storage ready");
            return Ok(backend);
        }
    }
    #[cfg(not(feature = "postgres"))]
    {
        if store.database_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            tracing::warn!("DATABASE_URL is set but postgres support is not built in, using SQLite");
        }
    }
    let db_path = get_db_path(store);
    ensure_db_dir(&db_path)?;
    let backend = StorageBackend::new_sqlite(&db_path)?;
    tracing::info!(backend = backend.kind(), path = %db_path.display(), "Storage ready");
    Ok(backend)
}

pub(crate) fn load_dataset(store: &StoreArgs) -> Result<Dataset> {
    Ok(Dataset::load(store.dataset.as_deref())?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(&cli.store, port, host).await?,
        Commands::Ingest { target } => commands::ingest::run_ingest(&cli.store, target).await?,
        Commands::Recompute { id, all } => {
            commands::ingest::run_recompute(&cli.store, id, all).await?;
        },
        Commands::Books { genre, sort, limit, offset } => {
            commands::catalog::run_books(&cli.store, genre, &sort, limit, offset).await?;
        },
        Commands::Reviews { id } => commands::catalog::run_reviews(&cli.store, &id).await?,
        Commands::Stats => commands::catalog::run_stats(&cli.store).await?,
        Commands::Trigger { target, endpoint } => {
            commands::trigger::run(&endpoint, target).await?;
        },
    }

    Ok(())
}
