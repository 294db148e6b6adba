use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use journal_tracker_catalog::{CatalogClient, CatalogLookup};
use journal_tracker_core::{BackendKind, JournalFilter, SortKey, SortSpec, TrackerConfig};
use journal_tracker_service::TrackerService;
use journal_tracker_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "journal-tracker")]
#[command(about = "Track journal title changes by ISSN", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for values otherwise read from `JOURNAL_TRACKER_*` variables.
#[derive(Args)]
struct GlobalArgs {
    /// Path of the JSON master list (file backend).
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    /// Storage backend: file or memory.
    #[arg(long, global = true)]
    backend: Option<BackendKind>,
    #[arg(long, global = true)]
    catalog_url: Option<String>,
    #[arg(long, global = true)]
    library_id: Option<u32>,
    /// ISSNs per catalog request.
    #[arg(long, global = true)]
    batch_size: Option<usize>,
    /// Records per write batch on document-store backends.
    #[arg(long, global = true)]
    chunk_size: Option<usize>,
}

#[derive(Args)]
struct FilterArgs {
    /// Substring of title or ISSN, case-insensitive.
    #[arg(short, long)]
    search: Option<String>,
    /// Earliest check date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest check date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Only records whose title changed.
    #[arg(long)]
    changed_only: bool,
    /// First letter of the title.
    #[arg(short, long)]
    letter: Option<char>,
}

impl FilterArgs {
    fn into_filter(self) -> Result<JournalFilter> {
        let filter = JournalFilter {
            search: self.search,
            from: self.from,
            to: self.to,
            changed_only: self.changed_only,
            letter: None,
        };
        Ok(match self.letter {
            Some(letter) => filter.with_letter(letter)?,
            None => filter,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a CSV or JSON row file into the master list.
    Ingest {
        file: PathBuf,
        /// Drop stored records whose ISSN is absent from the file.
        #[arg(long)]
        replace: bool,
    },
    /// Look up every stored ISSN in the catalog once.
    Refresh,
    /// Refresh now and then on a fixed interval until interrupted.
    Watch {
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Print records as JSON.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// issn, title, previous-title or status. Updated titles first when omitted.
        #[arg(long)]
        sort: Option<SortKey>,
        /// Sort descending.
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Print total, updated and unchanged counts.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write the list as CSV.
    Export {
        #[arg(long)]
        changed_only: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Query the catalog for ISSNs without touching the list.
    Lookup {
        #[arg(required = true)]
        issns: Vec<String>,
    },
}

fn load_config(global: GlobalArgs) -> Result<TrackerConfig> {
    let mut config = TrackerConfig::from_env();
    if let Some(path) = global.data_file {
        config.data_file = path;
    }
    if let Some(backend) = global.backend {
        config.backend = backend;
    }
    if let Some(url) = global.catalog_url {
        config.catalog_base_url = url;
    }
    if let Some(id) = global.library_id {
        config.library_id = id;
    }
    if let Some(size) = global.batch_size {
        config.batch_size = size;
    }
    if let Some(size) = global.chunk_size {
        config.chunk_size = size;
    }
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

pub(crate) async fn build_service(config: &TrackerConfig) -> Result<Arc<TrackerService>> {
    let store = StorageBackend::from_config(config)
        .await
        .with_context(|| format!("opening {} backend", config.backend))?;
    let catalog: Option<Arc<dyn CatalogLookup>> = if config.catalog_api_key.is_some() {
        Some(Arc::new(CatalogClient::from_config(config)?))
    } else {
        None
    };
    Ok(Arc::new(TrackerService::new(Arc::new(store), catalog, config)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.global)?;

    match cli.command {
        Commands::Ingest { file, replace } => commands::ingest::run(&config, &file, replace).await,
        Commands::Refresh => commands::refresh::run_once(&config).await,
        Commands::Watch { interval_secs } => {
            let secs = interval_secs.unwrap_or(config.refresh_interval_secs);
            commands::refresh::run_watch(&config, secs).await
        },
        Commands::List { filter, sort, desc } => {
            let sort =
                sort.map_or_else(SortSpec::default, |key| SortSpec { key, ascending: !desc });
            commands::query::run_list(&config, filter.into_filter()?, sort).await
        },
        Commands::Summary { filter } => {
            commands::query::run_summary(&config, filter.into_filter()?).await
        },
        Commands::Export { changed_only, output } => {
            commands::query::run_export(&config, changed_only, output).await
        },
        Commands::Lookup { issns } => commands::refresh::run_lookup(&config, &issns).await,
    }
}
