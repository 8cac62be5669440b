use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hullcheck_audit::{
    AlwaysConfirm, AuditStorage, AuditStore, Confirm, create_storage, default_audits,
};
use hullcheck_core::{AuditFilter, AuditId, AuditStatus, HullcheckConfig};

mod commands;

use commands::StdinConfirm;
use commands::audits::AddArgs;

#[derive(Parser, Debug)]
#[command(name = "hullcheck", version, about = "Track marine compliance audits")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(long, global = true, env = "HULLCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the audit document; overrides the configured one
    #[arg(long = "data-dir", global = true, env = "HULLCHECK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List audits, optionally filtered by survey name or ID.
    List {
        /// Search term matched against survey name (case-insensitive) and ID
        #[arg(long, short)]
        search: Option<String>,

        /// Only show audits with this status
        #[arg(long)]
        status: Option<AuditStatus>,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show counts per compliance status.
    Summary {
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print one audit as JSON.
    Show { id: AuditId },

    /// Add a new audit.
    Add {
        /// Explicit ID (auto-generated if omitted)
        #[arg(long)]
        id: Option<AuditId>,

        /// Survey / title, e.g. "Vessel Inspection"
        #[arg(long)]
        survey: String,

        /// Compliant, Pending or Non-Compliant
        #[arg(long)]
        status: AuditStatus,

        /// Survey date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Description
        #[arg(long)]
        description: String,
    },

    /// Set the status of an audit.
    Status { id: AuditId, status: AuditStatus },

    /// Flip an audit between Compliant and Pending.
    Toggle { id: AuditId },

    /// Delete an audit.
    Delete {
        id: AuditId,

        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },

    /// Replace all audits with the default dataset.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = HullcheckConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.store.directory = dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut store = open_store(&config).await?;

    match cli.cmd {
        Command::List {
            search,
            status,
            json,
        } => {
            let filter = AuditFilter {
                term: search,
                status,
            };
            commands::audits::list(&store, &filter, json)?
        }

        Command::Summary { json } => commands::summary::run(&store, json)?,

        Command::Show { id } => commands::audits::show(&store, id)?,

        Command::Add {
            id,
            survey,
            status,
            date,
            description,
        } => {
            let args = AddArgs {
                id,
                survey,
                status,
                date,
                description,
            };
            commands::audits::add(&mut store, args).await?;
        }

        Command::Status { id, status } => {
            commands::audits::set_status(&mut store, id, status).await?
        }

        Command::Toggle { id } => commands::audits::toggle(&mut store, id).await?,

        Command::Delete { id, yes } => {
            commands::audits::delete(&mut store, id, confirmer(yes)).await?
        }

        Command::Reset { yes } => commands::audits::reset(&mut store, confirmer(yes)).await?,
    }

    Ok(())
}

/// Build the store once; every command borrows it.
async fn open_store(config: &HullcheckConfig) -> anyhow::Result<AuditStore> {
    let storage: Arc<dyn AuditStorage> = Arc::from(create_storage(&config.store));
    let location = storage.describe();
    tracing::debug!(backend = ?config.store.backend, %location, "Opening audit store");

    let defaults = if config.store.seed_defaults {
        default_audits()?
    } else {
        Vec::new()
    };

    AuditStore::initialize(storage, defaults)
        .await
        .with_context(|| format!("failed to open audit store at {}", location))
}

fn confirmer(yes: bool) -> &'static dyn Confirm {
    if yes { &AlwaysConfirm } else { &StdinConfirm }
}
