//! sidekick: command-line access to a Sidekick character catalog.
//!
//! Every subcommand opens the catalog named by the config file (or
//! `--catalog`), runs one operation and prints its result as JSON on stdout.
//! Logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sidekick_types::{FilterCombineType, PartGroup};
use tracing::info;

use crate::config::CatalogConfig;

#[derive(Parser, Debug)]
#[command(name = "sidekick")]
#[command(version, about = "Sidekick character catalog tool")]
struct Cli {
    /// Config file. Defaults to `$SIDEKICK_DATA_DIR/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database, overriding the config file.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Asset root, overriding the config file.
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or upgrade the catalog and print its version stamp.
    Init {
        /// Write a new content version stamp.
        #[arg(long)]
        stamp: Option<String>,
    },
    /// List species.
    Species {
        /// Include species without any part on disk.
        #[arg(long)]
        all: bool,
    },
    /// List parts.
    Parts {
        /// Only parts of this species.
        #[arg(long)]
        species: Option<String>,
        /// Include parts whose file is missing.
        #[arg(long)]
        all: bool,
    },
    /// List part presets of one body group.
    Presets {
        #[arg(long, value_enum)]
        group: GroupArg,
        /// Include presets with missing parts.
        #[arg(long)]
        all: bool,
    },
    /// List part and preset filters.
    Filters {
        /// Include preset filters without available presets.
        #[arg(long)]
        all: bool,
    },
    /// List a species' part names selected by combining part filters.
    Browse {
        /// Species name.
        #[arg(long)]
        species: String,
        /// Part filter term. Repeat to combine several filters.
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, value_enum, default_value = "and")]
        combine: CombineArg,
    },
    /// Re-check every part file under the asset root.
    Refresh,
    /// Delete orphaned rows.
    Sweep,
    /// Compose a saved character document.
    Compose {
        /// Character JSON file.
        character: PathBuf,
    },
    /// Print tool, schema and catalog versions.
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GroupArg {
    Head,
    UpperBody,
    LowerBody,
}

impl From<GroupArg> for PartGroup {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Head => PartGroup::Head,
            GroupArg::UpperBody => PartGroup::UpperBody,
            GroupArg::LowerBody => PartGroup::LowerBody,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CombineArg {
    And,
    Or,
    Not,
}

impl From<CombineArg> for FilterCombineType {
    fn from(arg: CombineArg) -> Self {
        match arg {
            CombineArg::And => FilterCombineType::And,
            CombineArg::Or => FilterCombineType::Or,
            CombineArg::Not => FilterCombineType::Not,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CatalogConfig::load(cli.config.as_deref())?;
    if let Some(catalog) = &cli.catalog {
        config.catalog.path = catalog.display().to_string();
    }
    if let Some(assets) = &cli.assets {
        config.assets.root = assets.display().to_string();
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("sidekick={}", config.logging.log_level).parse()?),
        )
        .init();

    let catalog_path = config.catalog_path();
    if let Some(parent) = catalog_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!(path = %catalog_path.display(), "Opening catalog");
    let conn = sidekick_db::open_with(&catalog_path, &config.open_options())?;

    let output = match cli.command {
        Command::Init { stamp } => commands::catalog::init(&conn, &catalog_path, stamp.as_deref())?,
        Command::Species { all } => commands::catalog::species(&conn, all)?,
        Command::Parts { species, all } => commands::catalog::parts(&conn, species.as_deref(), all)?,
        Command::Presets { group, all } => commands::catalog::presets(&conn, group.into(), all)?,
        Command::Filters { all } => commands::catalog::filters(&conn, all)?,
        Command::Browse {
            species,
            filters,
            combine,
        } => commands::catalog::browse(&conn, &species, &filters, combine.into())?,
        Command::Refresh => commands::maintenance::refresh(&conn, &config.asset_root())?,
        Command::Sweep => commands::maintenance::sweep(&conn)?,
        Command::Compose { character } => {
            commands::compose::compose(&conn, config.compose_options(), &character)?
        }
        Command::Version => commands::catalog::version(&conn)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
