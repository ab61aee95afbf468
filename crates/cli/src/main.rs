//! # foodwise
//!
//! Command-line front end for shelf-life prediction and the saved inventory.
//!
//! ## Usage
//!
//! ```bash
//! # Predict without saving
//! foodwise predict --name Milk --category dairy --temperature 4 --humidity 40 --packaging plastic
//!
//! # Predict and save, then look at what is about to expire
//! foodwise save --name Spinach --category vegetables --temperature 4 --humidity 95
//! foodwise expiring --days 3
//!
//! # Keep notifications current until stdin closes
//! foodwise watch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use foodwise_core::{
    DEFAULT_HUMIDITY_PCT, DEFAULT_TEMPERATURE_C, FoodAttributes, FoodCategory, Packaging,
};
use foodwise_events::{InMemoryChangeBus, InventoryChange};
use foodwise_infra::{FoodwiseConfig, InventoryStore, JsonFileBackend};
use foodwise_observability::LogFormat;

mod commands;

pub(crate) type Store = InventoryStore<JsonFileBackend, Arc<InMemoryChangeBus<InventoryChange>>>;

#[derive(Parser, Debug)]
#[command(name = "foodwise")]
#[command(about = "Food shelf-life prediction and expiry tracking")]
#[command(version)]
struct Cli {
    /// JSON file holding saved items
    #[arg(long, global = true, env = "FOODWISE_STORE_PATH")]
    store_path: Option<PathBuf>,

    /// Log output format (json or pretty)
    #[arg(long, global = true, env = "FOODWISE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict shelf life without saving
    Predict {
        #[command(flatten)]
        food: FoodArgs,

        /// Show how the prediction was computed
        #[arg(long)]
        explain: bool,
    },
    /// Predict shelf life and save the item
    Save {
        #[command(flatten)]
        food: FoodArgs,
    },
    /// List saved items
    List,
    /// Delete a saved item by id
    Delete { id: String },
    /// Items expiring within a number of days, with notifications
    Expiring {
        /// Day window (defaults to FOODWISE_EXPIRING_THRESHOLD_DAYS)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Inventory statistics
    Stats,
    /// Delete every saved item
    Clear,
    /// Run the expiry watcher until stdin is closed
    Watch,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct FoodArgs {
    /// Food name, e.g. "Milk"
    #[arg(long, env = "FOODWISE_NAME")]
    name: String,

    /// fruits, vegetables, dairy, meat, bakery or other
    #[arg(long, env = "FOODWISE_CATEGORY")]
    category: FoodCategory,

    /// Storage temperature in °C
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE_C, allow_negative_numbers = true)]
    temperature: f64,

    /// Relative humidity in percent
    #[arg(long, default_value_t = DEFAULT_HUMIDITY_PCT)]
    humidity: f64,

    /// none, plastic, paper, glass or vacuum
    #[arg(long, default_value_t = Packaging::None)]
    packaging: Packaging,
}

impl FoodArgs {
    pub(crate) fn attributes(&self) -> anyhow::Result<FoodAttributes> {
        let attrs = FoodAttributes::new(
            self.name.clone(),
            self.category,
            self.temperature,
            self.humidity,
            self.packaging,
        );
        Ok(attrs.validated()?)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = FoodwiseConfig::from_env().context("invalid FOODWISE_* environment")?;
    if let Some(path) = cli.store_path.clone() {
        config.store_path = path;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    foodwise_observability::init(config.log_format);
    tracing::debug!(store_path = %config.store_path.display(), "configuration loaded");

    let store: Store = InventoryStore::new(
        JsonFileBackend::new(&config.store_path),
        Arc::new(InMemoryChangeBus::new()),
    )
    .with_expiring_threshold(config.expiring_threshold_days);

    let out = commands::Output { json: cli.json };
    match cli.command {
        Command::Predict { food, explain } => commands::predict(&out, &food, explain),
        Command::Save { food } => commands::save(&out, &store, &food),
        Command::List => commands::list(&out, &store),
        Command::Delete { id } => commands::delete(&out, &store, &id),
        Command::Expiring { days } => {
            commands::expiring(&out, &store, days.unwrap_or(config.expiring_threshold_days))
        }
        Command::Stats => commands::stats(&out, &store),
        Command::Clear => commands::clear(&out, &store),
        Command::Watch => commands::watch(&out, store, &config),
    }
}
