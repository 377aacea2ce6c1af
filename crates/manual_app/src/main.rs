mod cli;
mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use manual_logging::{level_for_verbosity, manual_info, manual_warn};

use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config: config_path,
        store,
        verbose,
        command,
    } = Cli::parse();

    let loaded = AppConfig::load(&config_path);
    logging::initialize(loaded.config.log_destination, level_for_verbosity(verbose));
    if let Some(warning) = &loaded.warning {
        manual_warn!("{}", warning);
        eprintln!("Warning: {warning}");
    }

    let config = loaded.config;
    let store_path = store.unwrap_or_else(|| config.store_path.clone());
    manual_info!("Using store {:?}", store_path);

    commands::run(command, &config, &store_path).await
}
