mod application;
mod config;
mod error;
mod logger;
mod runtime;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use std::{process::ExitCode, sync::Arc};

use oracle_blockchain::{EvmChain, SubmissionLedger};

use crate::{application::SubmissionLifecycle, utils::poll::TokioSleeper};

/// Loads configuration, connects to the ledger and runs the submission
/// lifecycle until done or interrupted.
pub async fn run() -> ExitCode {
    let cli = config::parse_cli();

    let config = match config::load_configuration(&cli) {
        Ok(config) => config,
        Err(error) => {
            // The subscriber depends on the configuration, so this goes to stderr.
            eprintln!("Failed to load configuration: {error}");
            return ExitCode::FAILURE;
        }
    };
    logger::initialize(&config.logger, &config.telemetry);

    tracing::info!(
        network = %config.network,
        wallet = %config.blockchain.wallet_address(),
        config_file = ?cli.config,
        "Starting tutorial submission oracle"
    );

    let chain = match EvmChain::connect(config.blockchain.clone()).await {
        Ok(chain) => chain,
        Err(error) => {
            tracing::error!(error = %error, "Failed to connect to the ledger");
            return ExitCode::FAILURE;
        }
    };
    let ledger: Arc<dyn SubmissionLedger> = Arc::new(chain);

    let lifecycle = SubmissionLifecycle::new(ledger, &config.lifecycle, Arc::new(TokioSleeper));
    runtime::run(lifecycle, &config.runtime, cli.once).await;

    tracing::info!("Oracle stopped");
    ExitCode::SUCCESS
}
