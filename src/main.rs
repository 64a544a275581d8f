//! session-ledger binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use session_ledger::api::{serve_with_state, AppState};
use session_ledger::cli::{self, Args};
use session_ledger::config::Config;
use session_ledger::{logging, Ledger, SqliteLedger};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{}", message);
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), String> {
    let config = Config::load(args).map_err(|e| e.to_string())?;
    logging::init_with_filter(config.log_filter()).map_err(|e| e.to_string())?;

    info!("session-ledger v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config.to_server_config().map_err(|e| e.to_string())?;
    let cookie = config.to_session_cookie().map_err(|e| e.to_string())?;

    let store = SqliteLedger::open(&config.storage.database).map_err(|e| e.to_string())?;
    info!("Ledger database opened at {}", config.storage.database);

    let state = AppState::with_ledger(Ledger::new(Arc::new(store)), cookie);
    serve_with_state(server_config, state)
        .await
        .map_err(|e| e.to_string())
}
