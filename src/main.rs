//! Sigcheck CLI entrypoint for SIG repository verification.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use sigcheck::SigCheckError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;

use cli::{Cli, Command, SigCommand};

const DEFAULT_LOG_FILTER: &str = "sigcheck=info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let command_line = Cli::parse();

    match run(command_line).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command_line: Cli) -> Result<(), SigCheckError> {
    match command_line.command {
        Command::Sig {
            command: SigCommand::Checkrepo { args },
        } => {
            let cancel = CancellationToken::new();
            cli::shutdown::install_interrupt_handler(cancel.clone());
            let summary = cli::check_repo::run(args, cancel).await?;
            cli::output::write_summary(&summary)
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
