//! CLI command routing and operation handlers.
//!
//! This module contains:
//! - [`check_repo`]: Verify every repository referenced by a SIG file
//! - [`shutdown`]: Ctrl-C handling that cancels an in-progress check
//!
//! Output formatting utilities are in [`output`].

use std::ffi::OsString;

use clap::{Parser, Subcommand};

pub mod check_repo;
pub mod output;
pub mod shutdown;

/// Command-line entry point.
#[derive(Debug, Parser)]
#[command(name = "sigcheck", version, about = "Community SIG maintenance tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with SIG ownership files.
    Sig {
        #[command(subcommand)]
        command: SigCommand,
    },
}

/// Commands operating on SIG ownership files.
#[derive(Debug, Subcommand)]
pub enum SigCommand {
    /// Check that every repository referenced by a SIG file exists.
    ///
    /// Options (`--filename`, `--gitee-token`, `--workers`, ...) are resolved
    /// together with environment variables and configuration files.
    /// `--giteetoken` is accepted as an alias of `--gitee-token`.
    Checkrepo {
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            num_args = 0..,
            value_name = "OPTIONS"
        )]
        args: Vec<OsString>,
    },
}
