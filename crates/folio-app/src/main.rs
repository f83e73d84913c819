// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio: command-line manuscript parser and KDP cover checker.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use folio_core::error::Result;
use folio_core::human_errors::humanize_error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Parse(args) => commands::parse::run(&args, &config, &mut out),
        Commands::Cover(args) => commands::cover::run(&args, &config, &mut out),
        Commands::Compliance(args) => commands::compliance::run(&args, &mut out),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
