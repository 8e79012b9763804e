// snapcommit: versioned backup and commit tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Run (default) | Status | Next | Options | Version
//! ```

use std::process::ExitCode;

use snapcommit::cli::global::GlobalOptions;
use snapcommit::cli::{self, Command};
use snapcommit::cmd::config::run_options_command;
use snapcommit::cmd::inspect::{run_next_command, run_status_command};
use snapcommit::cmd::run::run_pipeline_command;
use snapcommit::config::Config;
use snapcommit::config::loader::ConfigLoader;
use snapcommit::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config)
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let json = cli.global.json;
    let result = match &cli.command {
        None | Some(Command::Run) => run_pipeline_command(config, json),
        Some(Command::Status) => run_status_command(config, json),
        Some(Command::Next(args)) => run_next_command(args, json),
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> snapcommit::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    for assignment in global.to_config_overrides() {
        loader = loader.set_str(&assignment)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> snapcommit::error::Result<Config> {
    build_config_loader(global)?.build()
}
