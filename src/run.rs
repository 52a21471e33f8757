//! Application run modes: logger init, validator, dev server, completions.

use std::path::Path;
use std::process::ExitCode;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{self, Args};
use crate::core::server::{self, ServerConfig};
use crate::core::validator;

/// Initialize env_logger from the -v/-q flags. `RUST_LOG` still overrides.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .try_init();
}

/// Validate `data/` in the current directory and print the report.
/// Fails when the directory is missing or any file does not pass.
pub fn run_validate() -> ExitCode {
    let files = validator::data_files();
    match validator::validate_dir(Path::new(validator::DATA_DIR), &files) {
        Ok(report) => {
            print!("{}", report.render());
            if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Start the dev server from the current directory and block until Ctrl+C.
pub async fn run_serve(port: Option<u16>, host: String, no_browser: bool) -> ExitCode {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("❌ Error: cannot determine current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let config = ServerConfig {
        host,
        port,
        open_browser: !no_browser,
        ..ServerConfig::new(root)
    };
    log::debug!("Server config: {:?}", config);

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Print a completion script for `shell` to stdout.
pub fn run_completions(shell: Shell) {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    cli::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
