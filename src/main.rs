//! # Panda Site - developer tools for the red panda website
//!
//! Two independent tools behind one binary:
//! - `validate`: syntax and structure checks for the JSON files under `data/`
//! - `serve`: local static file server with CORS headers and browser auto-launch

mod cli;
mod core;
mod run;

use std::process::ExitCode;

use clap::Parser;

use cli::{Args, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    run::init_logger(&args);

    match args.command {
        Commands::Validate => run::run_validate(),
        Commands::Serve {
            port,
            host,
            no_browser,
        } => run::run_serve(port, host, no_browser).await,
        Commands::Completions { shell } => {
            run::run_completions(shell);
            ExitCode::SUCCESS
        }
    }
}
