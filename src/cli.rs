//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::server::DEFAULT_HOST;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  panda-site validate                 Check data/*.json syntax and structure
  panda-site serve                    Start the dev server and open a browser
  panda-site serve --port 3000        Use a specific port
  panda-site serve --no-browser       Do not open a browser
  panda-site serve --host 0.0.0.0     Accept connections from other machines
  panda-site completions bash         Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Developer tools for the red panda website",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the JSON data files under data/
    Validate,
    /// Serve the site from the current directory
    Serve {
        /// Server port (default: first free port from 8000)
        #[arg(short = 'p', long)]
        port: Option<u16>,
        /// Bind address
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        /// Do not open a browser on startup
        #[arg(long)]
        no_browser: bool,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn serve_flags_parse() {
        let args = Args::parse_from(["panda-site", "serve", "-p", "3000", "--no-browser"]);
        match args.command {
            Commands::Serve {
                port,
                host,
                no_browser,
            } => {
                assert_eq!(port, Some(3000));
                assert_eq!(host, DEFAULT_HOST);
                assert!(no_browser);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        let args = Args::parse_from(["panda-site", "-vv", "validate"]);
        assert_eq!(args.log_level(), "debug");
        let args = Args::parse_from(["panda-site", "validate", "-q"]);
        assert_eq!(args.log_level(), "error");
        let args = Args::parse_from(["panda-site", "validate"]);
        assert_eq!(args.log_level(), "warn");
    }
}
