//! FreakOut bidder CLI for exercising the adapter offline.
//!
//! This tool provides commands for:
//! - Validating adapter configuration
//! - Building the outbound requests for a set of bid requests
//! - Interpreting a captured ad endpoint response
//! - Listing the user syncs advertised by captured responses

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use freakout_bidder_common::bidder::SyncOptions;

mod bid;
mod config;
mod error;
mod logging;

use error::CliError;

#[derive(Parser)]
#[command(name = "fbcli")]
#[command(about = "FreakOut bid adapter CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML configuration file (defaults to the bundled config)
    #[arg(long, short, global = true, env = "FREAKOUT_BIDDER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and print the effective settings
    Validate,

    /// Build outbound requests from a JSON array of bid requests
    Build {
        /// Path to the bid requests JSON file
        #[arg(long, short)]
        bids: PathBuf,

        /// Page URL reported as `media_url`
        #[arg(long, short)]
        referer: Option<String>,
    },

    /// Interpret a raw ad endpoint response body
    Interpret {
        /// Path to the response body
        #[arg(long, short)]
        response: PathBuf,

        /// Ad spot the response was requested for
        #[arg(long, short)]
        adspot_id: String,
    },

    /// List user syncs from response bodies
    Syncs {
        /// Allow image pixel syncs
        #[arg(long)]
        pixel: bool,

        /// Allow iframe syncs
        #[arg(long)]
        iframe: bool,

        /// Paths to response bodies, in auction order
        #[arg(required = true)]
        responses: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Validate => config::validate(config_file),
        Commands::Build { bids, referer } => {
            let settings = config::load_settings(config_file)?;
            bid::build(settings, &bids, referer)
        }
        Commands::Interpret {
            response,
            adspot_id,
        } => {
            let settings = config::load_settings(config_file)?;
            bid::interpret(settings, &response, &adspot_id)
        }
        Commands::Syncs {
            pixel,
            iframe,
            responses,
        } => {
            let settings = config::load_settings(config_file)?;
            let sync_options = SyncOptions {
                pixel_enabled: pixel,
                iframe_enabled: iframe,
            };
            bid::syncs(settings, &responses, sync_options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_syncs_command() {
        let cli = Cli::try_parse_from(["fbcli", "syncs", "--pixel", "a.json", "b.json"])
            .expect("should parse");
        match cli.command {
            Commands::Syncs {
                pixel,
                iframe,
                responses,
            } => {
                assert!(pixel);
                assert!(!iframe);
                assert_eq!(responses.len(), 2);
            }
            _ => panic!("Expected Syncs command"),
        }
    }
}
