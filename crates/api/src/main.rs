//! MRP planning CLI.
//!
//! One subcommand: read a JSON planning request from a file, run the
//! engine, print the JSON response to stdout. Logs go to stderr so
//! stdout stays machine-readable. Exit codes: 0 success, 2 invalid
//! input or infeasible window, 1 unexpected failure.

use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use mrp_api::shim;
use mrp_core::HostConfig;

#[derive(Parser)]
#[command(name = "mrp")]
#[command(version)]
#[command(about = "Sporadic-demand MRP planning engine")]
#[command(long_about = "
Plans replenishment batches for sporadic, event-driven demand: given
initial stock, a lead time and dated demand events, it emits order and
arrival dates with quantities plus a full analytics bundle.

Examples:
  mrp plan request.json
  mrp plan request.json --pretty
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the planner on a JSON request file
    Plan {
        /// Path to the JSON planning request
        input: PathBuf,

        /// Pretty-print the JSON response
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = HostConfig::load().unwrap_or_default();
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Plan { input, pretty } => {
            let raw = match fs::read_to_string(&input) {
                Ok(raw) => raw,
                Err(read_error) => {
                    eprintln!(
                        "{} cannot read {}: {}",
                        "error:".red().bold(),
                        input.display(),
                        read_error
                    );
                    process::exit(2);
                }
            };

            let response = shim::handle_plan_request(&raw);
            let rendered = if pretty || config.output.pretty {
                serde_json::to_string_pretty(&response.body)
            } else {
                serde_json::to_string(&response.body)
            };
            match rendered {
                Ok(text) => println!("{}", text),
                Err(serialize_error) => {
                    eprintln!("{} {}", "error:".red().bold(), serialize_error);
                    process::exit(1);
                }
            }
            process::exit(response.exit_code);
        }
    }
}

fn init_tracing(config: &HostConfig, verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log.filter.clone())),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
