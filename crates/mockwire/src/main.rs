//! Mockwire request renderer CLI
//!
//! Reads a request definition (YAML or JSON) and prints the request document
//! in the stub server's wire format.
//!
//! Usage:
//!   mockwire <definition_file> [OPTIONS]

use anyhow::{Context, Result};
use clap::Parser;
use mockwire::load_definition;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Render request definitions into WireMock request JSON
#[derive(Parser, Debug)]
#[command(name = "mockwire")]
#[command(
    author,
    version,
    about = "Render request definitions into WireMock request JSON"
)]
struct Args {
    /// Path to a .yaml, .yml or .json request definition
    #[arg(required = true)]
    path: PathBuf,

    /// Indent the output
    #[arg(short, long, env = "MOCKWIRE_PRETTY")]
    pretty: bool,

    /// Verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let definition = load_definition(&args.path)
        .context("loading request definition")?;
    let request = definition.into_request();
    debug!(method = request.method(), "definition loaded");

    let output = if args.pretty {
        request.to_json_pretty()?
    } else {
        request.to_json_string()?
    };
    println!("{output}");

    Ok(())
}
