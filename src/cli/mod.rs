//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. Lookups run
//! against a headless widget, so the output is what the form would submit.

pub mod config;
pub mod inspect;
pub mod lookup;
pub mod reverse;

use crate::config::{Config, EndpointConfig};
use crate::endpoint::{get_endpoint, AnyEndpoint};
use crate::error::{Error, Result};
use crate::format::{get_formatter, SessionReport};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Geocoder field widget driven from the terminal
#[derive(Parser)]
#[command(name = "geocoder-field")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log widget transitions to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a place and optionally select a candidate
    Lookup(lookup::LookupArgs),

    /// Drop the marker at a position and look up its address
    Reverse(reverse::ReverseArgs),

    /// Restore a widget from a stored field value
    Inspect(inspect::InspectArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Endpoint overrides shared by the lookup commands
#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// Endpoint kind (nominatim, ajax)
    #[arg(long, short = 'e')]
    pub endpoint: Option<String>,

    /// Endpoint URL
    #[arg(long)]
    pub url: Option<String>,

    /// Response language
    #[arg(long)]
    pub language: Option<String>,
}

impl EndpointArgs {
    /// Apply the overrides on top of the configured endpoint
    pub fn resolve(&self, config: &EndpointConfig) -> EndpointConfig {
        let mut resolved = config.clone();
        if let Some(kind) = &self.endpoint {
            resolved.kind = kind.clone();
        }
        if let Some(url) = &self.url {
            resolved.url = url.clone();
        }
        if let Some(language) = &self.language {
            resolved.language = language.clone();
        }
        resolved
    }

    pub fn build(&self, config: &Config) -> Result<AnyEndpoint> {
        get_endpoint(&self.resolve(&config.endpoint))
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Render a report with the named formatter and print it
fn print_report(report: &SessionReport, format: &str) -> Result<()> {
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    let output = formatter.format(report)?;
    println!("{}", output.trim_end());
    Ok(())
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lookup(args) => lookup::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Inspect(args) => inspect::run(args),
        Commands::Config(args) => config::run(args),
    }
}
