//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "widget.detail_zoom")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key, args.value) {
        (None, None) => show_all_config(&config),
        (Some(key), None) => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{}", value);
        }
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, config.get(&key).unwrap_or(value));
        }
        (None, Some(_)) => {
            return Err(Error::Config(
                "Must specify a key to set a value".to_string(),
            ));
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {}\nAvailable keys:\n  {}",
        key,
        Config::available_keys().join("\n  ")
    ))
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[widget]");
    println!("initial_zoom = {}", config.widget.initial_zoom);
    println!("detail_zoom = {}", config.widget.detail_zoom);
    println!("fly_duration_ms = {}", config.widget.fly_duration_ms);
    println!("min_query_length = {}", config.widget.min_query_length);
    println!(
        "default_center = [{}, {}]",
        config.widget.default_center[0], config.widget.default_center[1]
    );
    println!();

    println!("[labels]");
    println!("not_found = \"{}\"", config.labels.not_found);
    println!("apply = \"{}\"", config.labels.apply);
    println!();

    println!("[map]");
    println!("tile_url = \"{}\"", config.map.tile_url);
    println!("attribution = \"{}\"", config.map.attribution);
    println!();

    println!("[endpoint]");
    println!("kind = \"{}\"", config.endpoint.kind);
    if config.endpoint.url.is_empty() {
        println!("url = \"\" # public Nominatim");
    } else {
        println!("url = \"{}\"", config.endpoint.url);
    }
    println!("language = \"{}\"", config.endpoint.language);
    println!("limit = {}", config.endpoint.limit);
    println!("timeout_secs = {}", config.endpoint.timeout_secs);
    println!("formatter = \"{}\"", config.endpoint.formatter);
}
