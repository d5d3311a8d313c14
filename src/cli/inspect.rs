//! Inspect command handler
//!
//! Restores a widget from a stored field value (JSON) and prints what it
//! shows.

use crate::cli::print_report;
use crate::config::Config;
use crate::error::Result;
use crate::format::SessionReport;
use crate::map::HeadlessMap;
use crate::value::FieldValue;
use crate::widget::GeocoderWidget;
use clap::Args;
use std::io::Read;

/// Inspect command arguments
#[derive(Args)]
pub struct InspectArgs {
    /// JSON file holding the field value, `-` for stdin
    pub input: String,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the inspect command
pub fn run(args: InspectArgs) -> Result<()> {
    let raw = if args.input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&args.input)?
    };

    let config = Config::load()?;
    let report = inspect(&raw, &config)?;
    print_report(&report, &args.format)
}

/// Restore a widget from `raw` and report its value
fn inspect(raw: &str, config: &Config) -> Result<SessionReport> {
    let stored: FieldValue = serde_json::from_str(raw)?;
    let options = config.widget_options();
    let fields = stored.to_fields(&options.status_bits);

    let widget = GeocoderWidget::new(&fields, options, HeadlessMap::new());
    Ok(SessionReport::new(widget.value()))
}
