//! Reverse command handler
//!
//! Drops the widget marker at a position and previews the address found
//! there, or commits it with `--apply`.

use crate::cli::{print_report, EndpointArgs};
use crate::config::Config;
use crate::coord::{sanitize, Coordinates};
use crate::error::{Error, Result};
use crate::format::SessionReport;
use crate::map::HeadlessMap;
use crate::widget::{FormFields, GeocoderWidget};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Commit the previewed address
    #[arg(long)]
    pub apply: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let endpoint = args.endpoint.build(&config)?;

    let coords: Coordinates = sanitize(args.lat, args.lng, false)?
        .ok_or_else(|| Error::InvalidCoordinates("missing coordinates".to_string()))?;

    let mut widget = GeocoderWidget::new(
        &FormFields::default(),
        config.widget_options(),
        HeadlessMap::new(),
    );
    widget.drag_marker(&endpoint, coords).await?;

    if args.apply {
        widget.apply_preview()?;
    }

    let report = SessionReport {
        query: None,
        candidates: Vec::new(),
        preview: widget.ui().preview_label.clone(),
        value: widget.value(),
    };
    print_report(&report, &args.format)
}
