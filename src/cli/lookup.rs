//! Lookup command handler
//!
//! Types a query into a headless widget and lists the candidates.

use crate::cli::{print_report, EndpointArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::SessionReport;
use crate::map::HeadlessMap;
use crate::widget::{EventOutcome, FormFields, GeocoderWidget, Indicator};
use clap::Args;

/// Lookup command arguments
#[derive(Args)]
pub struct LookupArgs {
    /// Place to search for
    pub query: String,

    /// Select the candidate at this index
    #[arg(long, short = 's')]
    pub select: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

/// Run the lookup command
pub async fn run(args: LookupArgs) -> Result<()> {
    let config = Config::load()?;
    let endpoint = args.endpoint.build(&config)?;

    let mut widget = GeocoderWidget::new(
        &FormFields::default(),
        config.widget_options(),
        HeadlessMap::new(),
    );

    let candidates = widget.search(&endpoint, &args.query).await;
    if candidates.is_empty() && widget.indicator() == Indicator::Idle {
        eprintln!(
            "Query too short (minimum {} characters)",
            config.widget.min_query_length
        );
    }

    if let Some(index) = args.select {
        if widget.select(index)? == EventOutcome::Continue {
            return Err(Error::Config(format!(
                "No candidate at index {} ({} listed)",
                index,
                candidates.len()
            )));
        }
    }

    let report = SessionReport {
        query: Some(args.query),
        candidates,
        preview: None,
        value: widget.value(),
    };
    print_report(&report, &args.format)
}
