//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SessionReport};

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &SessionReport) -> Result<String> {
        let mut output = String::new();
        let value = &report.value;

        // Candidates
        if let Some(query) = &report.query {
            output.push_str(&format!("Query: {}\n", query));
            if report.candidates.is_empty() {
                output.push_str("  (no candidates)\n");
            }
            for (index, item) in report.candidates.iter().enumerate() {
                output.push_str(&format!(
                    "  [{}] {}\n",
                    index,
                    item.label.as_deref().unwrap_or("?")
                ));
            }
            output.push('\n');
        }

        if let Some(preview) = &report.preview {
            output.push_str(&format!("Preview: {} (not applied)\n\n", preview));
        }

        // Field value
        let formatted = if value.formatted.is_empty() {
            "-"
        } else {
            value.formatted.as_str()
        };
        output.push_str(&format!("Formatted: {}\n", formatted));
        match value.coordinates() {
            Some([lng, lat]) => {
                output.push_str(&format!("Coordinates: {:.6}, {:.6}\n", lat, lng));
            }
            None => output.push_str("Coordinates: -\n"),
        }
        if !value.provider.is_empty() {
            output.push_str(&format!("Provider: {}\n", value.provider));
        }
        output.push_str(&format!(
            "Status: {} ({})\n",
            value.status,
            value.status.bits()
        ));

        Ok(output)
    }
}
