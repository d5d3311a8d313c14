//! Output formatters
//!
//! Provides trait-based output formatting for widget sessions.

pub mod json;
pub mod text;

use crate::endpoint::SelectableItem;
use crate::error::Result;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Outcome of a command line widget session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Text typed into the query input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Autocomplete candidates that were listed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<SelectableItem>,
    /// Label awaiting confirmation after a reverse lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Value the backend would persist
    pub value: FieldValue,
}

impl SessionReport {
    pub fn new(value: FieldValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a session report
    fn format(&self, report: &SessionReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Session report as JSON".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
    ]
}
