//! Autocomplete state machine
//!
//! `Idle -> Querying -> Populated | Empty -> Idle`. Queries are gated on a
//! minimum input length. Each query carries a generation number and only the
//! response to the latest query is applied.

use crate::endpoint::{MatchResponse, SelectableItem};
use crate::error::Result;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Querying,
    Populated,
    Empty,
}

/// Icon shown inside the query input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    Idle,
    Loading,
    HasResults,
    NoResults,
}

/// A forward lookup the host has to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub generation: u64,
    /// Trimmed search term
    pub term: String,
}

#[derive(Debug, Default)]
pub struct AutocompleteController {
    min_length: usize,
    generation: u64,
    phase: Phase,
    indicator: Indicator,
    items: Vec<SelectableItem>,
}

impl AutocompleteController {
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            ..Self::default()
        }
    }

    /// React to changed input text
    ///
    /// The gate counts characters of the untrimmed text; the request carries
    /// the trimmed term. Short input closes the list and invalidates any
    /// query still in flight.
    pub fn begin(&mut self, text: &str) -> Option<QueryRequest> {
        self.generation += 1;

        if text.chars().count() < self.min_length {
            debug!(length = text.chars().count(), "query below minimum length");
            self.close();
            return None;
        }

        self.phase = Phase::Querying;
        self.indicator = Indicator::Loading;
        Some(QueryRequest {
            generation: self.generation,
            term: text.trim().to_string(),
        })
    }

    /// Apply a lookup result. Returns `None` when `request` is stale.
    pub fn complete(
        &mut self,
        request: &QueryRequest,
        result: Result<MatchResponse>,
    ) -> Option<&[SelectableItem]> {
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                current = self.generation,
                "discarding stale autocomplete response"
            );
            return None;
        }

        self.items = match result {
            Ok(response) => response.to_items(),
            Err(e) => {
                warn!(error = %e, term = %request.term, "autocomplete lookup failed");
                Vec::new()
            }
        };

        if self.items.is_empty() {
            self.phase = Phase::Empty;
            self.indicator = Indicator::NoResults;
        } else {
            self.phase = Phase::Populated;
            self.indicator = Indicator::HasResults;
        }
        Some(&self.items)
    }

    /// Pick a candidate. The returned item is forced to a total of one.
    pub fn select(&mut self, index: usize) -> Option<SelectableItem> {
        let mut item = self.items.get(index)?.clone();
        item.total = Some(1);
        self.close();
        Some(item)
    }

    /// Hide the candidate list
    pub fn close(&mut self) {
        self.phase = Phase::Idle;
        self.items.clear();
    }

    /// Back to the idle icon, unless a query is in flight
    pub fn reset_indicator(&mut self) {
        if self.phase != Phase::Querying {
            self.indicator = Indicator::Idle;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn items(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
