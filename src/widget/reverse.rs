//! Reverse lookup after a marker drag

use crate::coord::Coordinates;
use crate::endpoint::{MatchResponse, SelectableItem};
use crate::error::Result;
use tracing::{debug, warn};

/// A reverse lookup the host has to run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseRequest {
    pub generation: u64,
    pub coords: Coordinates,
}

/// What a reverse lookup result means for the widget
#[derive(Debug, Clone, PartialEq)]
pub enum ReverseOutcome {
    /// A newer drag superseded this lookup
    Stale,
    /// First match, to be shown as a preview
    Found(SelectableItem),
    NotFound,
    /// Transport or endpoint failure
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ReverseGeocodeController {
    generation: u64,
    pending: bool,
}

impl ReverseGeocodeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, coords: Coordinates) -> ReverseRequest {
        self.generation += 1;
        self.pending = true;
        debug!(generation = self.generation, %coords, "reverse lookup started");
        ReverseRequest {
            generation: self.generation,
            coords,
        }
    }

    pub fn complete(
        &mut self,
        request: &ReverseRequest,
        result: Result<MatchResponse>,
    ) -> ReverseOutcome {
        if request.generation != self.generation {
            debug!(
                generation = request.generation,
                current = self.generation,
                "discarding stale reverse response"
            );
            return ReverseOutcome::Stale;
        }
        self.pending = false;

        match result {
            Ok(response) => match response.matches.first() {
                Some(first) => ReverseOutcome::Found(first.to_item(response.matches.len())),
                None => ReverseOutcome::NotFound,
            },
            Err(e) => {
                warn!(error = %e, coords = %request.coords, "reverse lookup failed");
                ReverseOutcome::Failed(e.to_string())
            }
        }
    }

    /// A lookup is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Match;
    use crate::error::Error;

    #[test]
    fn test_found_takes_first_match() {
        let mut rc = ReverseGeocodeController::new();
        let request = rc.begin(Coordinates::new(52.5, 13.4));
        assert!(rc.is_pending());

        let response = MatchResponse::new(vec![Match::new("A", "a"), Match::new("B", "b")]);
        let outcome = rc.complete(&request, Ok(response));
        assert_eq!(outcome, ReverseOutcome::Found(SelectableItem::new("A", "a", 2)));
        assert!(!rc.is_pending());
    }

    #[test]
    fn test_not_found_and_failed() {
        let mut rc = ReverseGeocodeController::new();
        let request = rc.begin(Coordinates::new(0.0, 0.0));
        assert_eq!(
            rc.complete(&request, Ok(MatchResponse::default())),
            ReverseOutcome::NotFound
        );

        let request = rc.begin(Coordinates::new(0.0, 0.0));
        let outcome = rc.complete(&request, Err(Error::Endpoint("timeout".to_string())));
        assert!(matches!(outcome, ReverseOutcome::Failed(msg) if msg.contains("timeout")));
    }

    #[test]
    fn test_stale() {
        let mut rc = ReverseGeocodeController::new();
        let first = rc.begin(Coordinates::new(1.0, 1.0));
        let second = rc.begin(Coordinates::new(2.0, 2.0));

        let response = MatchResponse::new(vec![Match::new("A", "a")]);
        assert_eq!(rc.complete(&first, Ok(response)), ReverseOutcome::Stale);
        assert!(rc.is_pending());
        assert_eq!(
            rc.complete(&second, Ok(MatchResponse::default())),
            ReverseOutcome::NotFound
        );
    }
}
