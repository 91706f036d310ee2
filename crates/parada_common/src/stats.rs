//! Fallback aggregation for the summary cards.
//!
//! The backend normally ships precomputed statistics under `cards`.
//! When it does not, the client computes the same three figures from
//! the record list. The two sources are never blended field by field;
//! [`Summary`] makes the choice explicit and carries its provenance.

use serde::{Deserialize, Serialize};

use crate::stop::{CardsSummary, StopRecord};
use crate::UNKNOWN_REASON;

/// Statistics computed client-side from a record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopStats {
    pub total_stops: u64,
    pub total_minutes: f64,
    pub top_reason: String,
}

impl StopStats {
    /// Aggregate a record list.
    ///
    /// Missing durations contribute 0; absent reasons tally under
    /// "Desconhecido". The top reason breaks ties by first-encountered
    /// tally order, which a Vec-based tally preserves; an empty input
    /// yields the "--" placeholder.
    pub fn compute(stops: &[StopRecord]) -> Self {
        let total_stops = stops.len() as u64;
        let total_minutes = stops.iter().map(StopRecord::duration_min).sum();

        let mut tally: Vec<(&str, u64)> = Vec::new();
        for stop in stops {
            let reason = stop.reason_or(UNKNOWN_REASON);
            match tally.iter_mut().find(|(r, _)| *r == reason) {
                Some((_, n)) => *n += 1,
                None => tally.push((reason, 1)),
            }
        }

        // Strictly-greater comparison over the insertion-ordered tally
        // keeps the first-seen reason on ties.
        let mut top: Option<(&str, u64)> = None;
        for (reason, n) in &tally {
            if top.map_or(true, |(_, best)| *n > best) {
                top = Some((reason, *n));
            }
        }
        let top_reason = top
            .map(|(r, _)| r.to_string())
            .unwrap_or_else(|| "--".to_string());

        Self {
            total_stops,
            total_minutes,
            top_reason,
        }
    }
}

/// Source-tagged summary for the cards row.
///
/// Backend cards win outright when present; the aggregator is not even
/// invoked in that case.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    FromBackend(CardsSummary),
    Computed(StopStats),
}

impl Summary {
    /// Select the summary source for a fetched payload.
    pub fn select(cards: Option<&CardsSummary>, stops: &[StopRecord]) -> Self {
        match cards {
            Some(c) => Summary::FromBackend(c.clone()),
            None => Summary::Computed(StopStats::compute(stops)),
        }
    }

    pub fn total_stops(&self) -> u64 {
        match self {
            Summary::FromBackend(c) => c.total_stops,
            Summary::Computed(s) => s.total_stops,
        }
    }

    pub fn total_minutes(&self) -> f64 {
        match self {
            Summary::FromBackend(c) => c.total_downtime,
            Summary::Computed(s) => s.total_minutes,
        }
    }

    pub fn top_reason(&self) -> &str {
        match self {
            Summary::FromBackend(c) => c.most_common_reason.as_deref().unwrap_or("--"),
            Summary::Computed(s) => &s.top_reason,
        }
    }
}
