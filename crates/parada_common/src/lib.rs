//! Shared types and pure logic for the Maroni stoppage dashboard.
//!
//! Everything in this crate is side-effect free: the serde data model
//! for `/api/data` payloads, the text normalizer used for machine-name
//! matching, the fallback stats aggregator, the reason color mapper
//! and the chart series builders. The `paradactl` binary wires these
//! into the HTTP client and the TUI.

pub mod charts;
pub mod format;
pub mod normalize;
pub mod password;
pub mod reason;
pub mod stats;
pub mod stop;

pub use charts::{bar_series, pie_series, PieSlice};
pub use reason::ReasonCategory;
pub use stats::{StopStats, Summary};
pub use stop::{CardsSummary, ChartSeries, DashboardPayload, StopRecord};

/// The single machine this dashboard scopes itself to.
pub const MONITORED_MACHINE: &str = "Máquina 01";

/// Placeholder reason for records where the backend sent none.
///
/// Tally placeholders ("Desconhecido") and the filter label for
/// reason-less records ("Sem motivo") are distinct on purpose; the
/// backend's web dashboard uses both, and the filter matches the
/// latter.
pub const UNKNOWN_REASON: &str = "Desconhecido";

/// Filter label under which reason-less records are grouped.
pub const NO_REASON_LABEL: &str = "Sem motivo";
