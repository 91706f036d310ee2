//! Polling controller and in-memory dashboard state.
//!
//! The controller owns the periodic `/api/data` fetch. Every fetch
//! result is tagged with the controller epoch at the moment the fetch
//! was scheduled; [`PollController::admit`] drops events from a stale
//! epoch, so an in-flight response resolving after [`stop`] can never
//! mutate state. A manual refresh produces one out-of-band fetch on
//! the same channel; when it races a scheduled tick, the last response
//! to resolve wins and fully replaces state, which is fine because
//! both hit the same authoritative snapshot endpoint.
//!
//! [`stop`]: PollController::stop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use parada_common::charts::{bar_series, pie_series, PieSlice};
use parada_common::normalize::belongs_to;
use parada_common::{
    CardsSummary, ChartSeries, DashboardPayload, StopRecord, Summary, NO_REASON_LABEL,
};

use crate::client::ApiClient;

/// How many rows the history table shows at most.
pub const HISTORY_WINDOW: usize = 20;

/// Outcome of one fetch, tagged with the epoch it was scheduled in.
#[derive(Debug)]
pub enum DataEvent {
    Snapshot {
        epoch: u64,
        payload: DashboardPayload,
    },
    Failed {
        epoch: u64,
        message: String,
    },
}

impl DataEvent {
    fn epoch(&self) -> u64 {
        match self {
            DataEvent::Snapshot { epoch, .. } | DataEvent::Failed { epoch, .. } => *epoch,
        }
    }
}

/// Owns the poll schedule and the liveness guard.
pub struct PollController {
    client: Arc<ApiClient>,
    interval: Duration,
    epoch: u64,
    task: Option<JoinHandle<()>>,
    tx: mpsc::Sender<DataEvent>,
}

impl PollController {
    /// Create a controller and the receiving end of its event channel.
    pub fn new(client: Arc<ApiClient>, interval: Duration) -> (Self, mpsc::Receiver<DataEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (
            Self {
                client,
                interval,
                epoch: 0,
                task: None,
                tx,
            },
            rx,
        )
    }

    /// Current epoch; events tagged with an older one are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Begin polling: one immediate fetch, then one per interval,
    /// until [`stop`](Self::stop). Not gated on login state.
    pub fn start(&mut self) {
        self.stop();
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let interval = self.interval;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                // First tick fires immediately.
                ticker.tick().await;
                let event = match client.fetch_data().await {
                    Ok(payload) => DataEvent::Snapshot { epoch, payload },
                    Err(e) => DataEvent::Failed {
                        epoch,
                        message: e.to_string(),
                    },
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(interval_secs = interval.as_secs(), "polling started");
    }

    /// Tear down: bump the epoch so any in-flight result is discarded,
    /// and cancel the schedule.
    pub fn stop(&mut self) {
        self.epoch += 1;
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("polling stopped");
        }
    }

    /// One out-of-band fetch, e.g. right after registering a stoppage.
    /// Does not reschedule the interval; a race with a scheduled tick
    /// is resolved by last-response-wins.
    pub fn refresh_now(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let event = match client.fetch_data().await {
                Ok(payload) => DataEvent::Snapshot { epoch, payload },
                Err(_) => DataEvent::Failed {
                    epoch,
                    message: "Erro ao atualizar dados após registrar parada.".to_string(),
                },
            };
            let _ = tx.send(event).await;
        });
    }

    /// Liveness guard: whether an event is still current.
    pub fn admit(&self, event: &DataEvent) -> bool {
        event.epoch() == self.epoch
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// In-memory dashboard state, fully replaced on every admitted
/// snapshot.
#[derive(Debug, Clone)]
pub struct DashboardState {
    stops: Vec<StopRecord>,
    cards: Option<CardsSummary>,
    pie_api: Option<ChartSeries>,
    bar_api: Option<ChartSeries>,
    /// Machine this dashboard scopes itself to.
    machine: String,
    /// Active reason filter set by selecting a distribution slice.
    filter_reason: Option<String>,
    /// Last fetch error, cleared by the next successful fetch.
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn new(machine: &str) -> Self {
        Self {
            stops: Vec::new(),
            cards: None,
            pie_api: None,
            bar_api: None,
            machine: machine.to_string(),
            filter_reason: None,
            last_error: None,
        }
    }

    /// Apply an admitted event. A snapshot replaces records and
    /// aggregates together, atomically; a failure only records the
    /// message, leaving data from the previous cycle on screen.
    pub fn apply(&mut self, event: DataEvent) {
        match event {
            DataEvent::Snapshot { payload, .. } => {
                self.stops = payload.stops;
                self.cards = payload.cards;
                self.pie_api = payload.pie;
                self.bar_api = payload.bar;
                self.last_error = None;
            }
            DataEvent::Failed { message, .. } => {
                self.last_error = Some(message);
            }
        }
    }

    /// Records scoped to the monitored machine. Untagged records are
    /// assumed to belong to it.
    pub fn machine_stops(&self) -> Vec<StopRecord> {
        self.stops
            .iter()
            .filter(|s| belongs_to(s.machine.as_deref(), &self.machine))
            .cloned()
            .collect()
    }

    /// Machine-scoped records narrowed by the active reason filter.
    pub fn visible_stops(&self) -> Vec<StopRecord> {
        let scoped = self.machine_stops();
        match &self.filter_reason {
            None => scoped,
            Some(filter) => scoped
                .into_iter()
                .filter(|s| s.reason_or(NO_REASON_LABEL) == filter)
                .collect(),
        }
    }

    /// Summary for the cards row; backend cards win outright.
    pub fn summary(&self) -> Summary {
        Summary::select(self.cards.as_ref(), &self.visible_stops())
    }

    /// Reason distribution, over machine-scoped (unfiltered) records
    /// so the operator can still see and pick other slices.
    pub fn pie(&self) -> Vec<PieSlice> {
        pie_series(self.pie_api.as_ref(), &self.machine_stops())
    }

    /// Recent durations, over the filtered set.
    pub fn bar(&self) -> ChartSeries {
        bar_series(self.bar_api.as_ref(), &self.visible_stops())
    }

    /// Last [`HISTORY_WINDOW`] visible records, newest first.
    pub fn history_rows(&self) -> Vec<StopRecord> {
        let visible = self.visible_stops();
        let skip = visible.len().saturating_sub(HISTORY_WINDOW);
        let mut rows: Vec<StopRecord> = visible[skip..].to_vec();
        rows.reverse();
        rows
    }

    pub fn machine(&self) -> &str {
        &self.machine
    }

    pub fn filter_reason(&self) -> Option<&str> {
        self.filter_reason.as_deref()
    }

    /// Selecting a distribution slice filters the displayed set to
    /// that reason.
    pub fn set_filter(&mut self, reason: &str) {
        self.filter_reason = Some(reason.to_string());
    }

    /// The dedicated clear action resets the filter.
    pub fn clear_filter(&mut self) {
        self.filter_reason = None;
    }
}
