//! Integration tests for the polling controller and dashboard state:
//! liveness guard across teardown, atomic snapshot replacement, and
//! the filter/summary pipeline end to end.

use std::sync::Arc;
use std::time::Duration;

use paradactl::client::ApiClient;
use paradactl::controller::{DashboardState, DataEvent, PollController, HISTORY_WINDOW};
use parada_common::{CardsSummary, ChartSeries, DashboardPayload, StopRecord};

fn controller() -> (PollController, tokio::sync::mpsc::Receiver<DataEvent>) {
    // Never started; no request ever leaves the process.
    let client = Arc::new(ApiClient::new("http://localhost:1").unwrap());
    PollController::new(client, Duration::from_secs(5))
}

fn stop(machine: Option<&str>, reason: Option<&str>, minutes: f64) -> StopRecord {
    StopRecord {
        machine: machine.map(String::from),
        reason: reason.map(String::from),
        duration_minutes: Some(minutes),
        ..Default::default()
    }
}

fn snapshot(epoch: u64, stops: Vec<StopRecord>) -> DataEvent {
    DataEvent::Snapshot {
        epoch,
        payload: DashboardPayload {
            stops,
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_stale_event_rejected_after_stop() {
    let (mut controller, _rx) = controller();
    let epoch = controller.epoch();

    let in_flight = snapshot(epoch, vec![stop(None, Some("Setup"), 10.0)]);
    assert!(controller.admit(&in_flight));

    // Teardown bumps the epoch; a response resolving afterwards must
    // be dropped instead of mutating state.
    controller.stop();
    assert!(!controller.admit(&in_flight));

    let mut state = DashboardState::new("Máquina 01");
    if controller.admit(&in_flight) {
        state.apply(in_flight);
    }
    assert!(state.history_rows().is_empty());
}

#[tokio::test]
async fn test_events_from_current_epoch_admitted() {
    let (mut controller, _rx) = controller();
    controller.stop();
    controller.stop();

    let current = snapshot(controller.epoch(), vec![]);
    let stale = snapshot(controller.epoch() - 1, vec![]);
    let failed = DataEvent::Failed {
        epoch: controller.epoch(),
        message: "x".into(),
    };
    assert!(controller.admit(&current));
    assert!(!controller.admit(&stale));
    assert!(controller.admit(&failed));
}

#[tokio::test]
async fn test_snapshot_replaces_everything_atomically() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(DataEvent::Snapshot {
        epoch: 0,
        payload: DashboardPayload {
            stops: vec![stop(None, Some("Setup"), 5.0)],
            cards: Some(CardsSummary {
                total_stops: 7,
                total_downtime: 99.0,
                ..Default::default()
            }),
            pie: Some(ChartSeries {
                labels: vec!["Setup".into()],
                data: vec![1.0],
            }),
            bar: None,
        },
    });
    assert_eq!(state.summary().total_stops(), 7);

    // A later snapshot with no aggregate sections clears them too;
    // records and aggregates never mix across cycles.
    state.apply(snapshot(0, vec![stop(None, Some("Manutenção"), 3.0)]));
    assert_eq!(state.summary().total_stops(), 1);
    assert_eq!(state.summary().top_reason(), "Manutenção");
    assert_eq!(state.pie().len(), 1);
    assert_eq!(state.pie()[0].label, "Manutenção");
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_data() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(snapshot(0, vec![stop(None, Some("Setup"), 5.0)]));

    state.apply(DataEvent::Failed {
        epoch: 0,
        message: "Erro de rede ao conectar com o backend.".into(),
    });
    assert_eq!(
        state.last_error.as_deref(),
        Some("Erro de rede ao conectar com o backend.")
    );
    assert_eq!(state.history_rows().len(), 1);

    // Next good snapshot clears the error.
    state.apply(snapshot(0, vec![]));
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn test_last_resolved_snapshot_wins() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(snapshot(0, vec![stop(None, Some("Setup"), 5.0)]));
    state.apply(snapshot(
        0,
        vec![
            stop(None, Some("Setup"), 5.0),
            stop(None, Some("Falta de Material"), 12.0),
        ],
    ));
    assert_eq!(state.summary().total_stops(), 2);
}

#[tokio::test]
async fn test_filter_round_trip() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(snapshot(
        0,
        vec![
            stop(None, Some("Setup"), 5.0),
            stop(None, Some("Manutenção"), 7.0),
            stop(None, Some("Setup"), 3.0),
            stop(None, None, 2.0),
        ],
    ));

    state.set_filter("Setup");
    assert_eq!(state.visible_stops().len(), 2);
    assert_eq!(state.summary().total_stops(), 2);
    assert_eq!(state.summary().total_minutes(), 8.0);
    // The distribution stays unfiltered so other slices remain selectable.
    assert_eq!(state.pie().len(), 3);

    // Records without a reason match the placeholder slice.
    state.set_filter("Sem motivo");
    assert_eq!(state.visible_stops().len(), 1);

    state.clear_filter();
    assert_eq!(state.visible_stops().len(), 4);
}

#[tokio::test]
async fn test_machine_scoping_keeps_untagged_records() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(snapshot(
        0,
        vec![
            stop(Some("MÁQUINA 01"), Some("Setup"), 5.0),
            stop(Some("Máquina 02"), Some("Setup"), 5.0),
            stop(None, Some("Manutenção"), 1.0),
        ],
    ));
    assert_eq!(state.machine_stops().len(), 2);
}

#[tokio::test]
async fn test_backend_cards_win_over_computed_stats() {
    let mut state = DashboardState::new("Máquina 01");
    state.apply(DataEvent::Snapshot {
        epoch: 0,
        payload: DashboardPayload {
            stops: vec![stop(None, Some("Setup"), 5.0)],
            cards: Some(CardsSummary {
                total_stops: 42,
                total_downtime: 300.0,
                most_common_reason: Some("Manutenção".into()),
                ..Default::default()
            }),
            pie: None,
            bar: None,
        },
    });

    let summary = state.summary();
    assert_eq!(summary.total_stops(), 42);
    assert_eq!(summary.total_minutes(), 300.0);
    assert_eq!(summary.top_reason(), "Manutenção");
}

#[tokio::test]
async fn test_history_window_newest_first() {
    let rows: Vec<StopRecord> = (0..25)
        .map(|i| stop(None, Some(&format!("r{i}")), i as f64))
        .collect();
    let mut state = DashboardState::new("Máquina 01");
    state.apply(snapshot(0, rows));

    let history = state.history_rows();
    assert_eq!(history.len(), HISTORY_WINDOW);
    assert_eq!(history[0].reason.as_deref(), Some("r24"));
    assert_eq!(history.last().unwrap().reason.as_deref(), Some("r5"));
}

#[tokio::test]
async fn test_refresh_channel_delivers_tagged_failure() {
    // refresh_now against an unreachable backend still produces an
    // event on the channel, tagged with the scheduling epoch.
    let (controller, mut rx) = controller();
    controller.refresh_now();
    let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("refresh event")
        .expect("channel open");
    assert!(controller.admit(&event));
    match event {
        DataEvent::Failed { message, .. } => {
            assert_eq!(message, "Erro ao atualizar dados após registrar parada.");
        }
        DataEvent::Snapshot { .. } => panic!("no backend should be listening on port 1"),
    }
}
