//! Chart-ready series for the two dashboard panels.
//!
//! Both builders prefer a well-formed backend series and fall back to
//! deriving one from the record list. They are pure functions of their
//! inputs; rendering (and slice selection) happens in the TUI.

use ratatui::style::Color;

use crate::format::format_time;
use crate::reason::color_for;
use crate::stop::{ChartSeries, StopRecord};
use crate::UNKNOWN_REASON;

/// How many records the duration bar panel shows at most.
pub const BAR_WINDOW: usize = 10;

/// One slice of the reason-distribution panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

/// Reason distribution for the pie panel.
///
/// A well-formed backend series is used verbatim; otherwise records
/// are tallied by reason in first-seen label order, absent reasons
/// under "Desconhecido". Labels are always colored through the shared
/// reason mapper so slices and table badges match.
pub fn pie_series(api: Option<&ChartSeries>, stops: &[StopRecord]) -> Vec<PieSlice> {
    if let Some(series) = api {
        if series.well_formed() {
            return series
                .labels
                .iter()
                .zip(series.data.iter())
                .map(|(label, value)| PieSlice {
                    label: label.clone(),
                    value: *value,
                    color: color_for(Some(label)),
                })
                .collect();
        }
    }

    let mut slices: Vec<PieSlice> = Vec::new();
    for stop in stops {
        let reason = stop.reason_or(UNKNOWN_REASON);
        match slices.iter_mut().find(|s| s.label == reason) {
            Some(slice) => slice.value += 1.0,
            None => slices.push(PieSlice {
                label: reason.to_string(),
                value: 1.0,
                color: color_for(Some(reason)),
            }),
        }
    }
    slices
}

/// Durations of the most recent stoppages for the bar panel.
///
/// A well-formed backend series is used verbatim; otherwise the last
/// [`BAR_WINDOW`] records in arrival order (all of them when fewer),
/// labeled with the formatted local start time.
pub fn bar_series(api: Option<&ChartSeries>, stops: &[StopRecord]) -> ChartSeries {
    if let Some(series) = api {
        if series.well_formed() {
            return series.clone();
        }
    }

    let window = stops.len().saturating_sub(BAR_WINDOW);
    let recent = &stops[window..];

    ChartSeries {
        labels: recent
            .iter()
            .map(|s| {
                s.start_local()
                    .map(|t| format_time(&t))
                    .unwrap_or_else(|| "--".to_string())
            })
            .collect(),
        data: recent.iter().map(StopRecord::duration_min).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reason::ReasonCategory;
    use chrono::{TimeZone, Utc};

    fn stop(reason: Option<&str>, duration: f64, minute: u32) -> StopRecord {
        StopRecord {
            reason: reason.map(String::from),
            duration_minutes: Some(duration),
            start_time: Some(Utc.with_ymd_and_hms(2026, 3, 14, 8, minute, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_pie_fallback_keeps_first_seen_order() {
        let stops = vec![
            stop(Some("Setup"), 1.0, 0),
            stop(Some("Manutenção"), 1.0, 1),
            stop(Some("Setup"), 1.0, 2),
            stop(None, 1.0, 3),
        ];
        let slices = pie_series(None, &stops);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Setup", "Manutenção", UNKNOWN_REASON]);
        assert_eq!(slices[0].value, 2.0);
        assert_eq!(slices[0].color, ReasonCategory::Setup.color());
    }

    #[test]
    fn test_pie_uses_backend_series_verbatim() {
        let api = ChartSeries {
            labels: vec!["Manutenção".into(), "Setup".into()],
            data: vec![7.0, 3.0],
        };
        // Records that would tally differently.
        let stops = vec![stop(Some("Setup"), 1.0, 0)];
        let slices = pie_series(Some(&api), &stops);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Manutenção");
        assert_eq!(slices[0].value, 7.0);
        assert_eq!(slices[0].color, ReasonCategory::Maintenance.color());
    }

    #[test]
    fn test_pie_malformed_backend_series_falls_back() {
        let api = ChartSeries {
            labels: vec!["Setup".into(), "Manutenção".into()],
            data: vec![3.0],
        };
        let stops = vec![stop(Some("Setup"), 1.0, 0)];
        let slices = pie_series(Some(&api), &stops);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "Setup");
    }

    #[test]
    fn test_bar_windows_last_ten_in_arrival_order() {
        let stops: Vec<StopRecord> = (0..15)
            .map(|i| stop(Some("Setup"), i as f64, i as u32))
            .collect();
        let series = bar_series(None, &stops);
        assert_eq!(series.data.len(), BAR_WINDOW);
        // Records 5..15, untouched arrival order.
        assert_eq!(series.data[0], 5.0);
        assert_eq!(series.data[9], 14.0);
    }

    #[test]
    fn test_bar_few_records_all_kept() {
        let stops: Vec<StopRecord> = (0..3).map(|i| stop(None, i as f64, i as u32)).collect();
        let series = bar_series(None, &stops);
        assert_eq!(series.data, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_bar_uses_backend_series_verbatim() {
        let api = ChartSeries {
            labels: vec!["Máquina 01".into()],
            data: vec![240.0],
        };
        let series = bar_series(Some(&api), &[]);
        assert_eq!(series, api);
    }

    #[test]
    fn test_builders_are_idempotent() {
        let stops = vec![
            stop(Some("Setup"), 1.0, 0),
            stop(Some("Manutenção"), 2.0, 1),
        ];
        let a = pie_series(None, &stops);
        let b = pie_series(None, &stops);
        assert_eq!(a, b);
        assert_eq!(bar_series(None, &stops), bar_series(None, &stops));
    }
}
