//! Data model for the `/api/data` payload.
//!
//! The backend grew organically and older rows use synonym field
//! names (`start`/`timestamp` instead of `start_time`, `duration`
//! instead of `duration_minutes`). The accessors here are the only
//! sanctioned way to read those fields: exactly the first present
//! synonym wins, in the documented priority order, and values are
//! never merged or summed.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One logged interval where a machine was not producing.
///
/// Received from the backend and read-only on the client; every field
/// may be absent in old rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_backend_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "de_backend_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "de_backend_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "de_backend_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// AUTO for sensor-derived stops, MANUAL for operator-registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origem: Option<String>,
}

/// Parse one backend timestamp.
///
/// The backend emits `datetime.utcnow().isoformat()`, a naive ISO
/// string with no offset (`2026-08-26T12:00:00.123456`); older rows
/// and proxies may carry a full RFC 3339 offset instead. Both are
/// accepted, naive values taken as UTC.
pub fn parse_backend_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&t));
    }
    Err(format!("timestamp inválido: {raw}"))
}

fn de_backend_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_backend_instant(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl StopRecord {
    /// Authoritative start instant: `start_time`, then `start`, then
    /// `timestamp`.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start_time.or(self.start).or(self.timestamp)
    }

    /// Authoritative start instant in local time, for display.
    pub fn start_local(&self) -> Option<DateTime<Local>> {
        self.start_instant().map(|t| t.with_timezone(&Local))
    }

    /// Authoritative elapsed minutes: `duration_minutes`, then
    /// `duration`. Missing duration contributes 0 to aggregates.
    pub fn duration_min(&self) -> f64 {
        self.duration_minutes.or(self.duration).unwrap_or(0.0)
    }

    /// Reason label for tallying; absent reason maps to the given
    /// placeholder.
    pub fn reason_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.reason.as_deref() {
            Some(r) if !r.is_empty() => r,
            _ => placeholder,
        }
    }
}

/// Precomputed statistics supplied by the backend under `cards`.
///
/// When present this is authoritative; the client must not recompute
/// any of these from the record list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsSummary {
    #[serde(default)]
    pub total_stops: u64,
    /// Total downtime in minutes.
    #[serde(default)]
    pub total_downtime: f64,
    #[serde(default)]
    pub avg_downtime: Option<f64>,
    #[serde(default)]
    pub most_common_reason: Option<String>,
    #[serde(default)]
    pub active_machines: Option<u32>,
    #[serde(default)]
    pub inactive_machines: Option<u32>,
}

/// Pre-aggregated chart series (`pie` or `bar` in the payload):
/// category labels paired positionally with numeric values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<f64>,
}

impl ChartSeries {
    /// A backend series is usable only when labels and data are
    /// parallel and non-empty; anything else falls back to local
    /// computation.
    pub fn well_formed(&self) -> bool {
        !self.labels.is_empty() && self.labels.len() == self.data.len()
    }
}

/// Full `/api/data` response. Replaces the in-memory state atomically
/// on every successful fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardPayload {
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<CardsSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie: Option<ChartSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<ChartSeries>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, 0, 0).unwrap()
    }

    #[test]
    fn test_start_synonym_priority() {
        let rec = StopRecord {
            start_time: Some(ts(1)),
            start: Some(ts(2)),
            timestamp: Some(ts(3)),
            ..Default::default()
        };
        assert_eq!(rec.start_instant(), Some(ts(1)));

        let rec = StopRecord {
            start: Some(ts(2)),
            timestamp: Some(ts(3)),
            ..Default::default()
        };
        assert_eq!(rec.start_instant(), Some(ts(2)));

        let rec = StopRecord {
            timestamp: Some(ts(3)),
            ..Default::default()
        };
        assert_eq!(rec.start_instant(), Some(ts(3)));

        assert_eq!(StopRecord::default().start_instant(), None);
    }

    #[test]
    fn test_duration_synonym_priority() {
        let rec = StopRecord {
            duration_minutes: Some(12.5),
            duration: Some(99.0),
            ..Default::default()
        };
        // First present synonym wins; never summed.
        assert_eq!(rec.duration_min(), 12.5);

        let rec = StopRecord {
            duration: Some(7.0),
            ..Default::default()
        };
        assert_eq!(rec.duration_min(), 7.0);

        assert_eq!(StopRecord::default().duration_min(), 0.0);
    }

    #[test]
    fn test_reason_placeholder() {
        let rec = StopRecord {
            reason: Some("Setup".into()),
            ..Default::default()
        };
        assert_eq!(rec.reason_or("Desconhecido"), "Setup");
        assert_eq!(StopRecord::default().reason_or("Desconhecido"), "Desconhecido");

        let rec = StopRecord {
            reason: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(rec.reason_or("Desconhecido"), "Desconhecido");
    }

    #[test]
    fn test_series_well_formed() {
        let ok = ChartSeries {
            labels: vec!["Setup".into()],
            data: vec![3.0],
        };
        assert!(ok.well_formed());

        let mismatched = ChartSeries {
            labels: vec!["Setup".into(), "Manutenção".into()],
            data: vec![3.0],
        };
        assert!(!mismatched.well_formed());
        assert!(!ChartSeries::default().well_formed());
    }

    #[test]
    fn test_naive_backend_timestamps_accepted() {
        // The backend writes `datetime.utcnow().isoformat()`: no
        // offset, microsecond precision.
        let json = r#"{
            "stops": [
                {"machine": "Máquina 01", "reason": "Setup",
                 "start_time": "2026-08-26T12:00:00.123456",
                 "end_time": "2026-08-26T12:30:00",
                 "duration_minutes": 30.0}
            ]
        }"#;
        let payload: DashboardPayload = serde_json::from_str(json).unwrap();
        let rec = &payload.stops[0];
        let start = rec.start_instant().unwrap();
        assert_eq!(
            start.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            "2026-08-26T12:00:00.123456"
        );
        assert_eq!(
            rec.end_time.unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 26, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_backend_instant_variants() {
        // Naive, naive with fraction, and full RFC 3339 all resolve
        // to the same UTC instant.
        let expected = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        assert_eq!(
            parse_backend_instant("2026-08-26T12:00:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_backend_instant("2026-08-26T12:00:00.000000").unwrap(),
            expected
        );
        assert_eq!(
            parse_backend_instant("2026-08-26T12:00:00Z").unwrap(),
            expected
        );
        assert_eq!(
            parse_backend_instant("2026-08-26T09:00:00-03:00").unwrap(),
            expected
        );
        assert!(parse_backend_instant("ontem").is_err());
    }

    #[test]
    fn test_payload_deserializes_backend_shape() {
        let json = r#"{
            "stops": [
                {"machine": "Máquina 01", "reason": "Setup",
                 "start_time": "2026-03-14T08:00:00Z",
                 "end_time": "2026-03-14T08:30:00Z",
                 "duration_minutes": 30.0, "origem": "MANUAL"}
            ],
            "cards": {"totalStops": 1, "totalDowntime": 30.0,
                      "mostCommonReason": "Setup",
                      "activeMachines": 2, "inactiveMachines": 1},
            "pie": {"labels": ["Setup"], "data": [1]},
            "bar": {"labels": ["Máquina 01"], "data": [30.0]}
        }"#;
        let payload: DashboardPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.stops.len(), 1);
        let cards = payload.cards.unwrap();
        assert_eq!(cards.total_stops, 1);
        assert_eq!(cards.most_common_reason.as_deref(), Some("Setup"));
        assert!(payload.pie.unwrap().well_formed());
    }

    #[test]
    fn test_payload_tolerates_missing_sections() {
        let payload: DashboardPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.stops.is_empty());
        assert!(payload.cards.is_none());
        assert!(payload.pie.is_none());
        assert!(payload.bar.is_none());
    }
}
