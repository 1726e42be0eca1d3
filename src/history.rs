use crate::errors::Result;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Resource usage history written by the edge node.
///
/// Series run parallel to `timestamps`. Missing series deserialize as empty
/// and `null` samples (e.g. no GPU) as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub timestamps: Vec<String>,
    #[serde(default)]
    pub cpu_load: Vec<Option<f64>>,
    #[serde(default)]
    pub occupied_memory: Vec<Option<f64>>,
    #[serde(default)]
    pub total_memory: Vec<Option<f64>>,
    #[serde(default)]
    pub gpu_load: Vec<Option<f64>>,
    #[serde(default)]
    pub gpu_occupied_memory: Vec<Option<f64>>,
    #[serde(default)]
    pub gpu_total_memory: Vec<Option<f64>>,
}

impl HistoryRecord {
    /// Keep only the newest `max` entries of every series
    pub fn trim(&mut self, max: usize) {
        keep_last(&mut self.timestamps, max);
        keep_last(&mut self.cpu_load, max);
        keep_last(&mut self.occupied_memory, max);
        keep_last(&mut self.total_memory, max);
        keep_last(&mut self.gpu_load, max);
        keep_last(&mut self.gpu_occupied_memory, max);
        keep_last(&mut self.gpu_total_memory, max);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<&str> {
        self.timestamps.first().map(String::as_str)
    }

    pub fn last_timestamp(&self) -> Option<&str> {
        self.timestamps.last().map(String::as_str)
    }

    pub fn series(&self, metric: Metric) -> &[Option<f64>] {
        match metric {
            Metric::CpuLoad => &self.cpu_load,
            Metric::OccupiedMemory => &self.occupied_memory,
            Metric::GpuLoad => &self.gpu_load,
            Metric::GpuOccupiedMemory => &self.gpu_occupied_memory,
        }
    }
}

fn keep_last<T>(values: &mut Vec<T>, max: usize) {
    if values.len() > max {
        let excess = values.len() - max;
        values.drain(..excess);
    }
}

/// Read the history file; `Ok(None)` when the node has not written it yet
pub fn load_history(path: &Path) -> Result<Option<HistoryRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let record = serde_json::from_str(&content)?;
    Ok(Some(record))
}

/// Detects whether a freshly loaded history differs from the previous one
#[derive(Debug, Default)]
pub struct HistoryTracker {
    last_timestamps: Vec<String>,
}

impl HistoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `record` carries a timestamp list not seen on the last check
    pub fn check(&mut self, record: &HistoryRecord) -> bool {
        if record.timestamps.is_empty() || record.timestamps == self.last_timestamps {
            return false;
        }
        self.last_timestamps = record.timestamps.clone();
        true
    }

    pub fn reset(&mut self) {
        self.last_timestamps.clear();
    }
}

/// The four charted metrics, in grid order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    CpuLoad,
    OccupiedMemory,
    GpuLoad,
    GpuOccupiedMemory,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CpuLoad,
        Metric::OccupiedMemory,
        Metric::GpuLoad,
        Metric::GpuOccupiedMemory,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Metric::CpuLoad => "CPU Load",
            Metric::OccupiedMemory => "Memory Load",
            Metric::GpuLoad => "GPU Load",
            Metric::GpuOccupiedMemory => "GPU Memory Load",
        }
    }

    /// Legend and y-axis label
    pub fn label(self) -> &'static str {
        match self {
            Metric::CpuLoad => "CPU Load",
            Metric::OccupiedMemory => "Occupied Memory",
            Metric::GpuLoad => "GPU Load",
            Metric::GpuOccupiedMemory => "Occupied GPU Memory",
        }
    }
}

/// Points of one chart: x is unix seconds, y the sample value
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPlot {
    pub metric: Metric,
    pub points: Vec<[f64; 2]>,
}

impl MetricPlot {
    pub fn has_data(&self) -> bool {
        !self.points.is_empty()
    }
}

/// Build the chart series from the newest `limit` entries of `record`.
///
/// Series are aligned on their tails, so a series shorter than the timestamp
/// list pairs with the most recent timestamps. Samples with an unparseable
/// timestamp or a `null` value are skipped.
pub fn build_plots(record: Option<&HistoryRecord>, limit: usize) -> Vec<MetricPlot> {
    let times: Vec<Option<f64>> = record
        .map(|r| tail(&r.timestamps, limit).iter().map(|ts| parse_timestamp(ts)).collect())
        .unwrap_or_default();

    Metric::ALL
        .iter()
        .map(|&metric| {
            let points = match record {
                Some(record) => {
                    let values = tail(record.series(metric), limit);
                    let n = values.len().min(times.len());
                    times[times.len() - n..]
                        .iter()
                        .zip(&values[values.len() - n..])
                        .filter_map(|(t, v)| Some([(*t)?, (*v)?]))
                        .collect()
                }
                None => Vec::new(),
            };
            MetricPlot { metric, points }
        })
        .collect()
}

fn tail<T>(values: &[T], limit: usize) -> &[T] {
    &values[values.len().saturating_sub(limit)..]
}

/// Unix seconds for an ISO-8601 timestamp. Timestamps without an offset are
/// taken as local time, which is how the node writes them.
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.timestamp_millis() as f64 / 1000.0);
    }

    let naive = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(local.timestamp_millis() as f64 / 1000.0)
}

/// Time axis tick label (`HH:MM:SS`, local time)
pub fn format_time_tick(secs: f64) -> String {
    match Local.timestamp_opt(secs.floor() as i64, 0).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> HistoryRecord {
        let timestamps = (0..n)
            .map(|i| format!("2024-05-01T10:{:02}:{:02}", i / 60, i % 60))
            .collect();
        let series = |scale: f64| (0..n).map(|i| Some(i as f64 * scale)).collect();
        HistoryRecord {
            timestamps,
            cpu_load: series(1.0),
            occupied_memory: series(2.0),
            total_memory: series(4.0),
            gpu_load: Vec::new(),
            gpu_occupied_memory: series(0.5),
            gpu_total_memory: Vec::new(),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_history(&dir.path().join("local_history.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_partial_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_history.json");
        fs::write(
            &path,
            r#"{
                "timestamps": ["2024-05-01T10:00:00.123456", "2024-05-01T10:00:10.5"],
                "cpu_load": [12.5, 14.0],
                "gpu_load": [null, 3.0],
                "epoch": 17
            }"#,
        )
        .unwrap();

        let loaded = load_history(&path).unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cpu_load, vec![Some(12.5), Some(14.0)]);
        assert_eq!(loaded.gpu_load, vec![None, Some(3.0)]);
        assert!(loaded.occupied_memory.is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_history.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_history(&path).is_err());
    }

    #[test]
    fn test_trim_keeps_newest() {
        let mut data = record(10);
        data.trim(4);

        assert_eq!(data.len(), 4);
        assert_eq!(data.first_timestamp(), Some("2024-05-01T10:00:06"));
        assert_eq!(data.cpu_load.first(), Some(&Some(6.0)));
        assert_eq!(data.gpu_occupied_memory.len(), 4);
        assert!(data.gpu_load.is_empty());
    }

    #[test]
    fn test_tracker_detects_changes_only() {
        let mut tracker = HistoryTracker::new();
        let first = record(3);

        assert!(tracker.check(&first));
        assert!(!tracker.check(&first.clone()));

        let second = record(4);
        assert!(tracker.check(&second));

        tracker.reset();
        assert!(tracker.check(&second));
    }

    #[test]
    fn test_tracker_ignores_empty_history() {
        let mut tracker = HistoryTracker::new();
        assert!(!tracker.check(&HistoryRecord::default()));
    }

    #[test]
    fn test_build_plots_limits_and_placeholders() {
        let data = record(150);
        let plots = build_plots(Some(&data), 100);

        assert_eq!(plots.len(), 4);
        let cpu = &plots[0];
        assert_eq!(cpu.metric, Metric::CpuLoad);
        assert_eq!(cpu.points.len(), 100);
        assert_eq!(cpu.points[0][1], 50.0);
        assert!(cpu.points.windows(2).all(|w| w[1][0] - w[0][0] == 1.0));

        // No GPU load series in the file
        assert_eq!(plots[2].metric, Metric::GpuLoad);
        assert!(!plots[2].has_data());
    }

    #[test]
    fn test_build_plots_without_data() {
        let plots = build_plots(None, 100);
        assert_eq!(plots.len(), 4);
        assert!(plots.iter().all(|p| !p.has_data()));
    }

    #[test]
    fn test_short_series_aligns_with_latest_timestamps() {
        let mut data = record(5);
        data.cpu_load = vec![Some(7.0), Some(8.0)];
        let plots = build_plots(Some(&data), 100);

        let expected_last = parse_timestamp("2024-05-01T10:00:04").unwrap();
        assert_eq!(plots[0].points.len(), 2);
        assert_eq!(plots[0].points[1], [expected_last, 8.0]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2024-05-01T10:00:00").unwrap();
        let fractional = parse_timestamp("2024-05-01T10:00:00.500000").unwrap();
        let spaced = parse_timestamp("2024-05-01 10:00:00").unwrap();
        assert_eq!(fractional - naive, 0.5);
        assert_eq!(spaced, naive);

        assert_eq!(parse_timestamp("2024-05-01T10:00:00+00:00"), Some(1714557600.0));
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_time_tick_roundtrips_local_time() {
        let secs = parse_timestamp("2024-05-01T13:45:09").unwrap();
        assert_eq!(format_time_tick(secs), "13:45:09");
    }
}
