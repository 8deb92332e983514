use std::collections::BTreeMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::PlotError;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub unit_id: i64,
    pub frame: usize,
}
/// Sorted spikes, one row per event.
#[derive(Clone, Debug, Default)]
pub struct SpikeTable {
    rows: Vec<SpikeRecord>,
}
impl SpikeTable {
    pub fn new(rows: Vec<SpikeRecord>) -> Self {
        Self { rows }
    }
    /// Parses a JSON array of `{"unit_id": .., "frame": ..}` records.
    pub fn from_json_str(text: &str) -> Result<Self, PlotError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlotError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn rows(&self) -> &[SpikeRecord] {
        &self.rows
    }
    /// Frames of every spike attributed to `unit_id`, in table order.
    pub fn frames_for_unit(&self, unit_id: i64) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|r| r.unit_id == unit_id)
            .map(|r| r.frame)
            .collect()
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    pub peak_frame: usize,
    pub peak_channel: usize,
    /// Columns other than the two above, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
impl PeakRecord {
    pub fn new(peak_frame: usize, peak_channel: usize) -> Self {
        Self {
            peak_frame,
            peak_channel,
            extra: BTreeMap::new(),
        }
    }
}
/// Detected peaks (typically the ones flagged as noise), indexed by row.
#[derive(Clone, Debug, Default)]
pub struct PeakTable {
    rows: Vec<PeakRecord>,
}
impl PeakTable {
    pub fn new(rows: Vec<PeakRecord>) -> Self {
        Self { rows }
    }
    pub fn from_json_str(text: &str) -> Result<Self, PlotError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlotError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn row(&self, idx: usize) -> Result<&PeakRecord, PlotError> {
        self.rows.get(idx).ok_or(PlotError::RowOutOfRange {
            row: idx,
            available: self.rows.len(),
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn unit_frames_keep_table_order() {
        let spikes = SpikeTable::from_json_str(
            r#"[{"unit_id": 2, "frame": 90}, {"unit_id": 1, "frame": 10}, {"unit_id": 2, "frame": 40}]"#,
        )
        .unwrap();
        assert_eq!(spikes.len(), 3);
        assert_eq!(spikes.frames_for_unit(2), vec![90, 40]);
        assert!(spikes.frames_for_unit(7).is_empty());
    }
    #[test]
    fn peak_rows_keep_extra_columns() {
        let peaks = PeakTable::from_json_str(
            r#"[{"peak_frame": 500, "peak_channel": 3, "amplitude": -81.5}]"#,
        )
        .unwrap();
        let row = peaks.row(0).unwrap();
        assert_eq!((row.peak_frame, row.peak_channel), (500, 3));
        assert_eq!(row.extra["amplitude"], serde_json::json!(-81.5));
    }
    #[test]
    fn missing_peak_column_is_a_json_error() {
        let err = PeakTable::from_json_str(r#"[{"peak_frame": 5}]"#).unwrap_err();
        assert!(matches!(err, PlotError::Json(_)));
    }
    #[test]
    fn row_past_end_is_reported() {
        let peaks = PeakTable::new(vec![PeakRecord::new(1, 0)]);
        assert!(matches!(
            peaks.row(1),
            Err(PlotError::RowOutOfRange { row: 1, available: 1 })
        ));
    }
}
