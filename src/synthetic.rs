use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::error::PlotError;
use crate::recording::InMemoryRecording;
use crate::table::{PeakRecord, PeakTable, SpikeRecord, SpikeTable};
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnitSpec {
    pub unit_id: i64,
    /// Extremum channel of the unit.
    pub center_channel: usize,
    pub amplitude_uv: f32,
    pub rate_hz: f32,
}
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub sample_rate_hz: f32,
    pub num_channels: usize,
    pub duration_secs: f32,
    pub noise_uv: f32,
    pub units: Vec<UnitSpec>,
    pub noise_peaks: usize,
    pub seed: u64,
}
impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 30_000.0,
            num_channels: 16,
            duration_secs: 2.0,
            noise_uv: 8.0,
            units: vec![
                UnitSpec {
                    unit_id: 0,
                    center_channel: 3,
                    amplitude_uv: 120.0,
                    rate_hz: 12.0,
                },
                UnitSpec {
                    unit_id: 1,
                    center_channel: 9,
                    amplitude_uv: 80.0,
                    rate_hz: 20.0,
                },
                UnitSpec {
                    unit_id: 2,
                    center_channel: 13,
                    amplitude_uv: 60.0,
                    rate_hz: 4.0,
                },
            ],
            noise_peaks: 8,
            seed: 42,
        }
    }
}
/// Generated recording with the spike and peak tables that describe it.
#[derive(Clone, Debug)]
pub struct SyntheticSession {
    pub recording: InMemoryRecording,
    pub spikes: SpikeTable,
    pub peaks: PeakTable,
}
// template support around the trough
const TEMPLATE_BEFORE_MS: f32 = 0.5;
const TEMPLATE_AFTER_MS: f32 = 1.5;
const EDGE_MARGIN_MS: f32 = 10.0;
/// Biphasic extracellular spike shape, trough at `t_ms = 0`.
fn template(t_ms: f32) -> f32 {
    let trough = (-(t_ms / 0.15).powi(2)).exp();
    let rebound = 0.35 * (-((t_ms - 0.45) / 0.3).powi(2)).exp();
    rebound - trough
}
pub fn generate(config: &SyntheticConfig) -> Result<SyntheticSession, PlotError> {
    if config.sample_rate_hz <= 0.0 {
        return Err(PlotError::InvalidSampleRate);
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let rate = config.sample_rate_hz;
    let num_frames = (config.duration_secs * rate).round() as usize;
    let channels = config.num_channels;
    let noise = config.noise_uv.abs();
    let mut data = Array2::from_shape_fn((num_frames, channels), |_| {
        if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        }
    });
    let ms_to_frames = |ms: f32| (ms * rate / 1000.0).round() as usize;
    let margin = ms_to_frames(EDGE_MARGIN_MS);
    let before = ms_to_frames(TEMPLATE_BEFORE_MS);
    let after = ms_to_frames(TEMPLATE_AFTER_MS);
    let mut spikes = Vec::new();
    if num_frames > 2 * margin {
        for unit in &config.units {
            let count = (unit.rate_hz * config.duration_secs).round() as usize;
            for _ in 0..count {
                let frame = rng.gen_range(margin..num_frames - margin);
                spikes.push(SpikeRecord {
                    unit_id: unit.unit_id,
                    frame,
                });
                for ch in 0..channels {
                    let distance = ch.abs_diff(unit.center_channel) as f32;
                    let gain = unit.amplitude_uv * (-distance / 1.5).exp();
                    for t in (frame - before)..(frame + after) {
                        let t_ms = (t as f32 - frame as f32) * 1000.0 / rate;
                        data[[t, ch]] += gain * template(t_ms);
                    }
                }
            }
        }
    }
    spikes.sort_by_key(|s| s.frame);
    let mut peaks = Vec::with_capacity(config.noise_peaks);
    if num_frames > 2 * margin && channels > 0 {
        for _ in 0..config.noise_peaks {
            let frame = rng.gen_range(margin..num_frames - margin);
            let channel = rng.gen_range(0..channels);
            let mut record = PeakRecord::new(frame, channel);
            record
                .extra
                .insert("amplitude".into(), serde_json::json!(data[[frame, channel]]));
            peaks.push(record);
        }
    }
    peaks.sort_by_key(|p| p.peak_frame);
    log::info!(
        "synthetic recording: {num_frames} frames x {channels} channels, {} spikes, {} noise peaks",
        spikes.len(),
        peaks.len()
    );
    Ok(SyntheticSession {
        recording: InMemoryRecording::new(rate, data)?,
        spikes: SpikeTable::new(spikes),
        peaks: PeakTable::new(peaks),
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Recording;
    #[test]
    fn spike_counts_follow_rates() {
        let session = generate(&SyntheticConfig::default()).unwrap();
        assert_eq!(session.recording.num_frames(), 60_000);
        assert_eq!(session.recording.num_channels(), 16);
        assert_eq!(session.spikes.frames_for_unit(0).len(), 24);
        assert_eq!(session.spikes.frames_for_unit(1).len(), 40);
        assert_eq!(session.spikes.frames_for_unit(2).len(), 8);
        assert_eq!(session.peaks.len(), 8);
    }
    #[test]
    fn trough_lands_on_extremum_channel() {
        let config = SyntheticConfig {
            noise_uv: 0.0,
            units: vec![UnitSpec {
                unit_id: 5,
                center_channel: 2,
                amplitude_uv: 100.0,
                rate_hz: 1.0,
            }],
            noise_peaks: 0,
            num_channels: 6,
            duration_secs: 1.0,
            ..SyntheticConfig::default()
        };
        let session = generate(&config).unwrap();
        let frame = session.spikes.frames_for_unit(5)[0];
        let row = session.recording.data().row(frame);
        assert!((row[2] - 100.0 * template(0.0)).abs() < 1e-3);
        assert!(row[2] < row[1] && row[1] < row[0]);
    }
    #[test]
    fn same_seed_same_session() {
        let a = generate(&SyntheticConfig::default()).unwrap();
        let b = generate(&SyntheticConfig::default()).unwrap();
        assert_eq!(a.spikes.rows(), b.spikes.rows());
        assert_eq!(a.recording.data(), b.recording.data());
    }
}
