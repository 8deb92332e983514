use std::f32::consts::PI;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    Notch { freq_hz: f32, q: f32 },
    Highpass { cutoff_hz: f32, q: f32 },
    Lowpass { cutoff_hz: f32, q: f32 },
    Bandpass { low_hz: f32, high_hz: f32, q: f32 },
}
#[derive(Clone, Copy, Debug)]
enum Response {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}
#[derive(Clone, Copy, Debug)]
struct Biquad {
    b: [f32; 3],
    a: [f32; 2],
    z1: f32,
    z2: f32,
}
impl Biquad {
    fn design(response: Response, freq_hz: f32, sample_rate_hz: f32, q: f32) -> Self {
        let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let b = match response {
            Response::Lowpass => {
                let b0 = (1.0 - cos_w0) * 0.5;
                [b0, 1.0 - cos_w0, b0]
            }
            Response::Highpass => {
                let b0 = (1.0 + cos_w0) * 0.5;
                [b0, -(1.0 + cos_w0), b0]
            }
            Response::Bandpass => [alpha, 0.0, -alpha],
            Response::Notch => [1.0, -2.0 * cos_w0, 1.0],
        };
        let a0 = 1.0 + alpha;
        Self {
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
            a: [-2.0 * cos_w0 / a0, (1.0 - alpha) / a0],
            z1: 0.0,
            z2: 0.0,
        }
    }
    fn process(&mut self, input: f32) -> f32 {
        // transposed direct form II
        let y = self.b[0] * input + self.z1;
        self.z1 = self.b[1] * input - self.a[0] * y + self.z2;
        self.z2 = self.b[2] * input - self.a[1] * y;
        y
    }
}
/// Cascade of second-order sections built from [`FilterKind`] stages.
#[derive(Clone, Debug, Default)]
pub struct FilterChain {
    sections: Vec<Biquad>,
}
impl FilterChain {
    pub fn from_kinds(sample_rate_hz: f32, kinds: &[FilterKind]) -> Self {
        let nyquist = sample_rate_hz * 0.5;
        let clamp = |f: f32| f.clamp(0.01, nyquist - 0.01);
        let sections = kinds
            .iter()
            .map(|kind| match *kind {
                FilterKind::Notch { freq_hz, q } => {
                    Biquad::design(Response::Notch, clamp(freq_hz), sample_rate_hz, q)
                }
                FilterKind::Highpass { cutoff_hz, q } => {
                    Biquad::design(Response::Highpass, clamp(cutoff_hz), sample_rate_hz, q)
                }
                FilterKind::Lowpass { cutoff_hz, q } => {
                    Biquad::design(Response::Lowpass, clamp(cutoff_hz), sample_rate_hz, q)
                }
                FilterKind::Bandpass { low_hz, high_hz, q } => {
                    let low = clamp(low_hz.min(high_hz));
                    let high = clamp(low_hz.max(high_hz));
                    let center = (low * high).sqrt();
                    let q = q.clamp(0.1, 100.0).min(center / (high - low).max(f32::EPSILON));
                    Biquad::design(Response::Bandpass, center, sample_rate_hz, q)
                }
            })
            .collect();
        Self { sections }
    }
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.z1 = 0.0;
            section.z2 = 0.0;
        }
    }
    pub fn process_sample(&mut self, mut value: f32) -> f32 {
        for section in &mut self.sections {
            value = section.process(value);
        }
        value
    }
    /// Filters every column (channel) of a frames x channels block independently.
    pub fn filter_columns(&mut self, traces: &Array2<f32>) -> Array2<f32> {
        let mut out = traces.clone();
        if self.is_empty() {
            return out;
        }
        for mut column in out.axis_iter_mut(Axis(1)) {
            self.reset();
            for value in column.iter_mut() {
                *value = self.process_sample(*value);
            }
        }
        out
    }
}
