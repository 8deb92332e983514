use std::fs;
use std::path::Path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use crate::error::PlotError;
use crate::filter::FilterKind;
use crate::synthetic::SyntheticConfig;
/// Sizes, colours and annotation switches used when building and rendering figures.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Pixel size of one cell in the per-channel grid.
    pub cell_width: u32,
    pub cell_height: u32,
    /// Pixel size of the trace image figure.
    pub image_width: u32,
    pub image_height: u32,
    /// Pixel size of the unit overlay figure.
    pub overlay_width: u32,
    pub overlay_height: u32,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    /// Line colours, cycled per series.
    pub palette: Vec<[u8; 3]>,
    /// Draw captions, axis labels and tick labels. Needs a system font.
    pub annotate: bool,
}
impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            // 4 x 3 inch cells at 100 dpi
            cell_width: 400,
            cell_height: 300,
            image_width: 800,
            image_height: 1000,
            overlay_width: 640,
            overlay_height: 480,
            background: [255, 255, 255],
            foreground: [0, 0, 0],
            palette: vec![
                [31, 119, 180],
                [255, 127, 14],
                [44, 160, 44],
                [214, 39, 40],
                [148, 103, 189],
                [140, 86, 75],
                [227, 119, 194],
                [127, 127, 127],
                [188, 189, 34],
                [23, 190, 207],
            ],
            annotate: true,
        }
    }
}
impl PlotConfig {
    pub fn from_json_str(text: &str) -> Result<Self, PlotError> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlotError> {
        load_json(path.as_ref())
    }
    pub fn color(&self, idx: usize) -> [u8; 3] {
        if self.palette.is_empty() {
            return self.foreground;
        }
        self.palette[idx % self.palette.len()]
    }
}
/// Snippet window and filter settings for [`crate::SnippetExtractor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub ms_before: f32,
    pub ms_after: f32,
    /// Extra history fed through the filter before the snippet starts.
    pub filter_margin_ms: f32,
    pub filters: Vec<FilterKind>,
}
impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ms_before: 1.0,
            ms_after: 2.0,
            filter_margin_ms: 5.0,
            filters: vec![
                FilterKind::Highpass {
                    cutoff_hz: 300.0,
                    q: std::f32::consts::FRAC_1_SQRT_2,
                },
                FilterKind::Lowpass {
                    cutoff_hz: 6000.0,
                    q: std::f32::consts::FRAC_1_SQRT_2,
                },
            ],
        }
    }
}
impl ExtractorConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlotError> {
        load_json(path.as_ref())
    }
    pub fn frames_before(&self, sample_rate_hz: f32) -> usize {
        ms_to_frames(self.ms_before, sample_rate_hz)
    }
    pub fn frames_after(&self, sample_rate_hz: f32) -> usize {
        ms_to_frames(self.ms_after, sample_rate_hz)
    }
    pub fn margin_frames(&self, sample_rate_hz: f32) -> usize {
        ms_to_frames(self.filter_margin_ms, sample_rate_hz)
    }
}
/// Combined file layout accepted by the demo binary's `--config`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plot: PlotConfig,
    pub extractor: ExtractorConfig,
    pub synthetic: SyntheticConfig,
}
impl AppConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlotError> {
        load_json(path.as_ref())
    }
}
fn ms_to_frames(ms: f32, sample_rate_hz: f32) -> usize {
    (ms.max(0.0) * sample_rate_hz / 1000.0).round() as usize
}
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PlotError> {
    let text = fs::read_to_string(path)?;
    log::debug!("loaded config from {}", path.display());
    Ok(serde_json::from_str(&text)?)
}
