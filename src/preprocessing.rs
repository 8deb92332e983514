use ndarray::{s, stack, Array2, Array3, Axis};
use crate::config::ExtractorConfig;
use crate::error::PlotError;
use crate::filter::FilterChain;
use crate::recording::Recording;
use crate::table::SpikeTable;
/// Source of the pre-extracted data slices the plotting entry points render.
pub trait Preprocessing {
    /// Window around `sample_time`, time x channel.
    fn trace_snippet<R: Recording + ?Sized>(
        &self,
        recording: &R,
        sample_time: usize,
    ) -> Result<Array2<f32>, PlotError>;
    /// Window around `sample_frame` in several variants, time x channel x variant.
    fn trace_reshaped<R: Recording + ?Sized>(
        &self,
        recording: &R,
        sample_frame: usize,
    ) -> Result<Array3<f32>, PlotError>;
    fn unit_frames(&self, spikes: &SpikeTable, unit_id: i64) -> Vec<usize>;
}
/// Cuts fixed windows around an event; the reshaped trace stacks the raw window
/// with a filtered copy.
#[derive(Clone, Debug, Default)]
pub struct SnippetExtractor {
    config: ExtractorConfig,
}
impl SnippetExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }
    fn window<R: Recording + ?Sized>(
        &self,
        recording: &R,
        frame: usize,
    ) -> Result<(usize, usize), PlotError> {
        let rate = recording.sample_rate_hz();
        let before = self.config.frames_before(rate);
        let after = self.config.frames_after(rate);
        let end = frame + after;
        if frame < before || end > recording.num_frames() {
            return Err(PlotError::FrameOutOfRange {
                start: frame as i64 - before as i64,
                end: end as i64,
                available: recording.num_frames(),
            });
        }
        Ok((frame - before, end))
    }
}
impl Preprocessing for SnippetExtractor {
    fn trace_snippet<R: Recording + ?Sized>(
        &self,
        recording: &R,
        sample_time: usize,
    ) -> Result<Array2<f32>, PlotError> {
        let (start, end) = self.window(recording, sample_time)?;
        recording.traces(start, end)
    }
    fn trace_reshaped<R: Recording + ?Sized>(
        &self,
        recording: &R,
        sample_frame: usize,
    ) -> Result<Array3<f32>, PlotError> {
        let (start, end) = self.window(recording, sample_frame)?;
        // filter state settles over the margin, which is clipped off at the recording start
        let padded_start = start.saturating_sub(self.config.margin_frames(recording.sample_rate_hz()));
        let padded = recording.traces(padded_start, end)?;
        let mut chain = FilterChain::from_kinds(recording.sample_rate_hz(), &self.config.filters);
        let filtered = chain.filter_columns(&padded);
        let offset = start - padded_start;
        let raw = padded.slice(s![offset.., ..]);
        let filtered = filtered.slice(s![offset.., ..]);
        Ok(stack(Axis(2), &[raw, filtered])?)
    }
    fn unit_frames(&self, spikes: &SpikeTable, unit_id: i64) -> Vec<usize> {
        spikes.frames_for_unit(unit_id)
    }
}
