use ndarray::{s, Array2};
use crate::error::PlotError;
/// Multi-channel time-series source that can be sliced by frame range.
pub trait Recording {
    fn sample_rate_hz(&self) -> f32;
    fn num_frames(&self) -> usize;
    fn num_channels(&self) -> usize;
    /// Samples in `start_frame..end_frame` for every channel, frames x channels.
    fn traces(&self, start_frame: usize, end_frame: usize) -> Result<Array2<f32>, PlotError>;
}
/// Recording held fully in memory.
#[derive(Clone, Debug)]
pub struct InMemoryRecording {
    sample_rate_hz: f32,
    data: Array2<f32>, // frames x channels
}
impl InMemoryRecording {
    pub fn new(sample_rate_hz: f32, data: Array2<f32>) -> Result<Self, PlotError> {
        if sample_rate_hz <= 0.0 {
            return Err(PlotError::InvalidSampleRate);
        }
        Ok(Self {
            sample_rate_hz,
            data,
        })
    }
    /// Builds from channel-major sample vectors; all channels must have equal length.
    pub fn from_channels(sample_rate_hz: f32, channels: Vec<Vec<f32>>) -> Result<Self, PlotError> {
        let num_channels = channels.len();
        let num_frames = channels.first().map(|c| c.len()).unwrap_or(0);
        let flat: Vec<f32> = channels.into_iter().flatten().collect();
        let channel_major = Array2::from_shape_vec((num_channels, num_frames), flat)?;
        Self::new(sample_rate_hz, channel_major.reversed_axes().as_standard_layout().to_owned())
    }
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }
}
impl Recording for InMemoryRecording {
    fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }
    fn num_frames(&self) -> usize {
        self.data.nrows()
    }
    fn num_channels(&self) -> usize {
        self.data.ncols()
    }
    fn traces(&self, start_frame: usize, end_frame: usize) -> Result<Array2<f32>, PlotError> {
        if start_frame > end_frame || end_frame > self.num_frames() {
            return Err(PlotError::FrameOutOfRange {
                start: start_frame as i64,
                end: end_frame as i64,
                available: self.num_frames(),
            });
        }
        Ok(self.data.slice(s![start_frame..end_frame, ..]).to_owned())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn channel_major_input_is_transposed() {
        let rec = InMemoryRecording::from_channels(
            1000.0,
            vec![vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]],
        )
        .unwrap();
        assert_eq!(rec.num_frames(), 3);
        assert_eq!(rec.num_channels(), 2);
        let block = rec.traces(1, 3).unwrap();
        assert_eq!(block.dim(), (2, 2));
        assert_eq!(block[[0, 1]], 11.0);
        assert_eq!(block[[1, 0]], 2.0);
    }
    #[test]
    fn ragged_channels_are_rejected() {
        let err = InMemoryRecording::from_channels(1000.0, vec![vec![0.0; 3], vec![0.0; 2]]);
        assert!(matches!(err, Err(PlotError::Shape(_))));
    }
    #[test]
    fn slicing_past_the_end_fails() {
        let rec = InMemoryRecording::new(1000.0, Array2::zeros((10, 2))).unwrap();
        assert!(matches!(
            rec.traces(5, 11),
            Err(PlotError::FrameOutOfRange { available: 10, .. })
        ));
    }
    #[test]
    fn zero_sample_rate_is_rejected() {
        assert!(matches!(
            InMemoryRecording::new(0.0, Array2::zeros((1, 1))),
            Err(PlotError::InvalidSampleRate)
        ));
    }
}
