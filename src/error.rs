use thiserror::Error;
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("channel list is empty; nothing to plot")]
    EmptyChannels,
    #[error("reshaped trace has no variants")]
    EmptyTrace,
    #[error("channel {channel} out of range: trace has {available} channels")]
    ChannelOutOfRange { channel: usize, available: usize },
    #[error("frame window {start}..{end} out of range: recording has {available} frames")]
    FrameOutOfRange {
        start: i64,
        end: i64,
        available: usize,
    },
    #[error("row {row} out of range: table has {available} rows")]
    RowOutOfRange { row: usize, available: usize },
    #[error("array shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("failed to render figure: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PlotError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(format!("{value:?}"))
    }
}
impl From<image::ImageError> for PlotError {
    fn from(value: image::ImageError) -> Self {
        PlotError::Render(value.to_string())
    }
}
