use ndarray::{Array2, Array3, Axis};
use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::figure::{ColorScale, Figure, Heatmap, Panel, PanelContent};
use crate::layout::GridShape;
use crate::preprocessing::Preprocessing;
use crate::random::seeded_sample;
use crate::recording::Recording;
use crate::sink::FigureSink;
use crate::table::{PeakTable, SpikeTable};
/// Selection knobs for [`WaveformPlotter::plot_unit_waveform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitWaveformOptions {
    /// Plot every spike of the unit instead of a sample.
    pub all_waveforms: bool,
    pub num_waveforms: usize,
    /// Re-seeds the shared random stream before sampling.
    pub seed: u64,
}
impl Default for UnitWaveformOptions {
    fn default() -> Self {
        Self {
            all_waveforms: false,
            num_waveforms: 10,
            seed: 0,
        }
    }
}
/// Frames to overlay: all of them when asked to or when too few exist,
/// otherwise a seeded draw without replacement.
pub fn select_unit_frames(frames: &[usize], options: UnitWaveformOptions) -> Vec<usize> {
    if options.all_waveforms || frames.len() < options.num_waveforms {
        return frames.to_vec();
    }
    seeded_sample(options.seed, frames, options.num_waveforms)
}
fn channel_column(snippet: &Array2<f32>, channel: usize) -> Result<Vec<f32>, PlotError> {
    if channel >= snippet.ncols() {
        return Err(PlotError::ChannelOutOfRange {
            channel,
            available: snippet.ncols(),
        });
    }
    Ok(snippet.column(channel).to_vec())
}
/// Pixel extent of `count` grid cells of `cell` pixels each.
fn cells_extent(cell: u32, count: usize) -> Result<u32, PlotError> {
    u32::try_from(count)
        .ok()
        .and_then(|n| cell.checked_mul(n))
        .ok_or_else(|| PlotError::Render(format!("{count} cells of {cell} px overflow the figure size")))
}
/// One line subplot per requested channel, laid out on a near-square grid.
pub fn trace_waveform_figure(
    snippet: &Array2<f32>,
    channels: &[usize],
    config: &PlotConfig,
) -> Result<Figure, PlotError> {
    if channels.is_empty() {
        return Err(PlotError::EmptyChannels);
    }
    let grid = GridShape::near_square(channels.len());
    let mut figure = Figure::new(
        cells_extent(config.cell_width, grid.cols)?,
        cells_extent(config.cell_height, grid.rows)?,
        grid,
    );
    for (idx, &channel) in channels.iter().enumerate() {
        figure.panels[idx] = Panel {
            title: Some(format!("Channel {channel}")),
            x_label: grid.is_last_row(idx).then(|| "Time".to_string()),
            y_label: grid.is_first_col(idx).then(|| "Amplitude".to_string()),
            content: PanelContent::Lines(vec![channel_column(snippet, channel)?]),
        };
    }
    Ok(figure)
}
/// Heatmap per variant of a time x channel x variant trace, on one shared colour scale.
pub fn trace_image_figure(reshaped: &Array3<f32>, config: &PlotConfig) -> Result<Figure, PlotError> {
    let variants = reshaped.len_of(Axis(2));
    if variants == 0 {
        return Err(PlotError::EmptyTrace);
    }
    let scale = ColorScale::spanning(reshaped.iter().copied()).ok_or(PlotError::EmptyTrace)?;
    // channel x time x variant
    let transposed = reshaped.view().permuted_axes([1, 0, 2]);
    let mut figure = Figure::new(
        config.image_width,
        config.image_height,
        GridShape::single_row(variants),
    );
    for (idx, image) in transposed.axis_iter(Axis(2)).enumerate() {
        figure.panels[idx] = Panel {
            title: None,
            x_label: None,
            y_label: None,
            content: PanelContent::Heatmap(Heatmap {
                data: image.to_owned(),
                scale,
            }),
        };
    }
    figure.x_label = Some("time (frames)".into());
    figure.y_label = Some("channel".into());
    figure.colorbar = Some(scale);
    Ok(figure)
}
/// Overlay of one channel's waveform around several spikes of a unit.
pub fn unit_waveform_figure(
    waveforms: Vec<Vec<f32>>,
    unit_id: i64,
    channel_id: usize,
    config: &PlotConfig,
) -> Figure {
    let mut figure = Figure::new(
        config.overlay_width,
        config.overlay_height,
        GridShape::single_row(1),
    );
    figure.title = Some(format!("Unit ID: {unit_id}\nChannel: {channel_id}"));
    figure.panels[0] = Panel {
        title: None,
        x_label: Some("time (frames)".into()),
        y_label: Some("action potential (mV)".into()),
        content: PanelContent::Lines(waveforms),
    };
    figure
}
/// The four plotting entry points, bound to a preprocessing collaborator and a display sink.
pub struct WaveformPlotter<P, S> {
    preprocessing: P,
    sink: S,
    config: PlotConfig,
}
impl<P: Preprocessing, S: FigureSink> WaveformPlotter<P, S> {
    pub fn new(preprocessing: P, sink: S, config: PlotConfig) -> Self {
        Self {
            preprocessing,
            sink,
            config,
        }
    }
    pub fn preprocessing(&self) -> &P {
        &self.preprocessing
    }
    pub fn sink(&self) -> &S {
        &self.sink
    }
    pub fn into_sink(self) -> S {
        self.sink
    }
    /// Grid of per-channel traces at `sample_time`. Channel order is kept and duplicates
    /// get their own panel.
    pub fn plot_trace_waveform<R: Recording + ?Sized>(
        &mut self,
        recording: &R,
        sample_time: usize,
        channels: &[usize],
    ) -> Result<(), PlotError> {
        log::debug!(
            "trace waveform at frame {sample_time} for {} channel(s)",
            channels.len()
        );
        let snippet = self.preprocessing.trace_snippet(recording, sample_time)?;
        let figure = trace_waveform_figure(&snippet, channels, &self.config)?;
        self.sink.show(figure)
    }
    /// Side-by-side heatmaps of every trace variant around `sample_frame`.
    pub fn plot_trace_image<R: Recording + ?Sized>(
        &mut self,
        recording: &R,
        sample_frame: usize,
    ) -> Result<(), PlotError> {
        let reshaped = self.preprocessing.trace_reshaped(recording, sample_frame)?;
        log::debug!("trace image at frame {sample_frame}, shape {:?}", reshaped.dim());
        let figure = trace_image_figure(&reshaped, &self.config)?;
        self.sink.show(figure)
    }
    pub fn plot_unit_waveform<R: Recording + ?Sized>(
        &mut self,
        recording: &R,
        spikes: &SpikeTable,
        unit_id: i64,
        channel_id: usize,
        options: UnitWaveformOptions,
    ) -> Result<(), PlotError> {
        let frames = self.preprocessing.unit_frames(spikes, unit_id);
        if frames.is_empty() {
            log::warn!("unit {unit_id} has no spikes; showing empty axes");
        }
        let selected = select_unit_frames(&frames, options);
        log::debug!(
            "unit {unit_id}: overlaying {} of {} waveform(s) on channel {channel_id}",
            selected.len(),
            frames.len()
        );
        let waveforms = selected
            .iter()
            .map(|&frame| {
                let snippet = self.preprocessing.trace_snippet(recording, frame)?;
                channel_column(&snippet, channel_id)
            })
            .collect::<Result<Vec<_>, PlotError>>()?;
        let figure = unit_waveform_figure(waveforms, unit_id, channel_id, &self.config);
        self.sink.show(figure)
    }
    /// Grid plot for every row in `start_idx..=end_idx`, one figure per row. Stops at
    /// the first failing row.
    pub fn plot_peak_waveform<R: Recording + ?Sized>(
        &mut self,
        recording: &R,
        peaks_noise_table: &PeakTable,
        start_idx: usize,
        end_idx: usize,
    ) -> Result<(), PlotError> {
        for idx in start_idx..=end_idx {
            let row = peaks_noise_table.row(idx)?;
            let (frame, channel) = (row.peak_frame, row.peak_channel);
            log::info!("peak row {idx}: frame {frame}, channel {channel}");
            self.plot_trace_waveform(recording, frame, &[channel])?;
        }
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use ndarray::Array2;
    use crate::preprocessing::SnippetExtractor;
    use crate::recording::InMemoryRecording;
    use crate::render::render_png;
    use crate::sink::FigureLog;
    use crate::synthetic::{self, SyntheticConfig};
    use crate::table::{PeakRecord, SpikeRecord};
    /// Snippet column `c` is filled with `frame * 100 + c`; every request is logged.
    #[derive(Default)]
    struct FakePreprocessing {
        snippet_requests: RefCell<Vec<usize>>,
    }
    impl Preprocessing for FakePreprocessing {
        fn trace_snippet<R: Recording + ?Sized>(
            &self,
            recording: &R,
            sample_time: usize,
        ) -> Result<Array2<f32>, PlotError> {
            self.snippet_requests.borrow_mut().push(sample_time);
            Ok(Array2::from_shape_fn((5, recording.num_channels()), |(_, c)| {
                (sample_time * 100 + c) as f32
            }))
        }
        fn trace_reshaped<R: Recording + ?Sized>(
            &self,
            recording: &R,
            sample_frame: usize,
        ) -> Result<Array3<f32>, PlotError> {
            let channels = recording.num_channels();
            Ok(Array3::from_shape_fn((6, channels, 2), |(t, c, v)| {
                (sample_frame + t) as f32 + c as f32 * 0.5 - v as f32 * 40.0
            }))
        }
        fn unit_frames(&self, spikes: &SpikeTable, unit_id: i64) -> Vec<usize> {
            spikes.frames_for_unit(unit_id)
        }
    }
    fn recording() -> InMemoryRecording {
        InMemoryRecording::new(30_000.0, Array2::zeros((1000, 8))).unwrap()
    }
    fn plotter() -> WaveformPlotter<FakePreprocessing, FigureLog> {
        WaveformPlotter::new(FakePreprocessing::default(), FigureLog::new(), PlotConfig::default())
    }
    fn spikes(unit: i64, count: usize) -> SpikeTable {
        let mut rows: Vec<SpikeRecord> = (0..count)
            .map(|i| SpikeRecord {
                unit_id: unit,
                frame: 10 + i,
            })
            .collect();
        rows.push(SpikeRecord {
            unit_id: unit + 1,
            frame: 999,
        });
        SpikeTable::new(rows)
    }
    #[test]
    fn trace_waveform_builds_grid_with_hidden_tail() {
        let mut p = plotter();
        p.plot_trace_waveform(&recording(), 40, &[3, 1, 3, 7, 0]).unwrap();
        let fig = &p.sink().figures()[0];
        assert_eq!(fig.grid, GridShape { rows: 2, cols: 3 });
        assert_eq!((fig.width, fig.height), (1200, 600));
        assert_eq!(fig.visible_panels().count(), 5);
        assert!(fig.panels[5].is_hidden());
        let titles: Vec<_> = fig.visible_panels().map(|p| p.title.clone().unwrap()).collect();
        assert_eq!(
            titles,
            ["Channel 3", "Channel 1", "Channel 3", "Channel 7", "Channel 0"]
        );
        assert_eq!(fig.panels[3].lines()[0], vec![4007.0; 5]);
        // labels only on outer panels
        assert!(fig.panels[0].x_label.is_none());
        assert_eq!(fig.panels[3].x_label.as_deref(), Some("Time"));
        assert_eq!(fig.panels[3].y_label.as_deref(), Some("Amplitude"));
        assert!(fig.panels[4].y_label.is_none());
    }
    #[test]
    fn trace_waveform_rejects_bad_channels() {
        let mut p = plotter();
        assert!(matches!(
            p.plot_trace_waveform(&recording(), 40, &[]),
            Err(PlotError::EmptyChannels)
        ));
        assert!(matches!(
            p.plot_trace_waveform(&recording(), 40, &[2, 8]),
            Err(PlotError::ChannelOutOfRange { channel: 8, available: 8 })
        ));
        assert!(p.sink().is_empty());
    }
    #[test]
    fn oversized_grid_is_an_error() {
        let config = PlotConfig {
            cell_width: u32::MAX / 2,
            ..PlotConfig::default()
        };
        let snippet = Array2::zeros((5, 8));
        let err = trace_waveform_figure(&snippet, &[0, 1, 2, 3, 4], &config).unwrap_err();
        assert!(matches!(err, PlotError::Render(_)));
        assert_eq!(cells_extent(400, 3).unwrap(), 1200);
    }
    #[test]
    fn built_figures_render_at_their_size() {
        let session = synthetic::generate(&SyntheticConfig::default()).unwrap();
        let recording = &session.recording;
        let extractor = SnippetExtractor::default();
        let config = PlotConfig {
            annotate: false,
            ..PlotConfig::default()
        };
        let frame = session.spikes.rows()[0].frame;
        let snippet = extractor.trace_snippet(recording, frame).unwrap();
        let reshaped = extractor.trace_reshaped(recording, frame).unwrap();
        let frames = select_unit_frames(
            &extractor.unit_frames(&session.spikes, 0),
            UnitWaveformOptions::default(),
        );
        let waveforms = frames
            .iter()
            .map(|&f| channel_column(&extractor.trace_snippet(recording, f).unwrap(), 3).unwrap())
            .collect();
        let figures = [
            trace_waveform_figure(&snippet, &[0, 1, 2, 3, 4], &config).unwrap(),
            trace_image_figure(&reshaped, &config).unwrap(),
            unit_waveform_figure(waveforms, 0, 3, &config),
        ];
        for fig in &figures {
            let png = render_png(fig, &config).unwrap();
            assert!(!png.is_empty());
            let decoded = image::load_from_memory(&png).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (fig.width, fig.height));
        }
        assert_eq!((figures[0].width, figures[0].height), (1200, 600));
        assert_eq!(figures[2].line_count(), 10);
    }
    #[test]
    fn trace_image_panels_share_global_scale() {
        let mut p = plotter();
        p.plot_trace_image(&recording(), 100).unwrap();
        let fig = &p.sink().figures()[0];
        assert_eq!(fig.grid, GridShape::single_row(2));
        let heatmaps: Vec<_> = fig.panels.iter().filter_map(Panel::heatmap).collect();
        assert_eq!(heatmaps.len(), 2);
        // data is transposed to channel x time
        assert_eq!(heatmaps[0].data.dim(), (8, 6));
        assert_eq!(heatmaps[0].data[[2, 1]], 102.0);
        let expected = ColorScale {
            min: 100.0 - 40.0,
            max: 105.0 + 3.5,
        };
        assert_eq!(heatmaps[0].scale, expected);
        assert_eq!(heatmaps[1].scale, expected);
        assert_eq!(fig.colorbar, Some(expected));
        assert_eq!(fig.x_label.as_deref(), Some("time (frames)"));
    }
    #[test]
    fn trace_image_follows_variant_count() {
        let reshaped = Array3::from_elem((4, 3, 3), 1.0f32);
        let fig = trace_image_figure(&reshaped, &PlotConfig::default()).unwrap();
        assert_eq!(fig.grid, GridShape::single_row(3));
        let empty = Array3::<f32>::zeros((4, 3, 0));
        assert!(matches!(
            trace_image_figure(&empty, &PlotConfig::default()),
            Err(PlotError::EmptyTrace)
        ));
    }
    #[test]
    fn all_waveforms_draws_every_frame() {
        let mut p = plotter();
        let table = spikes(4, 25);
        let options = UnitWaveformOptions {
            all_waveforms: true,
            ..Default::default()
        };
        p.plot_unit_waveform(&recording(), &table, 4, 2, options).unwrap();
        let fig = &p.sink().figures()[0];
        assert_eq!(fig.line_count(), 25);
        assert_eq!(fig.title.as_deref(), Some("Unit ID: 4\nChannel: 2"));
        assert_eq!(
            *p.preprocessing().snippet_requests.borrow(),
            (10..35).collect::<Vec<_>>()
        );
    }
    #[test]
    fn few_frames_draws_every_frame_regardless_of_flag() {
        let mut p = plotter();
        let table = spikes(1, 4);
        p.plot_unit_waveform(&recording(), &table, 1, 0, UnitWaveformOptions::default())
            .unwrap();
        assert_eq!(p.sink().figures()[0].line_count(), 4);
    }
    #[test]
    fn sampled_waveforms_are_distinct_and_seeded() {
        let frames: Vec<usize> = (10..60).collect();
        let options = UnitWaveformOptions {
            num_waveforms: 10,
            seed: 7,
            ..Default::default()
        };
        let first = select_unit_frames(&frames, options);
        let second = select_unit_frames(&frames, options);
        assert_eq!(first, second);
        assert_eq!(first.iter().collect::<HashSet<_>>().len(), 10);
        let mut p = plotter();
        p.plot_unit_waveform(&recording(), &spikes(9, 50), 9, 1, options)
            .unwrap();
        p.plot_unit_waveform(&recording(), &spikes(9, 50), 9, 1, options)
            .unwrap();
        let figs = p.sink().figures();
        assert_eq!(figs[0].line_count(), 10);
        assert_eq!(figs[0].panels[0].lines(), figs[1].panels[0].lines());
        let requests = p.preprocessing().snippet_requests.borrow();
        assert_eq!(&requests[..10], first.as_slice());
    }
    #[test]
    fn unknown_unit_shows_empty_axes() {
        let mut p = plotter();
        p.plot_unit_waveform(&recording(), &spikes(1, 3), 42, 0, UnitWaveformOptions::default())
            .unwrap();
        assert_eq!(p.sink().len(), 1);
        assert_eq!(p.sink().figures()[0].line_count(), 0);
    }
    #[test]
    fn peak_rows_plot_inclusive_range_in_order() {
        let table = PeakTable::new((0..6).map(|i| PeakRecord::new(100 + i * 10, i % 4)).collect());
        let mut p = plotter();
        p.plot_peak_waveform(&recording(), &table, 2, 4).unwrap();
        assert_eq!(*p.preprocessing().snippet_requests.borrow(), vec![120, 130, 140]);
        let titles: Vec<_> = p
            .sink()
            .figures()
            .iter()
            .map(|f| f.panels[0].title.clone().unwrap())
            .collect();
        assert_eq!(titles, ["Channel 2", "Channel 3", "Channel 0"]);
    }
    #[test]
    fn peak_range_aborts_on_first_bad_row() {
        let table = PeakTable::new(vec![PeakRecord::new(100, 0), PeakRecord::new(110, 1)]);
        let mut p = plotter();
        let err = p.plot_peak_waveform(&recording(), &table, 1, 3).unwrap_err();
        assert!(matches!(err, PlotError::RowOutOfRange { row: 2, available: 2 }));
        assert_eq!(p.sink().len(), 1);
        let mut p = plotter();
        p.plot_peak_waveform(&recording(), &table, 1, 0).unwrap();
        assert!(p.sink().is_empty());
    }
}
