// src/main.rs
mod gui;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use spikeview::plotting::UnitWaveformOptions;
use spikeview::{synthetic, AppConfig, FigureSink, PngDirectory, SnippetExtractor, WaveformPlotter};

/// Render the demo figures into a window or a PNG directory.
#[derive(Parser, Debug)]
#[command(author, version)]
struct Args {
    /// Write figures as PNG files into this directory instead of opening the viewer
    #[arg(long, value_name = "DIR")]
    png: Option<PathBuf>,

    /// JSON file with `plot`, `extractor` and `synthetic` sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

// 四个绘图入口依次跑一遍
fn run_demo<S: FigureSink>(config: &AppConfig, sink: S) -> anyhow::Result<S> {
    let session = synthetic::generate(&config.synthetic)?;
    let extractor = SnippetExtractor::new(config.extractor.clone());
    let mut plotter = WaveformPlotter::new(extractor, sink, config.plot.clone());
    let recording = &session.recording;

    if let Some(first) = session.spikes.rows().first().map(|r| r.frame) {
        let channels: Vec<usize> = (0..config.synthetic.num_channels.min(6)).collect();
        plotter.plot_trace_waveform(recording, first, &channels)?;
        plotter.plot_trace_image(recording, first)?;
    }
    for unit in &config.synthetic.units {
        plotter.plot_unit_waveform(
            recording,
            &session.spikes,
            unit.unit_id,
            unit.center_channel,
            UnitWaveformOptions::default(),
        )?;
    }
    if !session.peaks.is_empty() {
        let end = (session.peaks.len() - 1).min(2);
        plotter.plot_peak_waveform(recording, &session.peaks, 0, end)?;
    }
    Ok(plotter.into_sink())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    match args.png {
        Some(dir) => {
            let sink = PngDirectory::create(&dir, config.plot.clone())?;
            let sink = run_demo(&config, sink)?;
            log::info!("{} figure(s) written to {}", sink.written().len(), dir.display());
        }
        None => {
            let queue = run_demo(&config, gui::ViewerQueue::new(config.plot.clone()))?;
            log::info!("showing {} figure(s)", queue.len());
            queue.run().map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;
        }
    }
    Ok(())
}
