// src/lib.rs
pub mod config;
pub mod error;
pub mod figure;
pub mod filter;
pub mod layout;
pub mod plotting;
pub mod preprocessing;
pub mod random;
pub mod recording;
pub mod render;
pub mod sink;
pub mod synthetic;
pub mod table;
pub use config::{AppConfig, ExtractorConfig, PlotConfig};
pub use error::PlotError;
pub use figure::{ColorScale, Figure, Heatmap, Panel, PanelContent};
pub use filter::{FilterChain, FilterKind};
pub use layout::GridShape;
pub use plotting::{UnitWaveformOptions, WaveformPlotter};
pub use preprocessing::{Preprocessing, SnippetExtractor};
pub use recording::{InMemoryRecording, Recording};
pub use render::{render_png, render_rgb};
pub use sink::{FigureLog, FigureSink, PngDirectory};
pub use synthetic::{SyntheticConfig, SyntheticSession};
pub use table::{PeakRecord, PeakTable, SpikeRecord, SpikeTable};
