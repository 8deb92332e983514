use std::fs;
use std::path::{Path, PathBuf};
use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::figure::Figure;
use crate::render::render_png;
/// Destination that "shows" a finished figure. The figure is consumed.
pub trait FigureSink {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError>;
}
impl<S: FigureSink + ?Sized> FigureSink for &mut S {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError> {
        (**self).show(figure)
    }
}
impl<S: FigureSink + ?Sized> FigureSink for Box<S> {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError> {
        (**self).show(figure)
    }
}
/// Keeps every figure in memory, in display order.
#[derive(Debug, Default)]
pub struct FigureLog {
    figures: Vec<Figure>,
}
impl FigureLog {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }
    pub fn len(&self) -> usize {
        self.figures.len()
    }
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
    pub fn into_figures(self) -> Vec<Figure> {
        self.figures
    }
}
impl FigureSink for FigureLog {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError> {
        self.figures.push(figure);
        Ok(())
    }
}
/// Renders each figure to `figure_NNNN.png` inside a directory.
pub struct PngDirectory {
    dir: PathBuf,
    config: PlotConfig,
    next_index: usize,
    written: Vec<PathBuf>,
}
impl PngDirectory {
    pub fn create(dir: impl AsRef<Path>, config: PlotConfig) -> Result<Self, PlotError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            config,
            next_index: 1,
            written: Vec::new(),
        })
    }
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}
impl FigureSink for PngDirectory {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError> {
        let png = render_png(&figure, &self.config)?;
        let path = self.dir.join(format!("figure_{:04}.png", self.next_index));
        fs::write(&path, png)?;
        log::info!("wrote {}", path.display());
        self.next_index += 1;
        self.written.push(path);
        Ok(())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{Panel, PanelContent};
    use crate::layout::GridShape;
    fn one_line_figure() -> Figure {
        let mut fig = Figure::new(120, 90, GridShape::single_row(1));
        fig.panels[0] = Panel {
            title: None,
            x_label: None,
            y_label: None,
            content: PanelContent::Lines(vec![vec![0.0, 1.0, 0.5]]),
        };
        fig
    }
    #[test]
    fn log_keeps_order() {
        let mut log = FigureLog::new();
        let mut first = one_line_figure();
        first.title = Some("a".into());
        let mut second = one_line_figure();
        second.title = Some("b".into());
        fn show_all(mut sink: impl FigureSink, figures: Vec<Figure>) {
            for fig in figures {
                sink.show(fig).unwrap();
            }
        }
        show_all(&mut log, vec![first, second]);
        let titles: Vec<_> = log.figures().iter().map(|f| f.title.clone()).collect();
        assert_eq!(titles, vec![Some("a".to_string()), Some("b".to_string())]);
    }
    #[test]
    fn png_directory_numbers_files() {
        let dir = std::env::temp_dir().join(format!("spikeview-sink-{}", std::process::id()));
        let config = PlotConfig {
            annotate: false,
            ..PlotConfig::default()
        };
        let mut sink = PngDirectory::create(&dir, config).unwrap();
        sink.show(one_line_figure()).unwrap();
        sink.show(one_line_figure()).unwrap();
        assert_eq!(sink.written().len(), 2);
        assert!(sink.written()[1].ends_with("figure_0002.png"));
        let bytes = fs::read(&sink.written()[0]).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        fs::remove_dir_all(&dir).ok();
    }
}
