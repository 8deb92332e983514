use ndarray::Array2;
use crate::layout::GridShape;
/// Shared value range mapped onto the colormap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    pub min: f32,
    pub max: f32,
}
impl ColorScale {
    /// Min/max over every value; `None` for an empty iterator.
    pub fn spanning(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(s) => Some(Self {
                min: s.min.min(v),
                max: s.max.max(v),
            }),
        })
    }
    /// Position of `value` in `[0, 1]`; a flat scale maps everything to 0.5.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f32::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
#[derive(Clone, Debug)]
pub struct Heatmap {
    /// Image rows x image columns (channel x time).
    pub data: Array2<f32>,
    pub scale: ColorScale,
}
#[derive(Clone, Debug)]
pub enum PanelContent {
    /// One series per entry, sample index on the x axis.
    Lines(Vec<Vec<f32>>),
    Heatmap(Heatmap),
    /// Unused grid cell, drawn blank without axes.
    Hidden,
}
#[derive(Clone, Debug)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub content: PanelContent,
}
impl Panel {
    pub fn hidden() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            content: PanelContent::Hidden,
        }
    }
    pub fn is_hidden(&self) -> bool {
        matches!(self.content, PanelContent::Hidden)
    }
    pub fn lines(&self) -> &[Vec<f32>] {
        match &self.content {
            PanelContent::Lines(lines) => lines,
            _ => &[],
        }
    }
    pub fn heatmap(&self) -> Option<&Heatmap> {
        match &self.content {
            PanelContent::Heatmap(h) => Some(h),
            _ => None,
        }
    }
}
/// Fully described figure, ready to be rendered or inspected.
#[derive(Clone, Debug)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub grid: GridShape,
    /// Row-major, exactly `grid.cells()` entries.
    pub panels: Vec<Panel>,
    /// Figure-level axis labels shared by every panel.
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Horizontal colour bar above the panel row.
    pub colorbar: Option<ColorScale>,
}
impl Figure {
    pub fn new(width: u32, height: u32, grid: GridShape) -> Self {
        Self {
            width,
            height,
            title: None,
            grid,
            panels: vec![Panel::hidden(); grid.cells()],
            x_label: None,
            y_label: None,
            colorbar: None,
        }
    }
    pub fn visible_panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter().filter(|p| !p.is_hidden())
    }
    pub fn line_count(&self) -> usize {
        self.panels.iter().map(|p| p.lines().len()).sum()
    }
}
