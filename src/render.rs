use std::io::Cursor;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::FontTransform;
use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::figure::{ColorScale, Figure, Heatmap, Panel, PanelContent};
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
const FONT: &str = "sans-serif";
const TITLE_LINE_PX: u32 = 24;
const COLORBAR_PX: u32 = 60;
const FIGURE_LABEL_PX: u32 = 30;
const COLORBAR_STEPS: usize = 128;
/// Viridis colour at `t` in `[0, 1]`; out-of-range values clamp, NaN maps to the low end.
pub fn viridis(t: f32) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    ViridisRGB.get_color(t)
}
/// Rasterizes a figure into an RGB image of `figure.width x figure.height`.
pub fn render_rgb(figure: &Figure, config: &PlotConfig) -> Result<RgbImage, PlotError> {
    if figure.width == 0 || figure.height == 0 {
        return Err(PlotError::Render("figure has zero size".into()));
    }
    if figure.panels.len() != figure.grid.cells() {
        return Err(PlotError::Render(format!(
            "figure has {} panels for a {}x{} grid",
            figure.panels.len(),
            figure.grid.rows,
            figure.grid.cols
        )));
    }
    let mut buffer = vec![0u8; rgb_buffer_len(figure.width, figure.height)?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (figure.width, figure.height))
            .into_drawing_area();
        root.fill(&rgb(config.background))?;
        let mut area = root.clone();
        if config.annotate {
            if let Some(title) = &figure.title {
                area = draw_title(&area, title, config)?;
            }
        }
        if let Some(scale) = figure.colorbar {
            let (bar, rest) = area.split_vertically(COLORBAR_PX as i32);
            draw_colorbar(&bar, scale, config)?;
            area = rest;
        }
        if config.annotate {
            if let Some(label) = &figure.x_label {
                let height = area.dim_in_pixel().1 as i32;
                let (rest, strip) = area.split_vertically(height - FIGURE_LABEL_PX as i32);
                centered_text(&strip, label, 16, false, config)?;
                area = rest;
            }
            if let Some(label) = &figure.y_label {
                let (strip, rest) = area.split_horizontally(FIGURE_LABEL_PX as i32);
                centered_text(&strip, label, 16, true, config)?;
                area = rest;
            }
        }
        if figure.grid.cells() > 0 {
            let cells = area.split_evenly((figure.grid.rows, figure.grid.cols));
            for (panel, cell) in figure.panels.iter().zip(cells.iter()) {
                match &panel.content {
                    PanelContent::Lines(lines) => draw_lines(cell, panel, lines, config)?,
                    PanelContent::Heatmap(heatmap) => draw_heatmap(cell, panel, heatmap, config)?,
                    PanelContent::Hidden => {}
                }
            }
        }
        root.present()?;
    }
    RgbImage::from_raw(figure.width, figure.height, buffer)
        .ok_or_else(|| PlotError::Render("failed to allocate image buffer".into()))
}
fn rgb_buffer_len(width: u32, height: u32) -> Result<usize, PlotError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .ok_or_else(|| PlotError::Render(format!("figure of {width}x{height} px is too large")))
}
pub fn render_png(figure: &Figure, config: &PlotConfig) -> Result<Vec<u8>, PlotError> {
    let image = render_rgb(figure, config)?;
    encode_png(image)
}
fn encode_png(image: RgbImage) -> Result<Vec<u8>, PlotError> {
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}
fn text_style(size: u32, config: &PlotConfig) -> TextStyle<'static> {
    (FONT, size).into_font().color(&rgb(config.foreground))
}
fn draw_title<'a>(area: &Area<'a>, title: &str, config: &PlotConfig) -> Result<Area<'a>, PlotError> {
    let lines: Vec<&str> = title.lines().collect();
    let (strip, rest) = area.split_vertically((TITLE_LINE_PX * lines.len() as u32 + 8) as i32);
    let width = strip.dim_in_pixel().0 as i32;
    let style = text_style(18, config).pos(Pos::new(HPos::Center, VPos::Top));
    for (idx, line) in lines.iter().enumerate() {
        strip.draw_text(line, &style, (width / 2, 4 + idx as i32 * TITLE_LINE_PX as i32))?;
    }
    Ok(rest)
}
fn centered_text(
    area: &Area<'_>,
    text: &str,
    size: u32,
    vertical: bool,
    config: &PlotConfig,
) -> Result<(), PlotError> {
    let (w, h) = area.dim_in_pixel();
    let font = if vertical {
        (FONT, size).into_font().transform(FontTransform::Rotate270)
    } else {
        (FONT, size).into_font()
    };
    let style = font
        .color(&rgb(config.foreground))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(text, &style, (w as i32 / 2, h as i32 / 2))?;
    Ok(())
}
fn value_bounds(lines: &[Vec<f32>]) -> (f32, f32) {
    match ColorScale::spanning(lines.iter().flat_map(|l| l.iter().copied())) {
        Some(s) if (s.max - s.min).abs() >= f32::EPSILON => (s.min, s.max),
        Some(s) => (s.min - 1.0, s.max + 1.0),
        None => (-1.0, 1.0),
    }
}
fn draw_lines(
    cell: &Area<'_>,
    panel: &Panel,
    lines: &[Vec<f32>],
    config: &PlotConfig,
) -> Result<(), PlotError> {
    let len = lines.iter().map(Vec::len).max().unwrap_or(0).max(2);
    let (y_min, y_max) = value_bounds(lines);
    let mut builder = ChartBuilder::on(cell);
    builder.margin(8);
    if config.annotate {
        if let Some(title) = &panel.title {
            builder.caption(title, text_style(16, config));
        }
        builder
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 36);
    }
    let mut chart = builder.build_cartesian_2d(0f32..(len - 1) as f32, y_min..y_max)?;
    if config.annotate {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&rgb(config.foreground).mix(0.1))
            .label_style(text_style(12, config));
        if let Some(x) = &panel.x_label {
            mesh.x_desc(x.as_str());
        }
        if let Some(y) = &panel.y_label {
            mesh.y_desc(y.as_str());
        }
        mesh.draw()?;
    }
    for (idx, line) in lines.iter().enumerate() {
        let color = rgb(config.color(idx));
        let series = line.iter().enumerate().map(|(t, v)| (t as f32, *v));
        chart.draw_series(LineSeries::new(series, &color))?;
    }
    Ok(())
}
fn draw_heatmap(
    cell: &Area<'_>,
    panel: &Panel,
    heatmap: &Heatmap,
    config: &PlotConfig,
) -> Result<(), PlotError> {
    let (rows, cols) = heatmap.data.dim();
    let mut builder = ChartBuilder::on(cell);
    builder.margin(8);
    if config.annotate {
        if let Some(title) = &panel.title {
            builder.caption(title, text_style(16, config));
        }
        builder
            .set_label_area_size(LabelAreaPosition::Left, 40)
            .set_label_area_size(LabelAreaPosition::Bottom, 30);
    }
    let mut chart =
        builder.build_cartesian_2d(0f32..cols.max(1) as f32, 0f32..rows.max(1) as f32)?;
    if config.annotate {
        // row 0 sits at the top, so tick values are mirrored
        let flip = |y: &f32| format!("{:.0}", rows as f32 - *y);
        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(text_style(12, config))
            .y_label_formatter(&flip)
            .draw()?;
    }
    chart.draw_series(heatmap.data.indexed_iter().map(|((r, c), v)| {
        let top = (rows - r) as f32;
        Rectangle::new(
            [(c as f32, top), (c as f32 + 1.0, top - 1.0)],
            viridis(heatmap.scale.normalize(*v)).filled(),
        )
    }))?;
    Ok(())
}
fn draw_colorbar(bar: &Area<'_>, scale: ColorScale, config: &PlotConfig) -> Result<(), PlotError> {
    let width = bar.dim_in_pixel().0 as f32;
    let (lo, hi) = if (scale.max - scale.min).abs() < f32::EPSILON {
        (scale.min - 0.5, scale.max + 0.5)
    } else {
        (scale.min, scale.max)
    };
    let mut builder = ChartBuilder::on(bar);
    builder
        .margin_top(8)
        .margin_left((width * 0.15) as i32)
        .margin_right((width * 0.15) as i32);
    if config.annotate {
        builder.set_label_area_size(LabelAreaPosition::Bottom, 22);
    }
    let mut chart = builder.build_cartesian_2d(lo..hi, 0f32..1f32)?;
    let step = (hi - lo) / COLORBAR_STEPS as f32;
    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let x0 = lo + step * i as f32;
        Rectangle::new(
            [(x0, 0.0), (x0 + step, 1.0)],
            viridis((i as f32 + 0.5) / COLORBAR_STEPS as f32).filled(),
        )
    }))?;
    if config.annotate {
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_y_axis()
            .x_labels(5)
            .label_style(text_style(12, config))
            .draw()?;
    }
    Ok(())
}
