// src/gui.rs
use eframe::egui;
use egui::{Color32, Key, TextureHandle, TextureOptions};
use image::RgbImage;
use spikeview::{render_rgb, Figure, FigureSink, PlotConfig, PlotError};

/// One rendered figure waiting to be shown.
struct Page {
    caption: String,
    image: RgbImage,
    texture: Option<TextureHandle>,
}

/// Sink that rasterizes figures up front so the window only uploads textures.
pub struct ViewerQueue {
    config: PlotConfig,
    pages: Vec<Page>,
}

impl ViewerQueue {
    pub fn new(config: PlotConfig) -> Self {
        Self { config, pages: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Opens the viewer and blocks until its window is closed.
    pub fn run(self) -> eframe::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1280.0, 900.0])
                .with_title("spikeview"),
            ..Default::default()
        };
        let pages = self.pages;
        eframe::run_native(
            "spikeview",
            options,
            Box::new(|_cc| Box::new(FigureViewerApp { pages, current: 0 })),
        )
    }
}

impl FigureSink for ViewerQueue {
    fn show(&mut self, figure: Figure) -> Result<(), PlotError> {
        let image = render_rgb(&figure, &self.config)?;
        let caption = figure
            .title
            .clone()
            .map(|t| t.replace('\n', " / "))
            .or_else(|| figure.visible_panels().find_map(|p| p.title.clone()))
            .unwrap_or_else(|| format!("Figure {}", self.pages.len() + 1));
        log::debug!("queued figure {}: {caption}", self.pages.len() + 1);
        self.pages.push(Page { caption, image, texture: None });
        Ok(())
    }
}

struct FigureViewerApp {
    pages: Vec<Page>,
    current: usize,
}

impl FigureViewerApp {
    // 翻页
    fn step(&mut self, forward: bool) {
        if self.pages.is_empty() { return; }
        self.current = if forward {
            (self.current + 1).min(self.pages.len() - 1)
        } else {
            self.current.saturating_sub(1)
        };
    }
}

impl eframe::App for FigureViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(Key::ArrowRight) || i.key_pressed(Key::Space)) { self.step(true); }
        if ctx.input(|i| i.key_pressed(Key::ArrowLeft)) { self.step(false); }

        egui::SidePanel::left("figures").min_width(220.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Figures");
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("◀ PREV").clicked() { self.step(false); }
                if ui.button("NEXT ▶").clicked() { self.step(true); }
            });
            ui.add_space(10.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                for idx in 0..self.pages.len() {
                    let label = format!("{:>3}  {}", idx + 1, self.pages[idx].caption);
                    if ui.selectable_label(idx == self.current, label).clicked() {
                        self.current = idx;
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(page) = self.pages.get_mut(self.current) else {
                ui.label(egui::RichText::new("No figures were produced.").color(Color32::YELLOW));
                return;
            };
            let texture = page.texture.get_or_insert_with(|| {
                let size = [page.image.width() as usize, page.image.height() as usize];
                let pixels = egui::ColorImage::from_rgb(size, page.image.as_raw());
                ctx.load_texture(format!("figure-{}", self.current), pixels, TextureOptions::LINEAR)
            });
            ui.label(egui::RichText::new(&page.caption).strong());
            ui.add(egui::Image::new(&*texture).shrink_to_fit());
        });
    }
}
