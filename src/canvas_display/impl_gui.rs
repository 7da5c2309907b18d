use crate::canvas_display::interface::CanvasDisplay;
use crate::library::logger::interface::Logger;
use crate::selected_file::SelectedFile;
use crate::viewer::core::{Canvas, Event};
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};

pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

// Size of a canvas that has not been painted yet.
const BLANK_CANVAS_SIZE: egui::Vec2 = egui::vec2(300.0, 150.0);
const DROP_AREA_HEIGHT: f32 = 80.0;

#[derive(Clone, Default)]
struct GuiFrame {
    pass: u64,
    canvases: Vec<Canvas>,
    status: String,
    notice: Option<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Display half of the GUI: written by the viewer thread, read by the window.
#[derive(Default)]
pub struct CanvasDisplayGui {
    frame: Arc<Mutex<GuiFrame>>,
    context: Arc<Mutex<Option<egui::Context>>>,
}

impl CanvasDisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(
        &self,
        event_sender: Sender<Event>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> ViewerWindow {
        ViewerWindow {
            frame: self.frame.clone(),
            context: self.context.clone(),
            event_sender,
            logger: logger.with_namespace("window"),
            textures: vec![],
            texture_pass: 0,
        }
    }

    fn update(&self, apply: impl FnOnce(&mut GuiFrame)) -> Result<(), Box<dyn Error + Send + Sync>> {
        apply(&mut lock(&self.frame));
        if let Some(context) = lock(&self.context).as_ref() {
            context.request_repaint();
        }
        Ok(())
    }
}

impl CanvasDisplay for CanvasDisplayGui {
    fn show_canvases(
        &mut self,
        pass: u64,
        canvases: &[Canvas],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|frame| {
            frame.pass = pass;
            frame.canvases = canvases.to_vec();
        })
    }

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|frame| frame.status = status.to_string())
    }

    fn show_notice(&mut self, notice: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.update(|frame| frame.notice = notice.map(str::to_string))
    }
}

/// Turns OS drops into selected files. Drops that carry neither bytes nor a
/// readable path are logged and left out.
pub fn selected_files_from_drops(
    dropped: &[egui::DroppedFile],
    logger: &dyn Logger,
) -> Vec<SelectedFile> {
    dropped
        .iter()
        .filter_map(|drop| match (&drop.bytes, &drop.path) {
            (Some(bytes), path) => {
                let name = match (drop.name.is_empty(), path) {
                    (true, Some(path)) => path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    _ => drop.name.clone(),
                };
                Some(SelectedFile::new(name, bytes.clone()))
            }
            (None, Some(path)) => match SelectedFile::from_path(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    let _ = logger.warn(&format!("Could not read {}: {}", path.display(), e));
                    None
                }
            },
            (None, None) => {
                let _ = logger.warn(&format!("Dropped item {:?} has no content", drop.name));
                None
            }
        })
        .collect()
}

pub struct ViewerWindow {
    frame: Arc<Mutex<GuiFrame>>,
    context: Arc<Mutex<Option<egui::Context>>>,
    event_sender: Sender<Event>,
    logger: Arc<dyn Logger + Send + Sync>,
    textures: Vec<Option<egui::TextureHandle>>,
    texture_pass: u64,
}

impl ViewerWindow {
    /// Blocks until the window is closed. Must be called on the main thread.
    pub fn run(self, title: &str, size: [f32; 2]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(size)
                .with_drag_and_drop(true),
            ..Default::default()
        };

        let context = self.context.clone();
        eframe::run_native(
            title,
            options,
            Box::new(move |cc: &eframe::CreationContext<'_>| {
                *lock(&context) = Some(cc.egui_ctx.clone());
                Box::new(self) as Box<dyn eframe::App>
            }),
        )
        .map_err(|e| format!("window failed: {}", e))?;

        Ok(())
    }

    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.warn("Viewer is no longer listening for events");
        }
    }

    fn pick_files(&self) -> Option<Vec<SelectedFile>> {
        let paths = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_files()?;

        let files = paths
            .iter()
            .filter_map(|path| match SelectedFile::from_path(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    let _ = self
                        .logger
                        .warn(&format!("Could not read {}: {}", path.display(), e));
                    None
                }
            })
            .collect();
        Some(files)
    }

    /// Uploads each painted canvas once per pass.
    fn texture(
        &mut self,
        ctx: &egui::Context,
        pass: u64,
        index: usize,
        canvas: &Canvas,
    ) -> Option<(egui::TextureId, egui::Vec2)> {
        if pass != self.texture_pass {
            self.textures.clear();
            self.texture_pass = pass;
        }
        if self.textures.len() <= index {
            self.textures.resize(index + 1, None);
        }

        if self.textures[index].is_none() {
            let image = canvas.image.as_ref()?;
            let size = [image.width() as usize, image.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            self.textures[index] = Some(ctx.load_texture(
                format!("canvas-{}-{}", pass, index),
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }

        self.textures[index]
            .as_ref()
            .map(|texture| (texture.id(), texture.size_vec2()))
    }

    fn controls(&self, ui: &mut egui::Ui, hovering: bool, status: &str) {
        ui.add_space(8.0);

        let fill = if hovering {
            egui::Color32::from_rgb(60, 90, 130)
        } else {
            egui::Color32::from_rgb(45, 45, 45)
        };
        let drop_area = egui::Button::new("Drop images here, or click to select")
            .min_size(egui::vec2(ui.available_width(), DROP_AREA_HEIGHT))
            .fill(fill);
        if ui.add(drop_area).clicked() {
            if let Some(files) = self.pick_files() {
                self.send(Event::FilesSelected(files));
            }
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Upload & Detect").clicked() {
                self.send(Event::SubmitRequested);
            }
            ui.label(status);
        });
        ui.add_space(8.0);
    }
}

impl eframe::App for ViewerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame = lock(&self.frame).clone();
        let enabled = frame.notice.is_none();

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if enabled && !dropped.is_empty() {
            let files = selected_files_from_drops(&dropped, self.logger.as_ref());
            self.send(Event::FilesSelected(files));
        }
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.controls(ui, hovering, &frame.status));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (index, canvas) in frame.canvases.iter().enumerate() {
                        match self.texture(ctx, frame.pass, index, canvas) {
                            Some(texture) => {
                                ui.image(texture).on_hover_text(canvas.filename.as_str());
                            }
                            None => {
                                let (rect, response) =
                                    ui.allocate_exact_size(BLANK_CANVAS_SIZE, egui::Sense::hover());
                                ui.painter().rect_stroke(
                                    rect,
                                    0.0,
                                    egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                                );
                                response.on_hover_text(canvas.filename.as_str());
                            }
                        }
                    }
                });
            });
        });

        if let Some(notice) = &frame.notice {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(notice.as_str());
                    if ui.button("OK").clicked() {
                        self.send(Event::NoticeDismissed);
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;
    use crate::selected_file::test_images;
    use std::path::PathBuf;

    fn logger() -> LoggerConsole {
        LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_drops_with_bytes_keep_order_and_names() {
        let a = test_images::png("a.png", 2, 2);
        let dropped = vec![
            egui::DroppedFile {
                name: "a.png".to_string(),
                bytes: Some(a.bytes.clone()),
                ..Default::default()
            },
            egui::DroppedFile {
                name: "b.png".to_string(),
                bytes: Some(Arc::from(vec![1u8, 2, 3])),
                ..Default::default()
            },
        ];

        let files = selected_files_from_drops(&dropped, &logger());
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(files[0], a);
    }

    #[test]
    fn test_drops_with_paths_are_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ship.png");
        std::fs::write(&path, test_images::png("ship.png", 3, 3).bytes.as_ref()).unwrap();

        let dropped = vec![
            egui::DroppedFile {
                path: Some(path),
                ..Default::default()
            },
            egui::DroppedFile {
                path: Some(PathBuf::from("/definitely/not/here.png")),
                ..Default::default()
            },
            egui::DroppedFile::default(),
        ];

        let files = selected_files_from_drops(&dropped, &logger());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "ship.png");
    }
}
