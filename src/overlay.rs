use crate::config::OverlayConfig;
use crate::inference_client::interface::Detection;
use crate::selected_file::SelectedFile;
use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

pub const GOLDEN_ANGLE: f32 = 137.508;
pub const CLASS_SATURATION: f32 = 0.85;
pub const CLASS_LIGHTNESS: f32 = 0.5;

const CLASS_NAMES: [(u32, &str); 4] = [(0, "airplane"), (1, "boat"), (2, "car"), (3, "ship")];

const LABEL_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub fn class_name(class_id: u32) -> String {
    CLASS_NAMES
        .iter()
        .find(|(id, _)| *id == class_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("class_{}", class_id))
}

pub fn detection_label(detection: &Detection) -> String {
    format!(
        "{} {:.2}",
        class_name(detection.class_id),
        detection.confidence
    )
}

pub fn class_hue(class_id: u32) -> f32 {
    (class_id as f32 * GOLDEN_ANGLE) % 360.0
}

/// Stable, well spread color per class: hues step by the golden angle.
pub fn color_for_class(class_id: u32) -> Rgba<u8> {
    hsl_to_rgba(class_hue(class_id), CLASS_SATURATION, CLASS_LIGHTNESS)
}

pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32) -> Rgba<u8> {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let m = lightness - chroma / 2.0;

    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(r), channel(g), channel(b), 255])
}

/// Decodes selected files and draws detections over them.
pub struct CanvasPainter {
    font: FontArc,
    style: OverlayConfig,
}

impl CanvasPainter {
    pub fn new(style: OverlayConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let font = match &style.font_path {
            Some(path) => FontArc::try_from_vec(std::fs::read(path)?)?,
            None => builtin_font()?,
        };
        Ok(Self { font, style })
    }

    /// Full image at native resolution with every detection drawn on top.
    pub fn paint(
        &self,
        file: &SelectedFile,
        detections: &[Detection],
    ) -> Result<RgbaImage, Box<dyn std::error::Error + Send + Sync>> {
        let mut canvas = file.decode()?;
        for detection in detections {
            self.draw_detection(&mut canvas, detection);
        }
        Ok(canvas)
    }

    pub fn draw_detection(&self, canvas: &mut RgbaImage, detection: &Detection) {
        let color = color_for_class(detection.class_id);

        // Corners far outside the image would overflow the pixel math below.
        let (canvas_width, canvas_height) = canvas.dimensions();
        let reach = self.style.line_width as f32
            + self.style.font_size.max(0.0)
            + self.style.label_margin as f32
            + 1.0;
        let clamp = |v: f32, limit: u32| v.clamp(-reach, limit as f32 + reach).round() as i32;
        let [x1, x2] = [detection.bbox[0], detection.bbox[2]].map(|v| clamp(v, canvas_width));
        let [y1, y2] = [detection.bbox[1], detection.bbox[3]].map(|v| clamp(v, canvas_height));
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        let width = (right - left).max(1) as u32;
        let height = (bottom - top).max(1) as u32;

        // Grow outward one pixel per step so both corners are covered.
        for i in 0..self.style.line_width {
            let rect = Rect::at(left - i as i32, top - i as i32)
                .of_size(width + 2 * i, height + 2 * i);
            draw_hollow_rect_mut(canvas, rect, color);
        }

        let label = detection_label(detection);
        let scale = PxScale::from(self.style.font_size);
        let (text_width, _) = text_size(scale, &self.font, &label);
        let text_height = self.style.font_size.round() as u32;
        let background_height = text_height + self.style.label_margin;
        let background_top = top - background_height as i32;

        let background = Rect::at(left, background_top).of_size(
            text_width + self.style.label_padding,
            background_height,
        );
        draw_filled_rect_mut(canvas, background, color);

        draw_text_mut(
            canvas,
            LABEL_TEXT_COLOR,
            left + (self.style.label_padding / 2) as i32,
            background_top + (self.style.label_margin / 2) as i32,
            scale,
            &self.font,
            &label,
        );
    }
}

fn builtin_font() -> Result<FontArc, Box<dyn std::error::Error + Send + Sync>> {
    let definitions = egui::FontDefinitions::default();
    let data = definitions
        .font_data
        .get("Ubuntu-Light")
        .or_else(|| definitions.font_data.values().next())
        .ok_or("no built-in font available")?;
    Ok(FontArc::try_from_vec(data.font.to_vec())?)
}
