use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::AppearanceConfig;
use crate::panel::{PANEL_HEIGHT, PANEL_WIDTH};

use super::buttons::render_generated_panel;

/// Color constants
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([220, 60, 60]);
pub const BRIGHT_RED: Rgb<u8> = Rgb([255, 80, 80]);
pub const BLUE: Rgb<u8> = Rgb([60, 120, 200]);
pub const BRIGHT_BLUE: Rgb<u8> = Rgb([80, 150, 240]);
pub const GREEN: Rgb<u8> = Rgb([0, 200, 100]);
pub const BRIGHT_GREEN: Rgb<u8> = Rgb([50, 220, 130]);
pub const GRAY: Rgb<u8> = Rgb([80, 85, 95]);
pub const BRIGHT_GRAY: Rgb<u8> = Rgb([110, 115, 125]);
pub const ORANGE: Rgb<u8> = Rgb([220, 140, 50]);
pub const BRIGHT_ORANGE: Rgb<u8> = Rgb([255, 180, 60]);
pub const DARK_BG: Rgb<u8> = Rgb([15, 15, 22]);

/// Button color scheme by id: (fill, outline)
pub fn button_colors(button_id: u8) -> (Rgb<u8>, Rgb<u8>) {
    match button_id {
        0x03 => (RED, BRIGHT_RED),                 // Power
        0x04..=0x07 => (GREEN, BRIGHT_GREEN),      // Part / Inst
        0x08..=0x0B => (ORANGE, BRIGHT_ORANGE),    // Level / Reverb
        0x0C..=0x0F => (BLUE, BRIGHT_BLUE),        // Song / Tempo
        0x10..=0x13 => (BLUE, BRIGHT_BLUE),        // Transport
        _ => (GRAY, BRIGHT_GRAY),                  // All / Mute
    }
}

/// Window size in physical pixels for a given downscale divisor
pub fn window_size(scaling: u32) -> (u32, u32) {
    let scaling = scaling.max(1);
    (
        (PANEL_WIDTH / scaling).max(1),
        (PANEL_HEIGHT / scaling).max(1),
    )
}

/// A rendered window frame in softbuffer's 0RGB layout
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let pixels = image
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    /// Pixel at window coordinates, if in range
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// Renders the panel shown in the window
pub struct PanelRenderer {
    font: Option<Font<'static>>,
    background: std::path::PathBuf,
}

impl PanelRenderer {
    pub fn new(appearance: &AppearanceConfig) -> Self {
        let font = appearance.font.as_deref().and_then(|path| match load_font(path) {
            Ok(font) => {
                debug!("Loaded label font {:?}", path);
                Some(font)
            }
            Err(e) => {
                warn!("{:#}, labels disabled", e);
                None
            }
        });

        Self {
            font,
            background: appearance.background.clone(),
        }
    }

    /// Render the panel at window size for the given divisor.
    ///
    /// Uses the background artwork when it loads, otherwise draws the
    /// button layout.
    pub fn render(&self, scaling: u32) -> Frame {
        let (width, height) = window_size(scaling);

        let image = match load_background(&self.background, width, height) {
            Ok(image) => {
                info!("Loaded panel artwork {:?}", self.background);
                image
            }
            Err(e) => {
                warn!("{:#}, drawing generated panel", e);
                let panel = render_generated_panel(self.font.as_ref());
                image::imageops::resize(&panel, width, height, FilterType::CatmullRom)
            }
        };

        Frame::from_rgb(&image)
    }
}

fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read font {:?}", path))?;
    Font::try_from_vec(data).ok_or_else(|| anyhow!("Failed to parse font {:?}", path))
}

/// Load the artwork and smooth-scale it to the window
fn load_background(path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load background {:?}", path))?;
    Ok(image.resize_exact(width, height, FilterType::CatmullRom).to_rgb8())
}

/// Draw text onto an image
pub fn draw_text(
    image: &mut RgbImage,
    font: &Font,
    text: &str,
    x: i32,
    y: i32,
    scale: f32,
    color: Rgb<u8>,
) {
    let scale = Scale::uniform(scale);
    let v_metrics = font.v_metrics(scale);
    let offset = rusttype::point(x as f32, y as f32 + v_metrics.ascent);

    for glyph in font.layout(text, scale, offset) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;

                if px >= 0 && px < image.width() as i32 && py >= 0 && py < image.height() as i32 {
                    let pixel = image.get_pixel_mut(px as u32, py as u32);
                    // Alpha blend
                    let alpha = v;
                    pixel[0] = ((1.0 - alpha) * pixel[0] as f32 + alpha * color[0] as f32) as u8;
                    pixel[1] = ((1.0 - alpha) * pixel[1] as f32 + alpha * color[1] as f32) as u8;
                    pixel[2] = ((1.0 - alpha) * pixel[2] as f32 + alpha * color[2] as f32) as u8;
                }
            });
        }
    }
}

/// Calculate text width
pub fn text_width(font: &Font, text: &str, scale: f32) -> i32 {
    let scale = Scale::uniform(scale);
    let mut width = 0.0;

    for glyph in font.layout(text, scale, rusttype::point(0.0, 0.0)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            width = bb.max.x as f32;
        } else {
            width += glyph.unpositioned().h_metrics().advance_width;
        }
    }

    width as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn appearance(background: PathBuf) -> AppearanceConfig {
        AppearanceConfig {
            background,
            font: None,
        }
    }

    #[test]
    fn test_window_size() {
        assert_eq!(window_size(1), (600, 960));
        assert_eq!(window_size(2), (300, 480));
        assert_eq!(window_size(0), (600, 960));
        assert_eq!(window_size(10_000), (1, 1));
    }

    #[test]
    fn test_frame_from_rgb() {
        let mut image = RgbImage::new(2, 1);
        image.put_pixel(1, 0, Rgb([0x12, 0x34, 0x56]));

        let frame = Frame::from_rgb(&image);
        assert_eq!(frame.pixels, vec![0, 0x123456]);
        assert_eq!(frame.pixel(1, 0), Some(0x123456));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_missing_background_draws_panel() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PanelRenderer::new(&appearance(dir.path().join("missing.png")));

        let frame = renderer.render(2);
        assert_eq!((frame.width, frame.height), (300, 480));
        assert_eq!(frame.pixels.len(), 300 * 480);

        // Power button centre (486, 132) lands on (243, 66) in the window
        assert_ne!(frame.pixel(243, 66), frame.pixel(2, 2));
    }

    #[test]
    fn test_background_is_scaled_to_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.png");
        RgbImage::from_pixel(PANEL_WIDTH, PANEL_HEIGHT, Rgb([200, 0, 0]))
            .save(&path)
            .unwrap();

        let frame = PanelRenderer::new(&appearance(path)).render(2);
        assert_eq!((frame.width, frame.height), (300, 480));

        let centre = frame.pixel(150, 240).unwrap();
        let red = (centre >> 16) & 0xFF;
        let green = (centre >> 8) & 0xFF;
        assert!(red >= 195, "red channel {}", red);
        assert!(green <= 5, "green channel {}", green);
    }

    #[test]
    fn test_unreadable_font_disables_labels() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("font.ttf");
        std::fs::write(&font, b"not a font").unwrap();

        let renderer = PanelRenderer::new(&AppearanceConfig {
            background: dir.path().join("missing.png"),
            font: Some(font),
        });
        assert!(renderer.font.is_none());
        assert_eq!(renderer.render(3).pixels.len(), 200 * 320);
    }
}
