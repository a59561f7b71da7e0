//! Generated panel drawing, used when the artwork is unavailable

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_hollow_ellipse_mut};
use rusttype::Font;

use super::renderer::{button_colors, draw_text, text_width, DARK_BG, WHITE};
use crate::panel::{Button, BUTTONS, PANEL_HEIGHT, PANEL_WIDTH};

const LABEL_SCALE: f32 = 16.0;

/// Draw every button's clickable ellipse at panel resolution
pub fn render_generated_panel(font: Option<&Font>) -> RgbImage {
    let mut img = RgbImage::from_pixel(PANEL_WIDTH, PANEL_HEIGHT, DARK_BG);

    for button in &BUTTONS {
        draw_button(&mut img, button);
        if let Some(font) = font {
            draw_label(&mut img, font, button);
        }
    }

    img
}

fn draw_button(img: &mut RgbImage, button: &Button) {
    let (fill, outline) = button_colors(button.id);
    let (cx, cy) = button.center();
    let center = (cx.round() as i32, cy.round() as i32);
    let rx = (button.w / 2) as i32;
    let ry = (button.h / 2) as i32;

    draw_filled_ellipse_mut(img, center, rx, ry, darken(fill, 0.5));
    draw_hollow_ellipse_mut(img, center, rx, ry, outline);
    draw_hollow_ellipse_mut(img, center, rx - 1, ry - 1, outline);
}

/// Label centred under the button
fn draw_label(img: &mut RgbImage, font: &Font, button: &Button) {
    let width = text_width(font, button.name, LABEL_SCALE);
    let (cx, _) = button.center();
    let x = cx.round() as i32 - width / 2;
    let y = (button.y + button.h) as i32 + 6;

    draw_text(img, font, button.name, x, y, LABEL_SCALE, WHITE);
}

/// Darken a color by a factor (0.0 = black, 1.0 = unchanged)
fn darken(color: Rgb<u8>, factor: f32) -> Rgb<u8> {
    Rgb([
        (color[0] as f32 * factor) as u8,
        (color[1] as f32 * factor) as u8,
        (color[2] as f32 * factor) as u8,
    ])
}
