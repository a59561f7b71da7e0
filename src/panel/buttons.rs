//! Remote control panel layout
//!
//! Coordinates are in panel space: the unscaled 600x960 artwork of the
//! physical remote. The window shows the panel downscaled by an integer
//! divisor, so window positions are multiplied back up before hit testing.
//!
//! Button ids are the bytes the receiver expects on the pipe. 0x02 has no
//! button on this remote.

use serde::Serialize;

/// Panel artwork width in panel pixels
pub const PANEL_WIDTH: u32 = 600;

/// Panel artwork height in panel pixels
pub const PANEL_HEIGHT: u32 = 960;

/// Default panel-to-window downscale divisor
pub const DEFAULT_SCALING: u32 = 2;

/// A clickable region on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Button {
    /// Byte sent to the receiver
    pub id: u8,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub name: &'static str,
}

impl Button {
    pub const fn new(id: u8, x: u32, y: u32, w: u32, h: u32, name: &'static str) -> Self {
        Self { id, x, y, w, h, name }
    }

    /// Centre of the bounding box in panel coordinates
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.w as f64 / 2.0,
            self.y as f64 + self.h as f64 / 2.0,
        )
    }
}

/// Every button on the remote, in hit-test priority order
pub const BUTTONS: [Button; 19] = [
    Button::new(0x00, 80, 92, 80, 80, "All"), // Top row
    Button::new(0x01, 202, 92, 80, 80, "Mute"),
    Button::new(0x03, 446, 92, 80, 80, "Power"),
    Button::new(0x04, 80, 228, 76, 76, "Part L"),
    Button::new(0x05, 202, 228, 76, 76, "Part R"),
    Button::new(0x06, 326, 228, 76, 76, "Inst L"),
    Button::new(0x07, 448, 228, 76, 76, "Inst R"),
    Button::new(0x08, 80, 360, 76, 76, "Level L"),
    Button::new(0x09, 202, 360, 76, 76, "Level R"),
    Button::new(0x0A, 326, 360, 76, 76, "Reverb L"),
    Button::new(0x0B, 448, 360, 76, 76, "Reverb R"),
    Button::new(0x0C, 80, 492, 76, 76, "Song L"),
    Button::new(0x0D, 202, 492, 76, 76, "Song R"),
    Button::new(0x0E, 326, 492, 76, 76, "Tempo L"),
    Button::new(0x0F, 448, 492, 76, 76, "Tempo R"),
    Button::new(0x10, 80, 626, 76, 76, "Stop"), // Transport
    Button::new(0x11, 202, 626, 76, 76, "Play"),
    Button::new(0x12, 326, 626, 76, 76, "Rew"),
    Button::new(0x13, 448, 626, 76, 76, "FF"),
];

/// Look up a button by the byte it sends
pub fn button_by_id(id: u8) -> Option<&'static Button> {
    BUTTONS.iter().find(|b| b.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_ids_unique() {
        let ids: HashSet<u8> = BUTTONS.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), BUTTONS.len());
    }

    #[test]
    fn test_buttons_inside_panel() {
        for button in &BUTTONS {
            assert!(button.x + button.w <= PANEL_WIDTH, "{} overflows", button.name);
            assert!(button.y + button.h <= PANEL_HEIGHT, "{} overflows", button.name);
        }
    }

    #[test]
    fn test_button_by_id() {
        assert_eq!(button_by_id(0x03).map(|b| b.name), Some("Power"));
        assert_eq!(button_by_id(0x13).map(|b| b.name), Some("FF"));
        assert!(button_by_id(0x02).is_none());
        assert!(button_by_id(0xFF).is_none());
    }

    #[test]
    fn test_center() {
        let button = Button::new(0x00, 80, 92, 80, 80, "All");
        assert_eq!(button.center(), (120.0, 132.0));
    }
}
