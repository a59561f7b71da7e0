//! Inscribed-ellipse hit testing

use super::Button;

impl Button {
    /// True if the panel point lies inside the ellipse inscribed in this
    /// button's bounding box. Box edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (left, top) = (self.x as f64, self.y as f64);
        let (right, bottom) = (left + self.w as f64, top + self.h as f64);

        if x < left || y < top || x > right || y > bottom {
            return false;
        }

        let (cx, cy) = self.center();
        let rx = self.w as f64 / 2.0;
        let ry = self.h as f64 / 2.0;
        let dx = x - cx;
        let dy = y - cy;

        (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
    }
}

/// First button, in slice order, whose region contains the point
pub fn locate(buttons: &[Button], x: f64, y: f64) -> Option<&Button> {
    buttons.iter().find(|b| b.contains(x, y))
}
