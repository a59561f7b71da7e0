mod buttons;
pub mod renderer;

pub use buttons::render_generated_panel;
pub use renderer::{window_size, Frame, PanelRenderer};
