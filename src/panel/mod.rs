mod buttons;
mod hit;

pub use buttons::*;
pub use hit::locate;
