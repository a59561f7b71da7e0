use tracing::{debug, warn};

use crate::channel::{Connector, SignalChannel};
use crate::panel::{locate, Button, BUTTONS};

/// Pointer events translated out of the window event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to a window position (physical pixels)
    PointerMoved { x: f64, y: f64 },
    /// Primary button released at the last known position
    PointerReleased,
    /// Cursor left the window
    PointerLeft,
}

/// Turns clicks into signal bytes
pub struct InputHandler<C: Connector> {
    channel: SignalChannel<C>,
    buttons: &'static [Button],
    scaling: u32,
    cursor: Option<(f64, f64)>,
}

impl<C: Connector> InputHandler<C> {
    pub fn new(channel: SignalChannel<C>, scaling: u32) -> Self {
        Self::with_buttons(channel, &BUTTONS, scaling)
    }

    pub fn with_buttons(channel: SignalChannel<C>, buttons: &'static [Button], scaling: u32) -> Self {
        Self {
            channel,
            buttons,
            scaling: scaling.max(1),
            cursor: None,
        }
    }

    /// Handle an input event. Returns the button that was clicked, if any.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<&'static Button> {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.cursor = Some((x, y));
                None
            }
            InputEvent::PointerLeft => {
                self.cursor = None;
                None
            }
            InputEvent::PointerReleased => {
                let (x, y) = self.cursor?;
                self.handle_click(x, y)
            }
        }
    }

    /// Map a window position to panel space
    pub fn to_panel(&self, x: f64, y: f64) -> (f64, f64) {
        let scaling = self.scaling as f64;
        (x * scaling, y * scaling)
    }

    fn handle_click(&mut self, x: f64, y: f64) -> Option<&'static Button> {
        let (px, py) = self.to_panel(x, y);
        let buttons = self.buttons;
        let button = locate(buttons, px, py)?;

        debug!("{} pressed (0x{:02X}) at ({}, {})", button.name, button.id, px, py);

        if let Err(e) = self.channel.send(button.id) {
            warn!("Failed to send signal for {}: {}", button.name, e);
        }

        Some(button)
    }

    /// Close the underlying channel
    pub fn shutdown(&mut self) {
        self.channel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelError, OpenMode};
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Connector for SharedSink {
        type Sink = SharedSink;

        fn connect(&self, _mode: OpenMode) -> Result<SharedSink, ChannelError> {
            Ok(self.clone())
        }

        fn target(&self) -> String {
            "shared".to_string()
        }
    }

    fn handler(scaling: u32) -> (InputHandler<SharedSink>, Rc<RefCell<Vec<u8>>>) {
        let sink = SharedSink::default();
        let bytes = sink.0.clone();
        let channel = SignalChannel::open(sink).unwrap();
        (InputHandler::new(channel, scaling), bytes)
    }

    fn click(handler: &mut InputHandler<SharedSink>, x: f64, y: f64) -> Option<u8> {
        handler.handle_event(InputEvent::PointerMoved { x, y });
        handler.handle_event(InputEvent::PointerReleased).map(|b| b.id)
    }

    #[test]
    fn test_click_sends_button_id() {
        let (mut handler, bytes) = handler(2);

        // Power centre (486, 132) at half scale
        assert_eq!(click(&mut handler, 243.0, 66.0), Some(0x03));
        assert_eq!(*bytes.borrow(), vec![0x03]);
    }

    #[test]
    fn test_click_outside_buttons_sends_nothing() {
        let (mut handler, bytes) = handler(2);

        assert_eq!(click(&mut handler, 1.0, 1.0), None);
        // Top-left corner of "All" is outside its ellipse
        assert_eq!(click(&mut handler, 40.0, 46.0), None);
        assert!(bytes.borrow().is_empty());
    }

    #[test]
    fn test_release_without_position_is_ignored() {
        let (mut handler, bytes) = handler(2);

        assert!(handler.handle_event(InputEvent::PointerReleased).is_none());

        handler.handle_event(InputEvent::PointerMoved { x: 243.0, y: 66.0 });
        handler.handle_event(InputEvent::PointerLeft);
        assert!(handler.handle_event(InputEvent::PointerReleased).is_none());
        assert!(bytes.borrow().is_empty());
    }

    #[test]
    fn test_scaling_maps_to_panel() {
        let (scaled, _) = handler(3);
        assert_eq!(scaled.to_panel(100.0, 20.0), (300.0, 60.0));

        let (mut unscaled, bytes) = handler(1);
        assert_eq!(click(&mut unscaled, 240.0, 664.0), Some(0x11));
        assert_eq!(*bytes.borrow(), vec![0x11]);
    }

    #[test]
    fn test_overlapping_buttons_first_wins() {
        static OVERLAP: [Button; 2] = [
            Button::new(0x0A, 0, 0, 100, 100, "Under"),
            Button::new(0x0B, 20, 20, 100, 100, "Over"),
        ];
        let sink = SharedSink::default();
        let bytes = sink.0.clone();
        let channel = SignalChannel::open(sink).unwrap();
        let mut handler = InputHandler::with_buttons(channel, &OVERLAP, 1);

        assert_eq!(click(&mut handler, 60.0, 60.0), Some(0x0A));
        assert_eq!(*bytes.borrow(), vec![0x0A]);
    }

    #[test]
    fn test_send_after_shutdown_is_dropped() {
        let (mut handler, bytes) = handler(2);
        handler.shutdown();

        // The click still resolves, the byte is not delivered
        assert_eq!(click(&mut handler, 243.0, 66.0), Some(0x03));
        assert!(bytes.borrow().is_empty());
    }
}
