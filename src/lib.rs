pub mod channel;
pub mod cli;
pub mod config;
pub mod display;
pub mod input;
pub mod panel;

use anyhow::{anyhow, Context, Result};
use softbuffer::Surface;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use channel::{PipeConnector, SignalChannel};
use config::Config;
use display::{Frame, PanelRenderer};
use input::{InputEvent, InputHandler};

/// Main application struct
pub struct App {
    config: Config,
    input: InputHandler<PipeConnector>,
    frame: Frame,
}

impl App {
    /// Open the signal channel and render the panel.
    ///
    /// Fails if the pipe cannot be opened.
    pub fn new(config: Config, pipe: PathBuf) -> Result<Self> {
        let channel = SignalChannel::open(PipeConnector::new(&pipe))
            .with_context(|| format!("Failed to open named pipe {}", pipe.display()))?;

        let frame = PanelRenderer::new(&config.appearance).render(config.window.scaling);
        let input = InputHandler::new(channel, config.window.scaling);

        Ok(Self {
            config,
            input,
            frame,
        })
    }

    /// Show the window and dispatch clicks until it is closed
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;

        let window = Rc::new(
            WindowBuilder::new()
                .with_title(&self.config.window.title)
                .with_inner_size(PhysicalSize::new(self.frame.width, self.frame.height))
                .with_resizable(false)
                .build(&event_loop)?,
        );

        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("Failed to create graphics context: {}", e))?;
        let mut surface = Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("Failed to create window surface: {}", e))?;

        info!("Remote control running");
        window.request_redraw();

        event_loop.run(move |event, elwt| {
            // Surfaces must not outlive their context
            let _context = &context;
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = self.present(&mut surface) {
                            error!("{:#}", e);
                            elwt.exit();
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.input.handle_event(InputEvent::PointerMoved {
                            x: position.x,
                            y: position.y,
                        });
                    }
                    WindowEvent::CursorLeft { .. } => {
                        self.input.handle_event(InputEvent::PointerLeft);
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        button: MouseButton::Left,
                        ..
                    } => {
                        self.input.handle_event(InputEvent::PointerReleased);
                    }
                    _ => {}
                },
                Event::LoopExiting => self.shutdown(),
                _ => {}
            }
        })?;

        Ok(())
    }

    /// Copy the rendered panel into the window surface
    fn present(&self, surface: &mut Surface<Rc<Window>, Rc<Window>>) -> Result<()> {
        let (Some(width), Some(height)) = (
            NonZeroU32::new(self.frame.width),
            NonZeroU32::new(self.frame.height),
        ) else {
            return Ok(());
        };

        surface
            .resize(width, height)
            .map_err(|e| anyhow!("Failed to resize surface: {}", e))?;

        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| anyhow!("Failed to map surface buffer: {}", e))?;
        buffer.copy_from_slice(&self.frame.pixels);
        buffer
            .present()
            .map_err(|e| anyhow!("Failed to present frame: {}", e))?;

        Ok(())
    }

    /// Close the signal channel
    pub fn shutdown(&mut self) {
        info!("Shutting down remote control...");
        self.input.shutdown();
        info!("Shutdown complete");
    }
}
