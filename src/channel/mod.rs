//! One-way byte channel to the remote control receiver
//!
//! The channel holds a single handle for the process lifetime. A failed
//! write drops the handle, reopens the pipe once without waiting for a
//! reader and retries the byte. The Windows receiver disconnects its pipe
//! instance after every byte it reads, so there the reconnect path is the
//! normal path for every click after the first.

mod pipe;

use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use pipe::{validate_pipe_name, PipeConnector};

/// Errors raised while opening or writing the channel
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to open {target}: {source}")]
    Open {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("no receiver is listening on {target}")]
    NoReceiver { target: String },

    #[error("can't open '{0}': not a named pipe")]
    NotANamedPipe(String),

    #[error("failed to write to pipe: {0}")]
    Write(#[from] io::Error),

    #[error("channel is closed")]
    Closed,
}

/// How long an open may block waiting for the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Block until a reader is present (startup)
    Wait,
    /// Fail immediately if nobody is reading (reconnect from the UI thread)
    NoWait,
}

/// Opens the receiving end of the channel
pub trait Connector {
    type Sink: Write;

    fn connect(&self, mode: OpenMode) -> Result<Self::Sink, ChannelError>;

    /// Human readable name of the target, for logs
    fn target(&self) -> String;
}

/// Persistent one-byte signal channel with reconnect on failure
pub struct SignalChannel<C: Connector> {
    connector: C,
    sink: Option<C::Sink>,
    closed: bool,
}

impl<C: Connector> SignalChannel<C> {
    /// Open the channel, blocking until the receiver is reachable
    pub fn open(connector: C) -> Result<Self, ChannelError> {
        let sink = connector.connect(OpenMode::Wait)?;
        info!("Opened remote control pipe: {}", connector.target());

        Ok(Self {
            connector,
            sink: Some(sink),
            closed: false,
        })
    }

    /// Write a single byte and flush it through to the receiver
    pub fn send(&mut self, id: u8) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }

        if let Some(sink) = self.sink.as_mut() {
            match write_byte(sink, id) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("Write to {} failed ({}), reconnecting", self.connector.target(), e);
                    self.sink = None;
                }
            }
        }

        let mut sink = self.connector.connect(OpenMode::NoWait)?;
        write_byte(&mut sink, id)?;
        self.sink = Some(sink);
        Ok(())
    }

    /// True while a handle is held
    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }

    /// Release the handle. Later sends fail with [`ChannelError::Closed`].
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.flush() {
                warn!("Flush on close failed: {}", e);
            }
        }
        info!("Closed remote control pipe: {}", self.connector.target());
    }
}

impl<C: Connector> Drop for SignalChannel<C> {
    fn drop(&mut self) {
        self.close();
    }
}

fn write_byte<W: Write>(sink: &mut W, id: u8) -> io::Result<()> {
    sink.write_all(&[id])?;
    sink.flush()
}
