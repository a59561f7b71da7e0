//! Named pipe connector (POSIX FIFO or Windows named pipe)

use std::fs::File;
use std::path::{Path, PathBuf};

use super::{ChannelError, Connector, OpenMode};

/// Opens the receiver's named pipe for writing
#[derive(Debug, Clone)]
pub struct PipeConnector {
    path: PathBuf,
}

impl PipeConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for PipeConnector {
    type Sink = File;

    fn connect(&self, mode: OpenMode) -> Result<File, ChannelError> {
        open_pipe(&self.path, mode)
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}

/// Check a Windows pipe name of the form `\\<host>\pipe\<name>`
pub fn validate_pipe_name(name: &str) -> bool {
    if !(10..=256).contains(&name.len()) {
        return false;
    }

    let Some(rest) = name.strip_prefix(r"\\") else {
        return false;
    };
    let Some((host, pipe)) = rest.split_once('\\') else {
        return false;
    };

    !host.is_empty()
        && pipe
            .strip_prefix(r"pipe\")
            .is_some_and(|pipe_name| !pipe_name.is_empty())
}

#[cfg(unix)]
fn open_pipe(path: &Path, mode: OpenMode) -> Result<File, ChannelError> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
    use tracing::{info, warn};

    let target = path.display().to_string();

    if let Ok(metadata) = std::fs::metadata(path) {
        if !metadata.file_type().is_fifo() {
            warn!("{} is not a FIFO, writing to it anyway", target);
        }
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if mode == OpenMode::NoWait {
        options.custom_flags(libc::O_NONBLOCK);
    } else {
        info!("Waiting for a reader on {}", target);
    }

    let file = options.open(path).map_err(|source| {
        if source.raw_os_error() == Some(libc::ENXIO) {
            ChannelError::NoReceiver {
                target: target.clone(),
            }
        } else {
            ChannelError::Open {
                target: target.clone(),
                source,
            }
        }
    })?;

    if mode == OpenMode::NoWait {
        clear_nonblocking(&file).map_err(|source| ChannelError::Open { target, source })?;
    }

    Ok(file)
}

/// Writes on the reopened handle should block like the original one
#[cfg(unix)]
fn clear_nonblocking(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    // SAFETY: fd belongs to `file`, which outlives both calls
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(std::io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) < 0 {
            return Err(std::io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(windows)]
fn open_pipe(path: &Path, _mode: OpenMode) -> Result<File, ChannelError> {
    use std::fs::OpenOptions;

    // Win32 error codes for a missing or saturated pipe server
    const ERROR_FILE_NOT_FOUND: i32 = 2;
    const ERROR_PIPE_BUSY: i32 = 231;

    let target = path.display().to_string();
    if !validate_pipe_name(&target) {
        return Err(ChannelError::NotANamedPipe(target));
    }

    // Opening a pipe client never waits for the server, so both modes match
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|source| match source.raw_os_error() {
            Some(ERROR_FILE_NOT_FOUND) | Some(ERROR_PIPE_BUSY) => {
                ChannelError::NoReceiver { target }
            }
            _ => ChannelError::Open { target, source },
        })
}
