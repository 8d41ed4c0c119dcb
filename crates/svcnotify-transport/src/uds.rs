use std::net::Shutdown;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::{Result, TransportError};
use crate::traits::{Connector, DatagramChannel};

/// Unix datagram socket connected to a notification endpoint.
pub struct UnixDatagramChannel {
    socket: UnixDatagram,
    path: PathBuf,
}

impl UnixDatagramChannel {
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(target_os = "macos")]
    const MAX_PATH_LEN: usize = 104;
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    const MAX_PATH_LEN: usize = 104;

    /// Create an unbound datagram socket and connect it to `path` (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        let socket = UnixDatagram::unbound().map_err(TransportError::Create)?;
        socket
            .connect(&path)
            .map_err(|e| TransportError::Connect {
                path: path.clone(),
                source: e,
            })?;

        debug!(?path, "connected to notification socket");
        Ok(Self { socket, path })
    }

    /// The endpoint path this channel is connected to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatagramChannel for UnixDatagramChannel {
    fn send(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.socket.send(buf)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.socket.set_write_timeout(timeout).map_err(Into::into)
    }

    fn shutdown(&mut self) -> std::io::Result<()> {
        self.socket.shutdown(Shutdown::Both)
    }
}

impl std::fmt::Debug for UnixDatagramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixDatagramChannel")
            .field("path", &self.path)
            .finish()
    }
}

/// Connector producing [`UnixDatagramChannel`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixDatagramConnector;

impl Connector for UnixDatagramConnector {
    type Channel = UnixDatagramChannel;

    fn connect(&self, endpoint: &Endpoint) -> Result<Self::Channel> {
        UnixDatagramChannel::connect(endpoint.path())
    }
}
