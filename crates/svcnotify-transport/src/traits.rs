use std::time::Duration;

use crate::endpoint::Endpoint;
use crate::error::Result;

/// A connected, send-only datagram channel.
///
/// On Unix this is a Unix datagram socket connected to the notification
/// endpoint. Tests substitute fakes to observe writes or simulate short ones.
pub trait DatagramChannel {
    /// Send one datagram. Returns the number of bytes the OS accepted.
    fn send(&mut self, buf: &[u8]) -> std::io::Result<usize>;

    /// Bound how long a send may block. `None` means no bound.
    fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()>;

    /// Release the connection. Called once before the channel is dropped.
    fn shutdown(&mut self) -> std::io::Result<()>;
}

/// Creates channels connected to an [`Endpoint`].
pub trait Connector {
    type Channel: DatagramChannel;

    /// Create a socket and connect it to `endpoint`.
    fn connect(&self, endpoint: &Endpoint) -> Result<Self::Channel>;
}
