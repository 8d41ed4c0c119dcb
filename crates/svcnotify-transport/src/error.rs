use std::path::PathBuf;

/// Errors that can occur while resolving or connecting the notification channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The endpoint path is unset, empty, or names nothing on the filesystem.
    #[error("notification endpoint not found: '{}'", .path.display())]
    EndpointMissing { path: PathBuf },

    /// The local datagram socket could not be created.
    #[error("failed to create datagram socket: {0}")]
    Create(std::io::Error),

    /// Failed to connect to the specified endpoint.
    #[error("failed to connect to {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {}", .path.display())]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// An I/O error occurred on the channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
