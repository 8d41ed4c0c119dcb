use std::path::PathBuf;

use svcnotify_transport::TransportError;

/// Errors raised by [`Notifier`](crate::Notifier) operations.
///
/// None of these are retried internally. After any of them the notifier is
/// still usable: a failed `open` leaves it closed, a failed `send` leaves it
/// open with the variables untouched.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The endpoint path is unset, empty, or does not exist.
    #[error("notification endpoint not found: '{}'", .path.display())]
    EndpointMissing { path: PathBuf },

    /// `open` called while a connection is live.
    #[error("notification channel already open")]
    AlreadyOpen,

    /// `close` or a non-empty `send` called with no live connection.
    #[error("notification channel not open")]
    NotOpen,

    /// The datagram socket could not be created or configured.
    #[error("failed to create notification socket: {0}")]
    ChannelCreate(#[source] std::io::Error),

    /// Connecting to the endpoint failed.
    #[error("failed to connect to {}: {source}", .path.display())]
    ChannelConnect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The OS accepted fewer bytes than the payload holds.
    #[error("incomplete write: {actual} of {expected} bytes sent")]
    IncompleteWrite { expected: usize, actual: usize },

    /// The write itself failed.
    #[error("failed to send notification: {0}")]
    Write(#[source] std::io::Error),
}

impl From<TransportError> for NotifyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::EndpointMissing { path } => NotifyError::EndpointMissing { path },
            TransportError::Create(source) | TransportError::Io(source) => {
                NotifyError::ChannelCreate(source)
            }
            TransportError::Connect { path, source } => NotifyError::ChannelConnect { path, source },
            TransportError::PathTooLong { path, len, max } => NotifyError::ChannelConnect {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("socket path too long ({len} bytes, max {max})"),
                ),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
