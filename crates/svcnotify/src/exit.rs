use std::fmt;
use std::io;

use svcnotify::NotifyError;

// sysexits-style exit codes, shared with the other 3leaps CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn notify_error(context: &str, err: NotifyError) -> CliError {
    match err {
        NotifyError::ChannelCreate(source) | NotifyError::Write(source) => {
            io_error(context, source)
        }
        NotifyError::ChannelConnect { path, source } => {
            io_error(&format!("{context} ({})", path.display()), source)
        }
        NotifyError::EndpointMissing { .. } | NotifyError::IncompleteWrite { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        NotifyError::AlreadyOpen | NotifyError::NotOpen => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn endpoint_missing_is_transport_error() {
        let err = notify_error(
            "resolve failed",
            NotifyError::EndpointMissing {
                path: PathBuf::new(),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("resolve failed: "));
    }

    #[test]
    fn connect_refused_is_failure() {
        let err = notify_error(
            "open failed",
            NotifyError::ChannelConnect {
                path: PathBuf::from("/run/notify"),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("/run/notify"));
    }

    #[test]
    fn write_timeout_is_timeout() {
        let err = notify_error(
            "send failed",
            NotifyError::Write(io::Error::from(io::ErrorKind::WouldBlock)),
        );
        assert_eq!(err.code, TIMEOUT);
    }
}
