//! Notification channel transport.
//!
//! Resolves the notification endpoint (an explicit path or the `NOTIFY_SOCKET`
//! environment variable) and connects a local datagram socket to it.
//!
//! This is the lowest layer of svcnotify. The [`Connector`] and
//! [`DatagramChannel`] traits are the seam the notifier is generic over, so the
//! real Unix datagram socket can be swapped for a fake in tests.

pub mod endpoint;
pub mod env;
pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use endpoint::{Endpoint, NOTIFY_SOCKET_ENV};
pub use env::{EnvSource, FixedEnv, ProcessEnv};
pub use error::{Result, TransportError};
pub use traits::{Connector, DatagramChannel};

#[cfg(unix)]
pub use uds::{UnixDatagramChannel, UnixDatagramConnector};
