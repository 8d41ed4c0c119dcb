//! Report service lifecycle state to the service manager.
//!
//! svcnotify sends readiness, status text and watchdog pings as `KEY=VALUE`
//! datagrams to the socket named by `NOTIFY_SOCKET`.
//!
//! # Crate Structure
//!
//! - [`transport`] — Endpoint resolution and the Unix datagram channel
//! - [`wire`] — Key set, variable store and wire codec
//! - [`Notifier`] — Channel lifecycle and send
//! - [`watchdog`] — Watchdog interval discovery
//!
//! ```no_run
//! use svcnotify::Notifier;
//!
//! let mut notifier = Notifier::from_env()?;
//! let _ = notifier.set("READY", 1);
//! let _ = notifier.set_variable("STATUS", Some("serving".into()));
//! notifier.open()?;
//! notifier.send()?;
//! notifier.close()?;
//! # Ok::<(), svcnotify::NotifyError>(())
//! ```

pub mod config;
pub mod error;
pub mod notifier;
pub mod watchdog;

pub use config::NotifierConfig;
pub use error::{NotifyError, Result};
pub use notifier::Notifier;

/// Re-export transport types.
pub mod transport {
    pub use svcnotify_transport::*;
}

/// Re-export wire types.
pub mod wire {
    pub use svcnotify_wire::*;
}
