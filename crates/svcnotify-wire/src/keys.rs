//! Protocol-recognized variable names.
//!
//! The closed set below is what the service manager understands. Anything else
//! must carry the [`EXTENSION_PREFIX`] to be accepted.

/// Service startup finished.
pub const READY: &str = "READY";

/// Service is reloading its configuration.
pub const RELOADING: &str = "RELOADING";

/// Service is beginning its shutdown.
pub const STOPPING: &str = "STOPPING";

/// Free-form status text.
pub const STATUS: &str = "STATUS";

/// Failure as an `errno`-style number.
pub const ERRNO: &str = "ERRNO";

/// Failure as a D-Bus error name.
pub const BUSERROR: &str = "BUSERROR";

/// Main process ID of the service.
pub const MAINPID: &str = "MAINPID";

/// Watchdog keep-alive ping.
pub const WATCHDOG: &str = "WATCHDOG";

/// Reset the watchdog timeout (microseconds).
pub const WATCHDOG_USEC: &str = "WATCHDOG_USEC";

/// Extend the current start/stop timeout (microseconds).
pub const EXTEND_TIMEOUT_USEC: &str = "EXTEND_TIMEOUT_USEC";

/// `CLOCK_MONOTONIC` timestamp accompanying `RELOADING=1`.
pub const MONOTONIC_USEC: &str = "MONOTONIC_USEC";

/// Store passed file descriptors.
pub const FDSTORE: &str = "FDSTORE";

/// Remove stored file descriptors.
pub const FDSTOREREMOVE: &str = "FDSTOREREMOVE";

/// Name for stored file descriptors.
pub const FDNAME: &str = "FDNAME";

/// Whether stored file descriptors are polled.
pub const FDPOLL: &str = "FDPOLL";

/// Synchronization barrier.
pub const BARRIER: &str = "BARRIER";

/// Change the unit's notify access setting.
pub const NOTIFYACCESS: &str = "NOTIFYACCESS";

/// Exit status of the service.
pub const EXIT_STATUS: &str = "EXIT_STATUS";

/// Prefix reserved for vendor-defined variables.
pub const EXTENSION_PREFIX: &str = "X_";

/// Every protocol-recognized variable name.
pub const PROTOCOL_KEYS: &[&str] = &[
    READY,
    RELOADING,
    STOPPING,
    STATUS,
    ERRNO,
    BUSERROR,
    MAINPID,
    WATCHDOG,
    WATCHDOG_USEC,
    EXTEND_TIMEOUT_USEC,
    MONOTONIC_USEC,
    FDSTORE,
    FDSTOREREMOVE,
    FDNAME,
    FDPOLL,
    BARRIER,
    NOTIFYACCESS,
    EXIT_STATUS,
];

/// The closed set of keys a store accepts, plus `X_`-prefixed extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySet {
    keys: &'static [&'static str],
}

impl KeySet {
    /// A key set over an arbitrary table.
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    /// The service manager's protocol key set.
    pub const fn protocol() -> Self {
        Self::new(PROTOCOL_KEYS)
    }

    /// Whether `key` is in the closed table (extensions not considered).
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| *k == key)
    }

    /// Whether `key` may carry a value.
    ///
    /// Any `X_`-prefixed key is accepted as-is. A key containing `=` or a line
    /// break is not escaped and will be misread by the receiver.
    pub fn allows(&self, key: &str) -> bool {
        self.contains(key) || key.starts_with(EXTENSION_PREFIX)
    }

    /// The closed table.
    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }
}

impl Default for KeySet {
    fn default() -> Self {
        Self::protocol()
    }
}
