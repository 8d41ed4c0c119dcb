use std::path::PathBuf;
use std::time::Duration;

use svcnotify_transport::NOTIFY_SOCKET_ENV;
use svcnotify_wire::KeySet;

/// Controls how a [`Notifier`](crate::Notifier) resolves and uses its channel.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Explicit endpoint path. When `None`, `env_var` is read instead.
    pub socket_path: Option<PathBuf>,
    /// Environment variable holding the endpoint path. Default: `NOTIFY_SOCKET`.
    pub env_var: String,
    /// Bound on how long a send may block. Default: `None` (unbounded).
    pub write_timeout: Option<Duration>,
    /// Remove `env_var` from the environment once resolved, so child
    /// processes do not inherit it. Ignored when `socket_path` is set.
    pub unset_env: bool,
    /// Keys the variable store accepts.
    pub keys: KeySet,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            env_var: NOTIFY_SOCKET_ENV.to_string(),
            write_timeout: None,
            unset_env: false,
            keys: KeySet::protocol(),
        }
    }
}
