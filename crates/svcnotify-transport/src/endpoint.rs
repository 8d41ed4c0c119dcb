use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::EnvSource;
use crate::error::{Result, TransportError};

/// Environment variable the service manager uses to pass the notification socket.
pub const NOTIFY_SOCKET_ENV: &str = "NOTIFY_SOCKET";

/// A resolved notification endpoint.
///
/// Construction goes through [`Endpoint::resolve`], which guarantees the path is
/// non-empty and existed at resolution time. The path never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: PathBuf,
}

impl Endpoint {
    /// Resolve the endpoint from `explicit`, falling back to `env_var` in `env`.
    ///
    /// The value is treated as an opaque filesystem path. Abstract socket
    /// addresses (leading `@`) do not exist on the filesystem and are rejected.
    pub fn resolve(explicit: Option<&Path>, env_var: &str, env: &dyn EnvSource) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => env.var_os(env_var).map(PathBuf::from).unwrap_or_default(),
        };

        if path.as_os_str().is_empty() || !path.exists() {
            return Err(TransportError::EndpointMissing { path });
        }

        debug!(?path, "resolved notification endpoint");
        Ok(Self { path })
    }

    /// The resolved endpoint path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
