use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;

/// Read access to environment-style variables.
///
/// Endpoint resolution and watchdog discovery go through this trait instead of
/// `std::env` directly, so tests can supply fixed values without touching the
/// real process environment.
pub trait EnvSource {
    /// Look up a variable. `None` when unset.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Remove a variable so child processes do not inherit it.
    fn remove_var(&self, key: &str);
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn remove_var(&self, key: &str) {
        std::env::remove_var(key);
    }
}

/// A fixed, in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct FixedEnv {
    vars: RefCell<HashMap<String, OsString>>,
}

impl FixedEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Whether `key` is currently set.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.borrow().contains_key(key)
    }
}

impl EnvSource for FixedEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.borrow().get(key).cloned()
    }

    fn remove_var(&self, key: &str) {
        self.vars.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_env_lookup_and_remove() {
        let env = FixedEnv::new().with("NOTIFY_SOCKET", "/run/notify");
        assert_eq!(
            env.var_os("NOTIFY_SOCKET"),
            Some(OsString::from("/run/notify"))
        );
        assert_eq!(env.var_os("OTHER"), None);

        env.remove_var("NOTIFY_SOCKET");
        assert!(!env.contains("NOTIFY_SOCKET"));
    }
}
