//! Watchdog interval discovery.
//!
//! When a unit has `WatchdogSec=` set, the service manager exports
//! `WATCHDOG_USEC` (and usually `WATCHDOG_PID`) to the service. The process is
//! expected to send `WATCHDOG=1` at least once per interval.

use std::time::Duration;

use svcnotify_transport::EnvSource;

/// Watchdog interval in microseconds.
pub const WATCHDOG_USEC_ENV: &str = "WATCHDOG_USEC";

/// Process the watchdog applies to.
pub const WATCHDOG_PID_ENV: &str = "WATCHDOG_PID";

/// The watchdog interval for the current process, if one is configured.
pub fn watchdog_interval(env: &dyn EnvSource) -> Option<Duration> {
    watchdog_interval_for(env, std::process::id())
}

/// The watchdog interval for `pid`.
///
/// `None` when `WATCHDOG_USEC` is unset, unparsable or zero, or when
/// `WATCHDOG_PID` is set and names another process.
pub fn watchdog_interval_for(env: &dyn EnvSource, pid: u32) -> Option<Duration> {
    let usec: u64 = env.var_os(WATCHDOG_USEC_ENV)?.to_str()?.trim().parse().ok()?;
    if usec == 0 {
        return None;
    }

    if let Some(raw) = env.var_os(WATCHDOG_PID_ENV) {
        let target: u32 = raw.to_str()?.trim().parse().ok()?;
        if target != pid {
            return None;
        }
    }

    Some(Duration::from_micros(usec))
}

#[cfg(test)]
mod tests {
    use svcnotify_transport::FixedEnv;

    use super::*;

    #[test]
    fn interval_without_pid() {
        let env = FixedEnv::new().with(WATCHDOG_USEC_ENV, "30000000");
        assert_eq!(
            watchdog_interval_for(&env, 100),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn interval_for_matching_pid() {
        let env = FixedEnv::new()
            .with(WATCHDOG_USEC_ENV, "500000")
            .with(WATCHDOG_PID_ENV, "4242");
        assert_eq!(
            watchdog_interval_for(&env, 4242),
            Some(Duration::from_millis(500))
        );
        assert_eq!(watchdog_interval_for(&env, 4243), None);
    }

    #[test]
    fn unset_zero_or_garbage_is_none() {
        assert_eq!(watchdog_interval_for(&FixedEnv::new(), 1), None);
        let zero = FixedEnv::new().with(WATCHDOG_USEC_ENV, "0");
        assert_eq!(watchdog_interval_for(&zero, 1), None);
        let garbage = FixedEnv::new().with(WATCHDOG_USEC_ENV, "soon");
        assert_eq!(watchdog_interval_for(&garbage, 1), None);
        let bad_pid = FixedEnv::new()
            .with(WATCHDOG_USEC_ENV, "1000")
            .with(WATCHDOG_PID_ENV, "me");
        assert_eq!(watchdog_interval_for(&bad_pid, 1), None);
    }

    #[test]
    fn current_process_pid_is_used() {
        let env = FixedEnv::new()
            .with(WATCHDOG_USEC_ENV, "1000")
            .with(WATCHDOG_PID_ENV, std::process::id().to_string());
        assert_eq!(watchdog_interval(&env), Some(Duration::from_millis(1)));
    }
}
