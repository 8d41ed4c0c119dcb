use std::path::Path;
use std::time::Duration;

use svcnotify_transport::{
    Connector, DatagramChannel, Endpoint, EnvSource, ProcessEnv, UnixDatagramConnector,
};
use svcnotify_wire::keys::{
    ERRNO, EXTEND_TIMEOUT_USEC, MAINPID, READY, RELOADING, STATUS, STOPPING, WATCHDOG,
};
use svcnotify_wire::{SetOutcome, Value, Variables};
use tracing::{debug, warn};

use crate::config::NotifierConfig;
use crate::error::{NotifyError, Result};

/// Sends lifecycle notifications to the service manager.
///
/// A notifier holds a validated variable store and at most one connection to
/// the notification endpoint. Variables are set, the channel is opened, and
/// [`send`](Self::send) writes the whole store as one datagram.
///
/// The endpoint is resolved once at construction and never changes. `open` and
/// `close` are strict about the current state; `open_if_closed` and
/// `close_if_opened` are the lenient forms.
pub struct Notifier<C: Connector = UnixDatagramConnector> {
    endpoint: Endpoint,
    connector: C,
    channel: Option<C::Channel>,
    vars: Variables,
    write_timeout: Option<Duration>,
}

impl Notifier<UnixDatagramConnector> {
    /// Resolve the endpoint from `NOTIFY_SOCKET`.
    pub fn from_env() -> Result<Self> {
        Self::with_config(NotifierConfig::default())
    }

    /// Use an explicit endpoint path.
    pub fn with_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(NotifierConfig {
            socket_path: Some(path.as_ref().to_path_buf()),
            ..NotifierConfig::default()
        })
    }

    /// Build from explicit configuration against the process environment.
    pub fn with_config(config: NotifierConfig) -> Result<Self> {
        Self::with_parts(config, &ProcessEnv, UnixDatagramConnector)
    }
}

impl<C: Connector> Notifier<C> {
    /// Build from configuration, an environment source and a connector.
    pub fn with_parts(config: NotifierConfig, env: &dyn EnvSource, connector: C) -> Result<Self> {
        let endpoint = Endpoint::resolve(config.socket_path.as_deref(), &config.env_var, env)?;
        if config.unset_env && config.socket_path.is_none() {
            env.remove_var(&config.env_var);
        }

        Ok(Self {
            endpoint,
            connector,
            channel: None,
            vars: Variables::with_key_set(config.keys),
            write_timeout: config.write_timeout,
        })
    }

    /// The resolved endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Set (`Some`) or remove (`None`) a variable.
    ///
    /// Removal always succeeds. Setting an unknown key is rejected and leaves
    /// the store unchanged.
    pub fn set_variable(&mut self, key: &str, value: Option<Value>) -> SetOutcome {
        self.vars.set_variable(key, value)
    }

    /// Shorthand for `set_variable(key, Some(value.into()))`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> SetOutcome {
        self.vars.set(key, value)
    }

    pub fn clear_variables(&mut self) {
        self.vars.clear();
    }

    /// Read-only view of the current variables.
    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    /// Connect to the endpoint.
    ///
    /// Fails with [`NotifyError::AlreadyOpen`] if a connection is live. On
    /// any failure the notifier stays closed.
    pub fn open(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Err(NotifyError::AlreadyOpen);
        }

        let channel = self.connector.connect(&self.endpoint)?;
        if self.write_timeout.is_some() {
            channel.set_write_timeout(self.write_timeout)?;
        }

        debug!(path = ?self.endpoint.path(), "opened notification channel");
        self.channel = Some(channel);
        Ok(())
    }

    /// Release the connection.
    ///
    /// Fails with [`NotifyError::NotOpen`] if closed. Shutdown errors are
    /// ignored; the notifier is closed afterwards either way.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut channel) = self.channel.take() else {
            return Err(NotifyError::NotOpen);
        };

        if let Err(err) = channel.shutdown() {
            warn!(error = %err, "ignoring shutdown failure on close");
        }
        drop(channel);

        debug!(path = ?self.endpoint.path(), "closed notification channel");
        Ok(())
    }

    pub fn is_opened(&self) -> bool {
        self.channel.is_some()
    }

    pub fn is_closed(&self) -> bool {
        !self.is_opened()
    }

    /// `open` unless already open.
    pub fn open_if_closed(&mut self) -> Result<()> {
        if self.is_closed() {
            self.open()?;
        }
        Ok(())
    }

    /// `close` unless already closed.
    pub fn close_if_opened(&mut self) -> Result<()> {
        if self.is_opened() {
            self.close()?;
        }
        Ok(())
    }

    /// Write every variable as one datagram.
    ///
    /// An empty store is a successful no-op whether or not the channel is
    /// open. Otherwise the channel must be open, and the OS must accept the
    /// whole payload in a single write or [`NotifyError::IncompleteWrite`] is
    /// returned. The channel stays open and the variables stay set.
    pub fn send(&mut self) -> Result<()> {
        if self.vars.is_empty() {
            return Ok(());
        }
        let channel = self.channel.as_mut().ok_or(NotifyError::NotOpen)?;

        let payload = self.vars.encode();
        let written = channel.send(&payload).map_err(NotifyError::Write)?;
        if written != payload.len() {
            return Err(NotifyError::IncompleteWrite {
                expected: payload.len(),
                actual: written,
            });
        }

        debug!(bytes = written, vars = self.vars.len(), "sent notification");
        Ok(())
    }

    /// Replace the variables with `entries`, open if needed, and send.
    ///
    /// Returns the keys that were rejected. Accepted entries are still sent.
    pub fn notify<'a, I>(&mut self, entries: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        self.vars.clear();
        let mut rejected = Vec::new();
        for (key, value) in entries {
            if !self.vars.set_variable(key, Some(value)).is_accepted() {
                rejected.push(key.to_string());
            }
        }

        self.open_if_closed()?;
        self.send()?;
        Ok(rejected)
    }

    fn notify_one(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.notify([(key, value.into())]).map(|_| ())
    }

    /// `READY=1`
    pub fn ready(&mut self) -> Result<()> {
        self.notify_one(READY, 1u8)
    }

    /// `RELOADING=1`
    pub fn reloading(&mut self) -> Result<()> {
        self.notify_one(RELOADING, 1u8)
    }

    /// `STOPPING=1`
    pub fn stopping(&mut self) -> Result<()> {
        self.notify_one(STOPPING, 1u8)
    }

    /// `STATUS=<text>`
    pub fn status(&mut self, text: &str) -> Result<()> {
        self.notify_one(STATUS, text)
    }

    /// `WATCHDOG=1`
    pub fn watchdog(&mut self) -> Result<()> {
        self.notify_one(WATCHDOG, 1u8)
    }

    /// `ERRNO=<code>`
    pub fn errno(&mut self, code: i32) -> Result<()> {
        self.notify_one(ERRNO, code)
    }

    /// `MAINPID=<pid>`
    pub fn main_pid(&mut self, pid: u32) -> Result<()> {
        self.notify_one(MAINPID, pid)
    }

    /// `EXTEND_TIMEOUT_USEC=<micros>`
    pub fn extend_timeout(&mut self, by: Duration) -> Result<()> {
        let micros = u64::try_from(by.as_micros()).unwrap_or(u64::MAX);
        self.notify_one(EXTEND_TIMEOUT_USEC, micros)
    }
}

impl<C: Connector> std::fmt::Debug for Notifier<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("endpoint", &self.endpoint)
            .field("opened", &self.is_opened())
            .field("vars", &self.vars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;
    use std::rc::Rc;

    use svcnotify_transport::{FixedEnv, TransportError, NOTIFY_SOCKET_ENV};
    use svcnotify_wire::KeySet;

    use super::*;

    #[derive(Default)]
    struct Log {
        connects: usize,
        writes: Vec<Vec<u8>>,
        shutdowns: usize,
        write_timeout: Option<Duration>,
    }

    #[derive(Clone, Copy)]
    enum WriteBehavior {
        Full,
        Short(usize),
        Fail,
    }

    #[derive(Clone, Copy)]
    enum ConnectBehavior {
        Accept,
        CreateFails,
        Refuse,
    }

    struct FakeConnector {
        log: Rc<RefCell<Log>>,
        behavior: WriteBehavior,
        connect: ConnectBehavior,
    }

    struct FakeChannel {
        log: Rc<RefCell<Log>>,
        behavior: WriteBehavior,
    }

    impl DatagramChannel for FakeChannel {
        fn send(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.log.borrow_mut().writes.push(buf.to_vec());
            match self.behavior {
                WriteBehavior::Full => Ok(buf.len()),
                WriteBehavior::Short(by) => Ok(buf.len() - by),
                WriteBehavior::Fail => Err(io::Error::from(io::ErrorKind::ConnectionRefused)),
            }
        }

        fn set_write_timeout(&self, timeout: Option<Duration>) -> svcnotify_transport::Result<()> {
            self.log.borrow_mut().write_timeout = timeout;
            Ok(())
        }

        fn shutdown(&mut self) -> io::Result<()> {
            self.log.borrow_mut().shutdowns += 1;
            Err(io::Error::from(io::ErrorKind::NotConnected))
        }
    }

    impl Connector for FakeConnector {
        type Channel = FakeChannel;

        fn connect(&self, endpoint: &Endpoint) -> svcnotify_transport::Result<FakeChannel> {
            match self.connect {
                ConnectBehavior::Accept => {}
                ConnectBehavior::CreateFails => {
                    return Err(TransportError::Create(io::Error::from_raw_os_error(24)));
                }
                ConnectBehavior::Refuse => {
                    return Err(TransportError::Connect {
                        path: endpoint.path().to_path_buf(),
                        source: io::Error::from(io::ErrorKind::ConnectionRefused),
                    });
                }
            }
            self.log.borrow_mut().connects += 1;
            Ok(FakeChannel {
                log: Rc::clone(&self.log),
                behavior: self.behavior,
            })
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        path: PathBuf,
        log: Rc<RefCell<Log>>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("notify.sock");
            std::fs::write(&path, b"").unwrap();
            Self {
                _dir: dir,
                path,
                log: Rc::new(RefCell::new(Log::default())),
            }
        }

        fn env(&self) -> FixedEnv {
            FixedEnv::new().with(NOTIFY_SOCKET_ENV, self.path.as_os_str())
        }

        fn notifier(&self, behavior: WriteBehavior) -> Notifier<FakeConnector> {
            self.notifier_with(NotifierConfig::default(), behavior, ConnectBehavior::Accept)
        }

        fn notifier_with(
            &self,
            config: NotifierConfig,
            behavior: WriteBehavior,
            connect: ConnectBehavior,
        ) -> Notifier<FakeConnector> {
            let connector = FakeConnector {
                log: Rc::clone(&self.log),
                behavior,
                connect,
            };
            Notifier::with_parts(config, &self.env(), connector).unwrap()
        }
    }

    #[test]
    fn starts_closed_and_empty() {
        let fx = Fixture::new();
        let notifier = fx.notifier(WriteBehavior::Full);
        assert!(notifier.is_closed());
        assert!(!notifier.is_opened());
        assert!(notifier.variables().is_empty());
        assert_eq!(notifier.endpoint().path(), fx.path.as_path());
    }

    #[test]
    fn send_empty_store_needs_no_channel() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        notifier.send().unwrap();
        assert!(notifier.is_closed());
        assert!(fx.log.borrow().writes.is_empty());
    }

    #[test]
    fn send_while_closed_is_not_open() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        let _ = notifier.set("READY", 1);
        assert!(matches!(notifier.send(), Err(NotifyError::NotOpen)));
    }

    #[test]
    fn strict_open_and_close() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);

        assert!(matches!(notifier.close(), Err(NotifyError::NotOpen)));
        notifier.open().unwrap();
        assert!(notifier.is_opened());
        assert!(matches!(notifier.open(), Err(NotifyError::AlreadyOpen)));
        notifier.close().unwrap();
        assert!(notifier.is_closed());
        assert!(matches!(notifier.close(), Err(NotifyError::NotOpen)));
    }

    #[test]
    fn close_swallows_shutdown_failure() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        notifier.open().unwrap();
        notifier.close().unwrap();
        assert_eq!(fx.log.borrow().shutdowns, 1);
        assert!(notifier.is_closed());
    }

    #[test]
    fn lenient_wrappers_open_once() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);

        notifier.close_if_opened().unwrap();
        notifier.open_if_closed().unwrap();
        notifier.open_if_closed().unwrap();
        assert_eq!(fx.log.borrow().connects, 1);

        notifier.close_if_opened().unwrap();
        notifier.close_if_opened().unwrap();
        assert_eq!(fx.log.borrow().shutdowns, 1);
    }

    #[test]
    fn reopen_creates_fresh_connection() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        notifier.open().unwrap();
        notifier.close().unwrap();
        notifier.open().unwrap();
        assert_eq!(fx.log.borrow().connects, 2);
    }

    #[test]
    fn send_writes_exact_payload_once() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        let _ = notifier.set("READY", 1);
        notifier.open().unwrap();
        notifier.send().unwrap();

        let log = fx.log.borrow();
        assert_eq!(log.writes, vec![b"READY=1\n".to_vec()]);
        assert!(notifier.is_opened());
    }

    #[test]
    fn send_serializes_in_insertion_order() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        assert!(notifier.set_variable("READY", Some("1".into())).is_accepted());
        assert!(notifier.set_variable("STATUS", Some("hello".into())).is_accepted());
        notifier.open().unwrap();
        notifier.send().unwrap();
        assert_eq!(fx.log.borrow().writes[0], b"READY=1\nSTATUS=hello\n".to_vec());
    }

    #[test]
    fn short_write_is_incomplete_write() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Short(1));
        let _ = notifier.set("READY", 1);
        notifier.open().unwrap();

        let err = notifier.send().unwrap_err();
        assert!(matches!(
            err,
            NotifyError::IncompleteWrite {
                expected: 8,
                actual: 7
            }
        ));
        assert_eq!(fx.log.borrow().writes.len(), 1);
        assert!(notifier.is_opened());
        assert_eq!(notifier.variables().get("READY"), Some("1"));
    }

    #[test]
    fn failed_write_keeps_state() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Fail);
        let _ = notifier.set("STATUS", "up");
        notifier.open().unwrap();

        assert!(matches!(notifier.send(), Err(NotifyError::Write(_))));
        assert!(notifier.is_opened());
        assert_eq!(notifier.variables().len(), 1);
    }

    #[test]
    fn failed_connect_stays_closed() {
        let fx = Fixture::new();
        let mut notifier =
            fx.notifier_with(
            NotifierConfig::default(),
            WriteBehavior::Full,
            ConnectBehavior::Refuse,
        );

        let err = notifier.open().unwrap_err();
        match err {
            NotifyError::ChannelConnect { path, .. } => assert_eq!(path, fx.path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(notifier.is_closed());
    }

    #[test]
    fn failed_socket_create_stays_closed() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier_with(
            NotifierConfig::default(),
            WriteBehavior::Full,
            ConnectBehavior::CreateFails,
        );
        let _ = notifier.set("READY", 1);

        let err = notifier.open().unwrap_err();
        assert!(matches!(err, NotifyError::ChannelCreate(_)), "got {err:?}");
        assert!(notifier.is_closed());
        assert_eq!(fx.log.borrow().connects, 0);

        assert!(matches!(notifier.ready(), Err(NotifyError::ChannelCreate(_))));
        assert!(notifier.is_closed());
        assert!(fx.log.borrow().writes.is_empty());
    }

    #[test]
    fn rejected_variable_leaves_store_unchanged() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        let _ = notifier.set("STATUS", "a");
        assert!(!notifier.set("STAUTS", "b").is_accepted());
        assert_eq!(notifier.variables().to_vec().len(), 1);

        notifier.clear_variables();
        assert!(notifier.variables().is_empty());
    }

    #[test]
    fn endpoint_missing_from_environment() {
        let connector = FakeConnector {
            log: Rc::new(RefCell::new(Log::default())),
            behavior: WriteBehavior::Full,
            connect: ConnectBehavior::Accept,
        };
        let env = FixedEnv::new().with(NOTIFY_SOCKET_ENV, "/nonexistent/svcnotify/notify.sock");
        let err = Notifier::with_parts(NotifierConfig::default(), &env, connector).unwrap_err();
        assert!(matches!(err, NotifyError::EndpointMissing { .. }));
    }

    #[test]
    fn unset_env_removes_variable() {
        let fx = Fixture::new();
        let env = fx.env();
        let connector = FakeConnector {
            log: Rc::clone(&fx.log),
            behavior: WriteBehavior::Full,
            connect: ConnectBehavior::Accept,
        };
        let config = NotifierConfig {
            unset_env: true,
            ..NotifierConfig::default()
        };
        let notifier = Notifier::with_parts(config, &env, connector).unwrap();
        assert!(!env.contains(NOTIFY_SOCKET_ENV));
        assert_eq!(notifier.endpoint().path(), fx.path.as_path());
    }

    #[test]
    fn write_timeout_applied_on_open() {
        let fx = Fixture::new();
        let config = NotifierConfig {
            write_timeout: Some(Duration::from_millis(250)),
            ..NotifierConfig::default()
        };
        let mut notifier = fx.notifier_with(config, WriteBehavior::Full, ConnectBehavior::Accept);
        notifier.open().unwrap();
        assert_eq!(
            fx.log.borrow().write_timeout,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn notify_reports_rejected_keys_and_sends_the_rest() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        let _ = notifier.set("STATUS", "stale");

        let rejected = notifier
            .notify([("READY", Value::from(1)), ("BOGUS", Value::from("x"))])
            .unwrap();
        assert_eq!(rejected, vec!["BOGUS".to_string()]);
        assert!(notifier.is_opened());
        assert_eq!(fx.log.borrow().writes, vec![b"READY=1\n".to_vec()]);
    }

    #[test]
    fn state_helpers_send_single_entries() {
        let fx = Fixture::new();
        let mut notifier = fx.notifier(WriteBehavior::Full);
        notifier.ready().unwrap();
        notifier.status("warming caches").unwrap();
        notifier.watchdog().unwrap();
        notifier.errno(2).unwrap();
        notifier.main_pid(4242).unwrap();
        notifier
            .extend_timeout(Duration::from_millis(1500))
            .unwrap();
        notifier.reloading().unwrap();
        notifier.stopping().unwrap();

        let log = fx.log.borrow();
        let expected: Vec<Vec<u8>> = [
            "READY=1\n",
            "STATUS=warming caches\n",
            "WATCHDOG=1\n",
            "ERRNO=2\n",
            "MAINPID=4242\n",
            "EXTEND_TIMEOUT_USEC=1500000\n",
            "RELOADING=1\n",
            "STOPPING=1\n",
        ]
        .iter()
        .map(|line| line.as_bytes().to_vec())
        .collect();
        assert_eq!(log.writes, expected);
        assert_eq!(log.connects, 1);
    }

    #[test]
    fn custom_key_set_from_config() {
        const FAKE: &[&str] = &["PING"];
        let fx = Fixture::new();
        let config = NotifierConfig {
            keys: KeySet::new(FAKE),
            ..NotifierConfig::default()
        };
        let mut notifier = fx.notifier_with(config, WriteBehavior::Full, ConnectBehavior::Accept);
        assert!(notifier.set("PING", 1).is_accepted());
        assert!(!notifier.set("READY", 1).is_accepted());
    }
}
