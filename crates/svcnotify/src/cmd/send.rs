use std::time::Duration;

use svcnotify::wire::keys::{MAINPID, READY, RELOADING, STATUS, STOPPING};
use svcnotify::wire::Value;
use svcnotify::{Notifier, NotifierConfig};
use tracing::debug;

use crate::cmd::SendArgs;
use crate::exit::{notify_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_sent, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let entries = collect_entries(&args)?;
    if entries.is_empty() {
        return Err(CliError::new(USAGE, "nothing to send"));
    }

    let write_timeout = args
        .write_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    let config = NotifierConfig {
        socket_path: args.socket.clone(),
        write_timeout,
        ..NotifierConfig::default()
    };
    let mut notifier =
        Notifier::with_config(config).map_err(|err| notify_error("resolve failed", err))?;

    let mut rejected = Vec::new();
    for (key, value) in &entries {
        let outcome = notifier.set_variable(key, Some(Value::from(value.as_str())));
        if !outcome.is_accepted() {
            rejected.push(key.as_str());
        }
    }
    if !rejected.is_empty() {
        return Err(CliError::new(
            DATA_INVALID,
            format!("unknown variable(s): {}", rejected.join(", ")),
        ));
    }

    notifier
        .open()
        .map_err(|err| notify_error("open failed", err))?;
    notifier
        .send()
        .map_err(|err| notify_error("send failed", err))?;
    notifier
        .close()
        .map_err(|err| notify_error("close failed", err))?;
    debug!(vars = notifier.variables().len(), "notification delivered");

    print_sent(notifier.endpoint().path(), notifier.variables(), format);
    Ok(SUCCESS)
}

fn collect_entries(args: &SendArgs) -> CliResult<Vec<(String, String)>> {
    let mut entries = Vec::new();
    if args.ready {
        entries.push((READY.to_string(), "1".to_string()));
    }
    if args.reloading {
        entries.push((RELOADING.to_string(), "1".to_string()));
    }
    if args.stopping {
        entries.push((STOPPING.to_string(), "1".to_string()));
    }
    if let Some(status) = &args.status {
        entries.push((STATUS.to_string(), status.clone()));
    }
    if let Some(pid) = args.pid {
        entries.push((MAINPID.to_string(), pid.to_string()));
    }

    for assignment in &args.assignments {
        match assignment.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                entries.push((key.to_string(), value.to_string()));
            }
            _ => {
                return Err(CliError::new(
                    USAGE,
                    format!("expected KEY=VALUE, got '{assignment}'"),
                ))
            }
        }
    }

    Ok(entries)
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
