use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use serde::Serialize;
use svcnotify::transport::ProcessEnv;
use svcnotify::watchdog::watchdog_interval;
use svcnotify::{Notifier, NotifierConfig};

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let socket = args.socket.as_deref();
    let socket_check = notify_socket_check(socket);
    let connect_check = match (socket, socket_check.status) {
        (Some(path), CheckStatus::Pass | CheckStatus::Warn) => notify_connect_check(path),
        _ => CheckResult::new(
            "notify_connect",
            CheckStatus::Skip,
            "no usable notification socket",
        ),
    };

    let checks = vec![
        platform_transport_check(),
        socket_check,
        connect_check,
        watchdog_check(),
    ];

    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.3leaps.dev/svcnotify/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("svcnotify doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<18} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn platform_transport_check() -> CheckResult {
    CheckResult::new(
        "platform_transport",
        CheckStatus::Pass,
        "Unix datagram sockets available",
    )
}

fn notify_socket_check(socket: Option<&Path>) -> CheckResult {
    const NAME: &str = "notify_socket";

    let Some(path) = socket.filter(|p| !p.as_os_str().is_empty()) else {
        return CheckResult::new(
            NAME,
            CheckStatus::Skip,
            "NOTIFY_SOCKET not set (not started by a service manager)",
        );
    };

    if path.as_os_str().to_string_lossy().starts_with('@') {
        return CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} is an abstract address; only filesystem sockets are supported", path.display()),
        );
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("{} is a socket", path.display()),
        ),
        Ok(_) => CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("{} exists but is not a socket", path.display()),
        ),
        Err(err) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{}: {err}", path.display()),
        ),
    }
}

fn notify_connect_check(path: &Path) -> CheckResult {
    const NAME: &str = "notify_connect";

    let config = NotifierConfig {
        socket_path: Some(path.to_path_buf()),
        ..NotifierConfig::default()
    };
    let result = Notifier::with_config(config).and_then(|mut notifier| {
        notifier.open()?;
        notifier.close()
    });

    match result {
        Ok(()) => CheckResult::new(NAME, CheckStatus::Pass, "connect succeeded"),
        Err(err) => CheckResult::new(NAME, CheckStatus::Fail, err.to_string()),
    }
}

fn watchdog_check() -> CheckResult {
    match watchdog_interval(&ProcessEnv) {
        Some(interval) => CheckResult::new(
            "watchdog",
            CheckStatus::Info,
            format!("WATCHDOG=1 expected every {interval:?}"),
        ),
        None => CheckResult::new("watchdog", CheckStatus::Skip, "watchdog not enabled"),
    }
}
