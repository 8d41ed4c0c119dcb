mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "svcnotify", version, about = "Notify the service manager of state changes")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "SVCNOTIFY_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "svcnotify",
            "send",
            "--ready",
            "--status",
            "serving",
            "--socket",
            "/run/notify",
            "X_PHASE=warm",
        ])
        .expect("send args should parse");

        match cli.command {
            Command::Send(args) => {
                assert!(args.ready);
                assert_eq!(args.status.as_deref(), Some("serving"));
                assert_eq!(args.assignments, vec!["X_PHASE=warm".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = Cli::try_parse_from(["svcnotify", "--log-level", "loud", "version"])
            .expect_err("bad level should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_doctor_subcommand() {
        let cli = Cli::try_parse_from(["svcnotify", "doctor", "--socket", "/run/notify"])
            .expect("doctor args should parse");
        assert!(matches!(cli.command, Command::Doctor(_)));
    }
}
