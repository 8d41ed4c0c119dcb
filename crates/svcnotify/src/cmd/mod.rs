use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod doctor;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one notification to the service manager.
    Send(SendArgs),
    /// Check the notification environment.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Variable assignments, sent after the flag-derived ones.
    #[arg(value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
    /// Send READY=1.
    #[arg(long)]
    pub ready: bool,
    /// Send RELOADING=1.
    #[arg(long)]
    pub reloading: bool,
    /// Send STOPPING=1.
    #[arg(long)]
    pub stopping: bool,
    /// Send STATUS=<TEXT>.
    #[arg(long, value_name = "TEXT")]
    pub status: Option<String>,
    /// Send MAINPID=<PID>.
    #[arg(long)]
    pub pid: Option<u32>,
    /// Notification socket path.
    #[arg(long, env = "NOTIFY_SOCKET", value_name = "PATH")]
    pub socket: Option<PathBuf>,
    /// Maximum time the send may block (e.g. 5s, 500ms). Default: unbounded.
    #[arg(long, value_name = "DURATION")]
    pub write_timeout: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {
    /// Notification socket path to check.
    #[arg(long, env = "NOTIFY_SOCKET", value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
