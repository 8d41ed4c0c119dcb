use std::io::{IsTerminal, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use svcnotify::wire::Variables;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SentOutput<'a> {
    schema_id: &'a str,
    endpoint: String,
    payload_size: usize,
    variables: &'a Variables,
    timestamp: String,
}

/// Report a notification that was sent.
pub fn print_sent(endpoint: &Path, vars: &Variables, format: OutputFormat) {
    let payload = vars.encode();
    match format {
        OutputFormat::Json => {
            let out = SentOutput {
                schema_id: "https://schemas.3leaps.dev/svcnotify/cli/v1/notification-sent.schema.json",
                endpoint: endpoint.display().to_string(),
                payload_size: payload.len(),
                variables: vars,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KEY", "VALUE"]);
            for (key, value) in vars.iter() {
                table.add_row(vec![key, value]);
            }
            println!("{table}");
            println!("sent {} bytes to {}", payload.len(), endpoint.display());
        }
        OutputFormat::Pretty => {
            let pairs: Vec<String> = vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!(
                "endpoint={} size={} vars={}",
                endpoint.display(),
                payload.len(),
                pairs.join(" ")
            );
        }
        OutputFormat::Raw => {
            print_raw(&payload);
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
