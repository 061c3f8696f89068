use std::io::{self, Write};

use serde::Serialize;

use crate::app::{DownloadResult, ProgressEvent, ProgressSink};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn print_result(result: &DownloadResult, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => JsonOutput::print_result(result),
        OutputMode::Text => {
            let mut stdout = io::stdout();
            if result.dry_run {
                for file in &result.files {
                    writeln!(stdout, "{} -> {}", file.url, file.path)?;
                }
                return Ok(());
            }
            writeln!(stdout, "{}", success_message(result))
        }
    }
}

pub fn success_message(result: &DownloadResult) -> String {
    format!("Genome downloaded successfully to '{}'.", result.output_dir)
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_result(result: &DownloadResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}
