use std::process::ExitCode;

use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use crate::app::{App, LogSink, ProgressSink, RunOptions};
use crate::config::{DownloadArgs, DownloadRequest, HttpSettings};
use crate::domain::Source;
use crate::error::GenomeError;
use crate::fetch::HttpFetcher;
use crate::output::{self, JsonOutput, OutputMode};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(source: Source, args: DownloadArgs, json: bool) -> miette::Result<()> {
    let options = RunOptions {
        dry_run: args.dry_run,
    };
    let request = DownloadRequest::from(args);
    let mode = if json { OutputMode::Json } else { OutputMode::Text };

    let fetcher = HttpFetcher::new(HttpSettings::from_env())?;
    let app = App::new(fetcher);
    let sink: &dyn ProgressSink = match mode {
        OutputMode::Json => &JsonOutput,
        OutputMode::Text => &LogSink,
    };
    let result = app.run(source, &request, options, sink)?;
    output::print_result(&result, mode).into_diagnostic()?;
    Ok(())
}

pub fn finish(result: miette::Result<()>) -> ExitCode {
    if let Err(report) = result {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<GenomeError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

pub fn map_exit_code(error: &GenomeError) -> u8 {
    match error {
        err if err.is_user_error() => 2,
        GenomeError::Http(_) | GenomeError::HttpStatus { .. } | GenomeError::ReleaseLookup(_) => 3,
        _ => 1,
    }
}
