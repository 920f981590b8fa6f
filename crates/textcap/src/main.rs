use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use textcap::backend::{
    create_engine, create_grabber, describe_monitors, display_available_backends,
};
use textcap::cli::{CliArgs, CliSources, parse_cli};
use textcap::output::{OutputError, Report, write_report};
use textcap::settings::{ConfigError, resolve_settings};
use textcap::{CaptureRequest, Pipeline, PipelineError, logging};
use textcap_capture::CaptureError;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to write output: {0}")]
    Output(#[from] OutputError),
}

fn main() -> ExitCode {
    let (cli, sources) = parse_cli();
    logging::init(cli.verbose);

    match run(cli, sources) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CliArgs, sources: CliSources) -> Result<(), AppError> {
    let settings = resolve_settings(&cli, &sources)?;

    if cli.list_monitors {
        let grabber = create_grabber(&settings.capture)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in describe_monitors(&grabber)? {
            writeln!(out, "{line}").map_err(OutputError::from)?;
        }
        writeln!(out, "{}", display_available_backends()).map_err(OutputError::from)?;
        return Ok(());
    }

    let grabber = create_grabber(&settings.capture)?;
    let engine = create_engine(&settings.ocr);
    let pipeline = Pipeline::from_settings(&settings, grabber, engine);
    log::debug!("pipeline: {}", pipeline.stage_names().join(" -> "));

    let request = CaptureRequest {
        mode: settings.output.mode,
        monitor: cli.monitor,
        region: cli.region,
        images: cli.images,
    };
    let session = request.into_session()?;

    let spinner = spinner();
    let result = pipeline.run(session);
    spinner.finish_and_clear();
    let session = result?;

    let report = Report::from_session(&session).ok_or(PipelineError::MissingInput {
        stage: "magic",
        field: "final_text",
    })?;
    log::info!(
        "mean confidence {:.1}, magic {}",
        report.mean_conf,
        report
            .magic
            .map(|magic| magic.as_str())
            .unwrap_or(settings.output.mode.as_str())
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if settings.output.json {
        write_report(&mut out, &report, !settings.output.compact)?;
    } else {
        writeln!(out, "{}", report.text).map_err(OutputError::from)?;
    }
    Ok(())
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} [{elapsed_precise}] {msg}")
    {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message("recognizing text");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
