mod cli_options;
mod model_file;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use model::{CalcError, ExposureReport};
use thiserror::Error;

use cli_options::CliOptions;
use model_file::ModelFileError;

#[derive(Debug, Error)]
enum RunError {
    #[error("no model given; pass --model <file.json>")]
    NoModel,
    #[error(transparent)]
    ModelFile(#[from] ModelFileError),
    #[error(transparent)]
    Calc(#[from] CalcError),
}

fn main() {
    env_logger::init();
    let options = match cli_options::parse_args(std::env::args().collect()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: {}", CliOptions::message());
            std::process::exit(2);
        }
    };
    if options.help {
        println!("usage: {}", CliOptions::message());
        if options.model_file.is_none() {
            return;
        }
    }
    match run(&options) {
        Ok(reports) => {
            for report in reports.iter() {
                println!("{}", report.to_table());
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(options: &CliOptions) -> Result<Vec<ExposureReport>, RunError> {
    let path = options.model_file.as_ref().ok_or(RunError::NoModel)?;
    let mut model = model_file::load(Path::new(path))?;
    model.use_multi_thread = options.use_multi_thread;
    if model.detectors().is_empty() {
        log::warn!("{} has no detectors", path);
    }

    let progress = ProgressBar::new(model.detectors().len() as u64);
    progress.set_style(ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} detectors"));
    let start_time = std::time::Instant::now();
    let mut reports = Vec::with_capacity(model.detectors().len());
    for detector in model.detectors() {
        reports.push(model.calculate_report(detector)?);
        progress.inc(1);
    }
    progress.finish_and_clear();
    log::info!(
        "{} detectors evaluated in {:.3} s",
        reports.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(reports)
}
