//! Artifact Validator CLI
//!
//! Validates a benchmark results tree against a `validation.yaml` file and
//! prints the report.

use anyhow::{Context, Result};
use artifact_validator::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_FATAL: u8 = 2;
const EXIT_FAILED: u8 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "artifact-validator",
    about = "Validate benchmark output artifacts against YAML rules",
    version
)]
struct CliArgs {
    #[arg(value_name = "RESULTS_DIR", help = "Results directory laid out as {stage}/{module}/")]
    results_dir: PathBuf,

    #[arg(
        short,
        long,
        env = "ARTIFACT_VALIDATOR_CONFIG",
        value_name = "FILE",
        help = "Validation file (default: discovered in RESULTS_DIR, then the current directory)"
    )]
    config: Option<PathBuf>,

    #[arg(short, long, value_name = "NAME", help = "Benchmark name stamped on the report")]
    benchmark: Option<String>,

    #[arg(
        short = 's',
        long = "stage",
        value_name = "STAGE",
        help = "Only validate this stage (repeatable)"
    )]
    stages: Vec<String>,

    #[arg(
        short,
        long,
        env = "ARTIFACT_VALIDATOR_FORMAT",
        value_name = "FORMAT",
        default_value = "human",
        value_parser = ["human", "json"],
        ignore_case = true,
        help = "Report format"
    )]
    format: String,

    #[arg(short, long, value_name = "FILE", help = "Write the report to a file instead of stdout")]
    output: Option<PathBuf>,

    #[arg(long, help = "Validate modules in parallel")]
    parallel: bool,

    #[arg(long, help = "Also exit non-zero when a rule could not be evaluated")]
    strict: bool,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(args: &CliArgs) -> Result<ExitCode> {
    anyhow::ensure!(
        args.results_dir.is_dir(),
        "Results directory {} does not exist",
        args.results_dir.display()
    );

    let mut engine =
        ValidationEngine::new().with_options(EngineOptions::new().with_parallel(args.parallel));
    load_config(&mut engine, args)?;

    let benchmark = args.benchmark.as_deref();
    let report = if args.stages.is_empty() {
        engine.validate_all(&args.results_dir, benchmark)
    } else {
        engine.validate_stages(args.stages.as_slice(), &args.results_dir, benchmark)
    }
    .context("Validation aborted")?;

    let format: ReportFormat = args.format.parse().unwrap_or_default();
    let rendered = report.render(format).context("Failed to render report")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    let errors = report.error_modules().count();
    if errors > 0 {
        log::warn!("{} entries could not be fully evaluated", errors);
    }

    if report.has_failures() || (args.strict && errors > 0) {
        Ok(ExitCode::from(EXIT_FAILED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_config(engine: &mut ValidationEngine, args: &CliArgs) -> Result<()> {
    if let Some(path) = &args.config {
        engine
            .load_config(path)
            .with_context(|| format!("Cannot load validation config {}", path.display()))?;
        return Ok(());
    }

    let found = match engine.discover_config(&args.results_dir) {
        Ok(path) => path,
        Err(ConfigError::NotDiscovered { .. }) => {
            let cwd = std::env::current_dir().context("Cannot determine current directory")?;
            engine
                .discover_config(&cwd)
                .context("No validation config in the results directory or the current directory")?
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("Using validation config {}", found.display());
    Ok(())
}
