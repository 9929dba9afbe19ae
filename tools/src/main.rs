//! return-rate: cohort retention matrix from an activity log.
//!
//! Input lines: `YYYYMMDD<TAB>user_id<TAB>flag` (flag may be empty).
//!
//! Usage:
//!   return-rate < access.tsv
//!   return-rate --input access.tsv --format json
//!   return-rate --config retention.json --calendar-dates --ignore-extra-fields

use anyhow::{Context, Result};
use retention_core::{
    config::{ExtraFieldPolicy, RetentionConfig},
    format::{render_json, MatrixFormatter},
    pipeline::RetentionPipeline,
};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Tsv,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let input = find_arg(&args, "--input")?;
    let format = match find_arg(&args, "--format")?.unwrap_or("tsv") {
        "tsv" => OutputFormat::Tsv,
        "json" => OutputFormat::Json,
        other => anyhow::bail!("unknown --format '{other}' (expected tsv or json)"),
    };

    let mut config = match find_arg(&args, "--config")? {
        Some(path) => RetentionConfig::load(path)?,
        None => RetentionConfig::default(),
    };
    if args.iter().any(|a| a == "--calendar-dates") {
        config.calendar_dates = true;
    }
    if args.iter().any(|a| a == "--ignore-extra-fields") {
        config.extra_fields = ExtraFieldPolicy::Ignore;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
            emit_matrix(BufReader::new(file), path, config, format, &mut out)
        }
        None => emit_matrix(io::stdin().lock(), "standard input", config, format, &mut out),
    }
}

/// Ingest, compute and write the matrix.
///
/// If the stream fails part way, the table for the lines read so far is
/// still written before the read error is returned.
fn emit_matrix<R: BufRead, W: Write>(
    reader: R,
    source: &str,
    config: RetentionConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let mut pipeline = RetentionPipeline::new(config);
    let ingest = pipeline.ingest_reader(reader);

    let matrix = pipeline.compute();
    match format {
        OutputFormat::Tsv => {
            for line in MatrixFormatter::new(pipeline.config()).lines(&matrix) {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", render_json(&matrix)?)?;
        }
    }
    out.flush()?;

    let report = ingest.with_context(|| format!("reading {source}"))?;
    if report.rejected > 0 {
        log::warn!("{} of {} lines dropped as malformed", report.rejected, report.lines_read);
    }
    Ok(())
}

/// Value following `flag`, if the flag is present.
fn find_arg<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    match args.get(i + 1) {
        Some(value) if !value.starts_with("--") => Ok(Some(value.as_str())),
        _ => anyhow::bail!("{flag} requires a value"),
    }
}
