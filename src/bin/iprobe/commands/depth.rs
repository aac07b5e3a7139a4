use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

use implant_probe::analysis::{
    DepthReport, DepthReportBuilder, Error as AnalysisError, FileOutcome, FileStatus, Histogram,
    SkipReason,
};

use super::{read_points, surface_height};
use crate::cli::{DepthArgs, InputFormat};
use crate::config::{DepthSettings, build_depth_settings, load_file_config};
use crate::display::{
    Context as DisplayContext, Progress, print_depth_report, print_input_summary,
};
use crate::io::{create_output, describe_inputs, resolve_inputs};
use crate::util::text::{angstrom, short_path};

const STAGES: &[&str] = &["Measuring depths", "Aggregating", "Writing histogram"];

pub fn run_depth(args: DepthArgs, ctx: DisplayContext) -> Result<()> {
    let file_config = load_file_config(args.common.config.as_deref())?;
    let settings = build_depth_settings(&args, &file_config.depth)?;

    let inputs = resolve_inputs(&args.inputs, &settings.list_names)?;
    if inputs.is_empty() {
        eprintln!("No input files found:");
        for line in describe_inputs(&args.inputs) {
            eprintln!("  {line}");
        }
        return Ok(());
    }

    if ctx.interactive {
        print_input_summary(&inputs);
    }

    let mut progress = Progress::new(ctx.interactive, STAGES);

    progress.next_stage();
    let mut builder = DepthReport::builder(settings.report).context("Invalid depth settings")?;
    let mut stdout = std::io::stdout().lock();

    for (i, path) in inputs.iter().enumerate() {
        progress.input(&short_path(path), i, inputs.len());
        let outcome = measure_file(&mut builder, path, args.common.infmt, &settings);
        progress.record(match &outcome.status {
            FileStatus::Summary(s) => Some(s.point_count),
            FileStatus::Skipped { .. } => None,
        });
        writeln!(stdout, "{}", summary_line(outcome))?;
    }

    progress.complete_stage(&[
        format!("{} input(s)", inputs.len()),
        format!("Atom filter: {}", settings.filter),
    ]);

    progress.next_stage();
    let report = match builder.finish() {
        Ok(report) => report,
        Err(AnalysisError::NoData) => {
            progress.complete_stage(&["No depths in range".to_string()]);
            progress.finish();
            writeln!(stdout, "ALL: no depths in range")?;
            return Ok(());
        }
        Err(e) => return Err(e).context("Depth aggregation failed"),
    };
    writeln!(stdout, "{}", aggregate_line(&report))?;
    stdout.flush()?;
    drop(stdout);

    progress.complete_stage(&[
        format!("{} depths", report.depths.len()),
        format!("{} histogram bins", report.histogram.len()),
    ]);

    if ctx.interactive {
        print_depth_report(&report);
    }

    progress.next_stage();
    let mut results = Vec::new();
    if let Some(path) = &settings.histogram {
        let mut out = create_output(path)?;
        write_histogram(&mut out, &report.histogram)
            .with_context(|| format!("Failed to write histogram: {}", path.display()))?;
        out.flush()?;
        results.push(format!("TSV → {}", output_label(path)));
    } else {
        results.push("Skipped (no --histogram)".to_string());
    }
    progress.complete_stage(&results);

    progress.finish();

    Ok(())
}

/// Measures one input. A file that cannot be read, or whose surface cannot
/// be estimated, is recorded as skipped and the run goes on.
fn measure_file<'b>(
    builder: &'b mut DepthReportBuilder,
    path: &Path,
    infmt: Option<InputFormat>,
    settings: &DepthSettings,
) -> &'b FileOutcome {
    let surface_z = match surface_height(path, infmt, &settings.surface) {
        Ok(Some(z)) => z,
        Ok(None) => return builder.skip(path, SkipReason::NoSurface),
        Err(e) => {
            warn!("{e:#}");
            return builder.skip(path, SkipReason::Unreadable);
        }
    };

    match read_points(path, infmt, &settings.filter) {
        Ok(decoded) => builder.add_with_surface(path, &decoded.points, surface_z),
        Err(e) => {
            warn!("{e:#}");
            builder.skip(path, SkipReason::Unreadable)
        }
    }
}

fn summary_line(outcome: &FileOutcome) -> String {
    let path = outcome.path.display();
    match &outcome.status {
        FileStatus::Summary(s) => format!(
            "{path}: N={} mean_depth={:.3} Å mean_distance={}",
            s.depth_count,
            s.mean_depth,
            angstrom(s.mean_distance)
        ),
        FileStatus::Skipped { reason } => format!("skip: {path} ({reason})"),
    }
}

fn aggregate_line(report: &DepthReport) -> String {
    let label = match report.max_depth {
        Some(limit) => format!("ALL (<= {limit} Å)"),
        None => "ALL".to_string(),
    };
    format!(
        "{label}: N={} mean_depth={:.3} Å",
        report.depths.len(),
        report.mean_depth
    )
}

fn output_label(path: &Path) -> String {
    if path == Path::new("-") {
        "stdout".to_string()
    } else {
        short_path(path)
    }
}

/// Tab-separated `center lower upper count`, one row per bin.
fn write_histogram<W: Write>(out: W, histogram: &Histogram) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);

    writer.write_record(["center", "lower", "upper", "count"])?;
    for bin in histogram.bins() {
        writer.write_record([
            format!("{:.6}", bin.center()),
            format!("{:.6}", bin.lower),
            format!("{:.6}", bin.upper),
            bin.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
