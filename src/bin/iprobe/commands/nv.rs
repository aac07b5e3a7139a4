use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

use implant_probe::analysis::{NvAnalysis, NvPair, PeriodicCell, analyze_nv};
use implant_probe::io::{DumpDecoder, DumpFrame, read_text};

use crate::cli::NvArgs;
use crate::config::{NvSettings, build_nv_settings, load_file_config};
use crate::display::{Context as DisplayContext, Progress, print_nv_summary};
use crate::io::create_output;
use crate::util::text::short_path;

const STAGES: &[&str] = &["Reading atoms", "Finding NV centres", "Writing pairs"];

pub fn run_nv(args: NvArgs, ctx: DisplayContext) -> Result<()> {
    let file_config = load_file_config(args.common.config.as_deref())?;
    let settings = build_nv_settings(&args, &file_config.nv)?;

    if args.common.infmt.is_some() {
        warn!("--infmt is ignored: nv reads LAMMPS dumps only");
    }

    let mut progress = Progress::new(ctx.interactive, STAGES);

    progress.next_stage();
    let text = read_text(&args.input)
        .with_context(|| format!("Failed to read input: {}", args.input.display()))?;
    let nitrogen = DumpDecoder.decode_frame(&text, &settings.nitrogen_filter());
    let carbon = DumpDecoder.decode_frame(&text, &settings.carbon_filter());
    drop(text);
    progress.record(Some(nitrogen.points.len() + carbon.points.len()));

    let cell = periodic_cell(&settings, &nitrogen, &carbon);
    progress.complete_stage(&[
        short_path(&args.input),
        format!(
            "{} nitrogen (type {}), {} carbon (type {})",
            nitrogen.points.len(),
            settings.nitrogen_type,
            carbon.points.len(),
            settings.carbon_filter()
        ),
    ]);

    progress.next_stage();
    let result = analyze_nv(
        nitrogen.points.as_slice(),
        carbon.points.as_slice(),
        cell.as_ref(),
        &settings.criteria,
    )
    .context("NV analysis failed")?;
    progress.complete_stage(&[
        format!("{} candidates", result.candidates.len()),
        format!("{} pairs", result.pairs.len()),
    ]);

    if ctx.interactive {
        print_nv_summary(&result, &settings.criteria, cell.as_ref());
    }

    progress.next_stage();
    let mut results = Vec::new();
    if let Some(path) = &settings.pairs_out {
        let mut out = create_output(path)?;
        write_pairs(&mut out, &result.pairs)
            .with_context(|| format!("Failed to write pairs: {}", path.display()))?;
        out.flush()?;
        results.push(format!("CSV → {}", output_label(path)));
    } else {
        results.push("Skipped (no --pairs-out)".to_string());
    }
    progress.complete_stage(&results);

    progress.finish();

    let mut stdout = std::io::stdout().lock();
    for line in summary_lines(&result) {
        writeln!(stdout, "{line}")?;
    }

    Ok(())
}

/// The cell of the snapshot when minimum-image distances were asked for.
fn periodic_cell(
    settings: &NvSettings,
    nitrogen: &DumpFrame,
    carbon: &DumpFrame,
) -> Option<PeriodicCell> {
    if !settings.periodic {
        return None;
    }
    let cell = carbon
        .bounds
        .or(nitrogen.bounds)
        .and_then(|b| PeriodicCell::from_bounds(&b));
    if cell.is_none() {
        warn!("no usable BOX BOUNDS in the dump; distances are not periodic");
    }
    cell
}

fn output_label(path: &Path) -> String {
    if path == Path::new("-") {
        "stdout".to_string()
    } else {
        short_path(path)
    }
}

/// `key: value` lines; the statistics only when there is at least one pair.
fn summary_lines(result: &NvAnalysis) -> Vec<String> {
    let mut lines = vec![
        format!("n_nv: {}", result.candidates.len()),
        format!("n_pairs: {}", result.pairs.len()),
    ];
    if let Some(stats) = &result.stats {
        lines.extend([
            format!("mean: {:.6}", stats.mean),
            format!("median: {:.6}", stats.median),
            format!("p10: {:.6}", stats.p10),
            format!("p25: {:.6}", stats.p25),
            format!("p75: {:.6}", stats.p75),
            format!("p90: {:.6}", stats.p90),
        ]);
    }
    lines
}

/// `i,j,dist_A` with zero-based candidate indices.
fn write_pairs<W: Write>(out: W, pairs: &[NvPair]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["i", "j", "dist_A"])?;
    for pair in pairs {
        writer.write_record([
            pair.first.to_string(),
            pair.second.to_string(),
            format!("{:.6}", pair.distance),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
