use anyhow::{Context, Result, anyhow};

use implant_probe::analysis::{Classification, classify};

use super::{read_points, surface_height};
use crate::cli::PairsArgs;
use crate::config::{build_pair_settings, load_file_config};
use crate::display::{Context as DisplayContext, Progress, print_classification};
use crate::util::text::short_path;

const STAGES: &[&str] = &["Reading implants", "Classifying pairs"];

pub fn run_pairs(args: PairsArgs, ctx: DisplayContext) -> Result<()> {
    let file_config = load_file_config(args.common.config.as_deref())?;
    let settings = build_pair_settings(&args, &file_config.pairs)?;

    let mut progress = Progress::new(ctx.interactive, STAGES);

    progress.next_stage();
    let surface_z = surface_height(&args.input, args.common.infmt, &settings.surface)?
        .ok_or_else(|| {
            anyhow!(
                "Cannot estimate the surface of {}: no substrate atoms of type {}",
                args.input.display(),
                settings.surface.substrate_type
            )
        })?;
    let decoded = read_points(&args.input, args.common.infmt, &settings.filter())?;
    progress.record(Some(decoded.points.len()));

    let format_label = decoded
        .format
        .map(|f| f.to_string())
        .unwrap_or_else(|| "unrecognized".to_string());
    progress.complete_stage(&[
        format!("{} ({})", short_path(&args.input), format_label),
        format!(
            "{} points of type {}",
            decoded.points.len(),
            settings.implant_type
        ),
        format!("Surface at z = {surface_z:.3} Å"),
    ]);

    progress.next_stage();
    let result = classify(decoded.points.as_slice(), surface_z, &settings.criteria)
        .context("Pair classification failed")?;
    progress.complete_stage(&[
        format!("{} deep, {} in window", result.deep, result.candidate_pairs),
        format!("{} isolated pairs", result.pairs.len()),
    ]);

    if ctx.interactive {
        print_classification(&result, &settings.criteria);
    }

    progress.finish();

    println!("{}", result.qualifying_count());
    if args.common.verbose {
        println!("{}", breakdown(&result));
    }

    Ok(())
}

fn breakdown(result: &Classification) -> String {
    format!(
        "total={} deep={} candidate_pairs={} qualifying={}",
        result.total,
        result.deep,
        result.candidate_pairs,
        result.qualifying_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use implant_probe::Point;
    use implant_probe::analysis::PairCriteria;

    #[test]
    fn breakdown_counts() {
        let points = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(80.0, 0.0, 0.0),
            Point::new(0.0, 0.0, 200.0),
        ];
        let result = classify(&points, 100.0, &PairCriteria::default()).unwrap();
        assert_eq!(
            breakdown(&result),
            "total=3 deep=2 candidate_pairs=1 qualifying=2"
        );
    }
}
