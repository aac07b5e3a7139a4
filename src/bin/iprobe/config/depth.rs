use std::path::PathBuf;

use anyhow::{Context, Result};

use implant_probe::TypeFilter;
use implant_probe::analysis::DepthConfig;

use super::file::DepthSection;
use super::surface::{SurfaceSettings, build_surface_settings};
use crate::cli::DepthArgs;

/// File names tried inside a directory input, in order.
pub const DEFAULT_LIST_NAMES: [&str; 3] = ["N_list", "N_list.txt", "N_list.xyz"];

#[derive(Debug, Clone)]
pub struct DepthSettings {
    pub report: DepthConfig,
    pub surface: SurfaceSettings,
    pub filter: TypeFilter,
    pub histogram: Option<PathBuf>,
    pub list_names: Vec<String>,
}

pub fn build_depth_settings(args: &DepthArgs, file: &DepthSection) -> Result<DepthSettings> {
    let opts = &args.depth;
    let defaults = DepthConfig::default();

    let surface = build_surface_settings(&args.surface, file.surface_z.as_ref(), file.substrate_type)?;

    let max_depth = if opts.no_max_depth {
        None
    } else if let Some(limit) = opts.max_depth {
        Some(limit)
    } else if file.no_max_depth {
        None
    } else {
        file.max_depth.or(defaults.max_depth)
    };

    let report = DepthConfig {
        surface_z: surface.fixed_height().unwrap_or(defaults.surface_z),
        bin_width: opts.bin_width.or(file.bin_width).unwrap_or(defaults.bin_width),
        max_depth,
    };
    report.validate().context("Invalid depth settings")?;

    let list_names = if !opts.list_names.is_empty() {
        opts.list_names.clone()
    } else if let Some(names) = &file.list_names {
        names.clone()
    } else {
        DEFAULT_LIST_NAMES.iter().map(|s| s.to_string()).collect()
    };

    Ok(DepthSettings {
        report,
        surface,
        filter: opts.atom_type.or(file.atom_type).into(),
        histogram: opts.histogram.clone(),
        list_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn depth_args(argv: &[&str]) -> DepthArgs {
        let mut full = vec!["iprobe", "depth"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Depth(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let settings = build_depth_settings(&depth_args(&[]), &DepthSection::default()).unwrap();
        assert_eq!(settings.report, DepthConfig::default());
        assert_eq!(settings.filter, TypeFilter::Any);
        assert_eq!(settings.list_names, vec!["N_list", "N_list.txt", "N_list.xyz"]);
        assert!(settings.histogram.is_none());
    }

    #[test]
    fn precedence_flag_file_default() {
        let file = DepthSection {
            bin_width: Some(2.0),
            atom_type: Some(3),
            max_depth: Some(100.0),
            ..DepthSection::default()
        };
        let settings =
            build_depth_settings(&depth_args(&["--bin-width", "1.0"]), &file).unwrap();
        assert_eq!(settings.report.bin_width, 1.0);
        assert_eq!(settings.report.max_depth, Some(100.0));
        assert_eq!(settings.filter, TypeFilter::only(3));
    }

    #[test]
    fn no_max_depth_from_either_source() {
        let settings =
            build_depth_settings(&depth_args(&["--no-max-depth"]), &DepthSection::default())
                .unwrap();
        assert_eq!(settings.report.max_depth, None);

        let file = DepthSection {
            no_max_depth: true,
            ..DepthSection::default()
        };
        let settings = build_depth_settings(&depth_args(&[]), &file).unwrap();
        assert_eq!(settings.report.max_depth, None);

        let settings = build_depth_settings(&depth_args(&["--max-depth", "80"]), &file).unwrap();
        assert_eq!(settings.report.max_depth, Some(80.0));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(
            build_depth_settings(&depth_args(&["--bin-width", "0"]), &DepthSection::default())
                .is_err()
        );
        assert!(
            build_depth_settings(&depth_args(&["--max-depth=-5"]), &DepthSection::default())
                .is_err()
        );
    }
}
