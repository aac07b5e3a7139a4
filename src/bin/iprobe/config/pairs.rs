use anyhow::{Context, Result};

use implant_probe::TypeFilter;
use implant_probe::analysis::PairCriteria;

use super::file::PairsSection;
use super::surface::{SurfaceSettings, build_surface_settings};
use crate::cli::PairsArgs;

const DEFAULT_IMPLANT_TYPE: i64 = 3;
const DEFAULT_MIN_DEPTH_NM: f64 = 5.0;
const DEFAULT_PAIR_MIN_NM: f64 = 5.0;
const DEFAULT_PAIR_MAX_NM: f64 = 15.0;
const DEFAULT_ISOLATION_NM: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct PairSettings {
    pub criteria: PairCriteria,
    pub surface: SurfaceSettings,
    pub implant_type: i64,
}

impl PairSettings {
    pub fn filter(&self) -> TypeFilter {
        TypeFilter::only(self.implant_type)
    }
}

pub fn build_pair_settings(args: &PairsArgs, file: &PairsSection) -> Result<PairSettings> {
    let opts = &args.criteria;

    let surface = build_surface_settings(&args.surface, file.surface_z.as_ref(), file.substrate_type)?;

    let criteria = PairCriteria::from_nm(
        opts.min_depth_nm
            .or(file.min_depth_nm)
            .unwrap_or(DEFAULT_MIN_DEPTH_NM),
        opts.pair_min_nm
            .or(file.pair_min_nm)
            .unwrap_or(DEFAULT_PAIR_MIN_NM),
        opts.pair_max_nm
            .or(file.pair_max_nm)
            .unwrap_or(DEFAULT_PAIR_MAX_NM),
        opts.isolation_nm
            .or(file.isolation_nm)
            .unwrap_or(DEFAULT_ISOLATION_NM),
    );
    criteria.validate().context("Invalid pair selection settings")?;

    Ok(PairSettings {
        criteria,
        surface,
        implant_type: opts
            .atom_type
            .or(file.atom_type)
            .unwrap_or(DEFAULT_IMPLANT_TYPE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn pairs_args(argv: &[&str]) -> PairsArgs {
        let mut full = vec!["iprobe", "pairs", "in.dump"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Pairs(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn defaults_match_library() {
        let settings = build_pair_settings(&pairs_args(&[]), &PairsSection::default()).unwrap();
        assert_eq!(settings.criteria, PairCriteria::default());
        assert_eq!(settings.filter(), TypeFilter::only(3));
    }

    #[test]
    fn nanometres_become_angstrom() {
        let file = PairsSection {
            isolation_nm: Some(2.0),
            atom_type: Some(5),
            ..PairsSection::default()
        };
        let settings =
            build_pair_settings(&pairs_args(&["--pair-max-nm", "20", "--atom-type", "7"]), &file)
                .unwrap();
        assert_eq!(settings.criteria.pair_max, 200.0);
        assert_eq!(settings.criteria.isolation, 20.0);
        assert_eq!(settings.implant_type, 7);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let args = pairs_args(&["--pair-min-nm", "20", "--pair-max-nm", "10"]);
        assert!(build_pair_settings(&args, &PairsSection::default()).is_err());
    }
}
