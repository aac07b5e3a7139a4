use std::path::PathBuf;

use anyhow::{Context, Result};

use implant_probe::TypeFilter;
use implant_probe::analysis::NvCriteria;

use super::file::NvSection;
use crate::cli::NvArgs;

const DEFAULT_NITROGEN_TYPE: i64 = 2;
const DEFAULT_CARBON_TYPE: i64 = 1;

#[derive(Debug, Clone)]
pub struct NvSettings {
    pub criteria: NvCriteria,
    pub nitrogen_type: i64,
    pub carbon_types: Vec<i64>,
    /// Minimum-image distances when the dump carries box bounds.
    pub periodic: bool,
    pub pairs_out: Option<PathBuf>,
}

impl NvSettings {
    pub fn nitrogen_filter(&self) -> TypeFilter {
        TypeFilter::only(self.nitrogen_type)
    }

    pub fn carbon_filter(&self) -> TypeFilter {
        TypeFilter::any_of(self.carbon_types.iter().copied())
    }
}

pub fn build_nv_settings(args: &NvArgs, file: &NvSection) -> Result<NvSettings> {
    let opts = &args.nv;
    let defaults = NvCriteria::default();

    let criteria = NvCriteria {
        bond_cutoff: opts
            .bond_cutoff
            .or(file.bond_cutoff)
            .unwrap_or(defaults.bond_cutoff),
        coordination: opts
            .coordination
            .or(file.coordination)
            .unwrap_or(defaults.coordination),
    };
    criteria.validate().context("Invalid NV settings")?;

    let carbon_types = if !opts.carbon_types.is_empty() {
        opts.carbon_types.clone()
    } else {
        file.carbon_types
            .clone()
            .filter(|types| !types.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_CARBON_TYPE])
    };

    Ok(NvSettings {
        criteria,
        nitrogen_type: opts
            .nitrogen_type
            .or(file.nitrogen_type)
            .unwrap_or(DEFAULT_NITROGEN_TYPE),
        carbon_types,
        periodic: !opts.no_pbc && file.periodic.unwrap_or(true),
        pairs_out: opts.pairs_out.clone(),
    })
}
