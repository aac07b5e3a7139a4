use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub depth: DepthSection,

    #[serde(default)]
    pub pairs: PairsSection,

    #[serde(default)]
    pub nv: NvSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepthSection {
    pub surface_z: Option<SurfaceValue>,
    pub substrate_type: Option<i64>,
    pub atom_type: Option<i64>,
    pub bin_width: Option<f64>,
    pub max_depth: Option<f64>,
    #[serde(default)]
    pub no_max_depth: bool,
    pub list_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairsSection {
    pub surface_z: Option<SurfaceValue>,
    pub substrate_type: Option<i64>,
    pub atom_type: Option<i64>,
    pub min_depth_nm: Option<f64>,
    pub pair_min_nm: Option<f64>,
    pub pair_max_nm: Option<f64>,
    pub isolation_nm: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NvSection {
    pub nitrogen_type: Option<i64>,
    pub carbon_types: Option<Vec<i64>>,
    pub bond_cutoff: Option<f64>,
    pub coordination: Option<usize>,
    pub periodic: Option<bool>,
}

/// `surface_z = 125.0` or `surface_z = "auto"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SurfaceValue {
    Height(f64),
    Keyword(String),
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration file")
    }
}

/// Reads the configuration file, or returns the empty configuration when no
/// path was given.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    FileConfig::from_toml(&text)
        .with_context(|| format!("Failed to load configuration: {}", path.display()))
}
