use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use implant_probe::io::Format;

#[derive(Parser)]
#[command(
    name = "iprobe",
    about = "Implantation depth and color-center pair analysis for LAMMPS/OVITO output",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Depth statistics and histogram over one or more inputs
    #[command(visible_alias = "d")]
    Depth(DepthArgs),

    /// Count deep, isolated implant pairs in one input
    #[command(visible_alias = "p")]
    Pairs(PairsArgs),

    /// Find NV-centre candidates in a LAMMPS dump and their spacing
    Nv(NvArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Depth(args) => &args.common,
            Command::Pairs(args) => &args.common,
            Command::Nv(args) => &args.common,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Depth(_) => "depth",
            Command::Pairs(_) => "pairs",
            Command::Nv(_) => "nv",
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Input format (inferred from the extension, then sniffed, if omitted)
    #[arg(long = "infmt", value_name = "FORMAT")]
    pub infmt: Option<InputFormat>,

    /// TOML file with [depth], [pairs] and [nv] settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging (pairs: also print the selection breakdown)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Reference plane options shared by both commands.
#[derive(Args)]
#[command(next_help_heading = "Surface")]
pub struct SurfaceOptions {
    /// Surface height in Å, or `auto` to estimate it from substrate atoms
    /// [default: 125]
    #[arg(long = "surface-z", value_name = "Å|auto", allow_hyphen_values = true)]
    pub surface_z: Option<SurfaceZ>,

    /// Substrate particle type used by `--surface-z auto` [default: 1]
    #[arg(long = "substrate-type", value_name = "TYPE")]
    pub substrate_type: Option<i64>,
}

#[derive(Args)]
pub struct DepthArgs {
    /// Input files, directories or glob patterns (current directory if omitted)
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub surface: SurfaceOptions,

    #[command(flatten)]
    pub depth: DepthOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Depth Statistics")]
pub struct DepthOptions {
    /// Keep only atoms of this type (all atoms if omitted)
    #[arg(long = "atom-type", value_name = "TYPE")]
    pub atom_type: Option<i64>,

    /// Histogram bin width in Å [default: 5]
    #[arg(long = "bin-width", value_name = "Å")]
    pub bin_width: Option<f64>,

    /// Drop depths beyond this limit in Å [default: 250]
    #[arg(long = "max-depth", value_name = "Å", conflicts_with = "no_max_depth")]
    pub max_depth: Option<f64>,

    /// Keep every depth, however deep
    #[arg(long = "no-max-depth")]
    pub no_max_depth: bool,

    /// Write the histogram as TSV (`-` for stdout)
    #[arg(long, value_name = "FILE")]
    pub histogram: Option<PathBuf>,

    /// File names looked up inside directory inputs, repeatable
    /// [default: N_list, N_list.txt, N_list.xyz]
    #[arg(long = "list-name", value_name = "NAME", action = clap::ArgAction::Append)]
    pub list_names: Vec<String>,
}

#[derive(Args)]
pub struct PairsArgs {
    /// Input file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub surface: SurfaceOptions,

    #[command(flatten)]
    pub criteria: PairOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Pair Selection (nm)")]
pub struct PairOptions {
    /// Implant particle type [default: 3]
    #[arg(long = "atom-type", value_name = "TYPE")]
    pub atom_type: Option<i64>,

    /// Minimum depth below the surface [default: 5]
    #[arg(long = "min-depth-nm", value_name = "NM")]
    pub min_depth_nm: Option<f64>,

    /// Lower bound of the pair separation [default: 5]
    #[arg(long = "pair-min-nm", value_name = "NM")]
    pub pair_min_nm: Option<f64>,

    /// Upper bound of the pair separation [default: 15]
    #[arg(long = "pair-max-nm", value_name = "NM")]
    pub pair_max_nm: Option<f64>,

    /// Minimum distance from a pair member to any other implant [default: 15]
    #[arg(long = "isolation-nm", value_name = "NM")]
    pub isolation_nm: Option<f64>,
}

#[derive(Args)]
pub struct NvArgs {
    /// LAMMPS dump; the last snapshot is analysed
    #[arg(value_name = "DUMP")]
    pub input: PathBuf,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub nv: NvOptions,
}

#[derive(Args)]
#[command(next_help_heading = "NV Centres")]
pub struct NvOptions {
    /// Nitrogen particle type [default: 2]
    #[arg(long = "nitrogen-type", value_name = "TYPE")]
    pub nitrogen_type: Option<i64>,

    /// Carbon particle type, repeatable [default: 1]
    #[arg(long = "carbon-type", value_name = "TYPE", action = clap::ArgAction::Append)]
    pub carbon_types: Vec<i64>,

    /// Carbon neighbour cutoff in Å [default: 1.8]
    #[arg(long = "bond-cutoff", value_name = "Å")]
    pub bond_cutoff: Option<f64>,

    /// Carbon neighbours an NV nitrogen has [default: 3]
    #[arg(long, value_name = "N")]
    pub coordination: Option<usize>,

    /// Plain distances, ignoring the periodic cell
    #[arg(long = "no-pbc")]
    pub no_pbc: bool,

    /// Write every candidate pair as CSV (`-` for stdout)
    #[arg(long = "pairs-out", value_name = "FILE")]
    pub pairs_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// LAMMPS dump (ITEM: blocks)
    #[value(alias = "lammpstrj")]
    Dump,
    /// LAMMPS data file (Atoms section)
    #[value(alias = "lmp")]
    Data,
    /// OVITO table export
    #[value(alias = "table")]
    Ovito,
    /// XYZ or CSV point list
    #[value(aliases = ["xyz", "csv"])]
    Points,
}

impl From<InputFormat> for Format {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::Dump => Format::LammpsDump,
            InputFormat::Data => Format::LammpsData,
            InputFormat::Ovito => Format::OvitoTable,
            InputFormat::Points => Format::PointList,
        }
    }
}

/// Where the reference plane sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceZ {
    Fixed(f64),
    Auto,
}

impl FromStr for SurfaceZ {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let z = s
            .parse::<f64>()
            .map_err(|_| format!("invalid surface height: '{}' (use a number or auto)", s))?;
        if !z.is_finite() {
            return Err("surface height must be finite".into());
        }
        Ok(Self::Fixed(z))
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
