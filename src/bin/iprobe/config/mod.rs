//! Settings assembled from command-line flags, an optional TOML file and
//! built-in defaults, in that order of precedence.

mod depth;
mod file;
mod nv;
mod pairs;
mod surface;

pub use depth::{DepthSettings, build_depth_settings};
pub use file::{FileConfig, load_file_config};
pub use nv::{NvSettings, build_nv_settings};
pub use pairs::{PairSettings, build_pair_settings};
pub use surface::{SurfaceSettings, build_surface_settings};
