mod depth;
mod nv;
mod pairs;

use depth::run_depth;
use nv::run_nv;
use pairs::run_pairs;

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use implant_probe::TypeFilter;
use implant_probe::analysis::estimate_surface;
use implant_probe::io::{Decoded, Format, read_file};

use crate::cli::{Command, InputFormat};
use crate::config::SurfaceSettings;
use crate::display::Context as DisplayContext;
use crate::io::infer_input_format;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Depth(args) => run_depth(args, ctx),
        Command::Pairs(args) => run_pairs(args, ctx),
        Command::Nv(args) => run_nv(args, ctx),
    }
}

/// Decodes `path` with `--infmt` when given. Otherwise the extension picks
/// the decoder and content sniffing takes over when that finds nothing.
fn read_points(path: &Path, infmt: Option<InputFormat>, filter: &TypeFilter) -> Result<Decoded> {
    let read = |format: Option<Format>| {
        read_file(path, format, filter)
            .with_context(|| format!("Failed to read input: {}", path.display()))
    };

    if let Some(format) = infmt {
        return read(Some(format.into()));
    }

    match infer_input_format(path) {
        Some(format) => {
            let decoded = read(Some(format))?;
            if !decoded.points.is_empty() {
                return Ok(decoded);
            }
            debug!(
                "{}: nothing decoded as {format}, sniffing content",
                path.display()
            );
            read(None)
        }
        None => read(None),
    }
}

/// Height of the reference plane for `path`: the fixed value, or an
/// estimate from the substrate atoms in the same file. `Ok(None)` when the
/// file holds no substrate atom to estimate from.
fn surface_height(
    path: &Path,
    infmt: Option<InputFormat>,
    surface: &SurfaceSettings,
) -> Result<Option<f64>> {
    if let Some(z) = surface.fixed_height() {
        return Ok(Some(z));
    }

    let substrate = read_points(path, infmt, &surface.substrate_filter())?;
    let zs: Vec<f64> = substrate.points.iter().map(|p| p.z).collect();
    let Some(z) = estimate_surface(&zs) else {
        debug!(
            "{}: no substrate atoms of type {}",
            path.display(),
            surface.substrate_type
        );
        return Ok(None);
    };

    debug!(
        "{}: surface at z = {z:.3} from {} substrate atoms",
        path.display(),
        zs.len()
    );
    Ok(Some(z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SurfaceZ;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    const DUMP: &str = "\
ITEM: TIMESTEP
0
ITEM: ATOMS id type x y z
1 1 0.0 0.0 100.0
2 1 1.0 0.0 100.0
3 1 2.0 0.0 98.0
4 3 0.0 0.0 60.0
";

    #[test]
    fn auto_surface_uses_substrate_atoms() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("N_list");
        fs::write(&path, DUMP).unwrap();

        let auto = SurfaceSettings {
            surface: SurfaceZ::Auto,
            substrate_type: 1,
        };
        assert_relative_eq!(surface_height(&path, None, &auto).unwrap().unwrap(), 100.0);

        let fixed = SurfaceSettings {
            surface: SurfaceZ::Fixed(80.0),
            substrate_type: 1,
        };
        assert_eq!(surface_height(&path, None, &fixed).unwrap(), Some(80.0));

        let missing = SurfaceSettings {
            surface: SurfaceZ::Auto,
            substrate_type: 7,
        };
        assert_eq!(surface_height(&path, None, &missing).unwrap(), None);

        let gone = dir.path().join("gone.dump");
        assert!(surface_height(&gone, None, &auto).is_err());
    }

    #[test]
    fn misleading_extension_falls_back_to_sniffing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("implants.data");
        fs::write(&path, DUMP).unwrap();

        let decoded = read_points(&path, None, &TypeFilter::only(3)).unwrap();
        assert_eq!(decoded.format, Some(Format::LammpsDump));
        assert_eq!(decoded.points.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_points(&dir.path().join("gone.dump"), None, &TypeFilter::Any).unwrap_err();
        assert!(err.to_string().contains("Failed to read input"));
    }
}
