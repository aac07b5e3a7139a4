use anyhow::{Result, anyhow};

use implant_probe::TypeFilter;

use super::file::SurfaceValue;
use crate::cli::{SurfaceOptions, SurfaceZ};

const DEFAULT_SURFACE_Z: f64 = 125.0;
const DEFAULT_SUBSTRATE_TYPE: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    pub surface: SurfaceZ,
    pub substrate_type: i64,
}

impl SurfaceSettings {
    pub fn substrate_filter(&self) -> TypeFilter {
        TypeFilter::only(self.substrate_type)
    }

    /// Height used when the surface is fixed.
    pub fn fixed_height(&self) -> Option<f64> {
        match self.surface {
            SurfaceZ::Fixed(z) => Some(z),
            SurfaceZ::Auto => None,
        }
    }
}

pub fn build_surface_settings(
    opts: &SurfaceOptions,
    file_surface: Option<&SurfaceValue>,
    file_substrate: Option<i64>,
) -> Result<SurfaceSettings> {
    let surface = match (opts.surface_z, file_surface) {
        (Some(surface), _) => surface,
        (None, Some(value)) => surface_from_file(value)?,
        (None, None) => SurfaceZ::Fixed(DEFAULT_SURFACE_Z),
    };

    Ok(SurfaceSettings {
        surface,
        substrate_type: opts
            .substrate_type
            .or(file_substrate)
            .unwrap_or(DEFAULT_SUBSTRATE_TYPE),
    })
}

fn surface_from_file(value: &SurfaceValue) -> Result<SurfaceZ> {
    match value {
        SurfaceValue::Height(z) if z.is_finite() => Ok(SurfaceZ::Fixed(*z)),
        SurfaceValue::Height(z) => Err(anyhow!(
            "Invalid surface_z in configuration file: {z} is not finite"
        )),
        SurfaceValue::Keyword(word) => word
            .parse()
            .map_err(|e| anyhow!("Invalid surface_z in configuration file: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(surface_z: Option<SurfaceZ>, substrate_type: Option<i64>) -> SurfaceOptions {
        SurfaceOptions {
            surface_z,
            substrate_type,
        }
    }

    #[test]
    fn defaults() {
        let s = build_surface_settings(&opts(None, None), None, None).unwrap();
        assert_eq!(s.surface, SurfaceZ::Fixed(125.0));
        assert_eq!(s.substrate_type, 1);
        assert_eq!(s.fixed_height(), Some(125.0));
    }

    #[test]
    fn flag_beats_file() {
        let file = SurfaceValue::Keyword("auto".into());
        let s = build_surface_settings(&opts(Some(SurfaceZ::Fixed(90.0)), Some(4)), Some(&file), Some(2))
            .unwrap();
        assert_eq!(s.surface, SurfaceZ::Fixed(90.0));
        assert_eq!(s.substrate_type, 4);
    }

    #[test]
    fn file_beats_default() {
        let file = SurfaceValue::Keyword("auto".into());
        let s = build_surface_settings(&opts(None, None), Some(&file), Some(2)).unwrap();
        assert_eq!(s.surface, SurfaceZ::Auto);
        assert_eq!(s.fixed_height(), None);
        assert_eq!(s.substrate_filter(), TypeFilter::only(2));

        let file = SurfaceValue::Height(100.5);
        let s = build_surface_settings(&opts(None, None), Some(&file), None).unwrap();
        assert_eq!(s.surface, SurfaceZ::Fixed(100.5));
    }

    #[test]
    fn bad_file_keyword() {
        let file = SurfaceValue::Keyword("top".into());
        assert!(build_surface_settings(&opts(None, None), Some(&file), None).is_err());
    }
}
