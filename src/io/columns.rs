//! Column-name resolution for self-describing headers.
//!
//! Each logical field has an ordered list of acceptable aliases. Lookups are
//! pure: the first alias (in priority order) present among the header names
//! wins, regardless of where it appears in the header.

/// Dump column aliases for the x axis, highest priority first.
pub const X_ALIASES: &[&str] = &["x", "xu", "xsu", "xus", "xs"];
/// Dump column aliases for the y axis, highest priority first.
pub const Y_ALIASES: &[&str] = &["y", "yu", "ysu", "yus", "ys"];
/// Dump column aliases for the z axis, highest priority first.
pub const Z_ALIASES: &[&str] = &["z", "zu", "zsu", "zus", "zs"];

/// Dump column holding the particle type.
pub const TYPE_COLUMN: &str = "type";

/// OVITO position column names.
pub const OVITO_X: &[&str] = &["position.x"];
pub const OVITO_Y: &[&str] = &["position.y"];
pub const OVITO_Z: &[&str] = &["position.z"];
/// OVITO columns that may carry a numeric particle type.
pub const OVITO_TYPE_ALIASES: &[&str] = &["particle type", "type"];

/// Point-list header aliases per axis.
pub const LIST_X_ALIASES: &[&str] = &["x", "posx", "position.x", "position_x"];
pub const LIST_Y_ALIASES: &[&str] = &["y", "posy", "position.y", "position_y"];
pub const LIST_Z_ALIASES: &[&str] = &["z", "posz", "position.z", "position_z"];

/// A resolved column: its index in the header and the alias that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub index: usize,
    pub name: &'a str,
}

/// Returns the first alias present in `names`.
///
/// `names` are expected to be lower-cased already.
pub fn resolve<'a, S: AsRef<str>>(names: &[S], aliases: &[&'a str]) -> Option<Resolved<'a>> {
    aliases.iter().find_map(|alias| {
        names
            .iter()
            .position(|n| n.as_ref() == *alias)
            .map(|index| Resolved { index, name: alias })
    })
}

/// Resolves all three axes, or nothing.
pub fn resolve_axes<'a, S: AsRef<str>>(
    names: &[S],
    aliases: [&[&'a str]; 3],
) -> Option<[Resolved<'a>; 3]> {
    Some([
        resolve(names, aliases[0])?,
        resolve(names, aliases[1])?,
        resolve(names, aliases[2])?,
    ])
}

/// Coordinate convention of a dump `ATOMS` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordMode {
    Absolute,
    Scaled,
}

impl CoordMode {
    /// Scaled only when every resolved axis name ends in `s`.
    pub fn from_axes(axes: &[Resolved<'_>; 3]) -> Self {
        if axes.iter().all(|a| a.name.ends_with('s')) {
            Self::Scaled
        } else {
            Self::Absolute
        }
    }
}
