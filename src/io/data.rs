//! LAMMPS data-file (`Atoms` section) decoder.
//!
//! Data files carry a single configuration. The column layout of the `Atoms`
//! section depends on the `atom_style`, which LAMMPS writes as a comment on
//! the section header (`Atoms # full`). Rows may end in three integer image
//! flags; when the header declared the cell z extent the z image is folded
//! back into the z coordinate.

use log::debug;

use super::Decoder;
use crate::model::filter::TypeFilter;
use crate::model::point::{Point, PointSet, parse_coordinate};

/// Minimum number of tokens for a row to be considered an atom record.
const MIN_ROW_TOKENS: usize = 5;
/// Minimum number of tokens before trailing image flags are considered.
const MIN_IMAGE_ROW_TOKENS: usize = 8;

/// Recognized `atom_style` layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomStyle {
    /// No style comment on the section header.
    Unspecified,
    Atomic,
    Charge,
    Electron,
    Molecular,
    Full,
    /// Any other style; columns are located heuristically.
    Other(String),
}

impl AtomStyle {
    /// Parses the comment of an `Atoms` header line, if any.
    pub fn from_header(line: &str) -> Self {
        let Some((_, comment)) = line.split_once('#') else {
            return Self::Unspecified;
        };
        match comment.split_whitespace().next() {
            Some(word) => Self::from_name(word),
            None => Self::Unspecified,
        }
    }

    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.starts_with("atomic") {
            Self::Atomic
        } else if lower.starts_with("charge") {
            Self::Charge
        } else if lower.starts_with("electron") {
            Self::Electron
        } else if lower.starts_with("molecular") {
            Self::Molecular
        } else if lower.starts_with("full") {
            Self::Full
        } else {
            Self::Other(lower)
        }
    }

    /// Token indices of `(type, [x, y, z])` for the fixed layouts.
    fn fixed_columns(&self) -> Option<(usize, [usize; 3])> {
        match self {
            Self::Unspecified | Self::Atomic => Some((1, [2, 3, 4])),
            Self::Charge | Self::Electron => Some((1, [3, 4, 5])),
            Self::Molecular => Some((2, [3, 4, 5])),
            Self::Full => Some((2, [4, 5, 6])),
            Self::Other(_) => None,
        }
    }
}

/// Cell z extent declared in the data-file header.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CellHeight(Option<f64>);

impl CellHeight {
    /// Consumes `lo hi xlo xhi` style header lines, keeping the z extent.
    fn observe(&mut self, tokens: &[&str]) -> bool {
        if tokens.len() < 4 {
            return false;
        }
        match (
            tokens[2].to_lowercase().as_str(),
            tokens[3].to_lowercase().as_str(),
        ) {
            ("xlo", "xhi") | ("ylo", "yhi") => true,
            ("zlo", "zhi") => {
                if let (Some(lo), Some(hi)) =
                    (parse_coordinate(tokens[0]), parse_coordinate(tokens[1]))
                {
                    self.0 = Some(hi - lo);
                }
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataDecoder;

impl Decoder for DataDecoder {
    fn name(&self) -> &'static str {
        "LAMMPS data"
    }

    fn decode(&self, text: &str, filter: &TypeFilter) -> PointSet {
        let mut cell = CellHeight::default();
        let mut style: Option<AtomStyle> = None;
        let mut points = PointSet::new();
        let mut seen_rows = false;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                if style.is_some() && seen_rows {
                    break;
                }
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();

            if cell.observe(&tokens) {
                continue;
            }

            if line.to_lowercase().starts_with("atoms") {
                let parsed = AtomStyle::from_header(line);
                debug!("Atoms section with style {parsed:?}");
                style = Some(parsed);
                seen_rows = false;
                continue;
            }

            let Some(style) = style.as_ref() else {
                continue;
            };

            if line.starts_with(|c: char| c.is_alphabetic()) {
                break;
            }

            if let Some((atom_type, point)) = parse_atom_row(&tokens, style, &cell) {
                seen_rows = true;
                if filter.matches(atom_type) {
                    points.push(point);
                }
            }
        }

        points
    }
}

fn looks_like_int(token: &str) -> bool {
    token.parse::<i64>().is_ok()
}

fn parse_atom_row(
    tokens: &[&str],
    style: &AtomStyle,
    cell: &CellHeight,
) -> Option<(i64, Point)> {
    let count = tokens.len();
    if count < MIN_ROW_TOKENS {
        return None;
    }

    let has_images =
        count >= MIN_IMAGE_ROW_TOKENS && tokens[count - 3..].iter().all(|t| looks_like_int(t));
    let images = if has_images {
        let mut flags = [0i64; 3];
        for (slot, token) in flags.iter_mut().zip(&tokens[count - 3..]) {
            *slot = token.parse().ok()?;
        }
        Some(flags)
    } else {
        None
    };

    let (type_idx, coord_idx) = match style.fixed_columns() {
        Some(layout) => layout,
        // Heuristic: type in the second column, coordinates are the last
        // three values before any image flags.
        None => {
            let z = if images.is_some() { count - 4 } else { count - 1 };
            (1, [z - 2, z - 1, z])
        }
    };

    if coord_idx.iter().any(|&i| i >= count) {
        return None;
    }

    let atom_type = TypeFilter::parse_type_token(tokens[type_idx])?;
    let mut coords = [0.0f64; 3];
    for (slot, &idx) in coords.iter_mut().zip(&coord_idx) {
        *slot = parse_coordinate(tokens[idx])?;
    }

    // x and y stay in the wrapped cell.
    if let (Some(flags), Some(length)) = (images, cell.0) {
        coords[2] += flags[2] as f64 * length;
    }

    Some((atom_type, Point::from(coords)))
}
