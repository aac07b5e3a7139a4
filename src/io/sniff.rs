//! Format sniffing and the fallback decoder cascade.

use log::debug;

use super::dump::DumpDecoder;
use super::ovito::OvitoDecoder;
use super::{Decoder, Format};
use crate::model::filter::TypeFilter;
use crate::model::point::PointSet;

/// Classification of an input by its first non-blank line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniffed {
    /// Starts with an `ITEM:` marker.
    LammpsDump,
    /// Starts with a `#` comment header.
    OvitoTable,
    /// Anything else.
    Unknown,
}

/// An ordered list of decoders tried in turn until one finds points.
pub type Cascade = &'static [(Format, &'static dyn Decoder)];

const DUMP_ONLY: Cascade = &[(Format::LammpsDump, &DumpDecoder)];
const TABLE_ONLY: Cascade = &[(Format::OvitoTable, &OvitoDecoder)];
const BEST_EFFORT: Cascade = &[
    (Format::LammpsDump, &DumpDecoder),
    (Format::OvitoTable, &OvitoDecoder),
];

impl Sniffed {
    pub fn cascade(self) -> Cascade {
        match self {
            Self::LammpsDump => DUMP_ONLY,
            Self::OvitoTable => TABLE_ONLY,
            Self::Unknown => BEST_EFFORT,
        }
    }
}

/// Classifies `text`; `None` when it holds no non-blank line at all.
pub fn sniff(text: &str) -> Option<Sniffed> {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(if first.starts_with("ITEM:") {
        Sniffed::LammpsDump
    } else if first.starts_with('#') {
        Sniffed::OvitoTable
    } else {
        Sniffed::Unknown
    })
}

/// Runs the decoders of `cascade` in order, returning the first non-empty
/// result and the format that produced it.
pub fn first_match(cascade: Cascade, text: &str, filter: &TypeFilter) -> Option<(Format, PointSet)> {
    cascade.iter().find_map(|(format, decoder)| {
        let found = decoder.try_decode(text, filter);
        if found.is_none() {
            debug!("{} decoder found no points", decoder.name());
        }
        found.map(|points| (*format, points))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_by_first_meaningful_line() {
        assert_eq!(sniff("\n\nITEM: TIMESTEP\n0\n"), Some(Sniffed::LammpsDump));
        assert_eq!(sniff("  # Position.X\n"), Some(Sniffed::OvitoTable));
        assert_eq!(sniff("3\ncomment\n"), Some(Sniffed::Unknown));
        assert_eq!(sniff("   \n\n"), None);
    }

    #[test]
    fn cascades_per_classification() {
        assert_eq!(Sniffed::LammpsDump.cascade().len(), 1);
        assert_eq!(Sniffed::OvitoTable.cascade()[0].0, Format::OvitoTable);
        let formats: Vec<Format> = Sniffed::Unknown.cascade().iter().map(|(f, _)| *f).collect();
        assert_eq!(formats, vec![Format::LammpsDump, Format::OvitoTable]);
    }

    #[test]
    fn best_effort_after_preamble() {
        // The table header must lead the file; a dump marker may follow text.
        let text = "title\n# Position.X Position.Y Position.Z\n1 2 3\n";
        assert!(first_match(BEST_EFFORT, text, &TypeFilter::Any).is_none());

        let dump = "title\nITEM: ATOMS id x y z\n1 1.0 2.0 3.0\n";
        let (format, points) = first_match(BEST_EFFORT, dump, &TypeFilter::Any).unwrap();
        assert_eq!(format, Format::LammpsDump);
        assert_eq!(points.len(), 1);
    }
}
