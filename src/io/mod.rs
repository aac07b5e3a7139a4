//! Reading implant coordinates out of simulation output files.
//!
//! Four text formats are understood: LAMMPS dumps, LAMMPS data files, OVITO
//! table exports and loose point lists (XYZ/CSV). Each has a [`Decoder`];
//! [`PointReader`] picks one from an explicit [`Format`] or sniffs the text.
//! Malformed rows are skipped; a decoder that finds nothing returns an empty
//! [`PointSet`].

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::model::filter::TypeFilter;
use crate::model::point::PointSet;

pub mod columns;
pub mod data;
pub mod dump;
pub mod error;
pub mod ovito;
pub mod points;
pub mod sniff;

pub use data::{AtomStyle, DataDecoder};
pub use dump::{DumpDecoder, DumpFrame};
pub use error::Error;
pub use ovito::OvitoDecoder;
pub use points::PointListDecoder;
pub use sniff::{Sniffed, sniff};

/// A text decoder producing implant positions.
pub trait Decoder: Sync {
    /// Human-readable format name used in log lines.
    fn name(&self) -> &'static str;

    /// Extracts every point that passes `filter`. Never fails.
    fn decode(&self, text: &str, filter: &TypeFilter) -> PointSet;

    /// Like [`decode`](Decoder::decode), but `None` when nothing was found.
    fn try_decode(&self, text: &str, filter: &TypeFilter) -> Option<PointSet> {
        let points = self.decode(text, filter);
        (!points.is_empty()).then_some(points)
    }
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    LammpsDump,
    LammpsData,
    OvitoTable,
    PointList,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::LammpsDump => write!(f, "LAMMPS dump"),
            Format::LammpsData => write!(f, "LAMMPS data"),
            Format::OvitoTable => write!(f, "OVITO table"),
            Format::PointList => write!(f, "point list"),
        }
    }
}

/// Points decoded from one input, with the format that produced them.
///
/// `format` is `None` when no decoder recognized anything.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub format: Option<Format>,
    pub points: PointSet,
}

impl Decoded {
    fn empty() -> Self {
        Self::default()
    }
}

/// Builder that reads one input and decodes it.
pub struct PointReader<R> {
    reader: R,
    format: Option<Format>,
    filter: TypeFilter,
    prefer_csv: bool,
}

impl<R: Read> PointReader<R> {
    /// `format = None` sniffs the content.
    pub fn new(reader: R, format: Option<Format>) -> Self {
        Self {
            reader,
            format,
            filter: TypeFilter::Any,
            prefer_csv: false,
        }
    }

    pub fn with_filter(mut self, filter: TypeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Point lists try the CSV reading first.
    pub fn prefer_csv(mut self, prefer: bool) -> Self {
        self.prefer_csv = prefer;
        self
    }

    /// Reads the whole input and decodes it.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read(mut self) -> Result<Decoded, Error> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(decode_text(
            &text,
            self.format,
            &self.filter,
            self.prefer_csv,
        ))
    }
}

/// Decodes `text` with an explicit format or, without one, by sniffing.
pub fn decode_text(
    text: &str,
    format: Option<Format>,
    filter: &TypeFilter,
    prefer_csv: bool,
) -> Decoded {
    let found = match format {
        Some(format) => {
            let points = match format {
                Format::LammpsDump => DumpDecoder.decode(text, filter),
                Format::LammpsData => DataDecoder.decode(text, filter),
                Format::OvitoTable => OvitoDecoder.decode(text, filter),
                Format::PointList => PointListDecoder::new(prefer_csv).decode(text, filter),
            };
            (!points.is_empty()).then_some((format, points))
        }
        None => match sniff(text) {
            Some(sniffed) => {
                debug!("content sniffed as {sniffed:?}");
                sniff::first_match(sniffed.cascade(), text, filter)
            }
            None => None,
        },
    };

    match found {
        Some((format, points)) => Decoded {
            format: Some(format),
            points,
        },
        None => Decoded::empty(),
    }
}

/// Reads a whole file as text. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn read_text(path: &Path) -> Result<String, Error> {
    let mut file = File::open(path).map_err(|e| Error::open(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Opens and decodes a file. Point lists with a `.csv`/`.tsv` extension try
/// the CSV reading first.
pub fn read_file(
    path: &Path,
    format: Option<Format>,
    filter: &TypeFilter,
) -> Result<Decoded, Error> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let decoded = PointReader::new(file, format)
        .with_filter(filter.clone())
        .prefer_csv(has_table_extension(path))
        .read()?;

    match decoded.format {
        Some(format) => info!(
            "{}: {} points as {}",
            path.display(),
            decoded.points.len(),
            format
        ),
        None => info!("{}: no points recognized", path.display()),
    }
    Ok(decoded)
}

fn has_table_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "csv" | "tsv"))
        .unwrap_or(false)
}
