//! LAMMPS dump (`ITEM:`-delimited trajectory) decoder.
//!
//! A dump is a sequence of blocks introduced by `ITEM:` markers. Only
//! `BOX BOUNDS` and `ATOMS` carry data we need; every other marker simply
//! closes whatever block was open. The decoder keeps the rows of the last
//! completed `ATOMS` block, so a multi-snapshot trajectory reports its final
//! configuration.

use log::{debug, warn};

use super::columns::{self, CoordMode, Resolved};
use super::Decoder;
use crate::model::bounds::{BoxBounds, parse_bounds_row};
use crate::model::filter::TypeFilter;
use crate::model::point::{Point, PointSet, parse_coordinate};

const ITEM_PREFIX: &str = "ITEM:";
const BOUNDS_MARKER: &str = "ITEM: BOX BOUNDS";
const ATOMS_MARKER: &str = "ITEM: ATOMS";

#[derive(Debug, Clone, Copy, Default)]
pub struct DumpDecoder;

/// The last snapshot of a dump and the cell it was written in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpFrame {
    pub points: PointSet,
    /// `BOX BOUNDS` in effect when the snapshot's `ATOMS` block was read.
    pub bounds: Option<BoxBounds>,
}

impl DumpDecoder {
    /// Like [`Decoder::decode`], keeping the snapshot's cell bounds.
    pub fn decode_frame(&self, text: &str, filter: &TypeFilter) -> DumpFrame {
        let mut machine = DumpParser::new(filter);
        for line in text.lines() {
            machine.feed(line);
        }
        machine.finish()
    }
}

impl Decoder for DumpDecoder {
    fn name(&self) -> &'static str {
        "LAMMPS dump"
    }

    fn decode(&self, text: &str, filter: &TypeFilter) -> PointSet {
        self.decode_frame(text, filter).points
    }
}

/// Column layout of one `ATOMS` block.
#[derive(Debug, Clone, Copy)]
struct AtomsLayout {
    axes: [usize; 3],
    type_column: Option<usize>,
    mode: CoordMode,
}

impl AtomsLayout {
    fn from_header(line: &str) -> Option<Self> {
        let names: Vec<String> = line
            .split_whitespace()
            .skip(2)
            .map(|c| c.to_lowercase())
            .collect();

        let axes: [Resolved<'_>; 3] = columns::resolve_axes(
            &names,
            [columns::X_ALIASES, columns::Y_ALIASES, columns::Z_ALIASES],
        )?;
        let type_column = columns::resolve(&names, &[columns::TYPE_COLUMN]).map(|r| r.index);

        Some(Self {
            axes: axes.map(|a| a.index),
            type_column,
            mode: CoordMode::from_axes(&axes),
        })
    }
}

#[derive(Debug)]
enum State {
    Idle,
    InBounds {
        rows: Vec<Option<(f64, f64)>>,
    },
    InAtoms {
        layout: Option<AtomsLayout>,
        rows: Vec<Point>,
        dropped_unscaled: usize,
    },
}

/// Line-driven state machine over a dump.
struct DumpParser<'f> {
    filter: &'f TypeFilter,
    state: State,
    bounds: Option<BoxBounds>,
    last_block: Option<(Vec<Point>, Option<BoxBounds>)>,
}

impl<'f> DumpParser<'f> {
    fn new(filter: &'f TypeFilter) -> Self {
        Self {
            filter,
            state: State::Idle,
            bounds: None,
            last_block: None,
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if line.starts_with(ITEM_PREFIX) {
            self.close_block();
            self.state = if line.starts_with(BOUNDS_MARKER) {
                State::InBounds {
                    rows: Vec::with_capacity(3),
                }
            } else if line.starts_with(ATOMS_MARKER) {
                let layout = AtomsLayout::from_header(line);
                if layout.is_none() {
                    debug!("ATOMS block without x/y/z columns: '{line}'");
                }
                State::InAtoms {
                    layout,
                    rows: Vec::new(),
                    dropped_unscaled: 0,
                }
            } else {
                State::Idle
            };
            return;
        }

        match &mut self.state {
            State::Idle => {}
            State::InBounds { rows } => {
                rows.push(parse_bounds_row(line));
                if rows.len() == 3 {
                    self.close_block();
                    self.state = State::Idle;
                }
            }
            State::InAtoms {
                layout: Some(layout),
                rows,
                dropped_unscaled,
            } => match parse_atom_row(line, layout, self.filter, self.bounds.as_ref()) {
                Row::Point(p) => rows.push(p),
                Row::MissingBounds => *dropped_unscaled += 1,
                Row::Skipped => {}
            },
            State::InAtoms { layout: None, .. } => {}
        }
    }

    /// Commits the open block, if any, and returns to `Idle`.
    fn close_block(&mut self) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {}
            State::InBounds { rows } => {
                self.bounds = match rows.as_slice() {
                    [Some(x), Some(y), Some(z)] => Some(BoxBounds::new(*x, *y, *z)),
                    _ => {
                        debug!("incomplete BOX BOUNDS block; clearing cell bounds");
                        None
                    }
                };
            }
            State::InAtoms {
                rows,
                dropped_unscaled,
                ..
            } => {
                if dropped_unscaled > 0 {
                    warn!(
                        "dropped {dropped_unscaled} scaled rows: no BOX BOUNDS before ATOMS block"
                    );
                }
                debug!("ATOMS block closed with {} rows", rows.len());
                self.last_block = Some((rows, self.bounds));
            }
        }
    }

    /// Ends the stream, accepting a trailing non-empty `ATOMS` block.
    fn finish(mut self) -> DumpFrame {
        if let State::InAtoms { rows, .. } = &self.state {
            if !rows.is_empty() {
                self.close_block();
            }
        }
        match self.last_block {
            Some((rows, bounds)) => DumpFrame {
                points: PointSet::from(rows),
                bounds,
            },
            None => DumpFrame::default(),
        }
    }
}

enum Row {
    Point(Point),
    MissingBounds,
    Skipped,
}

fn parse_atom_row(
    line: &str,
    layout: &AtomsLayout,
    filter: &TypeFilter,
    bounds: Option<&BoxBounds>,
) -> Row {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [ix, iy, iz] = layout.axes;
    if tokens.len() <= ix.max(iy).max(iz) {
        return Row::Skipped;
    }

    if let (false, Some(t)) = (filter.is_any(), layout.type_column) {
        match tokens.get(t) {
            Some(token) if filter.accepts_token(token) => {}
            _ => return Row::Skipped,
        }
    }

    let raw = match (
        parse_coordinate(tokens[ix]),
        parse_coordinate(tokens[iy]),
        parse_coordinate(tokens[iz]),
    ) {
        (Some(x), Some(y), Some(z)) => [x, y, z],
        _ => return Row::Skipped,
    };

    match layout.mode {
        CoordMode::Absolute => Row::Point(Point::from(raw)),
        CoordMode::Scaled => match bounds {
            Some(b) => Row::Point(b.unscale(raw)),
            None => Row::MissingBounds,
        },
    }
}
