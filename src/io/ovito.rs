//! OVITO tabular text export decoder.
//!
//! OVITO writes a `#`-prefixed header naming each column, with multi-word
//! names quoted (`# "Particle Type" Position.X Position.Y Position.Z`),
//! followed by whitespace-separated rows.

use log::debug;

use super::Decoder;
use super::columns::{self, OVITO_X, OVITO_Y, OVITO_Z};
use crate::model::filter::TypeFilter;
use crate::model::point::{Point, PointSet, parse_coordinate};

#[derive(Debug, Clone, Copy, Default)]
pub struct OvitoDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TableLayout {
    axes: [usize; 3],
    type_column: Option<usize>,
}

impl TableLayout {
    fn from_comment(line: &str) -> Option<Self> {
        let candidate = line.trim_start_matches('#').trim();
        if candidate.is_empty() {
            return None;
        }
        let words = split_shell_words(candidate)
            .unwrap_or_else(|| candidate.split_whitespace().map(str::to_string).collect());
        let names: Vec<String> = words
            .iter()
            .map(|w| w.trim().trim_matches('"').to_lowercase())
            .collect();

        let axes = columns::resolve_axes(&names, [OVITO_X, OVITO_Y, OVITO_Z])?;
        let type_column = columns::resolve(&names, columns::OVITO_TYPE_ALIASES).map(|r| r.index);

        Some(Self {
            axes: axes.map(|a| a.index),
            type_column,
        })
    }
}

impl Decoder for OvitoDecoder {
    fn name(&self) -> &'static str {
        "OVITO table"
    }

    fn decode(&self, text: &str, filter: &TypeFilter) -> PointSet {
        let Some(layout) = find_header(text) else {
            debug!("no Position.X/Y/Z header among leading comments");
            return PointSet::new();
        };

        let [ix, iy, iz] = layout.axes;
        let needed = ix.max(iy).max(iz);
        let mut points = PointSet::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() <= needed {
                continue;
            }
            if let (false, Some(t)) = (filter.is_any(), layout.type_column) {
                match tokens.get(t) {
                    Some(token) if filter.accepts_token(token) => {}
                    _ => continue,
                }
            }
            if let (Some(x), Some(y), Some(z)) = (
                parse_coordinate(tokens[ix]),
                parse_coordinate(tokens[iy]),
                parse_coordinate(tokens[iz]),
            ) {
                points.push(Point::new(x, y, z));
            }
        }

        points
    }
}

/// Scans the leading comment block for the first usable header.
fn find_header(text: &str) -> Option<TableLayout> {
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('#') {
            break;
        }
        if let Some(layout) = TableLayout::from_comment(line) {
            return Some(layout);
        }
    }
    None
}

/// Splits a string into words with POSIX-shell quoting rules.
///
/// Returns `None` on an unterminated quote or a trailing escape.
pub fn split_shell_words(s: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        ch => current.push(ch),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => {
                            let next = chars.next()?;
                            if !matches!(next, '"' | '\\' | '$' | '`') {
                                current.push('\\');
                            }
                            current.push(next);
                        }
                        ch => current.push(ch),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            ch => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Some(words)
}
