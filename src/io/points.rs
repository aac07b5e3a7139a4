//! Loosely structured point lists: XYZ files, CSV/TSV tables and bare
//! whitespace rows, as produced by OVITO defect exports or ad-hoc scripts.

use csv::ReaderBuilder;
use log::debug;

use super::Decoder;
use super::columns::{self, LIST_X_ALIASES, LIST_Y_ALIASES, LIST_Z_ALIASES};
use crate::model::filter::TypeFilter;
use crate::model::point::{Point, PointSet, parse_coordinate};

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b';', b' '];
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Decoder for XYZ-like and CSV-like point lists.
///
/// The type filter does not apply: these lists carry positions only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointListDecoder {
    /// Try the CSV reading before the XYZ reading (`.csv`/`.tsv` inputs).
    pub prefer_csv: bool,
}

impl PointListDecoder {
    pub fn new(prefer_csv: bool) -> Self {
        Self { prefer_csv }
    }
}

impl Decoder for PointListDecoder {
    fn name(&self) -> &'static str {
        "point list"
    }

    fn decode(&self, text: &str, _filter: &TypeFilter) -> PointSet {
        let (first, second): (fn(&str) -> PointSet, fn(&str) -> PointSet) = if self.prefer_csv {
            (read_csv_like, read_xyz_like)
        } else {
            (read_xyz_like, read_csv_like)
        };

        let points = first(text);
        if !points.is_empty() {
            return points;
        }
        second(text)
    }
}

fn is_comment_or_empty(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Picks x, y, z out of one free-form row.
///
/// A row led by an integer (`type x y z [occupancy]`, as in OVITO vacancy
/// lists) or by an element symbol (`C x y z ...`) reads the three tokens
/// after the lead. Anything else, or a lead whose next three tokens are not
/// all numeric, falls back to the last three tokens.
fn row_xyz<S: AsRef<str>>(tokens: &[S]) -> Option<Point> {
    if tokens.len() < 3 {
        return None;
    }
    if tokens.len() >= 4 && has_label_lead(tokens[0].as_ref().trim()) {
        if let Some(p) = xyz_at(tokens, 1) {
            return Some(p);
        }
    }
    xyz_at(tokens, tokens.len() - 3)
}

fn xyz_at<S: AsRef<str>>(tokens: &[S], start: usize) -> Option<Point> {
    let x = parse_coordinate(tokens.get(start)?.as_ref())?;
    let y = parse_coordinate(tokens.get(start + 1)?.as_ref())?;
    let z = parse_coordinate(tokens.get(start + 2)?.as_ref())?;
    Some(Point::new(x, y, z))
}

/// An integer-valued number or a one-to-three letter element symbol.
fn has_label_lead(token: &str) -> bool {
    match token.parse::<f64>() {
        Ok(v) => v.is_finite() && (v - v.round()).abs() < INTEGER_TOLERANCE,
        Err(_) => {
            let mut chars = token.chars();
            chars.next().is_some_and(|c| c.is_ascii_uppercase())
                && token.len() <= 3
                && chars.all(|c| c.is_ascii_lowercase())
        }
    }
}

/// XYZ-like reading: an optional atom-count line plus comment line, then
/// one point per row as picked by [`row_xyz`].
pub fn read_xyz_like(text: &str) -> PointSet {
    let lines: Vec<&str> = text.lines().collect();
    let Some(first) = lines.first() else {
        return PointSet::new();
    };

    let start = if first.trim().parse::<i64>().is_ok() { 2 } else { 0 };

    lines
        .iter()
        .skip(start)
        .filter(|line| !is_comment_or_empty(line))
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            row_xyz(&tokens)
        })
        .collect()
}

/// Picks the delimiter that occurs most often on the first data line.
fn sniff_delimiter(text: &str) -> u8 {
    let Some(sample) = text.lines().find(|l| !is_comment_or_empty(l)) else {
        return b',';
    };
    let sample = sample.trim();

    let mut best = (b',', 0usize);
    for &delim in &DELIMITER_CANDIDATES {
        let count = sample.bytes().filter(|&b| b == delim).count();
        if count > best.1 {
            best = (delim, count);
        }
    }
    best.0
}

fn split_records(text: &str, delimiter: u8) -> Vec<Vec<String>> {
    if delimiter == b' ' {
        return text
            .lines()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect();
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .comment(None)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(|record| match record {
            Ok(r) => Some(r.iter().map(str::to_string).collect()),
            Err(e) => {
                debug!("skipping unreadable CSV record: {e}");
                None
            }
        })
        .collect()
}

/// CSV-like reading: a named `x,y,z` header selects columns; without one,
/// every row goes through the same row rules as the XYZ reading.
pub fn read_csv_like(text: &str) -> PointSet {
    let delimiter = sniff_delimiter(text);
    let rows = split_records(text, delimiter);
    let Some(header) = rows.first() else {
        return PointSet::new();
    };

    let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    if let Some(axes) =
        columns::resolve_axes(&names, [LIST_X_ALIASES, LIST_Y_ALIASES, LIST_Z_ALIASES])
    {
        let [ix, iy, iz] = axes.map(|a| a.index);
        let needed = ix.max(iy).max(iz);
        return rows
            .iter()
            .skip(1)
            .filter(|r| r.len() > needed)
            .filter_map(|r| {
                let x = parse_coordinate(&r[ix])?;
                let y = parse_coordinate(&r[iy])?;
                let z = parse_coordinate(&r[iz])?;
                Some(Point::new(x, y, z))
            })
            .collect();
    }

    rows.iter()
        .filter(|r| !r.is_empty())
        .filter_map(|r| {
            let flat = r.join(" ");
            if is_comment_or_empty(&flat) {
                return None;
            }
            let tokens: Vec<&str> = flat.split_whitespace().collect();
            row_xyz(&tokens)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz(points: PointSet) -> Vec<[f64; 3]> {
        points.into_iter().map(<[f64; 3]>::from).collect()
    }

    #[test]
    fn xyz_file_with_count_and_comment() {
        let text = "2\nvacancies frame 10\nX 1.0 2.0 3.0\nX 4.0 5.0 6.0\n";
        assert_eq!(
            xyz(read_xyz_like(text)),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn occupancy_rows_read_after_the_type() {
        let text = "1 -4.45875 -20.5102 74.0153 0\n2 1.0 2.0 3.0 1\n";
        assert_eq!(
            xyz(read_xyz_like(text)),
            vec![[-4.45875, -20.5102, 74.0153], [1.0, 2.0, 3.0]]
        );
    }

    #[test]
    fn integer_lead_reads_type_x_y_z() {
        let text = "3 1.0 2.0 3.0\n4.0 5.5 6.5 7.5\n";
        assert_eq!(
            xyz(read_xyz_like(text)),
            vec![[1.0, 2.0, 3.0], [5.5, 6.5, 7.5]]
        );
    }

    #[test]
    fn element_lead_ignores_trailing_properties() {
        let text = "C 1.0 2.0 3.0 0.25 7\nFe 4.0 5.0 6.0\n";
        assert_eq!(
            xyz(read_xyz_like(text)),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn other_rows_use_last_three_tokens() {
        let text = "# x y z\n1.0 2.0 3.0\n0.5 4.0 5.0 6.0\nbad row\nVac x 2.0 3.0\n";
        assert_eq!(
            xyz(read_xyz_like(text)),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn lead_with_non_numeric_coordinates_falls_back() {
        let text = "2 id x 1.0 2.0 3.0\n";
        assert_eq!(xyz(read_xyz_like(text)), vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn non_finite_rows_are_skipped() {
        let text = "1 inf 2.0 3.0\n2 1.0 nan 3.0\n3 1.0 2.0 1e400\n4 1.0 2.0 3.0\n";
        assert_eq!(xyz(read_xyz_like(text)), vec![[1.0, 2.0, 3.0]]);

        let csv = "x,y,z\n1.0,inf,3.0\n4.0,5.0,6.0\n";
        assert_eq!(xyz(read_csv_like(csv)), vec![[4.0, 5.0, 6.0]]);
    }

    #[test]
    fn csv_with_named_header() {
        let text = "id,Position.X,Position.Y,Position.Z,extra\n1,1.0,2.0,3.0,q\n2,4.0,,6.0,q\n";
        assert_eq!(xyz(read_csv_like(text)), vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn tsv_with_short_header_names() {
        let text = "x\ty\tz\n1\t2\t3\n4\t5\t6\n";
        assert_eq!(
            xyz(read_csv_like(text)),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn whitespace_header_is_recognized() {
        let text = "X   Y   Z\n1.0  2.0  3.0\n";
        assert_eq!(xyz(read_csv_like(text)), vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn headerless_csv_uses_row_rules() {
        let text = "7,1.0,2.0,3.0\n8,4.0,5.0,6.0\n";
        assert_eq!(
            xyz(read_csv_like(text)),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn delimiter_sniffing() {
        assert_eq!(sniff_delimiter("a;b;c\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc\n"), b'\t');
        assert_eq!(sniff_delimiter("a b c\n"), b' ');
        assert_eq!(sniff_delimiter("abc\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn decoder_order_follows_preference() {
        // The XYZ reading takes the values after the integer lead; the CSV
        // reading finds the named header and picks the named columns.
        let text = "z y x w\n1 2 3 4\n";
        let xyz_first = PointListDecoder::new(false).decode(text, &TypeFilter::Any);
        let csv_first = PointListDecoder::new(true).decode(text, &TypeFilter::Any);
        assert_eq!(xyz(xyz_first), vec![[2.0, 3.0, 4.0]]);
        assert_eq!(xyz(csv_first), vec![[3.0, 2.0, 1.0]]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let decoder = PointListDecoder::default();
        assert!(decoder.decode("", &TypeFilter::Any).is_empty());
        assert!(decoder.decode("\n# nothing\n", &TypeFilter::Any).is_empty());
    }
}
