use super::point::{Point, parse_coordinate};

/// Orthogonal simulation-cell bounds for the coordinate block that follows
/// them in a dump file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBounds {
    pub xlo: f64,
    pub xhi: f64,
    pub ylo: f64,
    pub yhi: f64,
    pub zlo: f64,
    pub zhi: f64,
}

impl BoxBounds {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self {
            xlo: x.0,
            xhi: x.1,
            ylo: y.0,
            yhi: y.1,
            zlo: z.0,
            zhi: z.1,
        }
    }

    #[inline]
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.xhi - self.xlo,
            self.yhi - self.ylo,
            self.zhi - self.zlo,
        ]
    }

    /// Maps fractional cell coordinates to absolute Cartesian ones.
    ///
    /// `absolute = lo + raw * (hi - lo)` on each axis. Fractions outside
    /// `[0, 1]` (unwrapped scaled output) extrapolate linearly.
    pub fn unscale(&self, raw: [f64; 3]) -> Point {
        Point::new(
            self.xlo + raw[0] * (self.xhi - self.xlo),
            self.ylo + raw[1] * (self.yhi - self.ylo),
            self.zlo + raw[2] * (self.zhi - self.zlo),
        )
    }
}

/// Parses one `lo hi [tilt]` bounds row.
pub(crate) fn parse_bounds_row(line: &str) -> Option<(f64, f64)> {
    let mut tokens = line.split_whitespace();
    let lo = parse_coordinate(tokens.next()?)?;
    let hi = parse_coordinate(tokens.next()?)?;
    Some((lo, hi))
}
