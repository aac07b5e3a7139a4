//! Fixed-width depth histograms anchored at zero.

use super::error::{Error, require_positive};

/// Decimal places kept when rounding the upper edge.
const EDGE_DECIMALS: i32 = 10;

/// Upper bound on the number of bins one histogram may allocate.
pub const MAX_BINS: usize = 1_000_000;

/// One histogram bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }
}

/// Counts over `[i·w, (i+1)·w)`, the last bin closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    width: f64,
    edges: Vec<f64>,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` with width `width`.
    ///
    /// The range runs from 0 to the smallest multiple of `width` covering
    /// the largest value. Values outside that range are not counted. An
    /// empty input gives an empty histogram; a largest value of 0 or less
    /// gives the single bin `[0, width]`.
    ///
    /// Fails with [`Error::TooManyBins`] when the range would need more than
    /// [`MAX_BINS`] bins.
    pub fn build(values: &[f64], width: f64) -> Result<Self, Error> {
        require_positive("bin_width", width)?;

        let Some(max) = values.iter().copied().reduce(f64::max) else {
            return Ok(Self {
                width,
                edges: Vec::new(),
                counts: Vec::new(),
            });
        };

        let (xmax, n) = if max <= 0.0 {
            (width, 1)
        } else {
            let required = (max / width).ceil();
            if !required.is_finite() || required > MAX_BINS as f64 {
                return Err(Error::TooManyBins {
                    required,
                    width,
                    limit: MAX_BINS,
                });
            }
            let xmax = round_to((max / width).ceil() * width, EDGE_DECIMALS);
            let n = ((xmax / width).round() as usize).max(1);
            (xmax, n)
        };

        let mut edges: Vec<f64> = (0..n).map(|i| i as f64 * width).collect();
        edges.push(xmax);

        let mut counts = vec![0usize; n];
        for &v in values {
            if let Some(idx) = bin_index(&edges, width, v) {
                counts[idx] += 1;
            }
        }

        Ok(Self {
            width,
            edges,
            counts,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// `len() + 1` edges, or none for an empty histogram.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of values that landed in a bin.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bins(&self) -> impl Iterator<Item = Bin> + '_ {
        self.counts.iter().enumerate().map(|(i, &count)| Bin {
            lower: self.edges[i],
            upper: self.edges[i + 1],
            count,
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn bin_index(edges: &[f64], width: f64, v: f64) -> Option<usize> {
    let n = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[n]);
    if !(v >= lo && v <= hi) {
        return None;
    }

    let mut idx = ((v / width).floor() as usize).min(n - 1);
    // Settle against the stored edges so float division cannot misplace a
    // value sitting on a boundary.
    while idx > 0 && v < edges[idx] {
        idx -= 1;
    }
    while idx + 1 < n && v >= edges[idx + 1] {
        idx += 1;
    }
    Some(idx)
}
