//! Nitrogen-vacancy centre candidates and the spacing between them.
//!
//! A nitrogen atom counts as an NV candidate when exactly three carbon atoms
//! sit within the bond cutoff: the fourth lattice neighbour is missing. All
//! distances use the minimum image of a periodic orthogonal cell when one is
//! known.

use log::debug;

use super::distance::CompensatedSum;
use super::error::{Error, require_positive};
use crate::model::bounds::BoxBounds;
use crate::model::point::Point;

/// Carbon neighbour cutoff in Å; a little above the diamond bond length.
pub const DEFAULT_BOND_CUTOFF: f64 = 1.8;
/// Carbon neighbours of a substitutional nitrogen next to a vacancy.
pub const DEFAULT_COORDINATION: usize = 3;

/// Neighbour rule for NV candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NvCriteria {
    /// Carbon atoms strictly closer than this (Å) are neighbours.
    pub bond_cutoff: f64,
    /// Exact neighbour count required.
    pub coordination: usize,
}

impl Default for NvCriteria {
    fn default() -> Self {
        Self {
            bond_cutoff: DEFAULT_BOND_CUTOFF,
            coordination: DEFAULT_COORDINATION,
        }
    }
}

impl NvCriteria {
    pub fn validate(&self) -> Result<(), Error> {
        require_positive("bond_cutoff", self.bond_cutoff)
    }
}

/// Periodic orthogonal cell used for minimum-image distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCell {
    lengths: [f64; 3],
}

impl PeriodicCell {
    /// `None` unless every edge length is finite and positive.
    pub fn from_bounds(bounds: &BoxBounds) -> Option<Self> {
        let lengths = bounds.lengths();
        lengths
            .iter()
            .all(|l| l.is_finite() && *l > 0.0)
            .then_some(Self { lengths })
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    /// Distance between the nearest periodic images of `a` and `b`.
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        let delta = [a.x - b.x, a.y - b.y, a.z - b.z];
        delta
            .iter()
            .zip(&self.lengths)
            .map(|(d, l)| {
                let wrapped = d - l * (d / l).round();
                wrapped * wrapped
            })
            .sum::<f64>()
            .sqrt()
    }
}

fn separation(cell: Option<&PeriodicCell>, a: &Point, b: &Point) -> f64 {
    match cell {
        Some(cell) => cell.distance(a, b),
        None => a.distance(b),
    }
}

/// Indices into `nitrogen` of the atoms with exactly
/// `criteria.coordination` carbon neighbours.
pub fn find_nv_candidates(
    nitrogen: &[Point],
    carbon: &[Point],
    cell: Option<&PeriodicCell>,
    criteria: &NvCriteria,
) -> Result<Vec<usize>, Error> {
    criteria.validate()?;

    let candidates = nitrogen
        .iter()
        .enumerate()
        .filter(|(_, n)| {
            let neighbours = carbon
                .iter()
                .filter(|c| separation(cell, n, c) < criteria.bond_cutoff)
                .count();
            neighbours == criteria.coordination
        })
        .map(|(i, _)| i)
        .collect();
    Ok(candidates)
}

/// Distance between two NV candidates, indexed into the candidate list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NvPair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

/// Every unordered pair of `points`, `first < second`, in row order.
pub fn pair_distances(points: &[Point], cell: Option<&PeriodicCell>) -> Vec<NvPair> {
    let mut pairs = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            pairs.push(NvPair {
                first: i,
                second: j,
                distance: separation(cell, a, b),
            });
        }
    }
    pairs
}

/// Summary of a distance sample.
///
/// Percentiles interpolate linearly between the two closest ranks, so the
/// median of an even sample is the mean of its middle values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

impl DistanceStats {
    /// `None` for an empty sample. Non-finite values are ignored.
    pub fn from_distances(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let mut acc = CompensatedSum::default();
        for &v in &sorted {
            acc.add(v);
        }

        Some(Self {
            count: sorted.len(),
            mean: acc.total() / sorted.len() as f64,
            median: percentile(&sorted, 50.0),
            p10: percentile(&sorted, 10.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
        })
    }
}

/// Linear-interpolation percentile of an ascending, non-empty sample.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Candidates, their pair distances and the distance summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NvAnalysis {
    /// Nitrogen atoms examined.
    pub nitrogen: usize,
    /// Carbon atoms searched for neighbours.
    pub carbon: usize,
    /// Candidate positions, in nitrogen input order.
    pub candidates: Vec<Point>,
    pub pairs: Vec<NvPair>,
    /// `None` with fewer than two candidates.
    pub stats: Option<DistanceStats>,
}

/// Finds NV candidates and measures how far apart they are.
pub fn analyze_nv(
    nitrogen: &[Point],
    carbon: &[Point],
    cell: Option<&PeriodicCell>,
    criteria: &NvCriteria,
) -> Result<NvAnalysis, Error> {
    let indices = find_nv_candidates(nitrogen, carbon, cell, criteria)?;
    let candidates: Vec<Point> = indices.iter().map(|&i| nitrogen[i]).collect();
    let pairs = pair_distances(&candidates, cell);
    let distances: Vec<f64> = pairs.iter().map(|p| p.distance).collect();

    debug!(
        "{} of {} nitrogen atoms have {} carbon neighbours within {} Å",
        candidates.len(),
        nitrogen.len(),
        criteria.coordination,
        criteria.bond_cutoff
    );

    Ok(NvAnalysis {
        nitrogen: nitrogen.len(),
        carbon: carbon.len(),
        candidates,
        pairs,
        stats: DistanceStats::from_distances(&distances),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BOND: f64 = 1.54;

    /// A nitrogen at `at` with `n` carbons one bond length away along
    /// distinct directions.
    fn site(at: Point, n: usize) -> (Point, Vec<Point>) {
        let dirs = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
        ];
        let carbons = dirs[..n]
            .iter()
            .map(|d| Point::new(at.x + d[0] * BOND, at.y + d[1] * BOND, at.z + d[2] * BOND))
            .collect();
        (at, carbons)
    }

    fn cubic(length: f64) -> PeriodicCell {
        let bounds = BoxBounds::new((0.0, length), (0.0, length), (0.0, length));
        PeriodicCell::from_bounds(&bounds).unwrap()
    }

    #[test]
    fn three_neighbours_make_a_candidate() {
        let mut nitrogen = Vec::new();
        let mut carbon = Vec::new();
        for (i, n) in [3usize, 4, 2, 3].into_iter().enumerate() {
            let (at, cs) = site(Point::new(20.0 * i as f64, 0.0, 0.0), n);
            nitrogen.push(at);
            carbon.extend(cs);
        }

        let found = find_nv_candidates(&nitrogen, &carbon, None, &NvCriteria::default()).unwrap();
        assert_eq!(found, vec![0, 3]);
    }

    #[test]
    fn cutoff_is_strict() {
        let nitrogen = [Point::new(0.0, 0.0, 0.0)];
        let carbon = [
            Point::new(1.8, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, -1.0, 0.0),
        ];
        let found = find_nv_candidates(&nitrogen, &carbon, None, &NvCriteria::default()).unwrap();
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn neighbours_across_the_boundary_count() {
        // One carbon sits across the x boundary of a 10 Å cell.
        let nitrogen = [Point::new(0.5, 5.0, 5.0)];
        let carbon = [
            Point::new(9.5, 5.0, 5.0),
            Point::new(0.5, 6.0, 5.0),
            Point::new(0.5, 5.0, 6.0),
        ];
        let criteria = NvCriteria::default();
        let cell = cubic(10.0);

        assert!(find_nv_candidates(&nitrogen, &carbon, None, &criteria).unwrap().is_empty());
        assert_eq!(
            find_nv_candidates(&nitrogen, &carbon, Some(&cell), &criteria).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn minimum_image_distance() {
        let cell = cubic(10.0);
        let a = Point::new(1.0, 1.0, 1.0);
        let b = Point::new(9.0, 9.0, 9.0);
        assert_relative_eq!(cell.distance(&a, &b), 12.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(cell.distance(&a, &Point::new(4.0, 1.0, 1.0)), 3.0);
        // Images more than one cell away still fold back.
        assert_relative_eq!(cell.distance(&a, &Point::new(23.0, 1.0, 1.0)), 2.0, epsilon = 1e-12);
        assert_eq!(cell.lengths(), [10.0; 3]);
    }

    #[test]
    fn degenerate_bounds_give_no_cell() {
        let flat = BoxBounds::new((0.0, 10.0), (0.0, 10.0), (5.0, 5.0));
        assert!(PeriodicCell::from_bounds(&flat).is_none());
        let inverted = BoxBounds::new((0.0, 10.0), (10.0, 0.0), (0.0, 10.0));
        assert!(PeriodicCell::from_bounds(&inverted).is_none());
    }

    #[test]
    fn pairs_are_unordered_and_indexed() {
        let points = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(3.0, 4.0, 0.0),
            Point::new(0.0, 0.0, 10.0),
        ];
        let pairs = pair_distances(&points, None);
        let summary: Vec<(usize, usize)> = pairs.iter().map(|p| (p.first, p.second)).collect();
        assert_eq!(summary, vec![(0, 1), (0, 2), (1, 2)]);
        assert_relative_eq!(pairs[0].distance, 5.0);
        assert_relative_eq!(pairs[1].distance, 10.0);
        assert!(pair_distances(&points[..1], None).is_empty());
    }

    #[test]
    fn stats_interpolate_linearly() {
        let stats = DistanceStats::from_distances(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.median, 2.5);
        assert_relative_eq!(stats.p10, 1.3, epsilon = 1e-12);
        assert_relative_eq!(stats.p25, 1.75);
        assert_relative_eq!(stats.p75, 3.25);
        assert_relative_eq!(stats.p90, 3.7, epsilon = 1e-12);
    }

    #[test]
    fn single_value_stats() {
        let stats = DistanceStats::from_distances(&[7.0, f64::NAN]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.p10, 7.0);
        assert_eq!(stats.p90, 7.0);
        assert!(DistanceStats::from_distances(&[]).is_none());
    }

    #[test]
    fn full_analysis() {
        let mut nitrogen = Vec::new();
        let mut carbon = Vec::new();
        for (x, n) in [(0.0, 3), (30.0, 3), (60.0, 4), (90.0, 3)] {
            let (at, cs) = site(Point::new(x, 0.0, 0.0), n);
            nitrogen.push(at);
            carbon.extend(cs);
        }

        let result = analyze_nv(&nitrogen, &carbon, None, &NvCriteria::default()).unwrap();
        assert_eq!(result.nitrogen, 4);
        assert_eq!(result.carbon, 13);
        assert_eq!(result.candidates.len(), 3);
        assert_eq!(result.pairs.len(), 3);

        let stats = result.stats.unwrap();
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.median, 60.0);
        assert_relative_eq!(stats.mean, 60.0);
    }

    #[test]
    fn lone_candidate_has_no_stats() {
        let (at, carbon) = site(Point::new(0.0, 0.0, 0.0), 3);
        let result = analyze_nv(&[at], &carbon, None, &NvCriteria::default()).unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert!(result.pairs.is_empty());
        assert!(result.stats.is_none());
    }

    #[test]
    fn rejects_bad_cutoff() {
        let criteria = NvCriteria {
            bond_cutoff: 0.0,
            ..NvCriteria::default()
        };
        assert!(matches!(
            find_nv_candidates(&[], &[], None, &criteria),
            Err(Error::InvalidConfig {
                field: "bond_cutoff",
                ..
            })
        ));
    }
}
