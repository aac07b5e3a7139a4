//! Selection of interacting, isolated implant pairs.
//!
//! A pair qualifies when both members sit deep enough below the surface,
//! their separation falls inside a window, and no other implant of the same
//! species comes within the isolation radius of either member.

use std::collections::BTreeSet;

use log::debug;

use super::error::{Error, require_positive};
use crate::model::point::Point;

/// Ångström per nanometre.
pub const ANGSTROM_PER_NM: f64 = 10.0;

/// Distance thresholds for pair selection, all in Å.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCriteria {
    /// Minimum depth below the surface for a point to be considered.
    pub min_depth: f64,
    /// Lower bound of the pair separation window (inclusive).
    pub pair_min: f64,
    /// Upper bound of the pair separation window (inclusive).
    pub pair_max: f64,
    /// Minimum distance from each pair member to every other point.
    pub isolation: f64,
}

impl Default for PairCriteria {
    fn default() -> Self {
        Self::from_nm(5.0, 5.0, 15.0, 15.0)
    }
}

impl PairCriteria {
    /// Builds criteria from thresholds given in nanometres.
    pub fn from_nm(min_depth: f64, pair_min: f64, pair_max: f64, isolation: f64) -> Self {
        Self {
            min_depth: min_depth * ANGSTROM_PER_NM,
            pair_min: pair_min * ANGSTROM_PER_NM,
            pair_max: pair_max * ANGSTROM_PER_NM,
            isolation: isolation * ANGSTROM_PER_NM,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.min_depth.is_finite() && self.min_depth >= 0.0) {
            return Err(Error::invalid_config(
                "min_depth",
                format!("must be a non-negative number, got {}", self.min_depth),
            ));
        }
        require_positive("pair_min", self.pair_min)?;
        require_positive("pair_max", self.pair_max)?;
        require_positive("isolation", self.isolation)?;
        if self.pair_min > self.pair_max {
            return Err(Error::invalid_config(
                "pair_min",
                format!(
                    "lower bound {} exceeds upper bound {}",
                    self.pair_min, self.pair_max
                ),
            ));
        }
        Ok(())
    }
}

/// A pair that passed every stage, by index into the input points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedPair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    /// Points examined.
    pub total: usize,
    /// Points at or below the minimum depth.
    pub deep: usize,
    /// Deep pairs whose separation falls inside the window.
    pub candidate_pairs: usize,
    /// Pairs that also passed the isolation test.
    pub pairs: Vec<QualifiedPair>,
    /// Distinct indices appearing in any qualified pair, ascending.
    pub qualifying: Vec<usize>,
}

impl Classification {
    /// Number of distinct qualifying points.
    pub fn qualifying_count(&self) -> usize {
        self.qualifying.len()
    }
}

/// Runs the deep, window and isolation stages over `points`.
///
/// Isolation is checked against every point, deep or not.
pub fn classify(
    points: &[Point],
    surface_z: f64,
    criteria: &PairCriteria,
) -> Result<Classification, Error> {
    criteria.validate()?;

    let deep: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.depth_below(surface_z) >= criteria.min_depth)
        .map(|(i, _)| i)
        .collect();

    let mut candidates = Vec::new();
    for (a, &i) in deep.iter().enumerate() {
        for &j in &deep[a + 1..] {
            let d = points[i].distance(&points[j]);
            if d >= criteria.pair_min && d <= criteria.pair_max {
                candidates.push(QualifiedPair {
                    first: i,
                    second: j,
                    distance: d,
                });
            }
        }
    }
    debug!(
        "{} deep of {} points, {} candidate pairs",
        deep.len(),
        points.len(),
        candidates.len()
    );

    let candidate_pairs = candidates.len();
    let pairs: Vec<QualifiedPair> = candidates
        .into_iter()
        .filter(|pair| is_isolated(points, pair, criteria.isolation))
        .collect();

    let qualifying: BTreeSet<usize> = pairs.iter().flat_map(|p| [p.first, p.second]).collect();

    Ok(Classification {
        total: points.len(),
        deep: deep.len(),
        candidate_pairs,
        pairs,
        qualifying: qualifying.into_iter().collect(),
    })
}

fn is_isolated(points: &[Point], pair: &QualifiedPair, radius: f64) -> bool {
    let (a, b) = (&points[pair.first], &points[pair.second]);
    points
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != pair.first && *k != pair.second)
        .all(|(_, p)| a.distance(p) >= radius && b.distance(p) >= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(min_depth: f64, pair_min: f64, pair_max: f64, isolation: f64) -> PairCriteria {
        PairCriteria {
            min_depth,
            pair_min,
            pair_max,
            isolation,
        }
    }

    fn along_x(xs: &[f64], z: f64) -> Vec<Point> {
        xs.iter().map(|&x| Point::new(x, 0.0, z)).collect()
    }

    #[test]
    fn crowded_line_yields_nothing() {
        let points = along_x(&[0.0, 8.0, 20.0], -100.0);
        let result = classify(&points, 0.0, &criteria(0.0, 5.0, 15.0, 15.0)).unwrap();
        assert_eq!(result.deep, 3);
        assert_eq!(result.candidate_pairs, 2);
        assert!(result.pairs.is_empty());
        assert_eq!(result.qualifying_count(), 0);
    }

    #[test]
    fn isolated_pair_qualifies() {
        let points = along_x(&[0.0, 10.0, 100.0], -100.0);
        let result = classify(&points, 0.0, &criteria(50.0, 5.0, 15.0, 15.0)).unwrap();
        assert_eq!(result.candidate_pairs, 1);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].first, 0);
        assert_eq!(result.pairs[0].second, 1);
        assert_eq!(result.pairs[0].distance, 10.0);
        assert_eq!(result.qualifying, vec![0, 1]);
    }

    #[test]
    fn shallow_points_still_break_isolation() {
        let mut points = along_x(&[0.0, 10.0], -50.0);
        points.push(Point::new(5.0, 0.0, -45.0));
        let result = classify(&points, 0.0, &criteria(50.0, 5.0, 15.0, 15.0)).unwrap();
        assert_eq!(result.deep, 2);
        assert_eq!(result.candidate_pairs, 1);
        assert!(result.pairs.is_empty());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let points = along_x(&[0.0, 5.0, 200.0, 215.0], -100.0);
        let result = classify(&points, 0.0, &criteria(0.0, 5.0, 15.0, 4.0)).unwrap();
        assert_eq!(result.candidate_pairs, 2);
        assert_eq!(result.qualifying, vec![0, 1, 2, 3]);
    }

    #[test]
    fn shared_member_counted_once() {
        // Star of three pairs around the origin, all within the window and
        // with a small isolation radius.
        let points = vec![
            Point::new(0.0, 0.0, -100.0),
            Point::new(10.0, 0.0, -100.0),
            Point::new(0.0, 10.0, -100.0),
        ];
        let result = classify(&points, 0.0, &criteria(0.0, 5.0, 15.0, 1.0)).unwrap();
        assert_eq!(result.pairs.len(), 3);
        assert_eq!(result.qualifying_count(), 3);
    }

    #[test]
    fn depth_threshold_is_inclusive() {
        let points = along_x(&[0.0, 10.0], -50.0);
        let result = classify(&points, 0.0, &criteria(50.0, 5.0, 15.0, 15.0)).unwrap();
        assert_eq!(result.deep, 2);
        assert_eq!(result.qualifying_count(), 2);
    }

    #[test]
    fn empty_and_single_inputs() {
        let result = classify(&[], 0.0, &PairCriteria::default()).unwrap();
        assert_eq!(result, Classification::default());

        let one = [Point::new(0.0, 0.0, -500.0)];
        let result = classify(&one, 0.0, &PairCriteria::default()).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.deep, 1);
        assert_eq!(result.candidate_pairs, 0);
    }

    #[test]
    fn nanometre_defaults() {
        let c = PairCriteria::default();
        assert_eq!(c.min_depth, 50.0);
        assert_eq!(c.pair_min, 50.0);
        assert_eq!(c.pair_max, 150.0);
        assert_eq!(c.isolation, 150.0);
    }

    #[test]
    fn validation_rejects_bad_thresholds() {
        assert!(criteria(0.0, 5.0, 15.0, 15.0).validate().is_ok());
        assert!(criteria(-1.0, 5.0, 15.0, 15.0).validate().is_err());
        assert!(criteria(0.0, 0.0, 15.0, 15.0).validate().is_err());
        assert!(criteria(0.0, 5.0, 15.0, -1.0).validate().is_err());
        assert!(matches!(
            criteria(0.0, 20.0, 15.0, 15.0).validate(),
            Err(Error::InvalidConfig {
                field: "pair_min",
                ..
            })
        ));
    }
}
