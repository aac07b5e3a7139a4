//! Depths below a reference plane and the plain statistics over them.

use crate::model::point::Point;

/// Depths (Å) of a set of points below a reference plane.
///
/// Positive values lie beneath the plane; negative ones sit above it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthSeries {
    values: Vec<f64>,
}

impl DepthSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// `surface_z - z` for every point, in input order.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>, surface_z: f64) -> Self {
        Self {
            values: points.into_iter().map(|p| p.depth_below(surface_z)).collect(),
        }
    }

    /// Drops points lying above the plane.
    pub fn retain_non_negative(&mut self) {
        self.values.retain(|&d| d >= 0.0);
    }

    /// Drops depths beyond `limit`.
    pub fn retain_at_most(&mut self, limit: f64) {
        self.values.retain(|&d| d <= limit);
    }

    pub fn extend(&mut self, other: &DepthSeries) {
        self.values.extend_from_slice(&other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        mean(&self.values)
    }
}

impl From<Vec<f64>> for DepthSeries {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
