use crate::model::point::Point;

/// Neumaier's variant of Kahan summation.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(super) fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub(super) fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Mean Euclidean distance over all unordered pairs.
///
/// Streams row by row in O(1) extra memory. `None` for fewer than two
/// points.
pub fn mean_pairwise_distance(points: &[Point]) -> Option<f64> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let mut acc = CompensatedSum::default();
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            acc.add(a.distance(b));
        }
    }

    let pairs = (n as f64) * (n as f64 - 1.0) / 2.0;
    Some(acc.total() / pairs)
}
