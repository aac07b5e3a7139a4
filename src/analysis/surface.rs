/// Samples below which the single highest value is taken as the surface.
const SMALL_SAMPLE: usize = 10;
/// Floor on the number of top values averaged for larger samples.
const MIN_TOP_SAMPLE: usize = 50;
/// One value in this many is averaged for very large samples.
const TOP_FRACTION_DIVISOR: usize = 1000;

/// Estimates the surface height from substrate `z` values.
///
/// Up to ten values give their maximum; larger samples give the mean of the
/// highest `max(50, n / 1000)` values (capped at `n`). Non-finite values are
/// ignored.
pub fn estimate_surface(zs: &[f64]) -> Option<f64> {
    let mut values: Vec<f64> = zs.iter().copied().filter(|z| z.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    if values.len() <= SMALL_SAMPLE {
        return values.into_iter().reduce(f64::max);
    }

    values.sort_by(|a, b| b.total_cmp(a));
    let take = MIN_TOP_SAMPLE
        .max(values.len() / TOP_FRACTION_DIVISOR)
        .min(values.len());
    let top = &values[..take];
    Some(top.iter().sum::<f64>() / take as f64)
}
