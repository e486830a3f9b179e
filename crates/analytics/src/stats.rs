//! Numeric primitives shared by the transforms. Callers strip undefined
//! observations before handing values in.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// The `p`-quantile with linear interpolation between closest ranks.
///
/// `None` if `values` is empty or `p` lies outside `[0, 1]`.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, p)
}

/// Same as [`quantile`] on data already sorted in non-decreasing order.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let frac = h - h.floor();

    if lo + 1 >= n {
        Some(sorted[n - 1])
    } else {
        Some(sorted[lo] + frac * (sorted[lo + 1] - sorted[lo]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        // Population std is 2.0, so the sample std is 2 * sqrt(8/7).
        let expected = 2.0 * (8.0f64 / 7.0).sqrt();
        assert!((sample_std(&v).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert_eq!(sample_std(&[3.0, 3.0, 3.0]), Some(0.0));
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(5.0));
        assert_eq!(quantile(&v, 0.5), Some(3.0));
        // h = 4 * 0.1 = 0.4 -> 1 + 0.4 * (2 - 1)
        assert!((quantile(&v, 0.1).unwrap() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn single_value_is_every_quantile() {
        assert_eq!(quantile(&[7.0], 0.01), Some(7.0));
        assert_eq!(quantile(&[7.0], 0.99), Some(7.0));
    }
}
