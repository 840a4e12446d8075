//! Price and volume helpers.

/// Relative change of `new_price` against a positive reference price.
pub fn relative_price_change(new_price: f64, ref_price: f64) -> f64 {
    debug_assert!(ref_price > 0.0);
    (new_price - ref_price) / ref_price
}

/// Mean volume over the most recent `window` sessions.
pub fn mean_volume(volumes: &[i64], window: usize) -> Option<f64> {
    if volumes.is_empty() || window == 0 {
        return None;
    }
    let tail = &volumes[volumes.len().saturating_sub(window)..];
    Some(tail.iter().sum::<i64>() as f64 / tail.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relative_change_gain() {
        assert_relative_eq!(relative_price_change(110.0, 100.0), 0.1);
    }

    #[test]
    fn relative_change_loss() {
        assert_relative_eq!(relative_price_change(90.0, 100.0), -0.1);
    }

    #[test]
    fn mean_volume_over_tail() {
        let volumes = [100, 200, 300, 400];
        assert_relative_eq!(mean_volume(&volumes, 2).unwrap(), 350.0);
    }

    #[test]
    fn mean_volume_window_larger_than_history() {
        let volumes = [100, 200];
        assert_relative_eq!(mean_volume(&volumes, 10).unwrap(), 150.0);
    }

    #[test]
    fn mean_volume_empty() {
        assert!(mean_volume(&[], 5).is_none());
    }
}
