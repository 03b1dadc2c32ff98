/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// # use wumpus_rl::assert_interval;
/// let value = 2.0;
/// assert_interval!(value, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`value\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Running mean over a sliding window
///
/// The first `window - 1` entries average over the prefix seen so far.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 {
        return data.to_vec();
    }

    let mut sum = 0.0;
    data.iter()
        .enumerate()
        .map(|(i, &v)| {
            sum += v;
            if i >= window {
                sum -= data[i - window];
                sum / window as f64
            } else {
                sum / (i + 1) as f64
            }
        })
        .collect()
}

/// Mean of the last `window` values, or `None` when there are no values
pub fn trailing_mean(data: &[f64], window: usize) -> Option<f64> {
    let tail = &data[data.len().saturating_sub(window.max(1))..];
    (!tail.is_empty()).then(|| tail.iter().sum::<f64>() / tail.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_warms_up_then_slides() {
        let avg = moving_average(&[1.0, 3.0, 5.0, 7.0], 2);
        assert_eq!(avg, vec![1.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn moving_average_unit_window_is_identity() {
        assert_eq!(moving_average(&[1.0, 2.0], 1), vec![1.0, 2.0]);
    }

    #[test]
    fn trailing_mean_uses_tail() {
        assert_eq!(trailing_mean(&[0.0, 0.0, 1.0, 1.0], 2), Some(1.0));
        assert_eq!(trailing_mean(&[1.0, 0.0], 10), Some(0.5));
        assert_eq!(trailing_mean(&[], 10), None);
    }

    #[test]
    #[should_panic(expected = "Must be in the interval")]
    fn assert_interval_panics_outside() {
        let alpha = 1.5;
        assert_interval!(alpha, 0.0, 1.0);
    }
}
