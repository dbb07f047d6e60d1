//! Rolling-window kernels over series with gaps.
//!
//! Samples are `Option<f64>`: `None` marks a missing observation (an empty
//! CSV cell). A window that touches a missing sample produces a missing output,
//! so gaps never get averaged away silently.

/// Window length of the smoothing average (one week of daily data).
pub const SMOOTHING_WINDOW: usize = 7;

/// Trailing arithmetic mean over exactly `window` consecutive samples.
///
/// Output `i` is the mean of `samples[i..i + window]`, i.e. the window that
/// *ends* at input index `i + window - 1`. There are no partial windows, so
/// the output has `len - window + 1` entries (or none when `len < window`).
pub fn trailing_mean(samples: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 || samples.len() < window {
        return Vec::new();
    }

    samples
        .windows(window)
        .map(|w| {
            let mut sum = 0.0;
            for v in w {
                sum += (*v)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}

/// Index of the first sample that is present and non-zero.
///
/// Everything before it is the leading run of "nothing happened yet" days.
/// Returns `samples.len()` when no such sample exists.
pub fn first_nonzero(samples: &[Option<f64>]) -> usize {
    samples
        .iter()
        .position(|v| matches!(v, Some(x) if *x != 0.0))
        .unwrap_or(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn trailing_mean_has_no_partial_windows() {
        let out = trailing_mean(&some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]), 7);
        assert_eq!(out.len(), 2);
        assert!((out[0].unwrap() - 4.0).abs() < 1e-12);
        assert!((out[1].unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn trailing_mean_short_input_is_empty() {
        assert!(trailing_mean(&some(&[1.0; 6]), SMOOTHING_WINDOW).is_empty());
        assert!(trailing_mean(&[], SMOOTHING_WINDOW).is_empty());
        assert_eq!(trailing_mean(&some(&[2.0; 7]), SMOOTHING_WINDOW), vec![Some(2.0)]);
    }

    #[test]
    fn trailing_mean_propagates_gaps() {
        let mut samples = some(&[1.0; 9]);
        samples[7] = None;
        let out = trailing_mean(&samples, 7);
        // Windows ending at 6, 7, 8; the last two include the gap.
        assert_eq!(out, vec![Some(1.0), None, None]);
    }

    #[test]
    fn first_nonzero_skips_zeros_and_gaps() {
        let samples = vec![None, Some(0.0), Some(0.0), Some(3.0), Some(0.0)];
        assert_eq!(first_nonzero(&samples), 3);
        assert_eq!(first_nonzero(&some(&[0.0, 0.0])), 2);
        assert_eq!(first_nonzero(&some(&[5.0])), 0);
    }
}
