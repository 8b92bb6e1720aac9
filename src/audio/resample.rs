pub trait Interpolator {
    /// Returns the number of samples needed on each side of the interpolated pair
    /// to perform the interpolation.
    fn window() -> usize;

    /// Performs the interpolation.
    fn interpolate(t: f32, samples: &[f32]) -> f32;
}

pub struct CubicInterpolator;

impl Interpolator for CubicInterpolator {
    #[inline]
    fn window() -> usize {
        1
    }

    #[inline]
    fn interpolate(t: f32, samples: &[f32]) -> f32 {
        let a0 = samples[1];
        let a1 =
            -(1.0 / 3.0) * samples[0] - (0.5) * samples[1] + samples[2] - (1.0 / 6.0) * samples[3];
        let a2 = (0.5) * (samples[0] + samples[2]) - samples[1];
        let a3 = (0.5) * (samples[1] - samples[2]) + (1.0 / 6.0) * (samples[3] - samples[0]);
        let x2 = t * t;
        let x3 = x2 * t;
        a0 + a1 * t + a2 * x2 + a3 * x3
    }
}

/// Resamples a complete mono signal from `rate_in` to `rate_out`.
///
/// The signal edges are extended by repeating the first and last samples,
/// so the interpolator always has a full window available.
pub fn resample<I: Interpolator>(samples: &[f32], rate_in: u32, rate_out: u32) -> Vec<f32> {
    if samples.is_empty() || rate_in == 0 || rate_out == 0 {
        return vec![];
    }
    if rate_in == rate_out {
        return samples.to_vec();
    }

    let window = I::window();
    let first = samples[0];
    let last = samples[samples.len() - 1];

    // Pad the signal so that every interpolation window stays in bounds
    let mut padded = Vec::with_capacity(samples.len() + 2 * window + 1);
    padded.extend(std::iter::repeat(first).take(window));
    padded.extend_from_slice(samples);
    padded.extend(std::iter::repeat(last).take(window + 1));

    let ratio = rate_in as f64 / rate_out as f64;
    let len_out = (samples.len() as f64 / ratio).round() as usize;
    let max_idx = samples.len() - 1;

    (0..len_out)
        .map(|i| {
            let x = i as f64 * ratio;
            let idx = (x.floor() as usize).min(max_idx);
            let frac = (x - idx as f64).clamp(0.0, 1.0) as f32;
            I::interpolate(frac, &padded[idx..])
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity() {
        let samples = [0.0, 0.5, -0.5, 1.0];
        assert_eq!(resample::<CubicInterpolator>(&samples, 48000, 48000), samples.to_vec());
    }

    #[test]
    fn test_length() {
        let samples = vec![0.25; 441];
        let out = resample::<CubicInterpolator>(&samples, 44100, 48000);
        assert_eq!(out.len(), 480);
        // A constant signal stays constant
        assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-5));

        let out = resample::<CubicInterpolator>(&samples, 44100, 22050);
        assert!(out.len() == 220 || out.len() == 221);
    }

    #[test]
    fn test_empty() {
        assert!(resample::<CubicInterpolator>(&[], 44100, 48000).is_empty());
        assert!(resample::<CubicInterpolator>(&[1.0], 0, 48000).is_empty());
    }
}
