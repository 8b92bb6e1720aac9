use itertools::{Itertools, MinMaxResult};

pub trait AudioBuffer<'a>: Sized {
    fn samples(self) -> &'a [f32];

    /// Calculates the extreme values (minimum and maximum) of the samples.
    fn extremes(self) -> (f32, f32) {
        match self.samples().iter().copied().minmax() {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(s) => (s, s),
            MinMaxResult::MinMax(min, max) => (min, max),
        }
    }

    /// Returns the largest absolute sample value.
    fn peak(self) -> f32 {
        let (min, max) = self.extremes();
        f32::max(-min, max)
    }
}

pub trait AudioBufferMut<'a>: AudioBuffer<'a> {
    fn samples_mut(self) -> &'a mut [f32];

    /// Multiplies the samples by `scale`.
    fn scale(self, scale: f32) {
        for sample in self.samples_mut().iter_mut() {
            *sample *= scale;
        }
    }

    /// Scales the samples so that the most extreme one reaches `target`.
    /// Silent buffers are left untouched.
    fn normalize(self, target: f32) {
        let samples = self.samples_mut();
        let peak = (&*samples).peak();
        let scale = target / peak;
        if peak == 0.0 || !scale.is_finite() {
            return;
        }
        samples.scale(scale);
    }
}

impl<'a> AudioBuffer<'a> for &'a [f32] {
    fn samples(self) -> &'a [f32] {
        self
    }
}

impl<'a> AudioBuffer<'a> for &'a mut [f32] {
    fn samples(self) -> &'a [f32] {
        self
    }
}

impl<'a> AudioBufferMut<'a> for &'a mut [f32] {
    fn samples_mut(self) -> &'a mut [f32] {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_peak() {
        let samples = [0.1, -0.6, 0.4];
        assert_eq!(samples[..].peak(), 0.6);
        assert_eq!((&[] as &[f32]).peak(), 0.0);
        assert_eq!([0.3][..].peak(), 0.3);
    }

    #[test]
    fn test_normalize() {
        let mut samples = [0.1, -0.4, 0.2];
        samples[..].normalize(0.8);
        assert!((samples[..].peak() - 0.8).abs() < 1e-6);
        assert!((samples[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_silent() {
        let mut samples = [0.0; 16];
        samples[..].normalize(0.8);
        assert!(samples.iter().all(|&s| s == 0.0));
    }
}
