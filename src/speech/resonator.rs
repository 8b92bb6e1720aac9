use std::f32::consts::PI;

/// Lowest formant frequency a resonator will accept, in Hz.
pub const MIN_FREQUENCY: f32 = 30.0;
/// Highest formant frequency as a fraction of the sample rate.
pub const MAX_FREQUENCY_RATIO: f32 = 0.45;
/// Narrowest bandwidth a resonator will accept, in Hz.
pub const MIN_BANDWIDTH: f32 = 20.0;
/// Widest bandwidth as a fraction of the sample rate.
pub const MAX_BANDWIDTH_RATIO: f32 = 0.2;

/// A time-varying two-pole resonant bandpass filter.
///
/// The coefficients can be changed every sample. When the pole radius changes the
/// delay registers are rescaled, so a formant that moves mid-segment keeps its
/// ringing energy instead of jumping.
#[derive(Copy, Clone, Debug)]
pub struct Resonator {
    sample_rate: f32,
    frequency: f32,
    bandwidth: f32,
    /// Pole radius, strictly less than 1.
    r: f32,
    /// Cosine coefficient, `2·r·cos(ω)`.
    c: f32,
    /// y[n-1]
    y1: f32,
    /// y[n-2]
    y2: f32,
}

impl Resonator {
    pub fn new(frequency: f32, bandwidth: f32, sample_rate: f32) -> Self {
        let mut resonator = Self {
            sample_rate,
            frequency: 0.0,
            bandwidth: 0.0,
            r: 0.0,
            c: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        resonator.frequency = resonator.clamp_frequency(frequency);
        resonator.bandwidth = resonator.clamp_bandwidth(bandwidth);
        resonator.calc_coefficients();
        resonator
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn radius(&self) -> f32 {
        self.r
    }

    /// Moves the centre frequency, keeping the filter state.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.set(frequency, self.bandwidth);
    }

    /// Moves the centre frequency and bandwidth, keeping the filter state.
    pub fn set(&mut self, frequency: f32, bandwidth: f32) {
        let frequency = self.clamp_frequency(frequency);
        let bandwidth = self.clamp_bandwidth(bandwidth);
        if frequency == self.frequency && bandwidth == self.bandwidth {
            return;
        }

        let old_r = self.r;
        self.frequency = frequency;
        self.bandwidth = bandwidth;
        self.calc_coefficients();

        // Rescale the history so the resonant energy carries over
        if old_r > 0.0 && self.r != old_r {
            let ratio = self.r / old_r;
            self.y1 *= ratio;
            self.y2 *= ratio * ratio;
        }
    }

    /// Clears the filter history.
    pub fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = (1.0 - self.r) * x + self.c * self.y1 - self.r * self.r * self.y2;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn clamp_frequency(&self, frequency: f32) -> f32 {
        let max = MAX_FREQUENCY_RATIO * self.sample_rate;
        if frequency.is_nan() {
            return MIN_FREQUENCY.min(max);
        }
        frequency.clamp(MIN_FREQUENCY.min(max), max)
    }

    fn clamp_bandwidth(&self, bandwidth: f32) -> f32 {
        let max = MAX_BANDWIDTH_RATIO * self.sample_rate;
        if bandwidth.is_nan() {
            return MIN_BANDWIDTH.min(max);
        }
        bandwidth.clamp(MIN_BANDWIDTH.min(max), max)
    }

    fn calc_coefficients(&mut self) {
        let sample_rate = self.sample_rate.max(1.0);
        self.r = (-PI * self.bandwidth / sample_rate).exp();
        self.c = 2.0 * self.r * (2.0 * PI * self.frequency / sample_rate).cos();
    }
}
