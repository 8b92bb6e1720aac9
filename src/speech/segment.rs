use super::{
    envelope::SegmentEnvelope,
    params::SynthParams,
    phoneme::PhonemeDescriptor,
    resonator::Resonator,
};
use crate::util::lerp;
use rand::Rng;
use std::f32::consts::PI;

/// Gain applied to the sum of the three formant filters.
const MIX_GAIN: f32 = 0.6;
/// Gain of the unfiltered noise added to sibilant phonemes.
const SIBILANCE_GAIN: f32 = 0.25;
/// Relative amplitudes of the second and third buzz harmonics.
const HARMONIC_2: f32 = 0.45;
const HARMONIC_3: f32 = 0.2;

/// Renders single phoneme descriptors into PCM samples.
#[derive(Copy, Clone, Debug)]
pub struct SegmentRenderer {
    sample_rate: f32,
    params: SynthParams,
}

impl SegmentRenderer {
    pub fn new(sample_rate: u32, params: SynthParams) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            params,
        }
    }

    /// Length of the rendered segment in samples, after the rate multiplier is applied.
    /// Degenerate durations give a length of zero.
    pub fn segment_length(&self, descriptor: &PhonemeDescriptor) -> usize {
        let seconds = descriptor.duration / self.params.rate();
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * self.sample_rate) as usize
    }

    /// Renders one descriptor with the excitation pitched at `base_pitch` Hz.
    pub fn render(&self, descriptor: &PhonemeDescriptor, base_pitch: f32, rng: &mut impl Rng) -> Vec<f32> {
        let len = self.segment_length(descriptor);
        if len == 0 {
            return vec![];
        }
        if descriptor.silence {
            return vec![0.0; len];
        }

        let shift = self.params.formant_shift();
        let PhonemeDescriptor {
            start, end, bandwidths, ..
        } = *descriptor;
        let mut resonators: [Resonator; 3] =
            std::array::from_fn(|k| Resonator::new(start[k] * shift, bandwidths[k], self.sample_rate));

        let envelope = SegmentEnvelope::new(len, self.sample_rate);
        let voice_gain = self.params.voice_level();
        let noise_gain = self.params.noise_level() * descriptor.noise;
        let sibilant = descriptor.is_sibilant();
        let glide = descriptor.is_glide();
        let omega = base_pitch.max(0.0) / self.sample_rate;
        let span = (len - 1).max(1) as f32;

        // Start the buzz at a random point in its cycle
        let mut phase: f32 = if descriptor.voiced { rng.gen() } else { 0.0 };

        (0..len)
            .map(|i| {
                let mut excitation = 0.0;
                if descriptor.voiced {
                    excitation += voice_gain * buzz(phase);
                    phase = (phase + omega).fract();
                }
                if noise_gain > 0.0 {
                    excitation += noise_gain * rng.gen_range(-1.0f32..=1.0);
                }

                // Glide the formants linearly across the segment
                let t = i as f32 / span;
                let mut sample = 0.0;
                for (k, resonator) in resonators.iter_mut().enumerate() {
                    if glide {
                        resonator.set_frequency(lerp(start[k], end[k], t) * shift);
                    }
                    sample += resonator.process(excitation);
                }
                sample *= MIX_GAIN;

                if sibilant {
                    sample += SIBILANCE_GAIN * noise_gain * rng.gen_range(-1.0f32..=1.0);
                }

                sample * envelope.gain(i)
            })
            .collect()
    }
}

/// A three-harmonic buzz, normalized to a peak of roughly 1.
fn buzz(phase: f32) -> f32 {
    let w = 2.0 * PI * phase;
    (w.sin() + HARMONIC_2 * (2.0 * w).sin() + HARMONIC_3 * (3.0 * w).sin()) / (1.0 + HARMONIC_2 + HARMONIC_3)
}
