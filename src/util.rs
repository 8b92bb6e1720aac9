use std::sync::atomic::{AtomicU32, Ordering};

/// Converts a MIDI note value to a frequency in Hz.
pub fn hz_from_note(note: u8) -> f32 {
    440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0)
}

/// Linearly interpolates between `a` and `b`, where `t` is between 0 and 1.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// An `f32` which can be shared between the control and audio threads without locking.
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hz_from_note() {
        assert_eq!(hz_from_note(69), 440.0);
        assert_eq!(hz_from_note(69 + 12), 880.0);
        assert_eq!(hz_from_note(69 - 12), 220.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(100.0, 200.0, 0.0), 100.0);
        assert_eq!(lerp(100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp(100.0, 200.0, 1.0), 200.0);
    }

    #[test]
    fn test_atomic_f32() {
        let value = AtomicF32::new(0.25);
        assert_eq!(value.load(), 0.25);
        value.store(-1.5);
        assert_eq!(value.load(), -1.5);
    }
}
