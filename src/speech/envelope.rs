/// Attack time of every rendered segment, in seconds.
pub const ATTACK: f32 = 0.004;
/// Release time of every rendered segment, in seconds.
pub const RELEASE: f32 = 0.03;

/// A linear attack/release envelope spanning a fixed number of samples.
///
/// Unlike a note envelope, the length is known up front, so the gain at any
/// sample index can be computed directly.
#[derive(Copy, Clone, Debug)]
pub struct SegmentEnvelope {
    /// Total length of the segment in samples.
    length: usize,
    /// Attack length in samples, at least 1.
    attack: usize,
    /// Release length in samples, at least 1.
    release: usize,
}

impl SegmentEnvelope {
    pub fn new(length: usize, sample_rate: f32) -> Self {
        Self {
            length,
            attack: ((ATTACK * sample_rate).round() as usize).max(1),
            release: ((RELEASE * sample_rate).round() as usize).max(1),
        }
    }

    /// Gain at sample `idx`, between 0 and 1.
    pub fn gain(&self, idx: usize) -> f32 {
        if idx >= self.length {
            return 0.0;
        }
        let rise = idx as f32 / self.attack as f32;
        let fall = (self.length - 1 - idx) as f32 / self.release as f32;
        rise.min(fall).min(1.0)
    }
}
