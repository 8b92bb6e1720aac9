use crate::{audio::RenderedPhrase, convert::pan_gains, note::Note};
use basedrop::Shared;

pub mod mixer;

pub use mixer::VoiceMixer;

/// A playback cursor over a rendered phrase.
#[derive(Clone)]
pub struct Voice {
    /// Trigger order, used for FIFO eviction.
    id: u64,
    note: Note,
    phrase: Shared<RenderedPhrase>,
    /// Velocity gain between 0 and 1.
    gain: f32,
    /// Position of the next sample to be played.
    read_idx: usize,
}

impl Voice {
    pub fn new(id: u64, note: Note, phrase: Shared<RenderedPhrase>, gain: f32) -> Self {
        Self {
            id,
            note,
            phrase,
            gain,
            read_idx: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn note(&self) -> Note {
        self.note
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn position(&self) -> usize {
        self.read_idx
    }

    fn seek(&mut self, position: usize) {
        self.read_idx = position;
    }

    /// Returns `true` once every sample of the phrase has been played.
    pub fn is_finished(&self) -> bool {
        self.read_idx >= self.phrase.len()
    }

    /// Adds the next frames of the phrase into the interleaved `audio_out`, and advances the read position.
    /// A return value of `false` indicates that the phrase has been played to the end.
    pub fn process(&mut self, audio_out: &mut [f32], gains: &OutputGains) -> bool {
        let channels = gains.channels();
        let samples = &self.phrase.samples()[self.read_idx.min(self.phrase.len())..];

        let mut played = 0;
        for (frame, &sample) in audio_out.chunks_exact_mut(channels).zip(samples.iter()) {
            let sample = self.gain * sample;
            for (channel, out) in frame.iter_mut().enumerate() {
                *out += gains.channel(channel) * sample;
            }
            played += 1;
        }
        self.read_idx += played;

        !self.is_finished()
    }
}

/// Per-channel output gains derived from the instrument volume and pan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OutputGains {
    channels: usize,
    volume: f32,
    left: f32,
    right: f32,
}

impl OutputGains {
    pub fn new(channels: usize, volume: f32, pan: f32) -> Self {
        let (left, right) = pan_gains(volume, pan);
        Self {
            channels: channels.max(1),
            volume,
            left,
            right,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Gain of the given interleaved channel. Mono output ignores the pan.
    #[inline]
    pub fn channel(&self, channel: usize) -> f32 {
        match (self.channels, channel) {
            (1, _) => self.volume,
            (_, 0) => self.left,
            (_, 1) => self.right,
            _ => self.volume,
        }
    }
}
