use super::{OutputGains, Voice};
use crate::{
    audio::RenderedPhrase,
    note::Note,
    util::AtomicF32,
};
use basedrop::Shared;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mixes a bounded set of playing phrases into an interleaved output buffer.
///
/// The control thread calls `trigger` and `stop_all` while the audio thread calls
/// `pull`. The active list is only locked to copy it out or merge it back; all the
/// mixing happens on a private snapshot.
pub struct VoiceMixer {
    /// Number of interleaved output channels.
    channels: usize,
    /// Maximum number of voices playing at once.
    max_polyphony: usize,
    /// The voices currently playing, oldest first.
    active: Mutex<VoiceList>,
    /// Snapshot of the active voices, only touched by `pull`.
    scratch: Mutex<Vec<Voice>>,
    volume: AtomicF32,
    /// Pan from -1.0 (left) to 1.0 (right).
    pan: AtomicF32,
}

struct VoiceList {
    voices: Vec<Voice>,
    next_id: u64,
}

impl VoiceMixer {
    pub fn new(channels: usize, max_polyphony: usize) -> Self {
        let max_polyphony = max_polyphony.max(1);
        Self {
            channels: channels.max(1),
            max_polyphony,
            active: Mutex::new(VoiceList {
                voices: Vec::with_capacity(max_polyphony),
                next_id: 0,
            }),
            scratch: Mutex::new(Vec::with_capacity(max_polyphony)),
            volume: AtomicF32::new(1.0),
            pan: AtomicF32::new(0.0),
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn max_polyphony(&self) -> usize {
        self.max_polyphony
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.store(volume.max(0.0));
    }

    pub fn set_pan(&self, pan: f32) {
        self.pan.store(pan.clamp(-1.0, 1.0));
    }

    pub fn volume(&self) -> f32 {
        self.volume.load()
    }

    pub fn pan(&self) -> f32 {
        self.pan.load()
    }

    /// Starts playing `phrase` with the given velocity gain.
    /// If the mixer is full, the oldest voice is evicted first and its note returned.
    pub fn trigger(&self, note: Note, phrase: Shared<RenderedPhrase>, gain: f32) -> Option<Note> {
        let mut active = lock(&self.active);

        let evicted = if active.voices.len() >= self.max_polyphony {
            Some(active.voices.remove(0).note())
        } else {
            None
        };

        let id = active.next_id;
        active.next_id += 1;
        active.voices.push(Voice::new(id, note, phrase, gain));

        evicted
    }

    /// Phrases always play to completion, so releasing a note does nothing.
    pub fn release(&self, _note: Note) {}

    /// Silences every voice immediately.
    pub fn stop_all(&self) {
        lock(&self.active).voices.clear();
    }

    /// Returns the number of voices currently playing.
    pub fn active_voices(&self) -> usize {
        lock(&self.active).voices.len()
    }

    /// Returns the notes of the playing voices, oldest first.
    pub fn active_notes(&self) -> Vec<Note> {
        lock(&self.active).voices.iter().map(Voice::note).collect()
    }

    /// Fills `count` interleaved samples of `buffer`, starting at `offset`, with the mix
    /// of all playing voices, and returns the number of samples written.
    ///
    /// # Panics
    ///
    /// If `offset + count` lies outside of `buffer`.
    pub fn pull(&self, buffer: &mut [f32], offset: usize, count: usize) -> usize {
        let in_bounds = offset.checked_add(count).map_or(false, |end| end <= buffer.len());
        assert!(
            in_bounds,
            "Pull of {} samples at offset {} is out of bounds for a buffer of {}",
            count,
            offset,
            buffer.len()
        );
        if count == 0 {
            return 0;
        }

        let audio_out = &mut buffer[offset..offset + count];
        audio_out.fill(0.0);

        let mut snapshot = lock(&self.scratch);
        snapshot.clear();
        snapshot.extend(lock(&self.active).voices.iter().cloned());

        let gains = OutputGains::new(self.channels, self.volume.load(), self.pan.load());
        for voice in snapshot.iter_mut() {
            voice.process(audio_out, &gains);
        }

        // Merge the new positions back. Voices triggered during the mix are kept,
        // voices evicted or stopped during the mix stay gone.
        lock(&self.active).voices.retain_mut(|voice| {
            match snapshot.iter().find(|mixed| mixed.id() == voice.id()) {
                Some(mixed) => {
                    voice.seek(mixed.position());
                    !mixed.is_finished()
                }
                None => true,
            }
        });
        snapshot.clear();

        count
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
