use crate::{
    audio::RenderedPhrase,
    midi::MidiEvent,
    note::{velocity_gain, Note},
    speech::{NativeSpeech, Parameter, PhraseBuilder, SynthParams},
    voice::VoiceMixer,
};
use basedrop::{Collector, Shared};
use std::sync::Arc;
use thiserror::Error;

/// Number of frames pulled at a time by `render_offline`.
const OFFLINE_BLOCK_FRAMES: usize = 512;

/// MIDI controllers understood by `handle_midi`.
const CC_VOLUME: u8 = 7;
const CC_PAN: u8 = 10;
const CC_ALL_SOUND_OFF: u8 = 120;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Construction options of a `SpeechInstrument`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstrumentOpts {
    /// Sample rate of the rendered phrases and of the output, in Hz.
    pub sample_rate: u32,
    /// Number of interleaved output channels.
    pub channels: usize,
    /// Maximum number of phrases playing at once.
    pub max_polyphony: usize,
    /// Seed of the random source used for the excitation phase and noise.
    pub seed: u64,
}

impl Default for InstrumentOpts {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            max_polyphony: 16,
            seed: 0x5EED,
        }
    }
}

impl InstrumentOpts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.max_polyphony == 0 {
            return Err(ConfigError::ZeroPolyphony);
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Sample rate must be greater than zero")]
    ZeroSampleRate,
    #[error("At least one output channel is required")]
    ZeroChannels,
    #[error("Maximum polyphony must be greater than zero")]
    ZeroPolyphony,
}

/// A sampler instrument that speaks: each note holds a phrase of synthesised
/// speech, and triggering the note plays it back.
///
/// The instrument itself lives on the control thread. The audio thread only
/// ever sees the `VoiceMixer` returned by [`SpeechInstrument::mixer`].
pub struct SpeechInstrument {
    opts: InstrumentOpts,
    params: SynthParams,
    /// The phrase assigned to each note.
    phrases: [Option<Shared<RenderedPhrase>>; 128],
    mixer: Arc<VoiceMixer>,
    native: Option<Box<dyn NativeSpeech>>,
    /// Reclaims dropped phrases. Must stay the last field.
    collector: Collector,
}

impl SpeechInstrument {
    pub fn new(opts: InstrumentOpts) -> Result<Self, ConfigError> {
        opts.validate()?;
        Ok(Self {
            opts,
            params: SynthParams::default(),
            phrases: std::array::from_fn(|_| None),
            mixer: Arc::new(VoiceMixer::new(opts.channels, opts.max_polyphony)),
            native: None,
            collector: Collector::new(),
        })
    }

    /// Prefers `native` for rendering phrases, falling back to formant synthesis when it fails.
    pub fn with_native_speech(mut self, native: Box<dyn NativeSpeech>) -> Self {
        self.native = Some(native);
        self
    }

    pub fn opts(&self) -> &InstrumentOpts {
        &self.opts
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Returns the mixer to be pulled from the audio thread.
    pub fn mixer(&self) -> Arc<VoiceMixer> {
        Arc::clone(&self.mixer)
    }

    /// Returns the phrase currently assigned to `note`, if any.
    pub fn phrase_for(&self, note: i32) -> Option<&RenderedPhrase> {
        self.phrases[Note::clamped(note).index()].as_deref()
    }

    /// Renders `text` at the pitch of `note` and assigns it to that note, replacing any
    /// previous phrase. Text with nothing to say leaves the note as it was.
    pub fn phrase(&mut self, text: &str, note: i32) {
        let note = Note::clamped(note);
        let Some(phrase) = self.build(text, note) else {
            tracing::debug!("Nothing to say for {note}: {text:?}");
            return;
        };

        tracing::debug!(
            "Built phrase for {note}: {} samples, {:.2}s",
            phrase.len(),
            phrase.duration()
        );
        self.phrases[note.index()] = Some(Shared::new(&self.collector.handle(), phrase));
        self.collect_garbage();
    }

    fn build(&self, text: &str, note: Note) -> Option<RenderedPhrase> {
        if text.trim().is_empty() {
            return None;
        }

        if let Some(native) = &self.native {
            let sample_rate = self.opts.sample_rate;
            let result = native
                .synthesize(text, sample_rate)
                .and_then(|pcm| pcm.into_phrase(sample_rate));
            match result {
                Ok(mut phrase) if !phrase.is_empty() => {
                    phrase.normalize();
                    return Some(phrase);
                }
                Ok(_) => tracing::warn!("Native speech returned no audio for {note}, using formant synthesis"),
                Err(err) => tracing::warn!("{err}, using formant synthesis for {note}"),
            }
        }

        PhraseBuilder::new(self.opts.sample_rate, self.params, self.opts.seed).build_phrase(text, note)
    }

    /// Starts playing the phrase assigned to `note`. Does nothing if the note has no phrase.
    pub fn trigger(&mut self, note: i32, velocity: i32) {
        let note = Note::clamped(note);
        let Some(phrase) = &self.phrases[note.index()] else {
            return;
        };

        if let Some(evicted) = self.mixer.trigger(note, phrase.clone(), velocity_gain(velocity)) {
            tracing::debug!("Polyphony limit reached, evicted {evicted} for {note}");
        }
        self.collect_garbage();
    }

    /// Phrases always play to the end, so this does nothing.
    pub fn release(&mut self, note: i32) {
        self.mixer.release(Note::clamped(note));
    }

    pub fn stop_all(&mut self) {
        self.mixer.stop_all();
        self.collect_garbage();
    }

    /// Sets a control by name. Unknown names and non-finite values are ignored.
    pub fn set_parameter(&mut self, name: &str, value: f32) {
        let Some(param) = Parameter::from_name(name) else {
            tracing::debug!("Ignoring unknown parameter {name:?}");
            return;
        };
        if !value.is_finite() {
            return;
        }

        match param {
            Parameter::Rate => self.params.rate = value,
            Parameter::Pitch => self.params.pitch = value,
            Parameter::FormantShift => self.params.formant_shift = value,
            Parameter::VoiceLevel => self.params.voice_level = value,
            Parameter::NoiseLevel => self.params.noise_level = value,
            Parameter::Volume => self.mixer.set_volume(value),
            Parameter::Pan => self.mixer.set_pan(value),
        }
    }

    /// Fills `count` interleaved samples of `buffer` from `offset`. See [`VoiceMixer::pull`].
    pub fn pull(&self, buffer: &mut [f32], offset: usize, count: usize) -> usize {
        self.mixer.pull(buffer, offset, count)
    }

    pub fn handle_midi(&mut self, event: MidiEvent) {
        match event {
            MidiEvent::NoteOn { note, velocity, .. } => self.trigger(note.number() as i32, velocity as i32),
            MidiEvent::NoteOff { note, .. } => self.release(note.number() as i32),
            MidiEvent::ControlChange { control, value, .. } => match control {
                CC_VOLUME => self.mixer.set_volume(value as f32 / 127.0),
                CC_PAN => self.mixer.set_pan((value as f32 - 64.0) / 63.0),
                CC_ALL_SOUND_OFF | CC_ALL_NOTES_OFF => self.stop_all(),
                _ => {}
            },
            MidiEvent::Invalid => {}
        }
    }

    /// Triggers `note` and renders `frames` frames of the output into a new buffer.
    pub fn render_offline(&mut self, note: i32, velocity: i32, frames: usize) -> Vec<f32> {
        let block = OFFLINE_BLOCK_FRAMES * self.opts.channels;
        let mut buffer = vec![0.0; frames * self.opts.channels];

        self.trigger(note, velocity);
        let mut offset = 0;
        while offset < buffer.len() {
            let count = block.min(buffer.len() - offset);
            offset += self.mixer.pull(&mut buffer, offset, count);
        }
        self.collect_garbage();

        buffer
    }

    /// Frees phrases which are no longer referenced by the cache or any voice.
    pub fn collect_garbage(&mut self) {
        self.collector.collect();
    }
}
