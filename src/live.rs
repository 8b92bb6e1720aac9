use anyhow::{anyhow, Context, Result};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat, SupportedStreamConfig, SupportedStreamConfigRange,
};
use formant_engine::{midi::MidiEvent, note::Note, InstrumentOpts, SpeechInstrument};
use midir::{Ignore, MidiInput};
use std::{sync::mpsc, time::Duration};

/// Range of notes which are given a phrase in live mode.
const LOWEST_NOTE: i32 = 36;
const HIGHEST_NOTE: i32 = 84;

/// Speaks `text` on the default output device, played from the first MIDI input.
/// Without a MIDI input, a short arpeggio is played instead.
pub fn run(text: &str, rate: Option<f32>) -> Result<()> {
    // Set up the output stream first, the instrument must match its format
    let host = cpal::default_host();
    let device = host.default_output_device().context("No audio output device available")?;
    let default = device.default_output_config()?;
    let ranges: Vec<_> = device.supported_output_configs()?.collect();
    let config = float_output_config(&default, &ranges).with_context(|| {
        format!("Output device has no f32 format, its default is {:?}", default.sample_format())
    })?;
    if default.sample_format() != SampleFormat::F32 {
        tracing::info!(
            "Default output format is {:?}, using f32 at {} Hz instead",
            default.sample_format(),
            config.sample_rate().0
        );
    }
    let opts = InstrumentOpts {
        sample_rate: config.sample_rate().0,
        channels: config.channels() as usize,
        ..Default::default()
    };

    let mut instrument = SpeechInstrument::new(opts)?;
    if let Some(rate) = rate {
        instrument.set_parameter("rate", rate);
    }
    for note in LOWEST_NOTE..=HIGHEST_NOTE {
        instrument.phrase(text, note);
    }
    tracing::info!(
        "Rendered {:?} for notes {LOWEST_NOTE} to {HIGHEST_NOTE} at {} Hz",
        text,
        opts.sample_rate
    );

    let mixer = instrument.mixer();
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let len = data.len();
            mixer.pull(data, 0, len);
        },
        move |err| {
            tracing::error!("An error occurred on the output stream: {err}");
        },
        None,
    )?;
    stream.play()?;

    // Get or generate MIDI input
    let mut midi_in = MidiInput::new("speech input")?;
    midi_in.ignore(Ignore::ActiveSense);

    let (midi_tx, midi_rx) = mpsc::channel();
    let in_ports = midi_in.ports();
    let _connection;
    if let Some(port) = in_ports.first() {
        let name = midi_in.port_name(port).unwrap_or_default();
        _connection = midi_in
            .connect(
                port,
                "speech-input-connection",
                move |_, message: &[u8], _: &mut ()| {
                    let event = MidiEvent::from_raw(message);
                    if !event.is_invalid() {
                        midi_tx.send(event).ok();
                    }
                },
                (),
            )
            .map_err(|err| anyhow!("Failed to connect to MIDI input: {err}"))?;
        tracing::info!("Listening to MIDI input {name}");
    } else {
        tracing::info!("No MIDI input ports available, playing an arpeggio");
        std::thread::spawn(move || loop {
            for offset in [0, 4, 7, 12, 7, 4] {
                let note = Note::middle_c().transpose(offset);
                let on = MidiEvent::NoteOn {
                    channel: 0,
                    note,
                    velocity: 100,
                };
                if midi_tx.send(on).is_err() {
                    return;
                }
                std::thread::sleep(Duration::from_millis(600));
            }
        });
    }

    // Control loop
    while let Ok(event) = midi_rx.recv() {
        instrument.handle_midi(event);
    }

    Ok(())
}

/// Picks an f32 output config, preferring the default one, then the default channel count
/// and sample rate.
fn float_output_config(
    default: &SupportedStreamConfig,
    ranges: &[SupportedStreamConfigRange],
) -> Option<SupportedStreamConfig> {
    if default.sample_format() == SampleFormat::F32 {
        return Some(default.clone());
    }

    let floats = || ranges.iter().filter(|range| range.sample_format() == SampleFormat::F32);
    let range = floats()
        .find(|range| range.channels() == default.channels())
        .or_else(|| floats().next())?
        .clone();

    let sample_rate = default.sample_rate();
    if (range.min_sample_rate()..=range.max_sample_rate()).contains(&sample_rate) {
        Some(range.with_sample_rate(sample_rate))
    } else {
        Some(range.with_max_sample_rate())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cpal::{SampleRate, SupportedBufferSize};

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    fn default_config(format: SampleFormat) -> SupportedStreamConfig {
        SupportedStreamConfig::new(2, SampleRate(48000), SupportedBufferSize::Unknown, format)
    }

    #[test]
    fn test_float_default_is_kept() {
        let default = default_config(SampleFormat::F32);
        let config = float_output_config(&default, &[]).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.sample_rate(), SampleRate(48000));
    }

    #[test]
    fn test_integer_default_falls_back_to_float() {
        let default = default_config(SampleFormat::I16);
        let ranges = [
            range(2, 8000, 96000, SampleFormat::I16),
            range(1, 8000, 96000, SampleFormat::F32),
            range(2, 8000, 96000, SampleFormat::F32),
        ];
        let config = float_output_config(&default, &ranges).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.channels(), 2);
        assert_eq!(config.sample_rate(), SampleRate(48000));

        // Outside the supported rates, the highest one is used
        let ranges = [range(1, 8000, 44100, SampleFormat::F32)];
        let config = float_output_config(&default, &ranges).unwrap();
        assert_eq!(config.channels(), 1);
        assert_eq!(config.sample_rate(), SampleRate(44100));
    }

    #[test]
    fn test_no_float_format() {
        let default = default_config(SampleFormat::U16);
        let ranges = [range(2, 8000, 96000, SampleFormat::U16)];
        assert!(float_output_config(&default, &ranges).is_none());
    }
}
