use anyhow::{bail, Context, Result};
use formant_engine::{audio::RenderedPhrase, InstrumentOpts, SpeechInstrument};
use std::{fs::File, io::BufWriter, path::PathBuf};

#[cfg(feature = "live")]
mod live;

/// Silence rendered after the phrase, in seconds.
const TAIL: f32 = 0.25;

struct CliOptions {
    /// Text to speak.
    text: String,
    /// Output file of the offline render.
    wav: PathBuf,
    note: i32,
    rate: Option<f32>,
    /// Play through the audio device instead of rendering to a file.
    live: bool,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--wav <path>`: File to render to (default `speech.wav`)
    /// - `--note <n>`: MIDI note to speak at (default 60)
    /// - `--rate <x>`: Speaking rate multiplier
    /// - `--live`: Play from MIDI input through the default output device
    /// - Any other arguments are joined into the text to speak
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);
        let mut words = vec![];
        let mut wav = PathBuf::from("speech.wav");
        let mut note = 60;
        let mut rate = None;
        let mut live = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wav" => wav = args.next().context("--wav requires a path")?.into(),
                "--note" => {
                    let value = args.next().context("--note requires a value")?;
                    note = value.parse().with_context(|| format!("Invalid note {value:?}"))?;
                }
                "--rate" => {
                    let value = args.next().context("--rate requires a value")?;
                    rate = Some(value.parse().with_context(|| format!("Invalid rate {value:?}"))?);
                }
                "--live" => live = true,
                "--help" | "-h" => {
                    eprintln!("Usage: formant-engine [OPTIONS] TEXT...");
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  --wav PATH   Render the phrase to a WAV file (default speech.wav)");
                    eprintln!("  --note N     MIDI note to speak at (default 60)");
                    eprintln!("  --rate X     Speaking rate multiplier");
                    eprintln!("  --live       Play from MIDI input (requires the `live` feature)");
                    std::process::exit(0);
                }
                other if other.starts_with("--") => bail!("Unknown option {other}, use --help for usage"),
                _ => words.push(arg.clone()),
            }
        }

        let text = if words.is_empty() {
            "hello world".to_string()
        } else {
            words.join(" ")
        };

        Ok(Self {
            text,
            wav,
            note,
            rate,
            live,
        })
    }
}

fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if cli.live {
        #[cfg(feature = "live")]
        return live::run(&cli.text, cli.rate);
        #[cfg(not(feature = "live"))]
        bail!("Live playback requires building with the `live` feature");
    }

    render_to_file(&cli)
}

fn render_to_file(cli: &CliOptions) -> Result<()> {
    let opts = InstrumentOpts {
        channels: 1,
        ..Default::default()
    };
    let mut instrument = SpeechInstrument::new(opts)?;
    if let Some(rate) = cli.rate {
        instrument.set_parameter("rate", rate);
    }

    instrument.phrase(&cli.text, cli.note);
    let Some(phrase) = instrument.phrase_for(cli.note) else {
        bail!("Nothing to say in {:?}", cli.text);
    };
    let frames = phrase.len() + (TAIL * opts.sample_rate as f32) as usize;

    let output = instrument.render_offline(cli.note, 127, frames);
    let file = File::create(&cli.wav).with_context(|| format!("Failed to create {}", cli.wav.display()))?;
    RenderedPhrase::new(opts.sample_rate, output).write_wav(BufWriter::new(file))?;

    tracing::info!(
        "Wrote {:.2}s of {:?} to {}",
        frames as f32 / opts.sample_rate as f32,
        cli.text,
        cli.wav.display()
    );
    Ok(())
}
