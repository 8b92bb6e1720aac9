use super::{
    params::SynthParams,
    phoneme::PhonemeDescriptor,
    segment::SegmentRenderer,
    tokenizer::tokenize,
};
use crate::{audio::RenderedPhrase, note::Note};
use rand::{rngs::StdRng, SeedableRng};

/// Turns text into a normalized, note-pitched phrase.
#[derive(Copy, Clone, Debug)]
pub struct PhraseBuilder {
    sample_rate: u32,
    params: SynthParams,
    seed: u64,
}

impl PhraseBuilder {
    /// Creates a builder. Every build reseeds its random source from `seed`,
    /// so identical inputs render identical phrases.
    pub fn new(sample_rate: u32, params: SynthParams, seed: u64) -> Self {
        Self {
            sample_rate,
            params,
            seed,
        }
    }

    /// Frequency of the voiced excitation for `note`.
    pub fn base_pitch(&self, note: Note) -> f32 {
        note.frequency() * self.params.pitch()
    }

    /// Estimates the phrase length in samples from the nominal phoneme durations.
    pub fn estimate_length(&self, tokens: &[PhonemeDescriptor]) -> usize {
        let seconds: f32 = tokens
            .iter()
            .map(|t| t.duration)
            .filter(|d| d.is_finite() && *d > 0.0)
            .sum();
        let seconds = seconds / self.params.rate();
        if !seconds.is_finite() {
            return 0;
        }
        (seconds * self.sample_rate as f32).ceil() as usize
    }

    /// Renders `text` pitched at `note`. Returns `None` when there is nothing to say.
    pub fn build_phrase(&self, text: &str, note: Note) -> Option<RenderedPhrase> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return None;
        }

        let length = self.estimate_length(&tokens);
        if length == 0 {
            return None;
        }

        let renderer = SegmentRenderer::new(self.sample_rate, self.params);
        let base_pitch = self.base_pitch(note);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut buffer = vec![0.0; length];
        let segments = tokens.iter().map(|token| renderer.render(token, base_pitch, &mut rng));
        let copied = concatenate(&mut buffer, segments);
        if copied < tokens.len() {
            tracing::debug!(
                "Dropping {} trailing segments of {note}, estimated {length} samples",
                tokens.len() - copied
            );
        }

        let mut phrase = RenderedPhrase::new(self.sample_rate, buffer);
        phrase.normalize();
        Some(phrase)
    }
}

/// Copies `segments` back to back into `buffer`. The first segment which does not fit
/// is dropped along with every segment after it. Returns the number of segments copied.
fn concatenate(buffer: &mut [f32], segments: impl IntoIterator<Item = Vec<f32>>) -> usize {
    let mut written = 0;
    let mut copied = 0;
    for segment in segments {
        let Some(target) = buffer.get_mut(written..written + segment.len()) else {
            break;
        };
        target.copy_from_slice(&segment);
        written += segment.len();
        copied += 1;
    }
    copied
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::audio::NORMALIZED_PEAK;

    const SAMPLE_RATE: u32 = 44100;

    fn builder(params: SynthParams) -> PhraseBuilder {
        PhraseBuilder::new(SAMPLE_RATE, params, 1234)
    }

    #[test]
    fn test_empty_text() {
        let builder = builder(SynthParams::default());
        assert!(builder.build_phrase("", Note::middle_c()).is_none());
        assert!(builder.build_phrase("   ", Note::middle_c()).is_none());
    }

    #[test]
    fn test_base_pitch() {
        let builder = builder(SynthParams {
            pitch: 2.0,
            ..Default::default()
        });
        assert_eq!(builder.base_pitch(Note::clamped(69)), 880.0);
    }

    #[test]
    fn test_normalized_peak() {
        let builder = builder(SynthParams::default());
        for text in ["hello world", "sch", "ai", "mama", "x"] {
            let phrase = builder.build_phrase(text, Note::middle_c()).unwrap();
            assert!(
                (phrase.peak() - NORMALIZED_PEAK).abs() < 1e-5,
                "{text} peaked at {}",
                phrase.peak()
            );
        }
    }

    #[test]
    fn test_length_matches_estimate() {
        let builder = builder(SynthParams::default());
        let text = "the quick brown fox";
        let phrase = builder.build_phrase(text, Note::middle_c()).unwrap();
        assert_eq!(phrase.len(), builder.estimate_length(&tokenize(text)));
    }

    #[test]
    fn test_all_segments_fit() {
        // Every segment is rendered, so the tail after the estimate is at most rounding slack
        let builder = builder(SynthParams::default());
        let renderer = SegmentRenderer::new(SAMPLE_RATE, SynthParams::default());
        let tokens = tokenize("formant synthesis");
        let rendered: usize = tokens.iter().map(|t| renderer.segment_length(t)).sum();
        let estimated = builder.estimate_length(&tokens);
        assert!(rendered <= estimated);
        assert!(estimated - rendered <= tokens.len() + 1);
    }

    #[test]
    fn test_concatenate_exact_fit() {
        let mut buffer = [0.0; 6];
        let copied = concatenate(&mut buffer, [vec![1.0; 2], vec![2.0; 4]]);
        assert_eq!(copied, 2);
        assert_eq!(buffer, [1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_concatenate_drops_overflow() {
        let mut buffer = [0.0; 10];
        let segments = [vec![1.0; 4], vec![2.0; 4], vec![3.0; 4], vec![4.0; 1]];
        let copied = concatenate(&mut buffer, segments);

        // The third segment is not partially copied, and the fourth is dropped even though it fits
        assert_eq!(copied, 2);
        assert_eq!(buffer[..8], [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
        assert_eq!(buffer[8..], [0.0, 0.0]);
    }

    #[test]
    fn test_deterministic() {
        let builder = builder(SynthParams::default());
        let a = builder.build_phrase("sing a song", Note::clamped(57)).unwrap();
        let b = builder.build_phrase("sing a song", Note::clamped(57)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rate_halves_length() {
        let normal = builder(SynthParams::default())
            .build_phrase("hello there", Note::middle_c())
            .unwrap();
        let fast = builder(SynthParams {
            rate: 2.0,
            ..Default::default()
        })
        .build_phrase("hello there", Note::middle_c())
        .unwrap();
        assert!(fast.len().abs_diff(normal.len() / 2) <= 1);
    }

    #[test]
    fn test_rate_is_clamped() {
        let fastest = builder(SynthParams {
            rate: 4.0,
            ..Default::default()
        })
        .build_phrase("hello", Note::middle_c())
        .unwrap();
        let too_fast = builder(SynthParams {
            rate: 400.0,
            ..Default::default()
        })
        .build_phrase("hello", Note::middle_c())
        .unwrap();
        assert_eq!(fastest.len(), too_fast.len());
    }

    #[test]
    fn test_surrounding_whitespace() {
        // Surrounding whitespace renders as silence around the vowel
        let builder = builder(SynthParams::default());
        let phrase = builder.build_phrase(" a ", Note::middle_c()).unwrap();
        assert!(phrase.len() > 0);
        assert!((phrase.peak() - NORMALIZED_PEAK).abs() < 1e-5);
    }
}
