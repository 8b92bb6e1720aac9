//! The fixed phoneme rule table.
//!
//! Each rule maps a short run of (normalized, lowercase ASCII) text to a
//! [`PhonemeDescriptor`]. Formant values are rough averages for an adult
//! speaker; accuracy is not a goal, only a recognisable vowel/consonant colour.

/// Formant centre frequencies F1, F2 and F3 in Hz.
pub type Formants = [f32; 3];

/// Everything the segment renderer needs to synthesise one phoneme.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhonemeDescriptor {
    /// Whether the excitation includes the harmonic buzz.
    pub voiced: bool,
    /// Silent segments only contribute their duration.
    pub silence: bool,
    /// Nominal duration in seconds, before the rate multiplier is applied.
    pub duration: f32,
    /// Formant frequencies at the start of the segment.
    pub start: Formants,
    /// Formant frequencies at the end of the segment. Equal to `start` unless the phoneme glides.
    pub end: Formants,
    /// Formant bandwidths in Hz.
    pub bandwidths: [f32; 3],
    /// Amount of noise in the excitation, between 0 and 1.
    pub noise: f32,
}

const VOWEL_BW: [f32; 3] = [80.0, 100.0, 150.0];
const NASAL_BW: [f32; 3] = [100.0, 150.0, 200.0];
const APPROX_BW: [f32; 3] = [90.0, 120.0, 180.0];
const FRICATIVE_BW: [f32; 3] = [250.0, 350.0, 450.0];
const PLOSIVE_BW: [f32; 3] = [150.0, 250.0, 350.0];

/// Noise amount above which a descriptor counts as fricative-like.
pub const SIBILANT_NOISE: f32 = 0.6;

/// Duration of the pause inserted for whitespace.
pub const WORD_GAP: f32 = 0.08;

impl PhonemeDescriptor {
    pub const fn silence(duration: f32) -> Self {
        Self {
            voiced: false,
            silence: true,
            duration,
            start: [0.0; 3],
            end: [0.0; 3],
            bandwidths: [0.0; 3],
            noise: 0.0,
        }
    }

    const fn vowel(formants: Formants, duration: f32) -> Self {
        Self::glide(formants, formants, duration)
    }

    const fn glide(start: Formants, end: Formants, duration: f32) -> Self {
        Self {
            voiced: true,
            silence: false,
            duration,
            start,
            end,
            bandwidths: VOWEL_BW,
            noise: 0.0,
        }
    }

    const fn nasal(formants: Formants) -> Self {
        Self {
            voiced: true,
            silence: false,
            duration: 0.08,
            start: formants,
            end: formants,
            bandwidths: NASAL_BW,
            noise: 0.0,
        }
    }

    const fn approximant(formants: Formants) -> Self {
        Self {
            voiced: true,
            silence: false,
            duration: 0.07,
            start: formants,
            end: formants,
            bandwidths: APPROX_BW,
            noise: 0.0,
        }
    }

    const fn fricative(formants: Formants, voiced: bool, noise: f32, duration: f32) -> Self {
        Self {
            voiced,
            silence: false,
            duration,
            start: formants,
            end: formants,
            bandwidths: FRICATIVE_BW,
            noise,
        }
    }

    const fn plosive(formants: Formants, voiced: bool) -> Self {
        Self {
            voiced,
            silence: false,
            duration: 0.05,
            start: formants,
            end: formants,
            bandwidths: PLOSIVE_BW,
            noise: if voiced { 0.2 } else { 0.6 },
        }
    }

    /// Whether the descriptor is noisy enough to need extra unfiltered sibilance.
    pub fn is_sibilant(&self) -> bool {
        !self.silence && self.noise >= SIBILANT_NOISE
    }

    /// Whether the formants move during the segment.
    pub fn is_glide(&self) -> bool {
        self.start != self.end
    }
}

// Vowel targets
const A: Formants = [730.0, 1090.0, 2440.0];
const E: Formants = [530.0, 1840.0, 2480.0];
const I: Formants = [270.0, 2290.0, 3010.0];
const O: Formants = [570.0, 840.0, 2410.0];
const U: Formants = [300.0, 870.0, 2240.0];
const AE: Formants = [660.0, 1720.0, 2410.0];
const OE: Formants = [460.0, 1500.0, 2300.0];
const UE: Formants = [270.0, 1750.0, 2200.0];

/// Used for any character without a rule of its own.
pub const FALLBACK: PhonemeDescriptor = PhonemeDescriptor {
    voiced: true,
    silence: false,
    duration: 0.06,
    start: [400.0, 1500.0, 2500.0],
    end: [400.0, 1500.0, 2500.0],
    bandwidths: APPROX_BW,
    noise: 0.1,
};

/// Used for every whitespace character.
pub const GAP: PhonemeDescriptor = PhonemeDescriptor::silence(WORD_GAP);

type Rule = (&'static str, PhonemeDescriptor);

const TRIGRAPHS: &[Rule] = &[
    ("sch", PhonemeDescriptor::fricative([2200.0, 2800.0, 3500.0], false, 0.9, 0.12)),
];

const DIGRAPHS: &[Rule] = &[
    // Long vowels
    ("aa", PhonemeDescriptor::vowel(A, 0.2)),
    ("ee", PhonemeDescriptor::vowel(I, 0.2)),
    ("ie", PhonemeDescriptor::vowel(I, 0.2)),
    ("oo", PhonemeDescriptor::vowel(U, 0.2)),
    // Umlauts, as produced by diacritic expansion
    ("ae", PhonemeDescriptor::vowel(AE, 0.16)),
    ("oe", PhonemeDescriptor::vowel(OE, 0.16)),
    ("ue", PhonemeDescriptor::vowel(UE, 0.16)),
    // Diphthongs
    ("ai", PhonemeDescriptor::glide(A, I, 0.22)),
    ("ay", PhonemeDescriptor::glide(A, I, 0.22)),
    ("ei", PhonemeDescriptor::glide(A, I, 0.22)),
    ("au", PhonemeDescriptor::glide(A, U, 0.22)),
    ("ow", PhonemeDescriptor::glide(O, U, 0.22)),
    ("oi", PhonemeDescriptor::glide(O, I, 0.22)),
    ("oy", PhonemeDescriptor::glide(O, I, 0.22)),
    ("eu", PhonemeDescriptor::glide(O, I, 0.22)),
    // Consonant clusters
    ("sh", PhonemeDescriptor::fricative([2200.0, 2800.0, 3500.0], false, 0.9, 0.12)),
    ("ch", PhonemeDescriptor::fricative([1800.0, 2600.0, 3400.0], false, 0.8, 0.1)),
    ("th", PhonemeDescriptor::fricative([1400.0, 2600.0, 3800.0], false, 0.5, 0.09)),
    ("ng", PhonemeDescriptor::nasal([250.0, 2300.0, 2750.0])),
];

const MONOGRAPHS: &[Rule] = &[
    ("a", PhonemeDescriptor::vowel(A, 0.14)),
    ("e", PhonemeDescriptor::vowel(E, 0.14)),
    ("i", PhonemeDescriptor::vowel(I, 0.14)),
    ("o", PhonemeDescriptor::vowel(O, 0.14)),
    ("u", PhonemeDescriptor::vowel(U, 0.14)),
    ("y", PhonemeDescriptor::vowel(UE, 0.14)),
    // Fricatives
    ("s", PhonemeDescriptor::fricative([4500.0, 5500.0, 6500.0], false, 0.9, 0.1)),
    ("z", PhonemeDescriptor::fricative([4500.0, 5500.0, 6500.0], true, 0.6, 0.1)),
    ("f", PhonemeDescriptor::fricative([1400.0, 3000.0, 6000.0], false, 0.7, 0.1)),
    ("v", PhonemeDescriptor::fricative([1400.0, 3000.0, 6000.0], true, 0.4, 0.08)),
    ("h", PhonemeDescriptor::fricative([500.0, 1500.0, 2500.0], false, 0.5, 0.07)),
    ("x", PhonemeDescriptor::fricative([1800.0, 2600.0, 3400.0], false, 0.8, 0.12)),
    // Nasals
    ("m", PhonemeDescriptor::nasal([250.0, 1200.0, 2100.0])),
    ("n", PhonemeDescriptor::nasal([250.0, 1700.0, 2600.0])),
    // Approximants
    ("l", PhonemeDescriptor::approximant([360.0, 1300.0, 2700.0])),
    ("r", PhonemeDescriptor::approximant([420.0, 1300.0, 1600.0])),
    ("w", PhonemeDescriptor::approximant([290.0, 610.0, 2150.0])),
    ("j", PhonemeDescriptor::approximant([280.0, 2250.0, 2900.0])),
    // Plosives
    ("p", PhonemeDescriptor::plosive([400.0, 1100.0, 2200.0], false)),
    ("t", PhonemeDescriptor::plosive([400.0, 1800.0, 2700.0], false)),
    ("k", PhonemeDescriptor::plosive([300.0, 2000.0, 2600.0], false)),
    ("c", PhonemeDescriptor::plosive([300.0, 2000.0, 2600.0], false)),
    ("q", PhonemeDescriptor::plosive([300.0, 2000.0, 2600.0], false)),
    ("b", PhonemeDescriptor::plosive([400.0, 1100.0, 2200.0], true)),
    ("d", PhonemeDescriptor::plosive([400.0, 1800.0, 2700.0], true)),
    ("g", PhonemeDescriptor::plosive([300.0, 2000.0, 2600.0], true)),
];

/// Looks up the rule for an exact run of normalized text.
pub fn lookup(key: &str) -> Option<&'static PhonemeDescriptor> {
    let rules = match key.chars().count() {
        3 => TRIGRAPHS,
        2 => DIGRAPHS,
        1 => MONOGRAPHS,
        _ => return None,
    };
    rules.iter().find(|(k, _)| *k == key).map(|(_, descriptor)| descriptor)
}

/// The longest rule key, in characters.
pub const MAX_RULE_LEN: usize = 3;
