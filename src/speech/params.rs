/// Synthesis controls applied when a phrase is built.
///
/// Values are stored as set and clamped where they are used, so setting an
/// out-of-range value and then a sane one behaves as expected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SynthParams {
    /// Speaking rate multiplier. Durations are divided by this.
    pub rate: f32,
    /// Multiplier applied to the note frequency to get the excitation pitch.
    pub pitch: f32,
    /// Multiplier applied to every formant centre frequency.
    pub formant_shift: f32,
    /// Gain of the voiced (harmonic) excitation.
    pub voice_level: f32,
    /// Gain of the noise excitation.
    pub noise_level: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            formant_shift: 1.0,
            voice_level: 0.8,
            noise_level: 0.35,
        }
    }
}

impl SynthParams {
    pub fn rate(&self) -> f32 {
        self.rate.clamp(0.2, 4.0)
    }

    pub fn pitch(&self) -> f32 {
        self.pitch.clamp(0.25, 4.0)
    }

    /// The shifted formant frequencies are kept in range by the resonators.
    pub fn formant_shift(&self) -> f32 {
        self.formant_shift.max(0.0)
    }

    pub fn voice_level(&self) -> f32 {
        self.voice_level.max(0.0)
    }

    pub fn noise_level(&self) -> f32 {
        self.noise_level.max(0.0)
    }
}

/// A named instrument control.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parameter {
    Rate,
    Pitch,
    FormantShift,
    VoiceLevel,
    NoiseLevel,
    Volume,
    Pan,
}

impl Parameter {
    /// Resolves a control from its name, ignoring case. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let param = match name.as_str() {
            "rate" | "speed" => Parameter::Rate,
            "pitch" | "voicepitch" => Parameter::Pitch,
            "formantshift" => Parameter::FormantShift,
            "voicelevel" => Parameter::VoiceLevel,
            "noiselevel" => Parameter::NoiseLevel,
            "volume" => Parameter::Volume,
            "pan" => Parameter::Pan,
            _ => return None,
        };
        Some(param)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Parameter::from_name("Rate"), Some(Parameter::Rate));
        assert_eq!(Parameter::from_name("SPEED"), Some(Parameter::Rate));
        assert_eq!(Parameter::from_name("voicePitch"), Some(Parameter::Pitch));
        assert_eq!(Parameter::from_name("FormantShift"), Some(Parameter::FormantShift));
        assert_eq!(Parameter::from_name("noiselevel"), Some(Parameter::NoiseLevel));
        assert_eq!(Parameter::from_name("Pan"), Some(Parameter::Pan));
        assert_eq!(Parameter::from_name("Reverb"), None);
        assert_eq!(Parameter::from_name(""), None);
    }

    #[test]
    fn test_clamped_accessors() {
        let params = SynthParams {
            rate: 10.0,
            pitch: 0.0,
            formant_shift: 5.0,
            voice_level: -1.0,
            noise_level: 3.0,
        };
        assert_eq!(params.rate(), 4.0);
        assert_eq!(params.pitch(), 0.25);
        assert_eq!(params.formant_shift(), 5.0);
        assert_eq!(params.voice_level(), 0.0);
        assert_eq!(params.noise_level(), 3.0);

        let params = SynthParams { formant_shift: -1.0, ..Default::default() };
        assert_eq!(params.formant_shift(), 0.0);

        let params = SynthParams { rate: 0.01, ..Default::default() };
        assert_eq!(params.rate(), 0.2);
    }
}
