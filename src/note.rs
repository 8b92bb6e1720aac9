use std::sync::OnceLock;

use crate::util::hz_from_note;

/// A MIDI note number between 0 and 127.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Note(u8);

impl From<u8> for Note {
    fn from(value: u8) -> Self {
        Self::clamped(value as i32)
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Debug for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Note {
    pub const MAX: u8 = 127;

    /// Creates a note from an arbitrary integer, clamping it into the MIDI range.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, Self::MAX as i32) as u8)
    }

    pub fn middle_c() -> Self {
        Self(60)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Index of the note into a 128-entry table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn name(&self) -> &'static str {
        note_name(self.0)
    }

    pub fn frequency(&self) -> f32 {
        hz_from_note(self.0)
    }

    pub fn transpose(&self, offset: i8) -> Self {
        Self::clamped(self.0 as i32 + offset as i32)
    }
}

/// Clamps a MIDI velocity into 1..=127 and scales it to a gain in (0, 1].
pub fn velocity_gain(velocity: i32) -> f32 {
    velocity.clamp(1, 127) as f32 / 127.0
}

fn note_name(note: u8) -> &'static str {
    static NOTE_NAMES: OnceLock<[String; 128]> = OnceLock::new();

    let names = NOTE_NAMES.get_or_init(|| {
        const NOTES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
        std::array::from_fn(|i| format!("{}{}", NOTES[i % 12], (i / 12) as i32 - 1))
    });

    &names[note as usize]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(Note::clamped(-5).number(), 0);
        assert_eq!(Note::clamped(200).number(), 127);
        assert_eq!(Note::clamped(64).number(), 64);
        assert_eq!(Note::from(255).number(), 127);
    }

    #[test]
    fn test_clamp_idempotent() {
        for value in [-1000, -1, 0, 1, 60, 127, 128, 1000] {
            let once = Note::clamped(value);
            let twice = Note::clamped(once.number() as i32);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(Note::middle_c().name(), "C4");
        assert_eq!(Note::clamped(0).name(), "C-1");
        assert_eq!(Note::clamped(69).name(), "A4");
        assert_eq!(Note::clamped(127).name(), "G9");
    }

    #[test]
    fn test_transpose() {
        assert_eq!(Note::middle_c().transpose(7).number(), 67);
        assert_eq!(Note::clamped(2).transpose(-12).number(), 0);
        assert_eq!(Note::clamped(125).transpose(12).number(), 127);
    }

    #[test]
    fn test_velocity_gain() {
        assert_eq!(velocity_gain(127), 1.0);
        assert_eq!(velocity_gain(500), 1.0);
        assert_eq!(velocity_gain(0), 1.0 / 127.0);
        assert_eq!(velocity_gain(-20), 1.0 / 127.0);
    }
}
