use crate::note::Note;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MidiEvent {
    NoteOn {
        channel: u8,
        note: Note,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        note: Note,
        velocity: u8,
    },
    ControlChange {
        channel: u8,
        control: u8,
        value: u8,
    },
    Invalid,
}

impl MidiEvent {
    pub fn from_raw(data: &[u8]) -> Self {
        match *data {
            [a @ 0x80..=0x8f, note, velocity] => MidiEvent::NoteOff {
                channel: a & 0x0f,
                note: note.into(),
                velocity,
            },
            // A note-on with zero velocity is a note-off by convention
            [a @ 0x90..=0x9f, note, 0] => MidiEvent::NoteOff {
                channel: a & 0x0f,
                note: note.into(),
                velocity: 0,
            },
            [a @ 0x90..=0x9f, note, velocity] => MidiEvent::NoteOn {
                channel: a & 0x0f,
                note: note.into(),
                velocity,
            },
            [a @ 0xb0..=0xbf, control, value] => MidiEvent::ControlChange {
                channel: a & 0x0f,
                control,
                value,
            },
            _ => MidiEvent::Invalid,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, MidiEvent::Invalid)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_raw() {
        assert_eq!(
            MidiEvent::from_raw(&[0x91, 60, 100]),
            MidiEvent::NoteOn {
                channel: 1,
                note: Note::middle_c(),
                velocity: 100
            }
        );
        assert_eq!(
            MidiEvent::from_raw(&[0x80, 60, 10]),
            MidiEvent::NoteOff {
                channel: 0,
                note: Note::middle_c(),
                velocity: 10
            }
        );
        assert!(matches!(
            MidiEvent::from_raw(&[0x90, 60, 0]),
            MidiEvent::NoteOff { .. }
        ));
        assert!(MidiEvent::from_raw(&[0xf8]).is_invalid());
        assert!(MidiEvent::from_raw(&[]).is_invalid());
    }
}
