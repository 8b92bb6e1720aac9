/// Converts an interleaved signal with any number of channels to a mono signal
/// by averaging the channels of each frame.
pub fn interleaved_to_mono(input: &[f32], channels: usize, mono: &mut Vec<f32>) {
    mono.clear();
    if channels == 0 {
        return;
    }
    let scale = (channels as f32).recip();
    mono.extend(input.chunks_exact(channels).map(|frame| scale * frame.iter().sum::<f32>()));
}

/// Computes the left and right channel gains for a pan position between -1.0 (left) and 1.0 (right).
/// Panning towards one side attenuates the other, the centre leaves both at `volume`.
pub fn pan_gains(volume: f32, pan: f32) -> (f32, f32) {
    let pan = pan.clamp(-1.0, 1.0);
    let left = volume * (1.0 - pan.max(0.0));
    let right = volume * (1.0 + pan.min(0.0));
    (left, right)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_interleaved_to_mono() {
        let mut mono = vec![9.0];
        interleaved_to_mono(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, &mut mono);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);

        interleaved_to_mono(&[0.1, 0.2, 0.3], 1, &mut mono);
        assert_eq!(mono, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_pan_gains() {
        assert_eq!(pan_gains(1.0, 0.0), (1.0, 1.0));
        assert_eq!(pan_gains(0.5, -1.0), (0.5, 0.0));
        assert_eq!(pan_gains(0.5, 1.0), (0.0, 0.5));
        assert_eq!(pan_gains(1.0, 0.5), (0.5, 1.0));
        assert_eq!(pan_gains(1.0, -4.0), (1.0, 0.0));
    }
}
