//! Loudness metric used for speech activity detection.
//!
//! The metric is the frame's peak level in dBFS: `20 * log10(max|s| / 32768)`.
//! Full scale is 0 dB, silence is negative infinity.

const FULL_SCALE: f64 = 32768.0;

/// Peak level of a frame in dBFS
pub fn peak_level_db(samples: &[i16]) -> f64 {
    let peak = samples
        .iter()
        .map(|&s| (s as i32).unsigned_abs())
        .max()
        .unwrap_or(0);

    if peak == 0 {
        return f64::NEG_INFINITY;
    }

    20.0 * (peak as f64 / FULL_SCALE).log10()
}

/// True when the frame's peak level reaches `threshold_db`
pub fn contains_min_audio_level(samples: &[i16], threshold_db: f64) -> bool {
    peak_level_db(samples) >= threshold_db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_is_negative_infinity() {
        assert_eq!(peak_level_db(&[0, 0, 0]), f64::NEG_INFINITY);
        assert_eq!(peak_level_db(&[]), f64::NEG_INFINITY);
        assert!(!contains_min_audio_level(&[0; 960], -100.0));
    }

    #[test]
    fn test_full_scale_is_zero_db() {
        assert!(peak_level_db(&[i16::MIN]).abs() < 1e-9);
        assert!(peak_level_db(&[0, i16::MAX]) < 0.0);
        assert!(peak_level_db(&[0, i16::MAX]) > -0.001);
    }

    #[test]
    fn test_peak_uses_loudest_sample() {
        // 3277 / 32768 is about -20 dBFS
        let samples = [10, -3277, 100];
        let level = peak_level_db(&samples);
        assert!((level + 20.0).abs() < 0.01, "got {}", level);

        assert!(contains_min_audio_level(&samples, -30.0));
        assert!(!contains_min_audio_level(&samples, -10.0));
    }
}
