use super::key::EncoderInfo;
use crate::error::DecodeError;

/// Frame duration every voice codec is configured for
pub const FRAME_DURATION_MS: u32 = 20;

/// Stateful decompressor bound to one codec configuration.
///
/// Implementations keep bitstream state between calls, so callers must
/// `reset` immediately before each independent `decode`.
pub trait AudioDecoder: Send {
    /// Return the decoder to a clean state. Never fails.
    fn reset(&mut self);

    /// Decode one packet. Stereo decoders return interleaved samples.
    fn decode(&mut self, data: &[u8]) -> Result<Vec<i16>, DecodeError>;
}

/// Parameters handed to the host when a decoder has to be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderParams {
    pub sample_rate: u32,
    pub stereo: bool,
    /// Samples per channel in one frame
    pub frame_size: usize,
    pub mtu_size: usize,
}

impl DecoderParams {
    pub fn new(sample_rate: u32, stereo: bool, mtu_size: usize) -> Self {
        Self {
            sample_rate,
            stereo,
            frame_size: ((sample_rate / 1_000) * FRAME_DURATION_MS) as usize,
            mtu_size,
        }
    }
}

/// Host capability that builds decoders for announced encoders
pub trait DecoderFactory: Send + Sync {
    fn create(
        &self,
        encoder: &EncoderInfo,
        params: &DecoderParams,
    ) -> Result<Box<dyn AudioDecoder>, DecodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_is_twenty_ms() {
        assert_eq!(DecoderParams::new(48_000, false, 1024).frame_size, 960);
        assert_eq!(DecoderParams::new(16_000, true, 1024).frame_size, 320);
    }
}
