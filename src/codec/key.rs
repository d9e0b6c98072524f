use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Codec used when an activation does not announce an encoder
pub const DEFAULT_CODEC: &str = "opus";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    pub fn is_stereo(self) -> bool {
        self == ChannelLayout::Stereo
    }

    pub fn channels(self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

/// Encoder descriptor announced by an activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderInfo {
    pub name: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl EncoderInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
        }
    }
}

impl Default for EncoderInfo {
    fn default() -> Self {
        Self::new(DEFAULT_CODEC)
    }
}

/// Identity of a decoder configuration: codec name plus channel layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodecKey {
    pub codec: String,
    pub layout: ChannelLayout,
}

impl CodecKey {
    pub fn new(codec: impl Into<String>, layout: ChannelLayout) -> Self {
        Self {
            codec: codec.into(),
            layout,
        }
    }

    /// Pick the decoder configuration for a packet.
    ///
    /// Stereo is used only when the packet is flagged stereo *and* the
    /// activation it arrived on supports stereo.
    pub fn select(
        encoder: Option<&EncoderInfo>,
        packet_stereo: bool,
        activation_stereo_supported: bool,
    ) -> Self {
        let codec = encoder
            .map(|info| info.name.as_str())
            .unwrap_or(DEFAULT_CODEC);

        let layout = if packet_stereo && activation_stereo_supported {
            ChannelLayout::Stereo
        } else {
            ChannelLayout::Mono
        };

        Self::new(codec, layout)
    }
}

impl fmt::Display for CodecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.layout {
            ChannelLayout::Mono => "mono",
            ChannelLayout::Stereo => "stereo",
        };
        write!(f, "{}_{}", self.codec, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_opus_mono() {
        let key = CodecKey::select(None, false, false);
        assert_eq!(key, CodecKey::new("opus", ChannelLayout::Mono));
        assert_eq!(key.to_string(), "opus_mono");
    }

    #[test]
    fn test_select_forces_mono_without_activation_support() {
        let info = EncoderInfo::new("speex");
        let key = CodecKey::select(Some(&info), true, false);
        assert_eq!(key, CodecKey::new("speex", ChannelLayout::Mono));
    }

    #[test]
    fn test_select_stereo_needs_both_flags() {
        let key = CodecKey::select(None, true, true);
        assert_eq!(key.layout, ChannelLayout::Stereo);
        assert_eq!(key.to_string(), "opus_stereo");

        let key = CodecKey::select(None, false, true);
        assert_eq!(key.layout, ChannelLayout::Mono);
    }
}
