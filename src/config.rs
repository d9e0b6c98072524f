use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub sculk: SculkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "sculk-recorder".to_string(),
        }
    }
}

/// Server-wide voice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub sample_rate: u32,
    pub mtu_size: usize,
    /// Directory utterance recordings are written to
    pub records_dir: PathBuf,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            mtu_size: 1024,
            records_dir: PathBuf::from("voice_chat_records"),
        }
    }
}

/// Speech-activity and recording behaviour, reloadable at runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SculkConfig {
    /// Minimum peak level in dBFS for a frame to count as speech
    pub activation_threshold: f64,
    /// Whether sneaking players can trigger activity and recording
    pub sneak_activation: bool,
    /// Game event sent to the world on speech activity
    pub game_event: String,
    /// Offset from UTC used for recording filenames
    pub utc_offset_minutes: i32,
    pub activations: ActivationsConfig,
}

impl SculkConfig {
    /// Timezone recording filenames are formatted in; falls back to UTC if
    /// the configured offset is out of range
    pub fn filename_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for SculkConfig {
    fn default() -> Self {
        Self {
            activation_threshold: -30.0,
            sneak_activation: true,
            game_event: "minecraft:eat".to_string(),
            utc_offset_minutes: 180,
            activations: ActivationsConfig::default(),
        }
    }
}

/// Per-activation enable flags with a default for unlisted activations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationsConfig {
    #[serde(default = "default_true")]
    pub default: bool,
    #[serde(flatten)]
    pub overrides: HashMap<String, bool>,
}

fn default_true() -> bool {
    true
}

impl Default for ActivationsConfig {
    fn default() -> Self {
        Self {
            default: true,
            overrides: HashMap::new(),
        }
    }
}

impl ActivationsConfig {
    /// Explicit flag for an activation, matched case-insensitively
    pub fn get_by_activation_name(&self, name: &str) -> Option<bool> {
        self.overrides
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, enabled)| *enabled)
    }

    /// Whether a packet on this activation should be processed.
    ///
    /// Packets with no distance must be explicitly or default enabled;
    /// distance packets pass unless the activation is explicitly disabled.
    pub fn is_enabled(&self, name: &str, distance: u16) -> bool {
        let explicit = self.get_by_activation_name(name);
        if distance == 0 {
            explicit.unwrap_or(self.default)
        } else {
            explicit != Some(false)
        }
    }
}

impl Config {
    /// Load from a TOML file (extension optional), then `SCULK__*` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("SCULK").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Parse configuration from an in-memory TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()
            .context("Failed to read config")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.voice.sample_rate, 48_000);
        assert_eq!(config.sculk.activation_threshold, -30.0);
        assert!(config.sculk.sneak_activation);
        assert_eq!(config.sculk.filename_offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let sculk = SculkConfig {
            utc_offset_minutes: 100_000,
            ..SculkConfig::default()
        };
        assert_eq!(sculk.filename_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_activation_rules() {
        let mut activations = ActivationsConfig {
            default: false,
            overrides: HashMap::new(),
        };
        activations.overrides.insert("whisper".to_string(), false);
        activations.overrides.insert("proximity".to_string(), true);

        // No distance: explicit flag or default
        assert!(activations.is_enabled("proximity", 0));
        assert!(!activations.is_enabled("whisper", 0));
        assert!(!activations.is_enabled("group", 0));

        // With distance: only an explicit false rejects
        assert!(activations.is_enabled("group", 16));
        assert!(!activations.is_enabled("Whisper", 16));
    }
}
