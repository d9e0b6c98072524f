use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::codec::EncoderInfo;
use crate::error::EncryptionError;
use crate::session::SpeakerId;

/// A connected player as seen by the voice server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: SpeakerId,
    /// Display name, used in recording filenames
    pub name: String,
    pub sneaking: bool,
}

impl Speaker {
    pub fn new(id: SpeakerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sneaking: false,
        }
    }
}

/// A named voice-input channel (proximity, whisper, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub id: Uuid,
    pub name: String,
    pub stereo_supported: bool,
    /// Encoder announced by clients on this activation, if any
    pub encoder: Option<EncoderInfo>,
}

/// How the host's activation handling treated a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationResult {
    #[default]
    Unhandled,
    Ignored,
    Handled,
}

/// Capabilities the voice server provides to the recorder
pub trait VoiceHost: Send + Sync {
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, EncryptionError>;

    fn activation(&self, id: Uuid) -> Option<Activation>;

    /// Notify the speaker's world that the speaker made a sound
    fn send_game_event(&self, speaker: &Speaker, game_event: &str);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
