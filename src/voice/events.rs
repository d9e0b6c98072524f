use tokio::task::JoinHandle;
use uuid::Uuid;

use super::host::{ActivationResult, Speaker};
use crate::session::SpeakerId;

/// One inbound voice packet
#[derive(Debug, Clone)]
pub struct SpeakPacket {
    pub speaker: Speaker,
    /// Encrypted, compressed audio
    pub data: Vec<u8>,
    pub stereo: bool,
    pub activation_id: Uuid,
    /// Hearing distance; zero for non-proximity activations
    pub distance: u16,
    pub result: ActivationResult,
}

/// End of one utterance
#[derive(Debug, Clone)]
pub struct SpeakEnded {
    pub speaker: Speaker,
}

#[derive(Debug, Clone, Copy)]
pub struct DisconnectNotice {
    pub speaker_id: SpeakerId,
}

/// Why a packet was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    UnknownActivation,
    ActivationDisabled,
    Sneaking,
}

/// What happened to one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    Skipped(SkipReason),
    /// Decrypt or decode failed
    Dropped,
    Recorded { signalled: bool },
}

/// Entry points driven by the host's event dispatcher.
///
/// Events for one speaker arrive in order; events for different speakers
/// may arrive concurrently from any thread.
pub trait VoiceEventHandler: Send + Sync {
    fn on_speak(&self, packet: &SpeakPacket) -> SpeakOutcome;

    /// Drain the speaker's utterance and write it in the background.
    ///
    /// Returns the write task, or `None` when there was nothing to write.
    fn on_speak_ended(&self, event: &SpeakEnded) -> Option<JoinHandle<()>>;

    /// Forget the speaker. Audio still queued for an utterance that never
    /// got its speak-end is written like one; returns that write task.
    fn on_disconnect(&self, notice: &DisconnectNotice) -> Option<JoinHandle<()>>;
}
