//! Voice event handling
//!
//! [`SculkRecorder`] ties the pieces together: packets are filtered,
//! decrypted and decoded, buffered per speaker and checked for speech
//! activity; speak-end dispatches the utterance write to a blocking task.

pub mod events;
pub mod host;
mod recorder;

pub use events::{
    DisconnectNotice, SkipReason, SpeakEnded, SpeakOutcome, SpeakPacket, VoiceEventHandler,
};
pub use host::{Activation, ActivationResult, Clock, Speaker, SystemClock, VoiceHost};
pub use recorder::SculkRecorder;
