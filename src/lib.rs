pub mod audio;
pub mod codec;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;
pub mod voice;

pub use audio::{AudioFile, PcmFrame};
pub use codec::{
    AudioDecoder, ChannelLayout, CodecKey, DecoderCache, DecoderFactory, DecoderParams, EncoderInfo,
};
pub use config::{ActivationsConfig, Config, SculkConfig, VoiceConfig};
pub use error::{DecodeError, EncryptionError, PacketError, RecordingError};
pub use recording::{RecordingEvent, RecordingMetadata, Utterance, UtteranceWriter};
pub use session::{ActivityDetector, DisconnectOutcome, SessionRegistry, SpeakerId};
pub use voice::{
    Activation, ActivationResult, Clock, DisconnectNotice, SculkRecorder, SkipReason, SpeakEnded,
    SpeakOutcome, SpeakPacket, Speaker, SystemClock, VoiceEventHandler, VoiceHost,
};
