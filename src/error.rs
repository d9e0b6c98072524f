use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a compressed voice packet into PCM
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed packet for codec {codec}: {reason}")]
    Malformed { codec: String, reason: String },
    #[error("codec {0} is not supported by this server")]
    Unsupported(String),
    #[error("failed to create decoder for {codec}: {reason}")]
    Creation { codec: String, reason: String },
}

#[derive(Error, Debug)]
#[error("failed to decrypt voice packet: {0}")]
pub struct EncryptionError(pub String);

/// Any failure scoped to a single inbound packet
#[derive(Error, Debug)]
pub enum PacketError {
    #[error(transparent)]
    Decrypt(#[from] EncryptionError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("WAV encoding failed for {path:?}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("background recording task failed: {0}")]
    Task(String),
}
