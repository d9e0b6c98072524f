//! Utterance assembly and persistence
//!
//! On speak-end a speaker's queued frames are drained in arrival order,
//! concatenated and written as one mono 16-bit WAV file per utterance.

mod writer;

pub use writer::{
    recording_file_name, sanitize_name, RecordingEvent, RecordingMetadata, Utterance,
    UtteranceWriter, FILENAME_TIME_FORMAT,
};
