use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::audio::{concat_frames, write_pcm_wav, PcmFrame};
use crate::error::RecordingError;
use crate::session::{SessionRegistry, SpeakerId};

/// Timestamp layout used in recording filenames
pub const FILENAME_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Frames drained from one speaker at speak-end, in arrival order
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker_id: SpeakerId,
    pub speaker_name: String,
    pub frames: Vec<PcmFrame>,
    pub ended_at: DateTime<Utc>,
}

impl Utterance {
    pub fn sample_count(&self) -> usize {
        self.frames.iter().map(PcmFrame::len).sum()
    }
}

/// Description of a recording that made it to disk
#[derive(Debug, Clone, Serialize)]
pub struct RecordingMetadata {
    pub speaker_id: SpeakerId,
    pub speaker_name: String,
    pub path: PathBuf,
    pub sample_rate: u32,
    pub sample_count: usize,
    pub frame_count: usize,
    pub duration_secs: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Result of one background flush
#[derive(Debug)]
pub enum RecordingEvent {
    Saved(RecordingMetadata),
    /// Speak-end arrived with nothing queued; no file was written
    Empty { speaker_id: SpeakerId },
    Failed {
        speaker_id: SpeakerId,
        error: RecordingError,
    },
}

/// Replace anything that is not safe in a filename
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// `<name>_<yyyy-MM-dd_HH-mm-ss>.wav` with the time shown in `offset`
pub fn recording_file_name(speaker_name: &str, at: DateTime<Utc>, offset: &FixedOffset) -> String {
    format!(
        "{}_{}.wav",
        sanitize_name(speaker_name),
        at.with_timezone(offset).format(FILENAME_TIME_FORMAT)
    )
}

/// Turns drained speaker sessions into WAV files under one directory
#[derive(Debug)]
pub struct UtteranceWriter {
    records_dir: PathBuf,
}

impl UtteranceWriter {
    pub fn new(records_dir: impl Into<PathBuf>) -> Result<Self, RecordingError> {
        let records_dir = records_dir.into();
        fs::create_dir_all(&records_dir).map_err(|source| RecordingError::Io {
            path: records_dir.clone(),
            source,
        })?;

        info!("Voice recordings will be written to {:?}", records_dir);

        Ok(Self { records_dir })
    }

    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    /// Drain the speaker's session into an utterance.
    ///
    /// Returns `None` when nothing was queued. A speaker with no session at
    /// all is reported as an anomaly.
    pub fn take_utterance(
        &self,
        registry: &SessionRegistry,
        speaker_id: SpeakerId,
        speaker_name: &str,
        ended_at: DateTime<Utc>,
    ) -> Option<Utterance> {
        let frames = match registry.drain_all(speaker_id) {
            Some(frames) => frames,
            None => {
                warn!(
                    "No audio session for speaker {} ({}) at speak end",
                    speaker_name, speaker_id
                );
                return None;
            }
        };

        if frames.is_empty() {
            debug!("Speak end for {} with no queued audio", speaker_name);
            return None;
        }

        Some(Utterance {
            speaker_id,
            speaker_name: speaker_name.to_string(),
            frames,
            ended_at,
        })
    }

    /// Concatenate the utterance and write it as a mono WAV file
    pub fn write(
        &self,
        utterance: &Utterance,
        sample_rate: u32,
        offset: &FixedOffset,
    ) -> Result<RecordingMetadata, RecordingError> {
        let samples = concat_frames(&utterance.frames);
        let path = self.records_dir.join(recording_file_name(
            &utterance.speaker_name,
            utterance.ended_at,
            offset,
        ));

        let output = write_pcm_wav(&path, &samples, sample_rate)?;

        let duration_secs = if sample_rate == 0 {
            0.0
        } else {
            output.sample_count as f64 / sample_rate as f64
        };

        Ok(RecordingMetadata {
            speaker_id: utterance.speaker_id,
            speaker_name: utterance.speaker_name.clone(),
            path: output.path,
            sample_rate,
            sample_count: output.sample_count,
            frame_count: utterance.frames.len(),
            duration_secs,
            recorded_at: utterance.ended_at,
        })
    }

    /// Drain and write in one step on the calling thread.
    ///
    /// `Ok(None)` means there was nothing to write.
    pub fn flush(
        &self,
        registry: &SessionRegistry,
        speaker_id: SpeakerId,
        speaker_name: &str,
        sample_rate: u32,
        ended_at: DateTime<Utc>,
        offset: &FixedOffset,
    ) -> Result<Option<RecordingMetadata>, RecordingError> {
        match self.take_utterance(registry, speaker_id, speaker_name, ended_at) {
            Some(utterance) => self.write(&utterance, sample_rate, offset).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Steve"), "Steve");
        assert_eq!(sanitize_name("Alex_99-x"), "Alex_99-x");
        assert_eq!(sanitize_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_name(""), "unknown");
    }

    #[test]
    fn test_file_name_uses_fixed_offset() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 22, 5, 7).unwrap();
        let moscow = FixedOffset::east_opt(3 * 3600).unwrap();

        assert_eq!(
            recording_file_name("Steve", at, &moscow),
            "Steve_2024-03-10_01-05-07.wav"
        );

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            recording_file_name("Steve", at, &utc),
            "Steve_2024-03-09_22-05-07.wav"
        );
    }
}
