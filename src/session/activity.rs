use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::registry::{SessionRegistry, SpeakerId};
use crate::audio::{contains_min_audio_level, PcmFrame};

/// Minimum time between two accepted activity signals for one speaker
pub const DEBOUNCE_WINDOW_MS: i64 = 500;

/// Decides when a speaker's frame should notify the world that they are speaking
#[derive(Debug, Clone)]
pub struct ActivityDetector {
    threshold_db: f64,
    debounce: Duration,
}

impl ActivityDetector {
    /// `threshold_db` is compared against the frame's peak level in dBFS
    pub fn new(threshold_db: f64) -> Self {
        Self {
            threshold_db,
            debounce: Duration::milliseconds(DEBOUNCE_WINDOW_MS),
        }
    }

    pub fn threshold_db(&self) -> f64 {
        self.threshold_db
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Accept the frame as a speech-activity signal, updating the speaker's
    /// last-activity time when it does.
    pub fn should_signal(
        &self,
        registry: &SessionRegistry,
        speaker: SpeakerId,
        frame: &PcmFrame,
        now: DateTime<Utc>,
    ) -> bool {
        // Early exit skips the level scan inside the window; claim_activity
        // repeats the check under the entry lock
        if let Some(last) = registry.last_activity(speaker) {
            if now - last < self.debounce {
                return false;
            }
        }

        if !contains_min_audio_level(&frame.samples, self.threshold_db) {
            return false;
        }

        let accepted = registry.claim_activity(speaker, now, self.debounce);
        if accepted {
            debug!("Speech activity from {}", speaker);
        }
        accepted
    }
}
