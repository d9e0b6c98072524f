use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::audio::PcmFrame;

/// Stable identifier of a connected speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeakerId(pub Uuid);

impl SpeakerId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for SpeakerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Default)]
struct SpeakerSession {
    frames: VecDeque<PcmFrame>,
}

/// What a disconnect did to the speaker's queued audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// No session existed
    NoSession,
    /// The session was empty and has been removed
    Removed,
    /// The session has been removed; these frames were still queued and
    /// belong to the caller now, oldest first
    Retained { frames: Vec<PcmFrame> },
}

/// Owner of every speaker's frame queue and last-activity time.
///
/// All operations on one speaker go through that speaker's map entry, so an
/// append never interleaves with a drain. Different speakers only meet on
/// the map's shard locks.
pub struct SessionRegistry {
    sessions: DashMap<SpeakerId, SpeakerSession>,
    last_activity: DashMap<SpeakerId, DateTime<Utc>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            last_activity: DashMap::new(),
        }
    }

    /// Queue a frame for the speaker, creating the session on first use
    pub fn append(&self, speaker: SpeakerId, frame: PcmFrame) {
        self.sessions
            .entry(speaker)
            .or_default()
            .frames
            .push_back(frame);
    }

    /// Remove and return everything queued for the speaker, oldest first.
    ///
    /// `None` means no session exists at all. The session itself is left in
    /// place, empty.
    pub fn drain_all(&self, speaker: SpeakerId) -> Option<Vec<PcmFrame>> {
        self.sessions
            .get_mut(&speaker)
            .map(|mut session| std::mem::take(&mut session.frames).into())
    }

    pub fn queued_frames(&self, speaker: SpeakerId) -> usize {
        self.sessions
            .get(&speaker)
            .map(|session| session.frames.len())
            .unwrap_or(0)
    }

    pub fn has_session(&self, speaker: SpeakerId) -> bool {
        self.sessions.contains_key(&speaker)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn last_activity(&self, speaker: SpeakerId) -> Option<DateTime<Utc>> {
        self.last_activity.get(&speaker).map(|last| *last)
    }

    /// Record an activity signal at `now` unless one was accepted less than
    /// `window` ago. Check and update happen atomically.
    pub fn claim_activity(&self, speaker: SpeakerId, now: DateTime<Utc>, window: Duration) -> bool {
        match self.last_activity.entry(speaker) {
            Entry::Occupied(mut entry) => {
                if now - *entry.get() < window {
                    return false;
                }
                entry.insert(now);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }

    pub fn forget_activity(&self, speaker: SpeakerId) -> bool {
        self.last_activity.remove(&speaker).is_some()
    }

    /// Drop all state for the speaker, handing back any frames that were
    /// still waiting for a flush.
    ///
    /// Nothing of the old session survives, so a frame appended afterwards
    /// starts a fresh one.
    pub fn disconnect(&self, speaker: SpeakerId) -> DisconnectOutcome {
        self.forget_activity(speaker);

        match self.sessions.remove(&speaker) {
            Some((_, session)) if session.frames.is_empty() => DisconnectOutcome::Removed,
            Some((_, session)) => {
                debug!(
                    "Speaker {} left {} queued frames",
                    speaker,
                    session.frames.len()
                );
                DisconnectOutcome::Retained {
                    frames: session.frames.into(),
                }
            }
            None => DisconnectOutcome::NoSession,
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
