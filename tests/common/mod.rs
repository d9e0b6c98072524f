// Shared test doubles for the voice host, codecs and clock
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use sculk_recorder::codec::{AudioDecoder, DecoderFactory, DecoderParams, EncoderInfo};
use sculk_recorder::voice::{Activation, Clock, Speaker, VoiceHost};
use sculk_recorder::{DecodeError, EncryptionError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Marker byte the fake host expects in front of every "encrypted" packet
pub const ENCRYPTION_MARKER: u8 = 0xA5;

/// Encode samples the way the fake codec expects them: marker + little-endian i16
pub fn packet(samples: &[i16]) -> Vec<u8> {
    let mut data = vec![ENCRYPTION_MARKER];
    data.extend(samples.iter().flat_map(|s| s.to_le_bytes()));
    data
}

pub fn raw_le(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Decoder that reads raw little-endian i16 and insists on a reset before each decode
pub struct LeDecoder {
    dirty: bool,
    in_use: Arc<AtomicBool>,
    resets: Arc<AtomicUsize>,
}

impl LeDecoder {
    pub fn new() -> Self {
        Self {
            dirty: false,
            in_use: Arc::new(AtomicBool::new(false)),
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl AudioDecoder for LeDecoder {
    fn reset(&mut self) {
        self.dirty = false;
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn decode(&mut self, data: &[u8]) -> Result<Vec<i16>, DecodeError> {
        assert!(!self.dirty, "decode called without reset");
        assert!(
            !self.in_use.swap(true, Ordering::SeqCst),
            "decoder used by two callers at once"
        );
        std::thread::yield_now();

        let result = if data.len() % 2 != 0 {
            Err(DecodeError::Malformed {
                codec: "le16".to_string(),
                reason: format!("odd length {}", data.len()),
            })
        } else {
            Ok(data
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect())
        };

        self.dirty = true;
        self.in_use.store(false, Ordering::SeqCst);
        result
    }
}

/// Factory that records every decoder it builds
#[derive(Default)]
pub struct FakeFactory {
    pub created: Mutex<Vec<(String, DecoderParams)>>,
}

impl FakeFactory {
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl DecoderFactory for FakeFactory {
    fn create(
        &self,
        encoder: &EncoderInfo,
        params: &DecoderParams,
    ) -> Result<Box<dyn AudioDecoder>, DecodeError> {
        if encoder.name == "broken" {
            return Err(DecodeError::Unsupported(encoder.name.clone()));
        }
        self.created.lock().push((encoder.name.clone(), *params));
        Ok(Box::new(LeDecoder::new()))
    }
}

/// Voice host with a fixed set of activations that records game events
#[derive(Default)]
pub struct FakeHost {
    pub activations: HashMap<Uuid, Activation>,
    pub game_events: Mutex<Vec<(String, String)>>,
}

impl FakeHost {
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activations.insert(activation.id, activation);
        self
    }

    pub fn game_event_count(&self) -> usize {
        self.game_events.lock().len()
    }
}

impl VoiceHost for FakeHost {
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        match data.split_first() {
            Some((&ENCRYPTION_MARKER, rest)) => Ok(rest.to_vec()),
            _ => Err(EncryptionError("bad marker".to_string())),
        }
    }

    fn activation(&self, id: Uuid) -> Option<Activation> {
        self.activations.get(&id).cloned()
    }

    fn send_game_event(&self, speaker: &Speaker, game_event: &str) {
        self.game_events
            .lock()
            .push((speaker.name.clone(), game_event.to_string()));
    }
}

pub fn activation(name: &str, stereo_supported: bool) -> Activation {
    Activation {
        id: Uuid::new_v4(),
        name: name.to_string(),
        stereo_supported,
        encoder: None,
    }
}

/// Clock tests move by hand
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        *self.now.lock() += Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub fn at_ms(ms: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::milliseconds(ms)
}

/// Constant-amplitude frame; 16384 is about -6 dBFS
pub fn loud(len: usize) -> Vec<i16> {
    vec![16384; len]
}

/// Peak of 10 is about -70 dBFS
pub fn quiet(len: usize) -> Vec<i16> {
    vec![10; len]
}
