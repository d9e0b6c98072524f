use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

use super::decoder::AudioDecoder;
use super::key::{ChannelLayout, CodecKey};
use crate::audio::PcmFrame;
use crate::error::DecodeError;

/// A decoder shared by every speaker using the same codec configuration.
///
/// The mutex is the decoder's only access path: `reset` and `decode` always
/// run inside one critical section.
pub type SharedDecoder = Arc<Mutex<Box<dyn AudioDecoder>>>;

/// At most one live decoder per [`CodecKey`], created lazily
pub struct DecoderCache {
    decoders: DashMap<CodecKey, SharedDecoder>,
}

impl DecoderCache {
    pub fn new() -> Self {
        Self {
            decoders: DashMap::new(),
        }
    }

    /// Return the decoder for `key`, building it with `factory` on first use.
    ///
    /// The factory runs under the key's map entry lock, so concurrent callers
    /// for the same key wait for it and then share its result. A failed
    /// factory leaves nothing cached.
    pub fn get_or_create<F>(&self, key: &CodecKey, factory: F) -> Result<SharedDecoder, DecodeError>
    where
        F: FnOnce() -> Result<Box<dyn AudioDecoder>, DecodeError>,
    {
        if let Some(existing) = self.decoders.get(key) {
            return Ok(Arc::clone(existing.value()));
        }

        match self.decoders.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let decoder = factory()?;
                info!("Created decoder {}", key);
                let shared: SharedDecoder = Arc::new(Mutex::new(decoder));
                entry.insert(Arc::clone(&shared));
                Ok(shared)
            }
        }
    }

    /// Reset and decode one packet with the decoder for `key`.
    ///
    /// Stereo output is downmixed so the returned frame is always mono.
    pub fn decode<F>(&self, key: &CodecKey, data: &[u8], factory: F) -> Result<PcmFrame, DecodeError>
    where
        F: FnOnce() -> Result<Box<dyn AudioDecoder>, DecodeError>,
    {
        let decoder = self.get_or_create(key, factory)?;

        let raw = {
            let mut decoder = decoder.lock();
            decoder.reset();
            decoder.decode(data)?
        };

        debug!("Decoded {} bytes into {} samples ({})", data.len(), raw.len(), key);

        Ok(match key.layout {
            ChannelLayout::Mono => PcmFrame::new(raw),
            ChannelLayout::Stereo => PcmFrame::from_interleaved_stereo(&raw),
        })
    }

    /// Drop the decoder for `key`; the next request builds a fresh one
    pub fn evict(&self, key: &CodecKey) -> bool {
        let removed = self.decoders.remove(key).is_some();
        if removed {
            info!("Evicted decoder {}", key);
        }
        removed
    }

    pub fn contains(&self, key: &CodecKey) -> bool {
        self.decoders.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl Default for DecoderCache {
    fn default() -> Self {
        Self::new()
    }
}
