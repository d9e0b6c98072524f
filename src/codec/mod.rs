//! Decoder selection and caching
//!
//! Codec implementations live in the host; this module only decides which
//! decoder a packet needs and guarantees a decoder instance is never used by
//! two callers at once.

pub mod cache;
pub mod decoder;
pub mod key;

pub use cache::{DecoderCache, SharedDecoder};
pub use decoder::{AudioDecoder, DecoderFactory, DecoderParams};
pub use key::{ChannelLayout, CodecKey, EncoderInfo, DEFAULT_CODEC};
