//! Per-speaker utterance state
//!
//! This module owns everything kept between packets for a speaker:
//! - the FIFO of decoded frames for the current utterance
//! - the time of the last accepted speech-activity signal
//! - the debounce/threshold rule deciding when a signal fires

mod activity;
mod registry;

pub use activity::{ActivityDetector, DEBOUNCE_WINDOW_MS};
pub use registry::{DisconnectOutcome, SessionRegistry, SpeakerId};
