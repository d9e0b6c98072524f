use anyhow::{Context, Result};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::events::{
    DisconnectNotice, SkipReason, SpeakEnded, SpeakOutcome, SpeakPacket, VoiceEventHandler,
};
use super::host::{Activation, ActivationResult, Clock, SystemClock, VoiceHost};
use crate::audio::PcmFrame;
use crate::codec::{CodecKey, DecoderCache, DecoderFactory, DecoderParams};
use crate::config::{Config, SculkConfig, VoiceConfig};
use crate::error::PacketError;
use crate::recording::{RecordingEvent, Utterance, UtteranceWriter};
use crate::session::{ActivityDetector, DisconnectOutcome, SessionRegistry, SpeakerId};

/// Records every speaker's utterances and signals speech activity to the world
pub struct SculkRecorder {
    host: Arc<dyn VoiceHost>,
    factory: Arc<dyn DecoderFactory>,
    decoders: DecoderCache,
    registry: SessionRegistry,
    /// Display names of speakers with queued audio, for recordings
    /// flushed on disconnect
    names: DashMap<SpeakerId, String>,
    writer: Arc<UtteranceWriter>,
    clock: Arc<dyn Clock>,
    voice: VoiceConfig,
    /// Swapped whole on reload; each event works on one snapshot
    sculk: RwLock<Arc<SculkConfig>>,
    events_tx: mpsc::UnboundedSender<RecordingEvent>,
    runtime: Handle,
}

impl SculkRecorder {
    /// Create the recorder and the channel its background writes report on.
    ///
    /// Must be called from within a tokio runtime; utterance writes are
    /// dispatched onto that runtime's blocking pool.
    pub fn new(
        config: &Config,
        host: Arc<dyn VoiceHost>,
        factory: Arc<dyn DecoderFactory>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RecordingEvent>)> {
        let runtime = Handle::try_current().context("SculkRecorder requires a tokio runtime")?;
        let writer = UtteranceWriter::new(&config.voice.records_dir)
            .context("Failed to create voice_chat_records directory")?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        info!(
            "Sculk recorder initialized: {}Hz, threshold {} dBFS, game event {}",
            config.voice.sample_rate, config.sculk.activation_threshold, config.sculk.game_event
        );

        let recorder = Self {
            host,
            factory,
            decoders: DecoderCache::new(),
            registry: SessionRegistry::new(),
            names: DashMap::new(),
            writer: Arc::new(writer),
            clock: Arc::new(SystemClock),
            voice: config.voice.clone(),
            sculk: RwLock::new(Arc::new(config.sculk.clone())),
            events_tx,
            runtime,
        };

        Ok((recorder, events_rx))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current activity/recording settings
    pub fn config(&self) -> Arc<SculkConfig> {
        self.sculk.read().clone()
    }

    /// Replace the activity/recording settings; packets already being
    /// processed finish with the previous ones
    pub fn reload_config(&self, config: SculkConfig) {
        info!(
            "Reloaded sculk config: threshold {} dBFS, game event {}",
            config.activation_threshold, config.game_event
        );
        *self.sculk.write() = Arc::new(config);
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn decoders(&self) -> &DecoderCache {
        &self.decoders
    }

    pub fn writer(&self) -> &UtteranceWriter {
        &self.writer
    }

    fn decode(&self, activation: &Activation, packet: &SpeakPacket) -> Result<PcmFrame, PacketError> {
        let data = self.host.decrypt(&packet.data)?;

        let key = CodecKey::select(
            activation.encoder.as_ref(),
            packet.stereo,
            activation.stereo_supported,
        );
        let encoder = activation.encoder.clone().unwrap_or_default();
        let params = DecoderParams::new(
            self.voice.sample_rate,
            key.layout.is_stereo(),
            self.voice.mtu_size,
        );

        let frame = self
            .decoders
            .decode(&key, &data, || self.factory.create(&encoder, &params))?;

        Ok(frame)
    }

    fn remember_name(&self, speaker_id: SpeakerId, name: &str) {
        let known = self
            .names
            .get(&speaker_id)
            .is_some_and(|current| current.as_str() == name);
        if !known {
            self.names.insert(speaker_id, name.to_string());
        }
    }

    /// Write the utterance on the blocking pool and report the outcome
    fn dispatch_write(&self, utterance: Utterance) -> JoinHandle<()> {
        let writer = Arc::clone(&self.writer);
        let events_tx = self.events_tx.clone();
        let sample_rate = self.voice.sample_rate;
        let offset = self.config().filename_offset();

        debug!(
            "Dispatching recording for {}: {} frames",
            utterance.speaker_name,
            utterance.frames.len()
        );

        self.runtime.spawn_blocking(move || {
            let event = match writer.write(&utterance, sample_rate, &offset) {
                Ok(metadata) => {
                    info!(
                        "Saved {:.1}s recording for {} to {:?}",
                        metadata.duration_secs, metadata.speaker_name, metadata.path
                    );
                    RecordingEvent::Saved(metadata)
                }
                Err(error) => {
                    error!(
                        "Failed to save recording for {}: {}",
                        utterance.speaker_name, error
                    );
                    RecordingEvent::Failed {
                        speaker_id: utterance.speaker_id,
                        error,
                    }
                }
            };

            if events_tx.send(event).is_err() {
                debug!("Recording event receiver dropped");
            }
        })
    }
}

impl VoiceEventHandler for SculkRecorder {
    fn on_speak(&self, packet: &SpeakPacket) -> SpeakOutcome {
        if packet.result == ActivationResult::Ignored {
            return SpeakOutcome::Skipped(SkipReason::Ignored);
        }

        let Some(activation) = self.host.activation(packet.activation_id) else {
            return SpeakOutcome::Skipped(SkipReason::UnknownActivation);
        };

        let sculk = self.config();
        if !sculk.activations.is_enabled(&activation.name, packet.distance) {
            return SpeakOutcome::Skipped(SkipReason::ActivationDisabled);
        }

        if !sculk.sneak_activation && packet.speaker.sneaking {
            return SpeakOutcome::Skipped(SkipReason::Sneaking);
        }

        let frame = match self.decode(&activation, packet) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping packet from {}: {}", packet.speaker.name, e);
                return SpeakOutcome::Dropped;
            }
        };

        let speaker_id = packet.speaker.id;
        self.remember_name(speaker_id, &packet.speaker.name);
        self.registry.append(speaker_id, frame.clone());

        let detector = ActivityDetector::new(sculk.activation_threshold);
        let signalled = detector.should_signal(&self.registry, speaker_id, &frame, self.clock.now());
        if signalled {
            self.host.send_game_event(&packet.speaker, &sculk.game_event);
        }

        SpeakOutcome::Recorded { signalled }
    }

    fn on_speak_ended(&self, event: &SpeakEnded) -> Option<JoinHandle<()>> {
        let speaker = &event.speaker;
        let Some(utterance) =
            self.writer
                .take_utterance(&self.registry, speaker.id, &speaker.name, self.clock.now())
        else {
            if self
                .events_tx
                .send(RecordingEvent::Empty {
                    speaker_id: speaker.id,
                })
                .is_err()
            {
                debug!("Recording event receiver dropped");
            }
            return None;
        };

        Some(self.dispatch_write(utterance))
    }

    fn on_disconnect(&self, notice: &DisconnectNotice) -> Option<JoinHandle<()>> {
        let speaker_id = notice.speaker_id;
        let name = self.names.remove(&speaker_id).map(|(_, name)| name);

        match self.registry.disconnect(speaker_id) {
            DisconnectOutcome::Retained { frames } => {
                let speaker_name = name.unwrap_or_else(|| speaker_id.to_string());
                info!(
                    "Speaker {} disconnected mid-utterance, saving {} frames",
                    speaker_name,
                    frames.len()
                );
                Some(self.dispatch_write(Utterance {
                    speaker_id,
                    speaker_name,
                    frames,
                    ended_at: self.clock.now(),
                }))
            }
            DisconnectOutcome::Removed | DisconnectOutcome::NoSession => {
                debug!("Speaker {} disconnected", speaker_id);
                None
            }
        }
    }
}
