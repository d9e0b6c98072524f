pub mod file;
pub mod frame;
pub mod level;
pub mod wav;

pub use file::AudioFile;
pub use frame::{concat_frames, PcmFrame};
pub use level::{contains_min_audio_level, peak_level_db};
pub use wav::{write_pcm_wav, WavOutput};
