use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::RecordingError;

/// Summary of a finished WAV file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavOutput {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub sample_count: usize,
}

/// Write mono 16-bit little-endian PCM as a RIFF/WAVE file.
///
/// Samples go to `<path>.part` first and the file is renamed into place only
/// after the header has been finalized, so a reader never sees a partial file.
pub fn write_pcm_wav(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
) -> Result<WavOutput, RecordingError> {
    let part_path = part_path_for(path);

    let mut writer = PartWriter::create(&part_path, sample_rate)?;
    writer.write_samples(samples)?;
    writer.finish()?;

    fs::rename(&part_path, path).map_err(|source| {
        remove_quietly(&part_path);
        RecordingError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!("Wrote {} samples to {:?}", samples.len(), path);

    Ok(WavOutput {
        path: path.to_path_buf(),
        sample_rate,
        sample_count: samples.len(),
    })
}

fn part_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove partial file {:?}: {}", path, e);
        }
    }
}

/// Writer for the temporary file; removes it again unless `finish` succeeds
struct PartWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
}

impl PartWriter {
    fn create(path: &Path, sample_rate: u32) -> Result<Self, RecordingError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(path, spec).map_err(|source| RecordingError::Wav {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            writer: Some(writer),
            path: path.to_path_buf(),
        })
    }

    fn write_samples(&mut self, samples: &[i16]) -> Result<(), RecordingError> {
        if let Some(writer) = &mut self.writer {
            for &sample in samples {
                writer.write_sample(sample).map_err(|source| RecordingError::Wav {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        Ok(())
    }

    fn finish(mut self) -> Result<(), RecordingError> {
        if let Some(writer) = self.writer.take() {
            if let Err(source) = writer.finalize() {
                remove_quietly(&self.path);
                return Err(RecordingError::Wav {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        Ok(())
    }
}

impl Drop for PartWriter {
    fn drop(&mut self) {
        // Only reached with a live writer when a write failed part way
        if let Some(writer) = self.writer.take() {
            drop(writer);
            remove_quietly(&self.path);
        }
    }
}
