/// One decoded voice packet: 16-bit signed mono samples at the server sample rate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PcmFrame {
    pub samples: Vec<i16>,
}

impl PcmFrame {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Downmix interleaved stereo `[L, R, L, R, ...]` by averaging each pair.
    ///
    /// A trailing unpaired sample is kept as-is.
    pub fn from_interleaved_stereo(interleaved: &[i16]) -> Self {
        let samples = interleaved
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => ((*left as i32 + *right as i32) / 2) as i16,
                [single] => *single,
                _ => 0,
            })
            .collect();

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<i16>> for PcmFrame {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

/// Concatenate frames in the given order into one contiguous buffer
pub fn concat_frames(frames: &[PcmFrame]) -> Vec<i16> {
    let total: usize = frames.iter().map(PcmFrame::len).sum();
    let mut out = Vec::with_capacity(total);
    for frame in frames {
        out.extend_from_slice(&frame.samples);
    }
    out
}
