// Purpose - host boundary: buffer layouts and the shared sample buffer

use crate::{MAX_BLOCK_SIZE, MAX_CHANNELS};

/// How channels are arranged in a host buffer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BufferLayout {
    /// Channel-major blocks: `data[ch * block_size + i]`.
    #[default]
    Planar,
    /// Sample-major frames: `data[i * channels + ch]`.
    Interleaved,
}

impl BufferLayout {
    /// Index of sample `i` of channel `ch`.
    #[inline]
    pub fn index(self, ch: usize, i: usize, channels: usize, block_size: usize) -> usize {
        match self {
            BufferLayout::Planar => ch * block_size + i,
            BufferLayout::Interleaved => i * channels + ch,
        }
    }
}

/// Fixed-capacity sample buffer shared with the host.
///
/// Sized once for `MAX_CHANNELS × MAX_BLOCK_SIZE`, so the host can keep a raw
/// pointer to it for the lifetime of the resonator and write each block
/// straight into it.
#[derive(Debug)]
pub struct HostBuffer {
    samples: Box<[f32]>,
}

impl HostBuffer {
    pub const CAPACITY: usize = MAX_CHANNELS * MAX_BLOCK_SIZE;

    pub fn new() -> Self {
        Self {
            samples: vec![0.0; Self::CAPACITY].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Stable for the lifetime of the buffer.
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.samples.as_mut_ptr()
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }
}

impl Default for HostBuffer {
    fn default() -> Self {
        Self::new()
    }
}
