use crate::MAX_SEGMENTS;

/// Fixed-length circular delay matching the waveguide transit time.
///
/// Each call returns the sample written `len` calls earlier, then stores the
/// new one in its place.
pub struct AlignmentDelay {
    buffer: Vec<f32>,
    len: usize,
    pos: usize,
}

impl AlignmentDelay {
    pub fn new(len: usize) -> Self {
        let mut delay = Self {
            buffer: vec![0.0; MAX_SEGMENTS],
            len: 1,
            pos: 0,
        };
        delay.set_len(len);
        delay
    }

    /// Change the delay length and clear the buffer.
    pub fn set_len(&mut self, len: usize) {
        self.len = len.clamp(1, MAX_SEGMENTS);
        self.reset();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        self.buffer[self.pos] = sample;

        self.pos += 1;
        if self.pos >= self.len {
            self.pos = 0;
        }

        delayed
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }

    pub fn is_silent(&self) -> bool {
        self.buffer.iter().all(|&x| x == 0.0)
    }
}
