//! Control messages from a UI/host thread to the audio thread.
//!
//! Reconfiguration must never overlap block processing, so instead of
//! touching the resonator from another thread the control side pushes
//! messages into a lock-free queue. The audio thread drains the queue between
//! blocks with [`HornResonator::drain_messages`](crate::HornResonator::drain_messages).

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::horn::geometry::HornGeometry;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HornMessage {
    /// Replace the geometry; state resets only if it actually changed.
    SetGeometry(HornGeometry),
    SetEnabled(bool),
    /// Zero all running state, keep the coefficients.
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<HornMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<HornMessage> {
    fn pop(&mut self) -> Option<HornMessage> {
        Consumer::pop(self).ok()
    }
}

/// Create a bounded control queue.
#[cfg(feature = "rtrb")]
pub fn control_queue(capacity: usize) -> (Producer<HornMessage>, Consumer<HornMessage>) {
    RingBuffer::new(capacity)
}
