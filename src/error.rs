use crate::horn::coefficients::ClampReport;

/// Errors surfaced by [`HornResonator`](crate::HornResonator).
///
/// The default configuration path never produces an error; it clamps instead.
/// These only appear on precondition violations and on the strict path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HornError {
    #[error("process called before configure")]
    NotConfigured,

    #[error("block of {block_size} samples exceeds the maximum of {max}")]
    BlockTooLarge { block_size: usize, max: usize },

    #[error("buffer holds {actual} samples but {needed} are required")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("configuration out of range: {0}")]
    Clamped(ClampReport),
}
