//! Host-facing horn context.
//!
//! A `HornResonator` owns the derived coefficients, every channel's state,
//! and the shared host buffer. Nothing is global: create as many as needed.
//!
//! All buffers are sized for the crate maximums when the resonator is
//! created. `configure` only rewrites them, so it is safe to call between
//! blocks on the audio thread.

use crate::{
    control::{HornMessage, MessageReceiver},
    error::HornError,
    horn::{
        channel::ChannelProcessor,
        coefficients::{sanitize_geometry, ClampReport, DerivedCoefficients},
        geometry::HornGeometry,
    },
    io::{BufferLayout, HostBuffer},
    MAX_BLOCK_SIZE, MAX_CHANNELS,
};

pub struct HornResonator {
    coeffs: DerivedCoefficients,
    geometry: HornGeometry,
    channels: Vec<ChannelProcessor>,
    active_channels: usize,
    max_block_size: usize,
    layout: BufferLayout,
    host_buffer: HostBuffer,
    configured: bool,
    enabled: bool,
    last_clamps: ClampReport,
}

impl HornResonator {
    pub fn new() -> Self {
        Self::with_layout(BufferLayout::default())
    }

    pub fn with_layout(layout: BufferLayout) -> Self {
        let coeffs = DerivedCoefficients::empty();
        let channels = (0..MAX_CHANNELS)
            .map(|_| ChannelProcessor::new(coeffs.segments))
            .collect();

        Self {
            coeffs,
            geometry: HornGeometry::default(),
            channels,
            active_channels: 1,
            max_block_size: MAX_BLOCK_SIZE,
            layout,
            host_buffer: HostBuffer::new(),
            configured: false,
            enabled: true,
            last_clamps: ClampReport::default(),
        }
    }

    /// Derive coefficients for `geometry` and zero all channel state.
    ///
    /// Out-of-range input is clamped, never rejected; the returned report
    /// (also available from [`last_clamps`](Self::last_clamps)) says what
    /// was adjusted.
    pub fn configure(
        &mut self,
        sample_rate: f32,
        channels: usize,
        block_size: usize,
        geometry: HornGeometry,
    ) -> ClampReport {
        let mut report = self.coeffs.update(&geometry, sample_rate);

        let active = channels.clamp(1, MAX_CHANNELS);
        report.channels = active != channels;
        let max_block = block_size.clamp(1, MAX_BLOCK_SIZE);
        report.block_size = max_block != block_size;

        for channel in &mut self.channels {
            channel.reset(self.coeffs.segments);
        }

        self.geometry = geometry;
        self.active_channels = active;
        self.max_block_size = max_block;
        self.configured = true;
        self.last_clamps = report;

        log::debug!(
            "horn configured: {} segments at {} Hz, {} channel(s), g = {:.6}, output gain = {:.3}",
            self.coeffs.segments,
            self.coeffs.sample_rate,
            active,
            self.coeffs.damping_gain,
            self.coeffs.output_gain,
        );
        if report.any() {
            log::warn!("horn configuration clamped: {report}");
        }

        report
    }

    /// Like [`configure`](Self::configure), but refuses anything that would
    /// need clamping. On error the previous configuration stays in place.
    pub fn configure_strict(
        &mut self,
        sample_rate: f32,
        channels: usize,
        block_size: usize,
        geometry: HornGeometry,
    ) -> Result<(), HornError> {
        let (_, mut report) = DerivedCoefficients::derive(&geometry, sample_rate);
        report.channels = !(1..=MAX_CHANNELS).contains(&channels);
        report.block_size = !(1..=MAX_BLOCK_SIZE).contains(&block_size);

        if report.any() {
            return Err(HornError::Clamped(report));
        }

        self.configure(sample_rate, channels, block_size, geometry);
        Ok(())
    }

    /// Reconfigure only if `geometry` moved beyond the change tolerances.
    ///
    /// Both sides are compared after clamping and non-finite fallback, so a
    /// geometry that derives the same coefficients never resets state.
    /// Returns whether a reconfiguration (and state reset) happened.
    pub fn set_geometry(&mut self, geometry: HornGeometry) -> Result<bool, HornError> {
        if !self.configured {
            return Err(HornError::NotConfigured);
        }
        let mut scratch = ClampReport::default();
        let candidate = sanitize_geometry(&geometry, self.coeffs.sample_rate, &mut scratch);
        if !candidate.differs_from(&self.coeffs.effective) {
            return Ok(false);
        }

        self.configure(
            self.coeffs.sample_rate,
            self.active_channels,
            self.max_block_size,
            geometry,
        );
        Ok(true)
    }

    /// Zero all running state without re-deriving coefficients.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset(self.coeffs.segments);
        }
    }

    /// Apply every pending control message.
    ///
    /// Returns how many took effect. A `SetGeometry` that arrives before
    /// [`configure`](Self::configure) is dropped and not counted.
    pub fn drain_messages<R: MessageReceiver>(&mut self, rx: &mut R) -> usize {
        let mut applied = 0;
        while let Some(msg) = rx.pop() {
            let accepted = match msg {
                HornMessage::SetGeometry(geometry) => self.set_geometry(geometry).is_ok(),
                HornMessage::SetEnabled(enabled) => {
                    self.set_enabled(enabled);
                    true
                }
                HornMessage::Reset => {
                    self.reset();
                    true
                }
            };
            applied += usize::from(accepted);
        }
        applied
    }

    /// Process `block_size` samples per channel of `buffer` in place.
    ///
    /// The buffer must hold at least `channels × block_size` samples arranged
    /// according to [`layout`](Self::layout). Block size may change from call
    /// to call.
    pub fn process_block(
        &mut self,
        buffer: &mut [f32],
        block_size: usize,
    ) -> Result<(), HornError> {
        self.check_block(buffer.len(), block_size)?;
        if !self.enabled {
            return Ok(());
        }

        process_channels(
            &mut self.channels[..self.active_channels],
            &self.coeffs,
            self.layout,
            buffer,
            block_size,
        );
        Ok(())
    }

    /// Process the shared [`HostBuffer`] in place.
    pub fn process_host_buffer(&mut self, block_size: usize) -> Result<(), HornError> {
        self.check_block(self.host_buffer.capacity(), block_size)?;
        if !self.enabled {
            return Ok(());
        }

        process_channels(
            &mut self.channels[..self.active_channels],
            &self.coeffs,
            self.layout,
            self.host_buffer.as_mut_slice(),
            block_size,
        );
        Ok(())
    }

    fn check_block(&self, available: usize, block_size: usize) -> Result<(), HornError> {
        if !self.configured {
            return Err(HornError::NotConfigured);
        }
        if block_size > MAX_BLOCK_SIZE {
            return Err(HornError::BlockTooLarge {
                block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        let needed = self.active_channels * block_size;
        if available < needed {
            return Err(HornError::BufferTooSmall {
                needed,
                actual: available,
            });
        }
        Ok(())
    }

    pub fn host_buffer(&self) -> &HostBuffer {
        &self.host_buffer
    }

    pub fn host_buffer_mut(&mut self) -> &mut HostBuffer {
        &mut self.host_buffer
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: BufferLayout) {
        self.layout = layout;
    }

    /// Derived coefficients, once configured.
    pub fn coefficients(&self) -> Option<&DerivedCoefficients> {
        self.configured.then_some(&self.coeffs)
    }

    /// Geometry as passed to the last configure (before clamping).
    pub fn geometry(&self) -> &HornGeometry {
        &self.geometry
    }

    pub fn channel_count(&self) -> usize {
        self.active_channels
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn channel(&self, ch: usize) -> Option<&ChannelProcessor> {
        self.channels[..self.active_channels].get(ch)
    }

    /// What the last configure had to adjust.
    pub fn last_clamps(&self) -> ClampReport {
        self.last_clamps
    }

    /// Delay of the horn band relative to the input, in samples.
    pub fn latency_samples(&self) -> usize {
        self.coeffs.latency_samples()
    }
}

impl Default for HornResonator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every active channel over its samples, wherever the layout puts them.
fn process_channels(
    channels: &mut [ChannelProcessor],
    coeffs: &DerivedCoefficients,
    layout: BufferLayout,
    data: &mut [f32],
    block_size: usize,
) {
    let count = channels.len();
    for (ch, channel) in channels.iter_mut().enumerate() {
        for i in 0..block_size {
            let idx = layout.index(ch, i, count, block_size);
            data[idx] = channel.process_sample(data[idx], coeffs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn configured(channels: usize) -> HornResonator {
        let mut horn = HornResonator::new();
        horn.configure(SR, channels, 256, HornGeometry::default());
        horn
    }

    #[test]
    fn test_process_before_configure_fails() {
        let mut horn = HornResonator::new();
        let mut buffer = vec![0.0f32; 64];
        assert_eq!(horn.process_block(&mut buffer, 64), Err(HornError::NotConfigured));
        assert!(horn.coefficients().is_none());
    }

    #[test]
    fn test_block_size_limits() {
        let mut horn = configured(2);
        let mut buffer = vec![0.0f32; 2 * (MAX_BLOCK_SIZE + 1)];

        assert_eq!(
            horn.process_block(&mut buffer, MAX_BLOCK_SIZE + 1),
            Err(HornError::BlockTooLarge {
                block_size: MAX_BLOCK_SIZE + 1,
                max: MAX_BLOCK_SIZE
            })
        );
        assert_eq!(
            horn.process_block(&mut buffer[..100], 64),
            Err(HornError::BufferTooSmall {
                needed: 128,
                actual: 100
            })
        );
        assert_eq!(horn.process_block(&mut buffer, 0), Ok(()));
    }

    #[test]
    fn test_channel_count_is_clamped() {
        let mut horn = HornResonator::new();
        let report = horn.configure(SR, 8, 128, HornGeometry::default());
        assert!(report.channels);
        assert_eq!(horn.channel_count(), MAX_CHANNELS);
        assert_eq!(horn.last_clamps(), report);

        let report = horn.configure(SR, 0, 128, HornGeometry::default());
        assert!(report.channels);
        assert_eq!(horn.channel_count(), 1);
    }

    #[test]
    fn test_strict_configure_rejects_and_keeps_state() {
        let mut horn = configured(1);
        let before = horn.coefficients().cloned();

        let low_crossover = HornGeometry::default().with_crossover(5.0);
        match horn.configure_strict(SR, 1, 128, low_crossover) {
            Err(HornError::Clamped(report)) => assert!(report.crossover),
            other => panic!("expected clamp error, got {other:?}"),
        }
        assert_eq!(horn.coefficients().cloned(), before);

        assert!(horn.configure_strict(SR, 3, 128, HornGeometry::default()).is_err());
        assert!(horn.configure_strict(SR, 2, 128, HornGeometry::default()).is_ok());
        assert_eq!(horn.channel_count(), 2);
    }

    #[test]
    fn test_set_geometry_only_resets_on_real_change() {
        let mut horn = configured(1);
        let mut buffer = vec![0.25f32; 256];
        horn.process_block(&mut buffer, 256).unwrap();

        let same = HornGeometry::default().with_length(70.0004);
        assert_eq!(horn.set_geometry(same), Ok(false));
        assert!(horn.channel(0).is_some_and(|c| !c.is_silent()));

        let longer = HornGeometry::default().with_length(90.0);
        assert_eq!(horn.set_geometry(longer), Ok(true));
        assert!(horn.channel(0).is_some_and(|c| c.is_silent()));
    }

    #[test]
    fn test_set_geometry_compares_effective_values() {
        let mut horn = configured(1);
        let mut buffer = vec![0.25f32; 256];
        horn.process_block(&mut buffer, 256).unwrap();

        // NaN falls back to the default length and trim is clamped to 0.99
        let nan_length = HornGeometry::default().with_length(f32::NAN);
        let over_trim = HornGeometry::default().with_throat_trim(3.0);
        assert_eq!(horn.set_geometry(nan_length), Ok(false));
        assert_eq!(horn.set_geometry(nan_length), Ok(false));
        assert_eq!(horn.set_geometry(over_trim), Ok(false));
        assert!(horn.channel(0).is_some_and(|c| !c.is_silent()));
    }

    #[test]
    fn test_layout_can_switch_between_blocks() {
        let mut switched = configured(2);
        let mut interleaved = HornResonator::with_layout(BufferLayout::Interleaved);
        interleaved.configure(SR, 2, 256, HornGeometry::default());

        switched.set_layout(BufferLayout::Interleaved);
        assert_eq!(switched.layout(), BufferLayout::Interleaved);

        let input: Vec<f32> = (0..256).map(|i| (i as f32 * 0.2).sin()).collect();
        let mut a = input.clone();
        let mut b = input;
        switched.process_block(&mut a, 128).unwrap();
        interleaved.process_block(&mut b, 128).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_geometry_requires_configure() {
        let mut horn = HornResonator::new();
        assert_eq!(
            horn.set_geometry(HornGeometry::default()),
            Err(HornError::NotConfigured)
        );
    }

    #[test]
    fn test_disabled_leaves_buffer_untouched() {
        let mut horn = configured(2);
        horn.set_enabled(false);

        let mut buffer: Vec<f32> = (0..512).map(|i| (i as f32 * 0.1).sin()).collect();
        let expected = buffer.clone();
        horn.process_block(&mut buffer, 256).unwrap();

        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_host_buffer_matches_caller_buffer() {
        let mut a = configured(2);
        let mut b = configured(2);
        let input: Vec<f32> = (0..256)
            .map(|i| ((i * 7 % 13) as f32 - 6.0) / 6.0)
            .collect();

        let mut buffer = input.clone();
        a.process_block(&mut buffer, 128).unwrap();

        b.host_buffer_mut().as_mut_slice()[..256].copy_from_slice(&input);
        b.process_host_buffer(128).unwrap();

        assert_eq!(&b.host_buffer().as_slice()[..256], buffer.as_slice());
    }

    #[test]
    fn test_reset_keeps_coefficients() {
        let mut horn = configured(1);
        let before = horn.coefficients().cloned();
        let mut buffer = vec![0.5f32; 128];
        horn.process_block(&mut buffer, 128).unwrap();

        horn.reset();

        assert!(horn.channel(0).is_some_and(|c| c.is_silent()));
        assert_eq!(horn.coefficients().cloned(), before);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_drain_applies_messages_in_order() {
        use crate::control::control_queue;

        let mut horn = configured(1);
        let (mut tx, mut rx) = control_queue(8);
        tx.push(HornMessage::SetEnabled(false)).unwrap();
        tx.push(HornMessage::SetGeometry(HornGeometry::default().with_length(40.0)))
            .unwrap();

        assert_eq!(horn.drain_messages(&mut rx), 2);
        assert!(!horn.is_enabled());
        assert_eq!(horn.geometry().length_cm, 40.0);
        assert_eq!(horn.drain_messages(&mut rx), 0);
    }
}
