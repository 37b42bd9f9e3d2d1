//! Offline inspection of what a horn does to a signal.
//!
//! Not used on the audio thread: these helpers allocate freely and plan an
//! FFT per call.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::{horn::geometry::HornGeometry, HornResonator};

/// Mono impulse response of `geometry` over `len` samples.
pub fn impulse_response(geometry: &HornGeometry, sample_rate: f32, len: usize) -> Vec<f32> {
    let mut horn = HornResonator::new();
    horn.configure(sample_rate, 1, len.max(1), *geometry);

    let mut response = vec![0.0f32; len];
    if let Some(first) = response.first_mut() {
        *first = 1.0;
    }

    for block in response.chunks_mut(crate::MAX_BLOCK_SIZE) {
        let block_size = block.len();
        // Mono buffer in range, cannot fail once configured
        if horn.process_block(block, block_size).is_err() {
            break;
        }
    }

    response
}

/// Magnitudes of the FFT of `signal`, bins 0..=len/2.
pub fn magnitude_spectrum(signal: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(signal.len());

    let mut bins: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut bins);

    bins[..=signal.len() / 2].iter().map(|c| c.norm()).collect()
}

/// Nearest FFT bin for `freq_hz`.
pub fn bin_for_frequency(freq_hz: f32, sample_rate: f32, fft_len: usize) -> usize {
    let bin = (freq_hz * fft_len as f32 / sample_rate).round();
    (bin.max(0.0) as usize).min(fft_len / 2)
}

/// Linear magnitude to dB, floored at -120 dB.
pub fn to_db(magnitude: f32) -> f32 {
    20.0 * magnitude.max(1e-6).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::crossover::{CrossoverCoeffs, CrossoverSplitter};

    const SR: f32 = 48_000.0;

    #[test]
    fn test_spectrum_of_impulse_is_flat() {
        let mut impulse = vec![0.0f32; 256];
        impulse[0] = 1.0;

        let spectrum = magnitude_spectrum(&impulse);

        assert_eq!(spectrum.len(), 129);
        assert!(spectrum.iter().all(|&m| (m - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_bin_for_frequency() {
        assert_eq!(bin_for_frequency(0.0, SR, 1024), 0);
        assert_eq!(bin_for_frequency(SR / 2.0, SR, 1024), 512);
        assert_eq!(bin_for_frequency(1_000.0, SR, 4_800), 100);
        assert_eq!(bin_for_frequency(SR, SR, 1024), 512);
    }

    #[test]
    fn test_crossover_bands_sum_to_allpass() {
        let coeffs = CrossoverCoeffs::new(600.0, SR);
        let mut splitter = CrossoverSplitter::new();

        let summed: Vec<f32> = (0..8_192)
            .map(|i| {
                let (low, high) = splitter.split(if i == 0 { 1.0 } else { 0.0 }, &coeffs);
                low + high
            })
            .collect();
        let spectrum = magnitude_spectrum(&summed);

        let lo = bin_for_frequency(50.0, SR, summed.len());
        let hi = bin_for_frequency(15_000.0, SR, summed.len());
        for (bin, &m) in spectrum.iter().enumerate().take(hi + 1).skip(lo) {
            assert!((m - 1.0).abs() < 0.05, "bin {bin}: |H| = {m}");
        }
    }

    #[test]
    fn test_horn_response_is_finite_and_nonzero() {
        let response = impulse_response(&HornGeometry::default(), SR, 4_096);
        assert_eq!(response.len(), 4_096);
        assert!(response.iter().all(|x| x.is_finite()));
        assert!(response.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_horn_band_is_boosted_above_crossover() {
        let geometry = HornGeometry::default()
            .with_output_gain(40.0)
            .with_throat_trim(0.0);
        let response = impulse_response(&geometry, SR, 8_192);
        let spectrum = magnitude_spectrum(&response);

        let low = spectrum[bin_for_frequency(100.0, SR, response.len())];
        let high = spectrum[bin_for_frequency(5_000.0, SR, response.len())];
        assert!(
            to_db(high) > to_db(low),
            "expected horn band above bypass band: low {:.1} dB, high {:.1} dB",
            to_db(low),
            to_db(high)
        );
    }
}
