//! Microphone level metering for the recording visualizer.

/// FFT size the analyser node is created with.
pub const FFT_SIZE: usize = 256;
/// Number of bars drawn by the visualizer.
pub const VISUALIZER_BARS: usize = 20;
/// RMS is amplified by this factor before clamping to 1.
const VOLUME_GAIN: f32 = 4.0;

/// Analyser connected to the live microphone source.
/// Reads at most `frequency_bin_count` byte time-domain samples per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Analyser {
    fft_size: usize,
}

impl Analyser {
    pub fn new(fft_size: usize) -> Self {
        Self { fft_size }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Volume in 0..=1 for one frame of unsigned 8-bit samples centred on 128.
    pub fn volume(&self, frame: &[u8]) -> f32 {
        let len = frame.len().min(self.frequency_bin_count());
        rms_volume(&frame[..len])
    }
}

/// `min(1, 4 * rms)` where each sample maps to `b / 128 - 1`.
pub fn rms_volume(samples: &[u8]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples
        .iter()
        .map(|&b| {
            let v = b as f32 / 128.0 - 1.0;
            v * v
        })
        .sum();
    let rms = (sum_squares / samples.len() as f32).sqrt();
    (rms * VOLUME_GAIN).min(1.0)
}

/// How many visualizer bars are lit at `volume`.
pub fn lit_bars(volume: f32) -> usize {
    (0..VISUALIZER_BARS)
        .filter(|&i| (i as f32) < volume * VISUALIZER_BARS as f32)
        .count()
}
