/// Integrated loudness, in LUFS, that corrected files must reach.
pub const DEFAULT_INTEGRATED_LUFS: f64 = -13.0;
/// Allowed loudness range, in LU.
pub const DEFAULT_LOUDNESS_RANGE: f64 = 7.0;
/// True-peak ceiling, in dBTP.
pub const DEFAULT_TRUE_PEAK: f64 = -1.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Inclusive acceptance window around the target, in LU.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// Normalization parameters and the acceptance policy for the verification pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessTarget {
    pub integrated_lufs: f64,
    pub loudness_range: f64,
    pub true_peak: f64,
    pub sample_rate: u32,
    pub tolerance: f64,
}

impl Default for LoudnessTarget {
    fn default() -> Self {
        Self {
            integrated_lufs: DEFAULT_INTEGRATED_LUFS,
            loudness_range: DEFAULT_LOUDNESS_RANGE,
            true_peak: DEFAULT_TRUE_PEAK,
            sample_rate: DEFAULT_SAMPLE_RATE,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LoudnessTarget {
    /// Whether a measured reading falls inside the inclusive tolerance window.
    ///
    /// No rounding is applied before the comparison.
    pub fn accepts(&self, reading: f64) -> bool {
        (reading - self.integrated_lufs).abs() <= self.tolerance
    }

    /// The `loudnorm` filter expression for this target.
    pub fn loudnorm_filter(&self) -> String {
        format!(
            "loudnorm=I={}:LRA={}:TP={}:print_format=summary",
            self.integrated_lufs, self.loudness_range, self.true_peak
        )
    }
}
