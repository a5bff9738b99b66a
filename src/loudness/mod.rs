//! Loudness correction with a verification pass.
//!
//! 1. ffmpeg's `loudnorm` filter writes a corrected copy to a temp file
//! 2. ffmpeg's `ebur128` filter measures the copy
//! 3. The copy replaces the source only if the measured integrated loudness is
//!    within the tolerance window around the target

mod corrector;
mod parser;
mod target;

pub use corrector::{CorrectionError, CorrectionJob, LoudnessCorrector, Verdict};
pub use parser::{
    parse_integrated_loudness, parse_loudnorm_summary, parse_true_peak, Ebur128Parser,
    LoudnormSummary, MeasurementParser,
};
pub use target::{
    LoudnessTarget, DEFAULT_INTEGRATED_LUFS, DEFAULT_LOUDNESS_RANGE, DEFAULT_SAMPLE_RATE,
    DEFAULT_TOLERANCE, DEFAULT_TRUE_PEAK,
};
