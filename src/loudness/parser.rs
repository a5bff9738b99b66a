//! Extraction of loudness values from ffmpeg diagnostic output.
//!
//! ffmpeg prints the `ebur128` summary as a multi-line block on stderr:
//!
//! ```text
//!   Integrated loudness:
//!     I:         -13.2 LUFS
//!     Threshold: -23.5 LUFS
//! ```
//!
//! Nothing here fails: text without a recognizable value yields `None`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INTEGRATED_LOUDNESS: Regex =
        Regex::new(r"Integrated loudness:\s+I:\s+(\S+)\s+LUFS")
            .expect("Invalid integrated loudness regex");
    static ref TRUE_PEAK: Regex =
        Regex::new(r"True peak:\s+Peak:\s+(\S+)\s+dBFS").expect("Invalid true peak regex");
    static ref LOUDNORM_INPUT_INTEGRATED: Regex =
        Regex::new(r"Input Integrated:\s+(\S+)\s+LUFS").expect("Invalid loudnorm input regex");
    static ref LOUDNORM_OUTPUT_INTEGRATED: Regex =
        Regex::new(r"Output Integrated:\s+(\S+)\s+LUFS").expect("Invalid loudnorm output regex");
}

/// Turns the diagnostic text of a measurement run into an integrated loudness reading.
pub trait MeasurementParser: Send + Sync {
    /// Returns the integrated loudness in LUFS, or `None` when absent.
    fn integrated_loudness(&self, diagnostics: &str) -> Option<f64>;
}

/// Parser for the summary printed by ffmpeg's `ebur128` filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ebur128Parser;

impl MeasurementParser for Ebur128Parser {
    fn integrated_loudness(&self, diagnostics: &str) -> Option<f64> {
        parse_integrated_loudness(diagnostics)
    }
}

/// Loudness figures reported by the `loudnorm` filter with `print_format=summary`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoudnormSummary {
    pub input_integrated: Option<f64>,
    pub output_integrated: Option<f64>,
}

/// Value of the first "Integrated loudness: I: <v> LUFS" occurrence.
///
/// Only the first occurrence is considered; if its value is not a finite number
/// the reading is absent.
pub fn parse_integrated_loudness(diagnostics: &str) -> Option<f64> {
    first_value(&INTEGRATED_LOUDNESS, diagnostics)
}

/// True peak from the `ebur128=peak=true` summary, in dBFS.
pub fn parse_true_peak(diagnostics: &str) -> Option<f64> {
    first_value(&TRUE_PEAK, diagnostics)
}

pub fn parse_loudnorm_summary(diagnostics: &str) -> LoudnormSummary {
    LoudnormSummary {
        input_integrated: first_value(&LOUDNORM_INPUT_INTEGRATED, diagnostics),
        output_integrated: first_value(&LOUDNORM_OUTPUT_INTEGRATED, diagnostics),
    }
}

fn first_value(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
