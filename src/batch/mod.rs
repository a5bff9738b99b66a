//! Batch processing: which files to touch, and what happened to each.

mod candidate;
mod orchestrator;
mod report;

pub use candidate::{
    expand_inputs, resolve_input, strip_quotes, AudioKind, CandidateFile, InputError,
    SUPPORTED_EXTENSIONS,
};
pub use orchestrator::BatchOrchestrator;
pub use report::{BatchReport, ExitInfo, FileReport, Outcome, RunSummary};
