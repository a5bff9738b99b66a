use super::fixtures::{measurement_output, CORRECTED_BYTES};
use async_trait::async_trait;
use loudness_normalizer::tool::{InvokeError, ToolInvoker, ToolOperation};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the fake tool does for a given source file.
#[derive(Debug, Clone)]
pub enum Script {
    /// Correction succeeds; measurement reports this integrated loudness.
    Measures(f64),
    /// Correction succeeds; measurement output carries no loudness summary.
    NoMeasurement,
    /// Correction writes a partial file, then exits with this code.
    CorrectionFails(i32),
    /// Correction exits zero without writing anything.
    CorrectionWritesNothing,
    /// Correction succeeds; measurement exits with this code.
    MeasurementFails(i32),
    /// Correction succeeds, but the source is replaced by a non-empty
    /// directory before the result can be moved over it.
    SourceBecomesDirectory,
}

/// Fake [`ToolInvoker`] keyed by source file name.
///
/// Files without a script behave like [`Script::Measures`] at -13.0 LUFS.
#[derive(Default)]
pub struct ScriptedInvoker {
    scripts: HashMap<String, Script>,
    current: Mutex<Option<Script>>,
    calls: Mutex<Vec<ToolOperation>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, file_name: &str, script: Script) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every operation received, in order.
    pub fn calls(&self) -> Vec<ToolOperation> {
        self.calls.lock().unwrap().clone()
    }

    fn script_for(&self, operation: &ToolOperation) -> Script {
        match operation {
            ToolOperation::Correct { input, .. } => {
                let name = input
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let script = self
                    .scripts
                    .get(&name)
                    .cloned()
                    .unwrap_or(Script::Measures(-13.0));
                *self.current.lock().unwrap() = Some(script.clone());
                script
            }
            // Measurement always follows the correction of the same file
            ToolOperation::Measure { .. } => self
                .current
                .lock()
                .unwrap()
                .clone()
                .expect("measurement without a preceding correction"),
        }
    }
}

fn exited(operation: &'static str, code: i32, diagnostics: &str) -> InvokeError {
    InvokeError::Exited {
        operation,
        code: Some(code),
        diagnostics: diagnostics.to_string(),
    }
}

#[async_trait]
impl ToolInvoker for ScriptedInvoker {
    async fn run(&self, operation: &ToolOperation) -> Result<String, InvokeError> {
        self.calls.lock().unwrap().push(operation.clone());
        let script = self.script_for(operation);

        match operation {
            ToolOperation::Correct { input, output, .. } => match script {
                Script::CorrectionFails(code) => {
                    std::fs::write(output, b"partial").unwrap();
                    Err(exited(
                        "correction",
                        code,
                        "Invalid data found when processing input",
                    ))
                }
                Script::CorrectionWritesNothing => Ok(String::new()),
                Script::SourceBecomesDirectory => {
                    std::fs::write(output, CORRECTED_BYTES).unwrap();
                    std::fs::remove_file(input).unwrap();
                    std::fs::create_dir(input).unwrap();
                    std::fs::write(input.join("cover.jpg"), b"jpeg").unwrap();
                    Ok(String::new())
                }
                _ => {
                    std::fs::write(output, CORRECTED_BYTES).unwrap();
                    Ok("Output Integrated:   -13.1 LUFS\n".to_string())
                }
            },
            ToolOperation::Measure { .. } => match script {
                Script::Measures(reading) => Ok(measurement_output(reading)),
                Script::MeasurementFails(code) => Err(exited("measurement", code, "")),
                Script::SourceBecomesDirectory => Ok(measurement_output(-13.0)),
                _ => Ok("Stream mapping:\n  Stream #0:0 -> #0:0 (pcm_s16le)\n".to_string()),
            },
        }
    }
}
