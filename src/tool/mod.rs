//! The external audio tool: where it lives and how operations are run.

mod invoker;
mod locator;

#[cfg(any(test, feature = "mock"))]
pub use invoker::MockToolInvoker;
pub use invoker::{FfmpegInvoker, InvokeError, ToolInvoker, ToolOperation};
pub use locator::{locate, probe_program, resolve_program, ToolUnavailable, DEFAULT_PROGRAM};
