//! Common test infrastructure
//!
//! Provides a scripted stand-in for ffmpeg and temp-dir audio fixtures so the
//! correct-then-verify workflow can run without a real ffmpeg install.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{AudioFixture, Script, ScriptedInvoker};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let fixture = AudioFixture::new();
//!     let invoker = ScriptedInvoker::new()
//!         .with_script("a.mp3", Script::Measures(-13.2))
//!         .shared();
//!     let report = fixture
//!         .orchestrator(invoker.clone())
//!         .run(&[fixture.write("a.mp3")])
//!         .await;
//! }
//! ```

#[allow(dead_code)]
mod fixtures;
#[allow(dead_code)]
mod scripted_invoker;

// Public API - this is what tests import
#[allow(unused_imports)]
pub use fixtures::{measurement_output, AudioFixture, CORRECTED_BYTES, ORIGINAL_BYTES};
#[allow(unused_imports)]
pub use scripted_invoker::{Script, ScriptedInvoker};
