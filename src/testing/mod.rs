//! Exchange runner
//!
//! Drives a fixed, ordered sequence of request/reply test cases over one
//! connection, validates each reply, and aggregates a verdict. Cases run
//! strictly one after another because later cases may consume server
//! state (a session) created by earlier ones.

mod cases;
mod runner;

pub use cases::*;
pub use runner::{run_cases, run_probe, CaseOutcome, RunReport, Verdict};
