//! Shared worker runtime primitives for the folding engine.
//!
//! Provides task classification and spawn entrypoints (with a lazily-built
//! owned runtime fallback), generation-scoped cancellation tokens, and the
//! [`ScanGate`] single-flight state machine that coalesces bursty rescan
//! requests into at most one queued follow-up.

mod class;
mod gate;
mod spawn;
mod token;

pub use class::TaskClass;
pub use gate::{GateDecision, ScanGate};
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
