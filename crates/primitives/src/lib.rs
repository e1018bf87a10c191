//! Core text primitives for the folding engine: line spans, rope helpers,
//! and position translation between buffer snapshot versions.

/// Rope utilities and extensions.
pub mod rope;
/// Line/char span types and normalized span-set operations.
pub mod span;
/// Snapshot position translation via retain/delete/insert changesets.
pub mod translate;

pub use ropey::{Rope, RopeSlice};
pub use rope::{line_char_span, line_text, visible_line_count};
pub use span::{CharIdx, CharSpan, Col, LineIdx, LineSpan, normalize, subtract};
pub use translate::{Bias, ChangeSet};
