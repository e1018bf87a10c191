//! Error types for folding configuration and controller construction.

use thiserror::Error;

/// Errors produced when constructing a folding controller.
///
/// Scanning itself never fails: malformed input degrades to fewer regions.
#[derive(Debug, Error)]
pub enum FoldError {
	/// The explicit start tag is empty and would match every line.
	#[error("explicit fold start tag must not be empty")]
	EmptyStartTag,

	/// The explicit end tag is empty and would match every line.
	#[error("explicit fold end tag must not be empty")]
	EmptyEndTag,

	/// Hover previews need at least one line to show.
	#[error("hover preview line cap must be at least 1")]
	ZeroHoverCap,
}

/// Result type for folding operations.
pub type Result<T> = std::result::Result<T, FoldError>;
