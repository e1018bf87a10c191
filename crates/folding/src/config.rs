//! Read-only folding configuration.

use std::time::Duration;

use crate::error::{FoldError, Result};

/// Assembler keyword dialect used for block boundary detection.
///
/// Explicit fold tags are recognized regardless of dialect; the dialect only
/// selects which keyword tables apply when no tag matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
	/// Explicit fold tags only, no keyword tables.
	Plain,
	/// MASM-style blocks (`SEGMENT`/`ENDS`, `PROC`/`ENDP`, ...).
	#[default]
	Masm,
	/// NASM-style blocks (`STRUC`/`ENDSTRUC`, `%MACRO`/`%ENDMACRO`, ...).
	Nasm,
}

/// Configuration for one folding controller.
///
/// Built by the host from its settings storage; the engine never mutates it.
#[derive(Debug, Clone)]
pub struct FoldConfig {
	/// Explicit free-text start tag, matched case-insensitively anywhere on a line.
	pub start_tag: String,
	/// Explicit free-text end tag, matched case-insensitively anywhere on a line.
	pub end_tag: String,
	/// Active assembler dialect.
	pub dialect: Dialect,
	/// Whether keyword/tag regions start out collapsed in the host view.
	pub default_collapsed: bool,
	/// Feature switch; a disabled controller never scans.
	pub enabled: bool,
	/// Quiet period between a change notification and the scan it triggers.
	pub debounce: Duration,
	/// Wall-clock budget for one full scan; exceeding it permanently
	/// disables folding for the buffer.
	pub slow_scan_threshold: Duration,
	/// Maximum number of body lines included in a hover preview.
	pub hover_line_cap: usize,
}

impl Default for FoldConfig {
	fn default() -> Self {
		Self {
			start_tag: "#region".to_string(),
			end_tag: "#endregion".to_string(),
			dialect: Dialect::default(),
			default_collapsed: false,
			enabled: true,
			debounce: Duration::from_millis(500),
			slow_scan_threshold: Duration::from_secs(3),
			hover_line_cap: 40,
		}
	}
}

impl FoldConfig {
	/// Checks the invariants a controller relies on.
	pub fn validate(&self) -> Result<()> {
		if self.start_tag.is_empty() {
			return Err(FoldError::EmptyStartTag);
		}
		if self.end_tag.is_empty() {
			return Err(FoldError::EmptyEndTag);
		}
		if self.hover_line_cap == 0 {
			return Err(FoldError::ZeroHoverCap);
		}
		Ok(())
	}
}
