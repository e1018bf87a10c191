//! Multi-line comment coalescing.
//!
//! Runs of comment-only lines fold as one region, independent of the keyword
//! nesting stack. The run is found by lookahead from its first line; a line
//! that opens or closes a region (an explicit tag inside a comment, say)
//! terminates the run and is handed back to the main scan loop.

use asmfold_primitives::{Col, LineIdx, line_text, visible_line_count};
use ropey::RopeSlice;

use crate::detect::BoundaryDetector;

/// A maximal run of coalescible comment-only lines.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommentRun {
	/// Comment marker column on the first line; the fold point.
	pub marker_col: Col,
	/// First line of the run.
	pub first_line: LineIdx,
	/// Last line of the run (inclusive). Equal to `first_line` for a
	/// single-line run, which does not fold.
	pub last_line: LineIdx,
}

/// Extends the run starting at `first_line` (already known to be
/// comment-only and boundary-free) over subsequent matching lines.
pub(crate) fn scan_comment_run(
	text: RopeSlice,
	detector: &BoundaryDetector,
	first_line: LineIdx,
	marker_col: Col,
	buf: &mut String,
) -> CommentRun {
	let total = visible_line_count(text);
	let mut last_line = first_line;

	for line_idx in (first_line + 1)..total {
		line_text(text, line_idx, buf);
		if detector.detect_start(buf).is_some() || detector.detect_end(buf).is_some() {
			break;
		}
		if detector.comment_marker(buf).is_none() {
			break;
		}
		last_line = line_idx;
	}

	CommentRun {
		marker_col,
		first_line,
		last_line,
	}
}
