//! Region data model.

use asmfold_primitives::{Col, LineIdx};
use ropey::Rope;

/// What produced a region; hosts style comment folds differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
	/// Keyword- or tag-delimited block.
	Block,
	/// Coalesced run of comment-only lines.
	Comment,
}

/// An in-progress region: its start has been seen, its end has not.
///
/// Lives in the builder's arena; `parent` is an index into that arena, so
/// ownership stays with the arena and the chain toward the root is plain
/// index-following.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PartialRegion {
	pub start_line: LineIdx,
	pub fold_col: Col,
	pub hover_col: Col,
	/// Nesting level, root = 1.
	pub level: usize,
	pub parent: Option<usize>,
}

/// A closed foldable region. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
	/// First line of the region.
	pub start_line: LineIdx,
	/// Last line of the region (inclusive).
	pub end_line: LineIdx,
	/// Column on the start line the collapsed span begins at.
	pub fold_col: Col,
	/// Column on the start line the description text begins at.
	pub hover_col: Col,
	/// Column on the end line the collapsed span ends at.
	pub end_col: Col,
	/// Nesting level, >= 1.
	pub level: usize,
	/// What produced the region.
	pub kind: RegionKind,
}

impl Region {
	pub(crate) fn close(partial: PartialRegion, end_line: LineIdx, end_col: Col) -> Self {
		debug_assert!(end_line >= partial.start_line, "region end line precedes its start");
		debug_assert!(partial.level >= 1, "region level must be >= 1");
		Self {
			start_line: partial.start_line,
			end_line,
			fold_col: partial.fold_col,
			hover_col: partial.hover_col,
			end_col,
			level: partial.level,
			kind: RegionKind::Block,
		}
	}
}

/// The ordered sequence of closed regions produced by one full scan, paired
/// with the snapshot and version it was computed against.
///
/// Regions appear in the order their closing boundary was encountered, which
/// is not necessarily sorted by start line.
#[derive(Debug, Clone)]
pub struct RegionSet {
	/// The snapshot the regions were computed over.
	pub snapshot: Rope,
	/// Buffer version of that snapshot.
	pub version: u64,
	/// Closed regions, in close order.
	pub regions: Vec<Region>,
}
