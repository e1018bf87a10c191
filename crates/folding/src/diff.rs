//! Region change-set diffing.
//!
//! Compares the previous scan's regions (repositioned onto the new snapshot
//! by pure position translation) against the freshly built set, and reduces
//! every actual difference to one minimal contiguous char span. Hosts
//! re-render only the notified span, so the bound must cover removed spans
//! and added spans and nothing more.

use asmfold_primitives::{Bias, ChangeSet, CharSpan, LineSpan, line_char_span, normalize, subtract};

use crate::region::{Region, RegionSet};

/// Computes the minimal changed span between `prev` (translated through
/// `change`) and `new_set`, in `new_set.snapshot` coordinates.
///
/// Returns `None` when the two sets cover the same lines.
pub fn diff_region_sets(prev: &RegionSet, change: &ChangeSet, new_set: &RegionSet) -> Option<CharSpan> {
	let new_len_chars = new_set.snapshot.len_chars();

	let old_spans = normalize(
		prev.regions
			.iter()
			.map(|r| translate_line_span(prev, r, change, new_set, new_len_chars))
			.collect(),
	);
	let new_spans = normalize(new_set.regions.iter().map(region_line_span).collect());

	let removed = subtract(&old_spans, &new_spans);
	let added = subtract(&new_spans, &old_spans);
	if removed.is_empty() && added.is_empty() {
		return None;
	}

	let mut changed = removed;
	changed.extend(added);
	let changed = normalize(changed);
	let first = changed.first()?;
	let last = changed.last()?;

	Some(lines_to_char_span(new_set, first.start, last.end))
}

/// Full extent of a region set, for the first scan where there is nothing to
/// diff against. `None` when the set is empty.
pub fn full_extent(set: &RegionSet) -> Option<CharSpan> {
	let spans = normalize(set.regions.iter().map(region_line_span).collect());
	let first = spans.first()?;
	let last = spans.last()?;
	Some(lines_to_char_span(set, first.start, last.end))
}

/// The half-open line interval a region covers.
fn region_line_span(region: &Region) -> LineSpan {
	LineSpan::new(region.start_line, region.end_line + 1)
}

/// Repositions a previous-snapshot region onto the new snapshot's lines.
fn translate_line_span(prev: &RegionSet, region: &Region, change: &ChangeSet, new_set: &RegionSet, new_len_chars: usize) -> LineSpan {
	let old_start = prev.snapshot.line_to_char(region.start_line);
	let old_end = line_char_span(prev.snapshot.slice(..), region.end_line).end;

	let new_start = change.map_pos(old_start, Bias::Left).min(new_len_chars);
	let new_end = change.map_pos(old_end, Bias::Right).clamp(new_start, new_len_chars);

	let start_line = new_set.snapshot.char_to_line(new_start);
	let end_line = new_set.snapshot.char_to_line(new_end);
	LineSpan::new(start_line, end_line + 1)
}

/// Converts a line interval to a char span on the set's snapshot.
fn lines_to_char_span(set: &RegionSet, start_line: usize, end_line: usize) -> CharSpan {
	let len_lines = set.snapshot.len_lines();
	let len_chars = set.snapshot.len_chars();

	let start_char = set.snapshot.line_to_char(start_line.min(len_lines - 1));
	let end_char = if end_line >= len_lines {
		len_chars
	} else {
		set.snapshot.line_to_char(end_line)
	};
	CharSpan::new(start_char, end_char.max(start_char))
}
