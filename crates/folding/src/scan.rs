//! The full-scan pipeline.
//!
//! One linear pass over a snapshot: every line is checked for a region start,
//! then a region end, then a comment run. Start/end decisions feed the
//! nesting stack; comment runs bypass it and append directly.

use asmfold_primitives::{line_text, visible_line_count};
use ropey::Rope;

use crate::build::RegionBuilder;
use crate::comment::scan_comment_run;
use crate::detect::BoundaryDetector;
use crate::region::{Region, RegionKind};

/// Scans a snapshot and returns its closed regions, in close order.
///
/// Never fails: unmatched boundaries and unclosed trailing regions degrade
/// to fewer regions.
pub fn scan_snapshot(text: &Rope, detector: &BoundaryDetector) -> Vec<Region> {
	let slice = text.slice(..);
	let total = visible_line_count(slice);
	let mut builder = RegionBuilder::new();
	let mut buf = String::new();

	let mut line_idx = 0;
	while line_idx < total {
		line_text(slice, line_idx, &mut buf);

		if let Some(boundary) = detector.detect_start(&buf) {
			builder.on_start(line_idx, boundary);
			line_idx += 1;
			continue;
		}
		if let Some(end_col) = detector.detect_end(&buf) {
			builder.on_end(line_idx, end_col);
			line_idx += 1;
			continue;
		}
		if let Some(marker_col) = detector.comment_marker(&buf) {
			let run = scan_comment_run(slice, detector, line_idx, marker_col, &mut buf);
			if run.last_line > run.first_line {
				line_text(slice, run.last_line, &mut buf);
				builder.push_closed(Region {
					start_line: run.first_line,
					end_line: run.last_line,
					fold_col: run.marker_col,
					hover_col: run.marker_col,
					end_col: buf.chars().count(),
					level: builder.next_level(),
					kind: RegionKind::Comment,
				});
			}
			// Single-line runs do not fold; either way resume after the run.
			line_idx = run.last_line + 1;
			continue;
		}

		line_idx += 1;
	}

	builder.finish()
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::classify::KeywordClassifier;
	use crate::config::{Dialect, FoldConfig};

	fn masm_detector() -> BoundaryDetector {
		let cfg = FoldConfig {
			dialect: Dialect::Masm,
			..FoldConfig::default()
		};
		BoundaryDetector::new(Arc::new(cfg), Arc::new(KeywordClassifier::new()))
	}

	fn scan(text: &str) -> Vec<Region> {
		scan_snapshot(&Rope::from(text), &masm_detector())
	}

	#[test]
	fn proc_endp_pair() {
		let regions = scan("PROC foo\n  mov ax, bx\nENDP\n");
		assert_eq!(regions.len(), 1);
		let r = &regions[0];
		assert_eq!(r.start_line, 0);
		assert_eq!(r.fold_col, "PROC foo".chars().count());
		assert_eq!(r.end_line, 2);
		assert_eq!(r.end_col, 0);
		assert_eq!(r.level, 1);
	}

	#[test]
	fn matched_pairs_produce_matching_region_count() {
		let text = "\
code SEGMENT
main PROC
  .IF eax
  mov ax, bx
  .ENDIF
main ENDP
code ENDS
";
		let regions = scan(text);
		assert_eq!(regions.len(), 3);

		// Close order: innermost first.
		assert_eq!((regions[0].start_line, regions[0].end_line, regions[0].level), (2, 4, 3));
		assert_eq!((regions[1].start_line, regions[1].end_line, regions[1].level), (1, 5, 2));
		assert_eq!((regions[2].start_line, regions[2].end_line, regions[2].level), (0, 6, 1));

		// Nesting: the earlier-opened region has the lower level and the
		// later (or equal) end line.
		for pair in regions.windows(2) {
			assert!(pair[1].level < pair[0].level);
			assert!(pair[1].end_line >= pair[0].end_line);
		}
	}

	#[test]
	fn every_region_satisfies_basic_invariants() {
		let text = "\
code SEGMENT
; orphaned end below
ENDP
main PROC
main ENDP
code ENDS
unclosed MACRO
";
		for r in scan(text) {
			assert!(r.end_line >= r.start_line);
			assert!(r.level >= 1);
		}
	}

	#[test]
	fn scanning_twice_is_idempotent() {
		let text = "\
code SEGMENT
; a
; b
main PROC
main ENDP
code ENDS
";
		let rope = Rope::from(text);
		let detector = masm_detector();
		assert_eq!(scan_snapshot(&rope, &detector), scan_snapshot(&rope, &detector));
	}

	#[test]
	fn comment_run_of_five_folds_to_one_region() {
		let text = "\
; one
; two
; three
; four
; five
mov ax, bx
";
		let regions = scan(text);
		assert_eq!(regions.len(), 1);
		let r = &regions[0];
		assert_eq!(r.kind, RegionKind::Comment);
		assert_eq!((r.start_line, r.end_line), (0, 4));
		assert_eq!(r.fold_col, 0);
		assert_eq!(r.end_col, "; five".chars().count());
	}

	#[test]
	fn single_comment_line_does_not_fold() {
		assert_eq!(scan("; lonely\nmov ax, bx\n"), Vec::new());
	}

	#[test]
	fn comment_run_breaks_at_boundary_line() {
		// The tagged line ends the run and still opens its own region.
		let text = "\
; one
; two
; #region tagged
; body
; #endregion
";
		let regions = scan(text);
		assert_eq!(regions.len(), 2);
		assert_eq!(regions[0].kind, RegionKind::Comment);
		assert_eq!((regions[0].start_line, regions[0].end_line), (0, 1));
		assert_eq!(regions[1].kind, RegionKind::Block);
		assert_eq!((regions[1].start_line, regions[1].end_line), (2, 4));
	}

	#[test]
	fn comment_region_inside_block_nests_one_deeper() {
		let text = "\
main PROC
; a
; b
main ENDP
";
		let regions = scan(text);
		assert_eq!(regions.len(), 2);
		assert_eq!(regions[0].kind, RegionKind::Comment);
		assert_eq!(regions[0].level, 2);
		assert_eq!(regions[1].kind, RegionKind::Block);
		assert_eq!(regions[1].level, 1);
	}

	#[test]
	fn unclosed_region_at_eof_is_dropped() {
		assert_eq!(scan("main PROC\n  mov ax, bx\n"), Vec::new());
	}

	#[test]
	fn empty_snapshot_has_no_regions() {
		assert_eq!(scan(""), Vec::new());
	}

	#[test]
	fn tag_regions_fold_after_the_tag() {
		let text = "\
; #region setup code
xor eax, eax
; #endregion
";
		let regions = scan(text);
		assert_eq!(regions.len(), 1);
		let r = &regions[0];
		assert_eq!(r.start_line, 0);
		assert_eq!(r.end_line, 2);
		assert_eq!(r.fold_col, "; #region".chars().count());
		assert_eq!(r.end_col, 2);
	}
}
