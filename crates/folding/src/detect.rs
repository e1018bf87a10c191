//! Keyword boundary detection.
//!
//! Decides, per line, whether a region opens or closes. Resolution order:
//! the explicit free-text tag always wins; only when no tag matched does the
//! active dialect's keyword table apply, and only to tokens the classifier
//! marked as directives.

use std::sync::Arc;

use asmfold_primitives::Col;

use crate::classify::{TokenClassifier, TokenKind};
use crate::config::{Dialect, FoldConfig};

/// MASM keywords that open a region.
pub(crate) const MASM_START: &[&str] = &["SEGMENT", "MACRO", "STRUCT", ".IF", ".WHILE", "PROC"];
/// MASM keywords that suppress a start match on their line.
pub(crate) const MASM_SUPPRESS: &[&str] = &["EXTERN", "EXTRN"];
/// MASM keywords that close a region.
pub(crate) const MASM_END: &[&str] = &["ENDS", "ENDP", "ENDM", ".ENDIF", ".ENDW"];
/// NASM keywords that open a region.
pub(crate) const NASM_START: &[&str] = &["STRUC", "ISTRUC", "%MACRO"];
/// NASM keywords that close a region.
pub(crate) const NASM_END: &[&str] = &["ENDSTRUC", "IEND", "%ENDMACRO"];

/// A detected region start: where the fold collapses from, and where the
/// hover-description text begins. The two differ only for explicit tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartBoundary {
	/// Column the collapsed span starts at.
	pub fold_col: Col,
	/// Column the region's description text starts at.
	pub hover_col: Col,
}

/// Per-buffer boundary detector: explicit tags plus dialect keyword tables.
pub struct BoundaryDetector {
	cfg: Arc<FoldConfig>,
	classifier: Arc<dyn TokenClassifier>,
}

impl BoundaryDetector {
	/// Creates a detector over the given configuration and classifier.
	pub fn new(cfg: Arc<FoldConfig>, classifier: Arc<dyn TokenClassifier>) -> Self {
		Self { cfg, classifier }
	}

	/// Returns the start boundary opened by this line, if any.
	pub fn detect_start(&self, line: &str) -> Option<StartBoundary> {
		if let Some(col) = find_ci(line, &self.cfg.start_tag) {
			let after = col + self.cfg.start_tag.chars().count();
			return Some(StartBoundary {
				fold_col: after,
				hover_col: after,
			});
		}
		self.keyword_start(line)
	}

	/// Returns the column at which this line closes a region, if any.
	pub fn detect_end(&self, line: &str) -> Option<Col> {
		if let Some(col) = find_ci(line, &self.cfg.end_tag) {
			return Some(col);
		}
		self.keyword_end(line)
	}

	/// Returns the comment marker column when the line holds nothing but a
	/// comment, for the multi-line comment coalescer.
	pub fn comment_marker(&self, line: &str) -> Option<Col> {
		for (col, c) in line.chars().enumerate() {
			if c == ';' {
				return Some(col);
			}
			if !c.is_whitespace() {
				return None;
			}
		}
		None
	}

	fn keyword_start(&self, line: &str) -> Option<StartBoundary> {
		let (starts, suppress): (&[&str], &[&str]) = match self.cfg.dialect {
			Dialect::Plain => return None,
			Dialect::Masm => (MASM_START, MASM_SUPPRESS),
			Dialect::Nasm => (NASM_START, &[]),
		};

		let tokens = self.classifier.classify_line(line);
		let mut upper = String::new();
		let mut matched = false;

		// Suppression applies to the whole line: EXTERN anywhere in directive
		// position beats a start keyword on the same line.
		for token in tokens.iter().filter(|t| t.kind == TokenKind::Directive) {
			upper_token(line, token.start, token.end, &mut upper);
			if suppress.contains(&upper.as_str()) {
				return None;
			}
			matched |= starts.contains(&upper.as_str());
		}

		if matched {
			// The body hides behind the keyword line: fold from end of line.
			let eol = line.chars().count();
			return Some(StartBoundary {
				fold_col: eol,
				hover_col: eol,
			});
		}
		None
	}

	fn keyword_end(&self, line: &str) -> Option<Col> {
		let ends: &[&str] = match self.cfg.dialect {
			Dialect::Plain => return None,
			Dialect::Masm => MASM_END,
			Dialect::Nasm => NASM_END,
		};

		let tokens = self.classifier.classify_line(line);
		let mut upper = String::new();

		for token in tokens.iter().filter(|t| t.kind == TokenKind::Directive) {
			upper_token(line, token.start, token.end, &mut upper);
			if ends.contains(&upper.as_str()) {
				return Some(token.start);
			}
		}
		None
	}
}

/// Case-insensitive substring search; returns the match's character column.
fn find_ci(line: &str, needle: &str) -> Option<Col> {
	if needle.is_empty() {
		return None;
	}
	let hay: Vec<char> = line.chars().map(|c| c.to_ascii_uppercase()).collect();
	let needle: Vec<char> = needle.chars().map(|c| c.to_ascii_uppercase()).collect();
	if needle.len() > hay.len() {
		return None;
	}
	hay.windows(needle.len()).position(|w| w == needle.as_slice())
}

/// Copies the token's text, ASCII-uppercased, into `buf`.
fn upper_token(line: &str, start: Col, end: Col, buf: &mut String) {
	buf.clear();
	buf.extend(line.chars().skip(start).take(end - start).map(|c| c.to_ascii_uppercase()));
}
