//! Token classification interface.
//!
//! Boundary detection only consults tokens the classifier marks as
//! [`TokenKind::Directive`]; everything else on a line is ignored, so plain
//! occurrences of keyword text in operands or comments never open regions.
//! Hosts with a real lexer implement [`TokenClassifier`] over it; the
//! bundled [`KeywordClassifier`] is a positional table lookup good enough
//! for standalone use.

use asmfold_primitives::Col;
use rustc_hash::FxHashSet;

use crate::detect::{MASM_END, MASM_START, MASM_SUPPRESS, NASM_END, NASM_START};

/// Lexical class of one token, as far as folding cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	/// An assembler pseudo-instruction (`PROC`, `ENDS`, `%MACRO`, ...).
	Directive,
	/// An instruction mnemonic.
	Mnemonic,
	/// Anything else: labels, operands, string literals.
	Other,
}

/// One classified token: a column span within its line plus a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
	/// First column of the token, in characters.
	pub start: Col,
	/// One past the last column of the token, in characters.
	pub end: Col,
	/// Lexical class.
	pub kind: TokenKind,
}

/// Classifies one line of text into typed tokens.
///
/// Lines arrive without their trailing line break. Returning no tokens is
/// fine and simply means no directive is present on the line.
pub trait TokenClassifier: Send + Sync {
	/// Classifies `line` into tokens, in column order.
	fn classify_line(&self, line: &str) -> Vec<Token>;
}

/// Characters that may appear inside an assembler token.
fn is_token_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%' | '$' | '@' | '?')
}

/// Table-driven classifier over the built-in dialect keyword sets.
///
/// A keyword counts as a directive only in label or operation position (the
/// first two tokens of a line); later occurrences are operands. Comments
/// (`;` to end of line) are skipped entirely.
pub struct KeywordClassifier {
	directives: FxHashSet<&'static str>,
}

impl KeywordClassifier {
	/// Builds the classifier over both dialects' keyword tables.
	pub fn new() -> Self {
		let mut directives = FxHashSet::default();
		for table in [MASM_START, MASM_SUPPRESS, MASM_END, NASM_START, NASM_END] {
			directives.extend(table.iter().copied());
		}
		Self { directives }
	}
}

impl Default for KeywordClassifier {
	fn default() -> Self {
		Self::new()
	}
}

impl TokenClassifier for KeywordClassifier {
	fn classify_line(&self, line: &str) -> Vec<Token> {
		let mut tokens = Vec::new();
		let mut word = String::new();
		let mut start = 0;

		let flush = |word: &mut String, start: Col, end: Col, tokens: &mut Vec<Token>| {
			if word.is_empty() {
				return;
			}
			let upper = word.to_ascii_uppercase();
			let kind = if self.directives.contains(upper.as_str()) && tokens.len() < 2 {
				TokenKind::Directive
			} else if tokens.is_empty() {
				TokenKind::Mnemonic
			} else {
				TokenKind::Other
			};
			tokens.push(Token { start, end, kind });
			word.clear();
		};

		for (col, c) in line.chars().enumerate() {
			if c == ';' {
				flush(&mut word, start, col, &mut tokens);
				break;
			}
			if is_token_char(c) {
				if word.is_empty() {
					start = col;
				}
				word.push(c);
			} else {
				flush(&mut word, start, col, &mut tokens);
			}
		}
		flush(&mut word, start, line.chars().count(), &mut tokens);

		tokens
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(line: &str) -> Vec<TokenKind> {
		KeywordClassifier::new().classify_line(line).iter().map(|t| t.kind).collect()
	}

	#[test]
	fn label_then_directive() {
		assert_eq!(kinds("main PROC"), vec![TokenKind::Mnemonic, TokenKind::Directive]);
	}

	#[test]
	fn directive_in_first_position() {
		assert_eq!(kinds(".if eax"), vec![TokenKind::Directive, TokenKind::Other]);
	}

	#[test]
	fn keyword_in_operand_position_is_not_directive() {
		// Third token onward never classifies as a directive.
		assert_eq!(kinds("mov ax, ends"), vec![TokenKind::Mnemonic, TokenKind::Other, TokenKind::Other]);
	}

	#[test]
	fn comment_tail_is_skipped() {
		let tokens = KeywordClassifier::new().classify_line("mov ax, bx ; PROC starts here");
		assert_eq!(tokens.len(), 3);
		assert!(tokens.iter().all(|t| t.kind != TokenKind::Directive));
	}

	#[test]
	fn token_spans_are_char_columns() {
		let tokens = KeywordClassifier::new().classify_line("  foo SEGMENT");
		assert_eq!((tokens[0].start, tokens[0].end), (2, 5));
		assert_eq!((tokens[1].start, tokens[1].end), (6, 13));
	}

	#[test]
	fn empty_line_has_no_tokens() {
		assert!(KeywordClassifier::new().classify_line("").is_empty());
	}
}
