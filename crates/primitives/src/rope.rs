//! Rope utilities and extensions.

use ropey::RopeSlice;

use crate::span::{CharSpan, LineIdx};

/// Returns the number of lines, including the empty line after a trailing newline.
#[inline]
pub fn visible_line_count(text: RopeSlice) -> usize {
	text.len_lines()
}

/// Returns the character span of a line, excluding its trailing line break.
pub fn line_char_span(text: RopeSlice, line: LineIdx) -> CharSpan {
	let start = text.line_to_char(line);
	let line_slice = text.line(line);
	let mut end = start + line_slice.len_chars();
	// Walk back over the line break so spans never cover it.
	let mut chars = line_slice.chars_at(line_slice.len_chars());
	while let Some(c) = chars.prev() {
		if c == '\n' || c == '\r' {
			end -= 1;
		} else {
			break;
		}
	}
	CharSpan::new(start, end)
}

/// Copies a line's text, without its trailing line break, into `buf`.
///
/// The buffer is cleared first; reusing one buffer across a scan avoids a
/// per-line allocation.
pub fn line_text(text: RopeSlice, line: LineIdx, buf: &mut String) {
	buf.clear();
	for chunk in text.line(line).chunks() {
		buf.push_str(chunk);
	}
	while buf.ends_with('\n') || buf.ends_with('\r') {
		buf.pop();
	}
}

#[cfg(test)]
mod tests {
	use ropey::Rope;

	use super::*;

	#[test]
	fn test_line_char_span_excludes_newline() {
		let text = Rope::from("abc\ndefgh\n");
		assert_eq!(line_char_span(text.slice(..), 0), CharSpan::new(0, 3));
		assert_eq!(line_char_span(text.slice(..), 1), CharSpan::new(4, 9));
		assert_eq!(line_char_span(text.slice(..), 2), CharSpan::new(10, 10));
	}

	#[test]
	fn test_line_char_span_crlf() {
		let text = Rope::from("abc\r\ndef");
		assert_eq!(line_char_span(text.slice(..), 0), CharSpan::new(0, 3));
		assert_eq!(line_char_span(text.slice(..), 1), CharSpan::new(5, 8));
	}

	#[test]
	fn test_line_text_reuses_buffer() {
		let text = Rope::from("first\nsecond\r\n");
		let mut buf = String::new();
		line_text(text.slice(..), 0, &mut buf);
		assert_eq!(buf, "first");
		line_text(text.slice(..), 1, &mut buf);
		assert_eq!(buf, "second");
		line_text(text.slice(..), 2, &mut buf);
		assert_eq!(buf, "");
	}

	#[test]
	fn test_visible_line_count_trailing_newline() {
		assert_eq!(visible_line_count(Rope::from("a\nb").slice(..)), 2);
		assert_eq!(visible_line_count(Rope::from("a\nb\n").slice(..)), 3);
		assert_eq!(visible_line_count(Rope::from("").slice(..)), 1);
	}
}
