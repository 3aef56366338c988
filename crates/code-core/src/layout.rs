//! Line Splitting (Headless Layout for Generated Source)
//!
//! Wraps logical lines of source text into physical lines bounded by a maximum width.
//! Width is the number of characters in a line unless [`WidthMode::Cells`] is selected, and
//! every split decision is delegated to a [`SyntaxPolicy`] so that string literals and comment
//! markers are never cut in half.

use code_core_lang::{SyntaxKind, SyntaxPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// Default maximum width of a physical line.
pub const DEFAULT_MAX_WIDTH: usize = 120;

/// Default indentation (in columns) added to code continuation lines.
pub const DEFAULT_CONTINUATION_INDENT: usize = 4;

/// Tab width (in cells) used by [`WidthMode::Cells`].
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// A later split point wins over a nicer one once it is more than this many columns further along.
const GREEDY_OVERRIDE_COLUMNS: usize = 5;

/// Tie-break ranking of split points; higher is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeparatorClass {
    /// `.`
    Period = 0,
    /// Any other non-letter.
    Punctuation = 1,
    /// Whitespace.
    Space = 2,
    /// A line separator.
    LineBreak = 3,
}

impl SeparatorClass {
    /// Classify a character the policy allows splitting at.
    pub fn of(ch: char) -> Self {
        match ch {
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => Self::LineBreak,
            '.' => Self::Period,
            c if c.is_whitespace() => Self::Space,
            _ => Self::Punctuation,
        }
    }
}

/// Calculate visual width of a character (based on UAX #11)
///
/// Return value:
/// - 1: Narrow character (ASCII, etc.)
/// - 2: Wide character (CJK, fullwidth, etc.)
/// - 0: Zero-width character (combining characters, etc.)
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Calculate visual width (in cells) for a character at a specific cell offset within the line.
///
/// For `'\t'`, width advances to the next tab stop based on `tab_width`.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        let rem = cell_offset_in_line % tab_width;
        tab_width - rem
    } else {
        char_width(ch)
    }
}

/// Calculate total visual width of a string, interpreting `'\t'` with [`DEFAULT_TAB_WIDTH`].
pub fn str_width(s: &str) -> usize {
    let mut x = 0usize;
    for ch in s.chars() {
        x = x.saturating_add(cell_width_at(ch, x, DEFAULT_TAB_WIDTH));
    }
    x
}

/// How the width of a line is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidthMode {
    /// One column per `char`; a tab counts as one.
    #[default]
    Chars,
    /// Terminal cells (UAX #11), with tabs expanded to the next [`DEFAULT_TAB_WIDTH`] stop.
    Cells,
}

impl WidthMode {
    /// Columns taken by `ch` when it starts at `column`.
    pub fn advance(self, ch: char, column: usize) -> usize {
        match self {
            Self::Chars => 1,
            Self::Cells => cell_width_at(ch, column, DEFAULT_TAB_WIDTH),
        }
    }

    /// Width of `s`.
    pub fn measure(self, s: &str) -> usize {
        match self {
            Self::Chars => s.chars().count(),
            Self::Cells => str_width(s),
        }
    }
}

fn leading_whitespace_prefix_slice(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut end = 0usize;
    while end < bytes.len() {
        match bytes[end] {
            b' ' | b'\t' => end += 1,
            _ => break,
        }
    }
    &line[..end]
}

/// Returns `true` if splitting at byte offset `at` would cut an occurrence of `marker` in two.
fn cuts_marker(line: &str, at: usize, marker: &str) -> bool {
    let bytes = line.as_bytes();
    (1..marker.len()).any(|back| at >= back && bytes[at - back..].starts_with(marker.as_bytes()))
}

/// Leader repeated on every continuation of a block comment line.
fn block_comment_leader(content: &str) -> &'static str {
    if content.starts_with("/*") {
        " * "
    } else if content.starts_with('*') {
        "* "
    } else {
        ""
    }
}

/// A legal split point: the continuation line starts with the character at `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitPoint {
    /// Byte offset of the split character.
    at: usize,
    /// Column where the split character starts.
    column: usize,
    class: SeparatorClass,
    /// Whether the split character sits inside a comment.
    in_comment: bool,
    /// Byte offset just past the marker that opened the line comment, if the scan saw it.
    marker_end: Option<usize>,
}

/// Transient scan state for one search of a split point.
#[derive(Debug, Default)]
struct SplitState {
    best: Option<SplitPoint>,
    /// Active quote while inside a string literal.
    quote: Option<char>,
    escaped: bool,
    in_line_comment: bool,
    marker_end: Option<usize>,
    /// Partially accumulated line-comment marker.
    marker: String,
}

impl SplitState {
    fn accumulate_marker(&mut self, ch: char, marker: &str) {
        self.marker.push(ch);
        if !marker.starts_with(self.marker.as_str()) {
            self.marker.clear();
            if marker.starts_with(ch) {
                self.marker.push(ch);
            }
        }
    }

    fn consider(&mut self, candidate: SplitPoint) {
        let replace = match self.best {
            None => true,
            Some(best) => {
                candidate.class >= best.class
                    || candidate.column > best.column + GREEDY_OVERRIDE_COLUMNS
            }
        };
        if replace {
            self.best = Some(candidate);
        }
    }
}

/// Wraps logical lines into physical lines using a [`SyntaxPolicy`].
///
/// The splitter remembers whether the previous line left a block comment open, so one splitter
/// should be fed the lines of one document in order.
#[derive(Debug, Clone)]
pub struct LineSplitter {
    policy: Arc<dyn SyntaxPolicy>,
    max_width: usize,
    continuation_indent: usize,
    width_mode: WidthMode,
    in_block_comment: bool,
}

impl LineSplitter {
    /// Create a splitter with the default continuation indent.
    pub fn new(policy: Arc<dyn SyntaxPolicy>, max_width: usize) -> Self {
        Self {
            policy,
            max_width,
            continuation_indent: DEFAULT_CONTINUATION_INDENT,
            width_mode: WidthMode::Chars,
            in_block_comment: false,
        }
    }

    /// Create a splitter for one of the built-in policies.
    pub fn for_kind(kind: SyntaxKind, max_width: usize) -> Self {
        Self::new(kind.shared(), max_width)
    }

    /// Set the indentation added to code continuation lines.
    pub fn with_continuation_indent(mut self, continuation_indent: usize) -> Self {
        self.continuation_indent = continuation_indent;
        self
    }

    /// Set how line width is measured.
    pub fn with_width_mode(mut self, width_mode: WidthMode) -> Self {
        self.width_mode = width_mode;
        self
    }

    /// Get max width.
    pub fn max_width(&self) -> usize {
        self.max_width
    }

    /// How line width is measured.
    pub fn width_mode(&self) -> WidthMode {
        self.width_mode
    }

    /// Get continuation indent (in columns).
    pub fn continuation_indent(&self) -> usize {
        self.continuation_indent
    }

    /// The policy used for split decisions.
    pub fn policy(&self) -> &dyn SyntaxPolicy {
        self.policy.as_ref()
    }

    /// Returns `true` if the lines split so far left a block comment open.
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    /// Split one logical line (which may contain embedded newlines) into physical lines.
    ///
    /// Embedded newlines are hard breaks; each piece keeps its own indentation.
    pub fn split(&mut self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for piece in text.split('\n') {
            let piece = piece.strip_suffix('\r').unwrap_or(piece);

            if !self.in_block_comment && self.policy.starts_block_comment(piece) {
                self.in_block_comment = true;
            }
            let in_block = self.in_block_comment;

            let before = out.len();
            self.wrap_piece(piece, in_block, &mut out);
            trace!(
                width = self.width_mode.measure(piece),
                max_width = self.max_width,
                physical_lines = out.len() - before,
                in_block,
                "wrapped line"
            );

            if in_block && self.policy.ends_block_comment(piece) {
                self.in_block_comment = false;
            }
        }
        out
    }

    fn wrap_piece(&self, line: &str, in_block: bool, out: &mut Vec<String>) {
        let marker = self.policy.line_comment();
        let indent = leading_whitespace_prefix_slice(line);
        let block_leader = block_comment_leader(&line[indent.len()..]);
        let code_leader = " ".repeat(self.continuation_indent);

        let mut current = line.to_string();
        loop {
            if self.width_mode.measure(&current) <= self.max_width {
                out.push(current);
                return;
            }

            let (body_start, in_comment) = self.body_start(&current, in_block);
            let Some(point) = self.find_split(&current, body_start, in_comment, in_block) else {
                out.push(current);
                return;
            };
            // A comment line keeps its own column for the rest of the comment.
            let comment_indent = if in_comment {
                leading_whitespace_prefix_slice(&current).to_string()
            } else {
                indent.to_string()
            };

            let mut head = current[..point.at].trim_end();
            let rest = current[point.at..].trim_start();
            if rest.is_empty() {
                out.push(head.to_string());
                return;
            }

            let mut continues_comment = point.in_comment && !in_block;
            // A marker left dangling at the end of the head moves to the continuation.
            if point.marker_end == Some(head.len()) {
                head = head[..head.len() - marker.len()].trim_end();
                continues_comment = true;
            }
            if !head.trim().is_empty() {
                out.push(head.to_string());
            }

            current = if in_block {
                format!("{indent}{block_leader}{rest}")
            } else if continues_comment {
                format!("{comment_indent}{marker} {rest}")
            } else {
                format!("{indent}{code_leader}{rest}")
            };
        }
    }

    /// Byte offset where scanning starts (past indentation and any comment leader), and whether
    /// the line is a line comment from there on.
    fn body_start(&self, line: &str, in_block: bool) -> (usize, bool) {
        let marker = self.policy.line_comment();
        let indent = line.len() - line.trim_start().len();
        let content = &line[indent..];

        let leader = if in_block {
            ["/**", "/*", "*"]
                .into_iter()
                .find(|leader| content.starts_with(leader))
                .map(str::len)
        } else if !marker.is_empty() && content.starts_with(marker) {
            Some(marker.len())
        } else {
            None
        };

        match leader {
            Some(len) => {
                let after = &content[len..];
                let skipped = after.len() - after.trim_start().len();
                (indent + len + skipped, !in_block)
            }
            None => (indent, false),
        }
    }

    fn find_split(
        &self,
        line: &str,
        start: usize,
        in_line_comment: bool,
        in_block: bool,
    ) -> Option<SplitPoint> {
        let policy = self.policy.as_ref();
        let marker = policy.line_comment();
        let mut state = SplitState {
            in_line_comment,
            ..SplitState::default()
        };
        let mut column = self.width_mode.measure(&line[..start]);

        for (offset, ch) in line[start..].char_indices() {
            if column > self.max_width && state.best.is_some() {
                break;
            }
            let byte = start + offset;
            let width = self.width_mode.advance(ch, column);

            let splittable = if in_block {
                policy.can_split_in_comment(ch) && !cuts_marker(line, byte, marker)
            } else if let Some(quote) = state.quote {
                if state.escaped {
                    state.escaped = false;
                } else if ch == '\\' {
                    state.escaped = true;
                } else if ch == quote {
                    state.quote = None;
                }
                false
            } else if state.in_line_comment {
                policy.can_split_in_comment(ch) && !cuts_marker(line, byte, marker)
            } else {
                if !marker.is_empty() {
                    state.accumulate_marker(ch, marker);
                }
                if !marker.is_empty() && state.marker == marker {
                    state.in_line_comment = true;
                    state.marker_end = Some(byte + ch.len_utf8());
                    state.marker.clear();
                    false
                } else {
                    let splittable = policy.can_split_outside_comment(ch, state.marker.is_empty());
                    if state.marker.is_empty() && policy.is_string_start(ch) {
                        state.quote = Some(ch);
                    }
                    splittable
                }
            };

            // Splitting at the scan start would leave nothing behind.
            if splittable && offset > 0 {
                state.consider(SplitPoint {
                    at: byte,
                    column,
                    class: SeparatorClass::of(ch),
                    in_comment: in_block || state.in_line_comment,
                    marker_end: state.marker_end,
                });
            }
            column = column.saturating_add(width);
        }

        state.best
    }
}

/// Split `text` with a fresh splitter for one of the built-in policies.
pub fn split_text(text: &str, max_width: usize, kind: SyntaxKind) -> Vec<String> {
    LineSplitter::for_kind(kind, max_width).split(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_core_lang::{BlockComments, CommentConfig, JavaIdentifier};

    fn generic(text: &str, width: usize) -> Vec<String> {
        split_text(text, width, SyntaxKind::Generic)
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width(' '), 1);
        assert_eq!(char_width('你'), 2);
    }

    #[test]
    fn test_str_width_expands_tabs() {
        assert_eq!(str_width("\t"), 4);
        assert_eq!(str_width("a\t"), 4);
        assert_eq!(str_width("abcd\t"), 8);
        assert_eq!(str_width("你好"), 4);
    }

    #[test]
    fn test_width_modes() {
        assert_eq!(WidthMode::Chars.measure("\tabc def"), 8);
        assert_eq!(WidthMode::Cells.measure("\tabc def"), 11);
        assert_eq!(WidthMode::Chars.measure("你好"), 2);
        assert_eq!(WidthMode::Cells.measure("你好"), 4);
    }

    #[test]
    fn test_width_counts_chars_by_default() {
        assert_eq!(generic("\tabc def", 8), vec!["\tabc def"]);
        assert_eq!(generic("s = 你好你好你好;", 11), vec!["s = 你好你好你好;"]);
    }

    #[test]
    fn test_cell_width_mode_expands_tabs() {
        let mut splitter =
            LineSplitter::for_kind(SyntaxKind::Generic, 8).with_width_mode(WidthMode::Cells);
        assert_eq!(splitter.split("\tabc def"), vec!["\tabc", "\t    def"]);
    }

    #[test]
    fn test_separator_classes() {
        assert_eq!(SeparatorClass::of('\n'), SeparatorClass::LineBreak);
        assert_eq!(SeparatorClass::of(' '), SeparatorClass::Space);
        assert_eq!(SeparatorClass::of(','), SeparatorClass::Punctuation);
        assert_eq!(SeparatorClass::of('.'), SeparatorClass::Period);
        assert!(SeparatorClass::Space > SeparatorClass::Punctuation);
    }

    #[test]
    fn test_fitting_line_is_unchanged() {
        assert_eq!(generic("int x = 1;  ", 20), vec!["int x = 1;  "]);
        assert_eq!(generic("", 20), vec![""]);
    }

    #[test]
    fn test_trailing_comment_is_relocated() {
        assert_eq!(
            generic("String foo; // Qapla'!", 16),
            vec!["String foo;", "// Qapla'!"]
        );
    }

    #[test]
    fn test_whitespace_split_gets_continuation_indent() {
        assert_eq!(generic("PART1 PART2", 7), vec!["PART1", "    PART2"]);
    }

    #[test]
    fn test_unsplittable_token_is_emitted_whole() {
        let long = "x".repeat(40);
        assert_eq!(generic(&long, 10), vec![long.clone()]);
    }

    #[test]
    fn test_first_candidate_past_width_is_used() {
        let text = format!("{};{}", "a".repeat(15), "b".repeat(3));
        assert_eq!(
            generic(&text, 10),
            vec!["a".repeat(15), "    ;bbb".to_string()]
        );
    }

    #[test]
    fn test_string_literal_is_atomic() {
        let lines = generic(r#"call("a b c d e f", x);"#, 10);
        assert_eq!(lines, vec!["call(", r#"    "a b c d e f""#, "    , x);"]);
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let text = r#"s = "say \"hi there\" ok";"#;
        let lines = generic(text, 8);
        assert_eq!(lines[0], "s =");
        assert!(lines.iter().any(|l| l.contains(r#""say \"hi there\" ok""#)));
    }

    #[test]
    fn test_space_preferred_over_nearby_punctuation() {
        // ',' at column 5 is within 5 columns of the space at column 1, so the space keeps winning
        // until a later space beats it.
        assert_eq!(generic("a bcd,e fghijk", 10), vec!["a bcd,e", "    fghijk"]);
    }

    #[test]
    fn test_greedy_override_prefers_reaching_the_width() {
        assert_eq!(generic("a bcdefgh,ij", 11), vec!["a bcdefgh", "    ,ij"]);
    }

    #[test]
    fn test_continuations_keep_original_indentation() {
        let lines = generic("        alpha beta gamma delta", 20);
        assert_eq!(lines[0], "        alpha beta");
        assert!(lines[1..].iter().all(|l| l.starts_with("            ")));
    }

    #[test]
    fn test_comment_line_propagates_marker() {
        let lines = generic("  // one two three four five six", 16);
        assert_eq!(lines, vec!["  // one two", "  // three four", "  // five six"]);
    }

    #[test]
    fn test_split_inside_trailing_comment_continues_comment() {
        let lines = generic("x = 1; // alpha beta gamma", 18);
        assert_eq!(lines, vec!["x = 1; // alpha", "// beta gamma"]);
    }

    #[test]
    fn test_relocated_comment_keeps_its_column() {
        let lines = generic("foo(a, b); // c d e f g h", 12);
        assert_eq!(lines, vec!["foo(a, b);", "    // c d e", "    // f g h"]);
    }

    #[test]
    fn test_comment_split_never_cuts_a_marker() {
        let lines = generic("// aaaa //bbbbbb", 10);
        assert_eq!(lines, vec!["// aaaa", "// //bbbbbb"]);
    }

    #[test]
    fn test_slashes_in_comment_text_are_kept() {
        let lines = generic("// a /// b", 9);
        assert_eq!(lines, vec!["// a ///", "// b"]);
    }

    #[test]
    fn test_embedded_newlines_are_hard_breaks() {
        assert_eq!(generic("a\n  b\r\nc", 80), vec!["a", "  b", "c"]);
    }

    #[test]
    fn test_xml_keeps_end_tags_together() {
        let lines = split_text("<a><b>text</b></a>", 9, SyntaxKind::Xml);
        assert_eq!(lines, vec!["<a>", "    <b>text", "    </b>", "    </a>"]);
    }

    #[test]
    fn test_java_policy_does_not_split_identifiers() {
        let lines = split_text("my_long_name$value + other", 10, SyntaxKind::Java);
        assert_eq!(lines, vec!["my_long_name$value", "    + other"]);
    }

    #[test]
    fn test_block_comment_mode_is_carried_across_calls() {
        let policy = Arc::new(BlockComments::new(JavaIdentifier, CommentConfig::c_style()));
        let mut splitter = LineSplitter::new(policy, 20);

        assert_eq!(splitter.split("/**"), vec!["/**"]);
        assert!(splitter.in_block_comment());

        let lines = splitter.split(" * it's a lovely day in the park");
        assert_eq!(lines, vec![" * it's a lovely day", " * in the park"]);

        assert_eq!(splitter.split(" */"), vec![" */"]);
        assert!(!splitter.in_block_comment());
    }

    #[test]
    fn test_single_line_block_comment_opens_and_closes() {
        let policy = Arc::new(BlockComments::new(JavaIdentifier, CommentConfig::c_style()));
        let mut splitter = LineSplitter::new(policy, 80);
        splitter.split("/** Short. */");
        assert!(!splitter.in_block_comment());
    }
}
