//! Brace depth tracking that skips string literals, character literals and comments.

/// Lexical state of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Code,
    Quoted {
        quote: char,
        escaped: bool,
    },
    LineComment,
    BlockComment,
}

/// Counts `{`/`}` nesting one character at a time.
///
/// Strings and character literals end at the line break if unterminated; line comments end at
/// the line break; block comments may span lines.
#[derive(Debug, Clone, Default)]
pub struct BraceCounter {
    mode: Mode,
    prev: Option<char>,
    depth: usize,
}

impl BraceCounter {
    /// Create a counter at depth 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Feed the next character.
    pub fn feed(&mut self, ch: char) {
        let mut prev = Some(ch);
        match self.mode {
            Mode::Code => match ch {
                '{' => self.depth += 1,
                '}' => self.depth = self.depth.saturating_sub(1),
                '"' | '\'' => {
                    self.mode = Mode::Quoted {
                        quote: ch,
                        escaped: false,
                    }
                }
                '/' if self.prev == Some('/') => self.mode = Mode::LineComment,
                '*' if self.prev == Some('/') => {
                    self.mode = Mode::BlockComment;
                    // `/*/` does not close the comment.
                    prev = None;
                }
                _ => {}
            },
            Mode::Quoted { quote, escaped } => {
                if ch == '\n' || (!escaped && ch == quote) {
                    self.mode = Mode::Code;
                } else {
                    self.mode = Mode::Quoted {
                        quote,
                        escaped: !escaped && ch == '\\',
                    };
                }
                prev = None;
            }
            Mode::LineComment => {
                if ch == '\n' {
                    self.mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if ch == '/' && self.prev == Some('*') {
                    self.mode = Mode::Code;
                    prev = None;
                }
            }
        }
        self.prev = prev;
    }

    /// Feed every character of `text`.
    pub fn feed_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.feed(ch);
        }
    }
}

/// Depth before each line, plus the depth after the last line (`lines.len() + 1` entries).
pub fn line_depths<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    let mut counter = BraceCounter::new();
    let mut depths = Vec::with_capacity(lines.len() + 1);
    for line in lines {
        depths.push(counter.depth());
        counter.feed_str(line.as_ref());
        counter.feed('\n');
    }
    depths.push(counter.depth());
    depths
}

/// Byte offset of the `}` matching the `{` at byte offset `open`.
///
/// Returns `None` if `open` is not a `{` or the brace is never closed.
pub fn matching_brace(text: &str, open: usize) -> Option<usize> {
    if !text.get(open..)?.starts_with('{') {
        return None;
    }

    let mut counter = BraceCounter::new();
    for (offset, ch) in text[open..].char_indices() {
        counter.feed(ch);
        if ch == '}' && counter.depth() == 0 && counter.mode == Mode::Code {
            return Some(open + offset);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_depths() {
        let lines = ["class A {", "  void f() {", "  }", "}"];
        assert_eq!(line_depths(&lines), vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_braces_in_strings_and_comments_are_ignored() {
        let lines = [
            "class A {",
            r#"  String s = "{ \" {";"#,
            "  char c = '{';",
            "  // {",
            "  /* {",
            "     } } */",
            "  int x;",
            "}",
        ];
        assert_eq!(line_depths(&lines), vec![0, 1, 1, 1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_matching_brace_handles_nesting() {
        let text = "f() { if (a) { b(); } new X() { }; }";
        let open = text.find('{').unwrap();
        let close = matching_brace(text, open).unwrap();
        assert_eq!(close, text.len() - 1);
    }

    #[test]
    fn test_matching_brace_skips_quoted_braces() {
        let text = r#"{ s = "}"; c = '}'; }"#;
        assert_eq!(matching_brace(text, 0), Some(text.len() - 1));
    }

    #[test]
    fn test_unbalanced_brace() {
        assert_eq!(matching_brace("{ { }", 0), None);
        assert_eq!(matching_brace("x { }", 0), None);
    }

    #[test]
    fn test_extra_closing_braces_do_not_underflow() {
        assert_eq!(line_depths(&["}", "}"]), vec![0, 0, 0]);
    }
}
