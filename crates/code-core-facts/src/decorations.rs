//! Annotations and doc comments attached to a declaration.
//!
//! Decorations belong to a declaration only when they are immediately adjacent to it. The lines
//! before the declaration are scanned in order; any line that is neither an annotation nor part
//! of a `/** ... */` comment discards what has been collected so far.

use crate::patterns::split_annotations;

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    /// Inside an annotation whose argument list is still open.
    Annotation { open_parens: usize },
    /// Inside a `/** ... */` comment.
    Comment,
}

/// Annotations and doc comment collected for one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decorations {
    /// Individual annotations, in source order.
    pub annotations: Vec<String>,
    /// De-prefixed doc comment lines.
    pub comment: Vec<String>,
}

impl Decorations {
    /// The doc comment joined with `'\n'` (empty if there is none).
    pub fn comment_text(&self) -> String {
        self.comment.join("\n")
    }

    fn clear(&mut self) {
        self.annotations.clear();
        self.comment.clear();
    }
}

/// Collect the decorations on the lines immediately before `lines[target]`.
pub fn decorations_before<S: AsRef<str>>(lines: &[S], target: usize) -> Decorations {
    let mut found = Decorations::default();
    let mut annotation = String::new();
    let mut comment = Vec::new();
    let mut state = ScanState::Idle;

    for line in lines.iter().take(target) {
        let line = line.as_ref().trim();
        state = match state {
            ScanState::Idle => {
                if line.starts_with('@') {
                    annotation.clear();
                    annotation.push_str(line);
                    match paren_balance(line) {
                        open if open > 0 => ScanState::Annotation {
                            open_parens: open.unsigned_abs(),
                        },
                        _ => {
                            found.annotations.extend(split_annotations(&annotation));
                            ScanState::Idle
                        }
                    }
                } else if line.starts_with("/**") {
                    comment.clear();
                    comment.push(strip_comment_line(line).to_string());
                    if line.len() > 3 && line.ends_with("*/") {
                        found.comment = finish_comment(&mut comment);
                        ScanState::Idle
                    } else {
                        ScanState::Comment
                    }
                } else {
                    found.clear();
                    ScanState::Idle
                }
            }
            ScanState::Annotation { open_parens } => {
                annotation.push(' ');
                annotation.push_str(line);
                let open = open_parens as isize + paren_balance(line);
                if open > 0 {
                    ScanState::Annotation {
                        open_parens: open.unsigned_abs(),
                    }
                } else {
                    found.annotations.extend(split_annotations(&annotation));
                    ScanState::Idle
                }
            }
            ScanState::Comment => {
                comment.push(strip_comment_line(line).to_string());
                if line.ends_with("*/") {
                    found.comment = finish_comment(&mut comment);
                    ScanState::Idle
                } else {
                    ScanState::Comment
                }
            }
        };
    }

    // The declaration itself sits inside an unterminated comment or annotation.
    if state != ScanState::Idle {
        found.clear();
    }
    found
}

/// The leading block comment of a file, de-prefixed and joined with `'\n'`.
///
/// Empty unless the first line starts a `/*` comment.
pub fn file_comment<S: AsRef<str>>(lines: &[S]) -> String {
    let starts_comment = lines
        .first()
        .is_some_and(|line| line.as_ref().trim_start().starts_with("/*"));
    if !starts_comment {
        return String::new();
    }

    let mut comment = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        comment.push(strip_comment_line(line).to_string());
        if line.contains("*/") {
            break;
        }
    }
    finish_comment(&mut comment).join("\n")
}

/// Remove the comment delimiters and the `*` leader from one comment line.
pub fn strip_comment_line(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    line = line
        .strip_prefix("/**")
        .or_else(|| line.strip_prefix("/*"))
        .or_else(|| line.strip_prefix('*'))
        .unwrap_or(line);
    line.trim()
}

/// Drop blank lines at both ends.
fn finish_comment(comment: &mut Vec<String>) -> Vec<String> {
    let lines = std::mem::take(comment);
    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].to_vec(),
        _ => Vec::new(),
    }
}

/// `(` minus `)` outside string literals.
fn paren_balance(line: &str) -> isize {
    let mut balance = 0isize;
    let mut quote = None;
    let mut escaped = false;
    for ch in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => balance += 1,
            ')' => balance -= 1,
            _ => {}
        }
    }
    balance
}
