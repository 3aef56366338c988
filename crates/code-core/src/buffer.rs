//! Code buffer: an append-only sequence of physical lines.
//!
//! Every string passed to [`CodeBuffer::add`] goes through the buffer's [`LineSplitter`], so the
//! stored lines respect the configured width wherever a legal split point exists. Lines read
//! from an existing file are kept verbatim.

use crate::config::CodeConfig;
use crate::error::CodeError;
use crate::layout::LineSplitter;
use crate::line_ending::LineEnding;
use crate::text::split_file_lines;
use code_core_lang::{SyntaxKind, SyntaxPolicy};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// An ordered, append-only sequence of source lines.
///
/// Two buffers are equal iff their line sequences are identical; width and policy are not
/// compared.
#[derive(Debug, Clone)]
pub struct CodeBuffer {
    lines: Vec<String>,
    splitter: LineSplitter,
    line_ending: LineEnding,
}

impl CodeBuffer {
    /// Create an empty buffer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&CodeConfig::default())
    }

    /// Create an empty buffer from a configuration.
    pub fn with_config(config: &CodeConfig) -> Self {
        Self::with_splitter(config.splitter())
    }

    /// Create an empty buffer for one of the built-in policies.
    pub fn with_kind(kind: SyntaxKind, max_width: usize) -> Self {
        Self::with_splitter(LineSplitter::for_kind(kind, max_width))
    }

    /// Create an empty buffer with a custom policy.
    pub fn with_policy(policy: Arc<dyn SyntaxPolicy>, max_width: usize) -> Self {
        Self::with_splitter(LineSplitter::new(policy, max_width))
    }

    /// Create an empty buffer around an existing splitter.
    pub fn with_splitter(splitter: LineSplitter) -> Self {
        Self {
            lines: Vec::new(),
            splitter,
            line_ending: LineEnding::Lf,
        }
    }

    /// Create a buffer holding `lines` verbatim (no re-wrapping), with the default configuration.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut code = Self::new();
        code.lines = lines.into_iter().map(Into::into).collect();
        code
    }

    /// Create a buffer from whole-file text, one line per line of `text` (no re-wrapping).
    ///
    /// CRLF and lone CR are normalized; the detected line ending is used by [`Self::save`].
    pub fn from_text(text: &str) -> Self {
        let mut code = Self::new();
        code.line_ending = LineEnding::detect_in_text(text);
        code.lines = split_file_lines(text);
        code
    }

    /// Read a file verbatim. The policy is chosen from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut code = Self::with_config(&CodeConfig::for_path(path));
        code.line_ending = LineEnding::detect_in_text(&text);
        code.lines = split_file_lines(&text);
        debug!(
            path = %path.display(),
            lines = code.lines.len(),
            line_ending = ?code.line_ending,
            "loaded code buffer"
        );
        Ok(code)
    }

    /// Write [`Self::text`] to `path` using the preferred line ending.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CodeError> {
        let path = path.as_ref();
        std::fs::write(path, self.line_ending.apply_to_text(&self.text())).map_err(|source| {
            CodeError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!(path = %path.display(), lines = self.lines.len(), "saved code buffer");
        Ok(())
    }

    /// Split `text` to the configured width and append every resulting line.
    ///
    /// Returns `true` if any line was appended.
    pub fn add(&mut self, text: impl AsRef<str>) -> bool {
        let lines = self.splitter.split(text.as_ref());
        let added = !lines.is_empty();
        self.lines.extend(lines);
        added
    }

    /// Append formatted text, e.g. `code.add_fmt(format_args!("class {name} {{"))`.
    pub fn add_fmt(&mut self, args: fmt::Arguments<'_>) -> bool {
        match args.as_str() {
            Some(text) => self.add(text),
            None => self.add(args.to_string()),
        }
    }

    /// Add every item of `texts`; returns `true` if any line was appended.
    pub fn add_all<I, S>(&mut self, texts: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .fold(false, |added, text| self.add(text) || added)
    }

    /// Append the lines of `other` verbatim.
    pub fn append(&mut self, other: &CodeBuffer) {
        self.lines.extend(other.lines.iter().cloned());
    }

    /// Iterate over the physical lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// The physical lines as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    /// Get a line by index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of physical lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the buffer has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines, each followed by `'\n'`.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Maximum width used by [`Self::add`].
    pub fn max_width(&self) -> usize {
        self.splitter.max_width()
    }

    /// The splitter used by [`Self::add`].
    pub fn splitter(&self) -> &LineSplitter {
        &self.splitter
    }

    /// Preferred line ending for [`Self::save`].
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Set the preferred line ending for [`Self::save`].
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }
}

impl Default for CodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CodeBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
    }
}

impl Eq for CodeBuffer {}

impl fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl<S: AsRef<str>> Extend<S> for CodeBuffer {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps_and_reports() {
        let mut code = CodeBuffer::with_kind(SyntaxKind::Generic, 16);
        assert!(code.add("String foo; // Qapla'!"));
        assert_eq!(code.as_slice(), ["String foo;", "// Qapla'!"]);
        assert_eq!(code.text(), "String foo;\n// Qapla'!\n");
    }

    #[test]
    fn test_add_empty_string_appends_blank_line() {
        let mut code = CodeBuffer::new();
        assert!(code.add(""));
        assert_eq!(code.line_count(), 1);
        assert_eq!(code.text(), "\n");
    }

    #[test]
    fn test_empty_buffer_text() {
        let code = CodeBuffer::new();
        assert!(code.is_empty());
        assert_eq!(code.text(), "");
        assert_eq!(code.to_string(), "");
    }

    #[test]
    fn test_add_fmt_and_extend() {
        let name = "Foo";
        let mut code = CodeBuffer::new();
        code.add_fmt(format_args!("public class {name} {{"));
        code.add_fmt(format_args!("}}"));
        code.extend(["", "// end"]);
        assert_eq!(code.as_slice(), ["public class Foo {", "}", "", "// end"]);
    }

    #[test]
    fn test_equality_ignores_configuration() {
        let mut a = CodeBuffer::with_kind(SyntaxKind::Xml, 40);
        let mut b = CodeBuffer::with_kind(SyntaxKind::Java, 80);
        a.add("<a/>");
        b.add("<a/>");
        assert_eq!(a, b);
        b.add("<b/>");
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_matters_for_equality() {
        assert_ne!(
            CodeBuffer::from_lines(["a", "b"]),
            CodeBuffer::from_lines(["b", "a"])
        );
    }

    #[test]
    fn test_from_lines_is_verbatim() {
        let long = "x ".repeat(100);
        let code = CodeBuffer::from_lines([long.as_str()]);
        assert_eq!(code.line_count(), 1);
        assert_eq!(code.line(0), Some(long.as_str()));
    }

    #[test]
    fn test_append_copies_lines() {
        let mut a = CodeBuffer::from_lines(["a"]);
        let b = CodeBuffer::from_lines(["b", "c"]);
        a.append(&b);
        assert_eq!(a.lines().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_text_tracks_line_ending() {
        let code = CodeBuffer::from_text("a\r\nb\r\n");
        assert_eq!(code.as_slice(), ["a", "b"]);
        assert_eq!(code.line_ending(), LineEnding::Crlf);
    }
}
