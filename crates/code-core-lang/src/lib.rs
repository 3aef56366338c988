#![warn(missing_docs)]
//! `code-core-lang` - per-language line splitting policies for `code-core`.
//!
//! This crate intentionally stays lightweight and does **not** know anything about the
//! splitting algorithm itself. It provides the small capability set the splitter consults
//! character by character: what opens a string literal, where a line may be broken inside and
//! outside a trailing comment, and which lines open or close a multi-line comment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The line-comment marker used by every built-in policy.
pub const DEFAULT_LINE_COMMENT: &str = "//";

/// Where a line of source text may legally be split, for one language or dialect.
///
/// Implementations are stateless: the splitter owns all scan state and only asks questions
/// about single characters or whole lines.
pub trait SyntaxPolicy: fmt::Debug + Send + Sync {
    /// Returns `true` if `ch` opens a quoted literal.
    fn is_string_start(&self, ch: char) -> bool;

    /// Returns `true` if a line may be split at `ch` once inside a trailing line comment.
    fn can_split_in_comment(&self, ch: char) -> bool;

    /// Returns `true` if a line may be split at `ch` in code.
    ///
    /// The continuation line starts with `ch`.
    ///
    /// `comment_buffer_empty` is `false` while a line-comment marker is partially accumulated;
    /// splitting is never allowed in that case.
    fn can_split_outside_comment(&self, ch: char, comment_buffer_empty: bool) -> bool;

    /// Returns `true` if `line` opens a multi-line comment.
    fn starts_block_comment(&self, _line: &str) -> bool {
        false
    }

    /// Returns `true` if `line` closes a multi-line comment.
    fn ends_block_comment(&self, _line: &str) -> bool {
        false
    }

    /// The line-comment marker.
    fn line_comment(&self) -> &str {
        DEFAULT_LINE_COMMENT
    }
}

fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

fn can_split_in_prose(ch: char) -> bool {
    !ch.is_alphabetic() && ch != '\''
}

/// Generic source text: `'`/`"` quotes, `//` comments, split on any non-alphanumeric character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Generic;

impl SyntaxPolicy for Generic {
    fn is_string_start(&self, ch: char) -> bool {
        is_quote(ch)
    }

    fn can_split_in_comment(&self, ch: char) -> bool {
        can_split_in_prose(ch)
    }

    fn can_split_outside_comment(&self, ch: char, comment_buffer_empty: bool) -> bool {
        comment_buffer_empty && !ch.is_alphanumeric()
    }
}

/// XML-like markup: like [`Generic`], but never splits at `>` or `/` so that end tags and
/// self-closing tags stay intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Xml;

impl SyntaxPolicy for Xml {
    fn is_string_start(&self, ch: char) -> bool {
        Generic.is_string_start(ch)
    }

    fn can_split_in_comment(&self, ch: char) -> bool {
        Generic.can_split_in_comment(ch)
    }

    fn can_split_outside_comment(&self, ch: char, comment_buffer_empty: bool) -> bool {
        ch != '>' && ch != '/' && Generic.can_split_outside_comment(ch, comment_buffer_empty)
    }
}

/// Java-like source: never splits at an identifier character (alphanumeric, `_` or `$`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JavaIdentifier;

impl JavaIdentifier {
    /// Returns `true` if `ch` may be part of an identifier.
    pub fn is_identifier_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }
}

impl SyntaxPolicy for JavaIdentifier {
    fn is_string_start(&self, ch: char) -> bool {
        is_quote(ch)
    }

    fn can_split_in_comment(&self, ch: char) -> bool {
        can_split_in_prose(ch)
    }

    fn can_split_outside_comment(&self, ch: char, comment_buffer_empty: bool) -> bool {
        comment_buffer_empty && !Self::is_identifier_char(ch)
    }
}

/// Comment tokens for a given language.
///
/// Used by [`BlockComments`] to teach an existing policy about multi-line comments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// C-family comments: `//`, `/*` and `*/`.
    pub fn c_style() -> Self {
        Self::line_and_block("//", "/*", "*/")
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Wraps a policy and recognizes the block comment tokens of a [`CommentConfig`].
///
/// A line opens a block comment when it starts with `block_start` (after indentation) and
/// closes one when it ends with `block_end`. All character-level decisions are delegated to
/// the inner policy.
#[derive(Debug, Clone)]
pub struct BlockComments<P> {
    inner: P,
    comments: CommentConfig,
}

impl<P: SyntaxPolicy> BlockComments<P> {
    /// Create a wrapper around `inner` using the tokens in `comments`.
    pub fn new(inner: P, comments: CommentConfig) -> Self {
        Self { inner, comments }
    }

    /// The wrapped policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: SyntaxPolicy> SyntaxPolicy for BlockComments<P> {
    fn is_string_start(&self, ch: char) -> bool {
        self.inner.is_string_start(ch)
    }

    fn can_split_in_comment(&self, ch: char) -> bool {
        self.inner.can_split_in_comment(ch)
    }

    fn can_split_outside_comment(&self, ch: char, comment_buffer_empty: bool) -> bool {
        self.inner.can_split_outside_comment(ch, comment_buffer_empty)
    }

    fn starts_block_comment(&self, line: &str) -> bool {
        if !self.comments.has_block() {
            return self.inner.starts_block_comment(line);
        }
        let start = self.comments.block_start.as_deref().unwrap_or_default();
        line.trim_start().starts_with(start)
    }

    fn ends_block_comment(&self, line: &str) -> bool {
        if !self.comments.has_block() {
            return self.inner.ends_block_comment(line);
        }
        let end = self.comments.block_end.as_deref().unwrap_or_default();
        line.trim_end().ends_with(end)
    }

    fn line_comment(&self) -> &str {
        if self.comments.has_line() {
            self.comments.line.as_deref().unwrap_or_default()
        } else {
            self.inner.line_comment()
        }
    }
}

/// Selects one of the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxKind {
    /// [`Generic`].
    #[default]
    Generic,
    /// [`Xml`].
    Xml,
    /// [`JavaIdentifier`].
    #[serde(alias = "java-identifier")]
    Java,
}

impl SyntaxKind {
    /// Pick a policy from a file extension (without the leading dot, case-insensitive).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "xml" | "xsd" | "xsl" | "xslt" | "wsdl" | "html" => Self::Xml,
            "java" => Self::Java,
            _ => Self::Generic,
        }
    }

    /// The built-in policy for this kind.
    pub fn policy(self) -> &'static dyn SyntaxPolicy {
        match self {
            Self::Generic => &Generic,
            Self::Xml => &Xml,
            Self::Java => &JavaIdentifier,
        }
    }

    /// The built-in policy for this kind, as a shareable handle.
    pub fn shared(self) -> Arc<dyn SyntaxPolicy> {
        match self {
            Self::Generic => Arc::new(Generic),
            Self::Xml => Arc::new(Xml),
            Self::Java => Arc::new(JavaIdentifier),
        }
    }
}
