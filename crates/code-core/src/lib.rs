#![warn(missing_docs)]
//! Code Core - Width-Bounded Source Code Buffer
//!
//! # Overview
//!
//! `code-core` accumulates generated (or loaded) source code line by line. Every line added to a
//! [`CodeBuffer`] is wrapped to a maximum width by a [`LineSplitter`], which never breaks inside a
//! string literal or a comment marker and asks a pluggable [`SyntaxPolicy`] where splitting is
//! legal for the language at hand.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  CodeBuffer (add / text / load / save)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  LineSplitter (string/comment aware scan)   │  ← Wrapping
//! ├─────────────────────────────────────────────┤
//! │  SyntaxPolicy (code-core-lang)              │  ← Per-language rules
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use code_core::{CodeBuffer, SyntaxKind};
//!
//! let mut code = CodeBuffer::with_kind(SyntaxKind::Generic, 16);
//! code.add("String foo; // Qapla'!");
//!
//! assert_eq!(code.text(), "String foo;\n// Qapla'!\n");
//! ```
//!
//! # Module Description
//!
//! - [`layout`] - line splitting and width measurement
//! - [`buffer`] - the append-only code buffer
//! - [`config`] - width / indent / policy configuration
//! - [`line_ending`] - line ending detection for load/save

pub mod buffer;
pub mod config;
mod error;
pub mod layout;
pub mod line_ending;
mod text;

pub use buffer::CodeBuffer;
pub use code_core_lang::{
    BlockComments, CommentConfig, Generic, JavaIdentifier, SyntaxKind, SyntaxPolicy, Xml,
};
pub use config::CodeConfig;
pub use error::CodeError;
pub use layout::{LineSplitter, SeparatorClass, WidthMode, split_text};
pub use line_ending::LineEnding;
