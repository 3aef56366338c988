//! Buffer configuration.
//!
//! A buffer is configured by two numbers, a width measure and one policy selection. Hosts usually derive the
//! configuration from a file path, or load it from a small YAML document:
//!
//! ```yaml
//! max_width: 100
//! continuation_indent: 8
//! syntax: java
//! width_mode: cells
//! ```

use crate::error::CodeError;
use crate::layout::{DEFAULT_CONTINUATION_INDENT, DEFAULT_MAX_WIDTH, LineSplitter, WidthMode};
use code_core_lang::SyntaxKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Width, width measure, continuation indent and policy for a [`CodeBuffer`](crate::CodeBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeConfig {
    /// Maximum width of a physical line.
    pub max_width: usize,
    /// Indentation (in columns) added to code continuation lines.
    pub continuation_indent: usize,
    /// Which built-in policy decides split points.
    pub syntax: SyntaxKind,
    /// How the width of a line is measured.
    pub width_mode: WidthMode,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            continuation_indent: DEFAULT_CONTINUATION_INDENT,
            syntax: SyntaxKind::Generic,
            width_mode: WidthMode::Chars,
        }
    }
}

impl CodeConfig {
    /// Default configuration with the policy chosen from the file extension of `path`.
    pub fn for_path(path: &Path) -> Self {
        let syntax = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(SyntaxKind::from_extension)
            .unwrap_or_default();
        Self {
            syntax,
            ..Self::default()
        }
    }

    /// Parse a configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, CodeError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Build a splitter for this configuration.
    pub fn splitter(&self) -> LineSplitter {
        LineSplitter::for_kind(self.syntax, self.max_width)
            .with_continuation_indent(self.continuation_indent)
            .with_width_mode(self.width_mode)
    }
}
