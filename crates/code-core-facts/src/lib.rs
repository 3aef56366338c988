#![warn(missing_docs)]
//! `code-core-facts` - Structural facts extracted from a `code-core` buffer.
//!
//! A [`SourceFacts`] view answers questions about the single top-level class or interface in a
//! [`CodeBuffer`](code_core::CodeBuffer): its name, supertype, interfaces, imports, fields,
//! methods, annotations, bodies and comments. Facts come from a small table of regular
//! expressions plus brace counting; there is no parser and no syntax tree, so only a
//! disciplined source subset is understood.
//!
//! ```rust
//! use code_core::CodeBuffer;
//! use code_core_facts::SourceFacts;
//!
//! let code = CodeBuffer::from_lines([
//!     "public class Foo<Bar> extends Baz implements Qux, Zap {",
//!     "    private static final String X = \"v\";",
//!     "}",
//! ]);
//! let facts = SourceFacts::new(&code);
//!
//! assert_eq!(facts.type_name().unwrap(), "Foo<Bar>");
//! assert_eq!(facts.super_type_name().unwrap(), "Baz");
//! assert!(facts.field_is_constant("X"));
//! ```

pub mod braces;
pub mod decorations;
mod error;
pub mod facts;
pub mod patterns;

pub use error::FactError;
pub use facts::{FieldFact, MethodFact, SourceFacts, TypeHeader, TypeKind};
pub use patterns::PatternKind;
