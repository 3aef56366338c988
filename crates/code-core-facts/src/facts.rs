//! Structural queries over the text of a [`CodeBuffer`].
//!
//! The buffer is treated as one source file holding exactly one top-level class or interface.
//! Members are the lines at brace depth 1, i.e. directly inside the top-level type's body.

use crate::braces::{line_depths, matching_brace};
use crate::decorations::{decorations_before, file_comment};
use crate::error::FactError;
use crate::patterns::{
    NON_RETURN_WORDS, PatternKind, constructor_header, normalize_type_name, normalize_whitespace,
    split_annotations, split_type_list, strip_generics,
};
use code_core::CodeBuffer;
use regex::Captures;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::debug;

/// Whether the top-level type is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
}

/// The matched header of the top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    /// Class or interface.
    pub kind: TypeKind,
    /// Declared name, including its generic parameter list.
    pub name: String,
    /// Annotations preceding the header, sorted.
    pub annotations: Vec<String>,
    /// The `extends` type of a class; empty if there is none.
    pub super_type: String,
    /// The `implements` list of a class, or the `extends` list of an interface.
    pub interfaces: BTreeSet<String>,
}

/// A field declared directly in the top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFact {
    /// Line index of the declaration.
    pub line: usize,
    /// Field name.
    pub name: String,
    /// Declared type (generics and array brackets included).
    pub type_name: String,
    /// `public`, `protected` or `private`.
    pub scope: Option<String>,
    /// Modifiers in source order, e.g. `static final`.
    pub modifiers: String,
    /// Initializer expression.
    pub value: Option<String>,
    /// Preceding and inline annotations, sorted.
    pub annotations: Vec<String>,
    /// Preceding doc comment; empty if there is none.
    pub comment: String,
}

impl FieldFact {
    /// Returns `true` if the modifiers are exactly `static final`.
    pub fn is_constant(&self) -> bool {
        self.modifiers == "static final"
    }
}

/// A method declared directly in the top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFact {
    /// Line index where the header starts.
    pub line: usize,
    /// Line index of the header's `{` (or `;`).
    pub header_end: usize,
    /// Method name.
    pub name: String,
    /// Return type, whitespace-normalized.
    pub returns: String,
    /// Parameter list without the parentheses, whitespace-normalized.
    pub arguments: String,
    /// Modifiers in source order.
    pub modifiers: String,
    /// Declared exceptions.
    pub throws: Vec<String>,
    /// Preceding and inline annotations, sorted.
    pub annotations: Vec<String>,
    /// Preceding doc comment; empty if there is none.
    pub comment: String,
    /// `false` for abstract and interface methods.
    pub has_body: bool,
}

/// Read-only structural view over a [`CodeBuffer`].
///
/// The type header is matched once and cached; the borrow keeps the buffer from changing
/// underneath the cache.
#[derive(Debug)]
pub struct SourceFacts<'a> {
    code: &'a CodeBuffer,
    text: String,
    line_starts: Vec<usize>,
    depths: Vec<usize>,
    header: OnceLock<Option<TypeHeader>>,
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

impl<'a> SourceFacts<'a> {
    /// Build the view. This computes the text and brace depths; matching is deferred.
    pub fn new(code: &'a CodeBuffer) -> Self {
        let mut line_starts = Vec::with_capacity(code.line_count());
        let mut offset = 0usize;
        for line in code.lines() {
            line_starts.push(offset);
            offset += line.len() + 1;
        }

        Self {
            code,
            text: code.text(),
            line_starts,
            depths: line_depths(code.as_slice()),
            header: OnceLock::new(),
        }
    }

    /// The underlying buffer.
    pub fn code(&self) -> &'a CodeBuffer {
        self.code
    }

    /// The full text the queries run over.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    fn is_member_line(&self, line: usize) -> bool {
        self.depths.get(line) == Some(&1)
    }

    /// The matched type header.
    pub fn type_header(&self) -> Result<&TypeHeader, FactError> {
        self.header
            .get_or_init(|| self.match_header())
            .as_ref()
            .ok_or_else(|| FactError::MalformedSource {
                reason: "no class or interface header found".to_string(),
            })
    }

    fn match_header(&self) -> Option<TypeHeader> {
        let Some(caps) = PatternKind::TypeHeader.regex().captures(&self.text) else {
            debug!(lines = self.code.line_count(), "no type header matched");
            return None;
        };

        let kind = match group(&caps, "keyword") {
            "interface" => TypeKind::Interface,
            _ => TypeKind::Class,
        };
        let mut annotations = split_annotations(group(&caps, "annotations"));
        annotations.sort();

        let extends = group(&caps, "extends");
        let implements = split_type_list(group(&caps, "implements"));
        let (super_type, interfaces) = match kind {
            TypeKind::Class => (normalize_whitespace(extends), implements),
            // An interface extends interfaces only, so it reports no supertype.
            TypeKind::Interface => {
                let mut interfaces = split_type_list(extends);
                interfaces.extend(implements);
                (String::new(), interfaces)
            }
        };

        Some(TypeHeader {
            kind,
            name: normalize_whitespace(group(&caps, "name")),
            annotations,
            super_type,
            interfaces: interfaces.into_iter().collect(),
        })
    }

    /// Declared name of the top-level type, e.g. `Foo<Bar>`.
    pub fn type_name(&self) -> Result<String, FactError> {
        Ok(self.type_header()?.name.clone())
    }

    /// Class or interface.
    pub fn type_kind(&self) -> Result<TypeKind, FactError> {
        Ok(self.type_header()?.kind)
    }

    /// Annotations on the top-level type, sorted.
    pub fn type_annotations(&self) -> Result<Vec<String>, FactError> {
        Ok(self.type_header()?.annotations.clone())
    }

    /// The `extends` type of a class; empty if there is none or the type is an interface.
    pub fn super_type_name(&self) -> Result<String, FactError> {
        Ok(self.type_header()?.super_type.clone())
    }

    /// Implemented (or, for an interface, extended) interfaces.
    pub fn implemented_interfaces(&self) -> Result<BTreeSet<String>, FactError> {
        Ok(self.type_header()?.interfaces.clone())
    }

    /// Returns `true` if the type name equals `candidate`, ignoring generic parameters.
    pub fn is_type(&self, candidate: &str) -> Result<bool, FactError> {
        let header = self.type_header()?;
        Ok(strip_generics(&header.name) == strip_generics(candidate))
    }

    /// Imported names, `import static` included.
    pub fn imports(&self) -> BTreeSet<String> {
        PatternKind::Import
            .regex()
            .captures_iter(&self.text)
            .map(|caps| group(&caps, "name").to_string())
            .collect()
    }

    /// Declared package; empty for the default package.
    pub fn package_name(&self) -> String {
        PatternKind::Package
            .regex()
            .captures(&self.text)
            .map(|caps| group(&caps, "name").to_string())
            .unwrap_or_default()
    }

    /// The leading `/* ... */` comment of the file; empty if the file does not start with one.
    pub fn file_comments(&self) -> String {
        file_comment(self.code.as_slice())
    }

    fn field_matches(&self) -> impl Iterator<Item = (usize, Captures<'a>)> {
        let code: &'a CodeBuffer = self.code;
        code.as_slice()
            .iter()
            .enumerate()
            .filter(move |(index, _)| self.is_member_line(*index))
            .filter_map(|(index, line)| {
                PatternKind::Field
                    .regex()
                    .captures(line)
                    .map(|caps| (index, caps))
            })
    }

    fn field_fact(&self, line: usize, caps: &Captures<'_>) -> FieldFact {
        let decorations = decorations_before(self.code.as_slice(), line);
        let mut annotations = decorations.annotations.clone();
        annotations.extend(split_annotations(group(caps, "annotations")));
        annotations.sort();

        FieldFact {
            line,
            name: group(caps, "name").to_string(),
            type_name: normalize_whitespace(group(caps, "type")),
            scope: caps.name("scope").map(|m| m.as_str().to_string()),
            modifiers: normalize_whitespace(group(caps, "modifiers")),
            value: caps.name("value").map(|m| m.as_str().trim().to_string()),
            annotations,
            comment: decorations.comment_text(),
        }
    }

    /// Names of the fields declared directly in the type.
    pub fn field_names(&self) -> BTreeSet<String> {
        self.field_matches()
            .map(|(_, caps)| group(&caps, "name").to_string())
            .collect()
    }

    /// The first field named `name`.
    pub fn field(&self, name: &str) -> Option<FieldFact> {
        self.field_matches()
            .find(|(_, caps)| group(caps, "name") == name)
            .map(|(line, caps)| self.field_fact(line, &caps))
    }

    /// Declared type of a field; empty if the field is absent.
    pub fn field_type(&self, name: &str) -> String {
        self.field(name).map(|f| f.type_name).unwrap_or_default()
    }

    /// Initializer of a field; `None` if the field or its initializer is absent.
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.field(name).and_then(|f| f.value)
    }

    /// Returns `true` if the field exists and is `static final`.
    pub fn field_is_constant(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.is_constant())
    }

    /// Annotations of a field, sorted; empty if the field is absent.
    pub fn field_annotations(&self, name: &str) -> Vec<String> {
        self.field(name).map(|f| f.annotations).unwrap_or_default()
    }

    /// Doc comment of a field; empty if there is none.
    pub fn field_comments(&self, name: &str) -> String {
        self.field(name).map(|f| f.comment).unwrap_or_default()
    }

    fn method_matches(&self) -> impl Iterator<Item = Captures<'_>> {
        let type_name = self
            .type_header()
            .ok()
            .map(|header| strip_generics(&header.name).to_string());

        PatternKind::MethodHeader
            .regex()
            .captures_iter(&self.text)
            .filter(move |caps| {
                let start = caps.get(0).map_or(0, |m| m.start());
                let returns = group(caps, "returns");
                let name = group(caps, "name");
                self.is_member_line(self.line_of(start))
                    && !NON_RETURN_WORDS.contains(&returns)
                    && type_name.as_deref() != Some(name)
            })
    }

    fn method_fact(&self, caps: &Captures<'_>) -> MethodFact {
        let (start, end) = caps
            .get(0)
            .map_or((0, 0), |m| (m.start(), m.end().saturating_sub(1)));
        let line = self.line_of(start);

        let decorations = decorations_before(self.code.as_slice(), line);
        let mut annotations = decorations.annotations.clone();
        annotations.extend(split_annotations(group(caps, "annotations")));
        annotations.sort();

        MethodFact {
            line,
            header_end: self.line_of(end),
            name: group(caps, "name").to_string(),
            returns: normalize_type_name(group(caps, "returns")),
            arguments: normalize_whitespace(group(caps, "args")),
            modifiers: normalize_whitespace(group(caps, "modifiers")),
            throws: split_type_list(group(caps, "throws")),
            annotations,
            comment: decorations.comment_text(),
            has_body: group(caps, "end") == "{",
        }
    }

    /// Names of the methods declared directly in the type. Constructors are not included.
    pub fn methods(&self) -> BTreeSet<String> {
        self.method_matches()
            .map(|caps| group(&caps, "name").to_string())
            .collect()
    }

    /// The first method named `name`.
    pub fn method(&self, name: &str) -> Option<MethodFact> {
        self.method_matches()
            .find(|caps| group(caps, "name") == name)
            .map(|caps| self.method_fact(&caps))
    }

    /// Return type of a method; empty if the method is absent.
    pub fn method_returns(&self, name: &str) -> String {
        self.method(name).map(|m| m.returns).unwrap_or_default()
    }

    /// Parameter list of a method; empty if the method is absent.
    pub fn method_arguments(&self, name: &str) -> String {
        self.method(name).map(|m| m.arguments).unwrap_or_default()
    }

    /// Annotations of a method, sorted; empty if the method is absent.
    pub fn method_annotations(&self, name: &str) -> Vec<String> {
        self.method(name).map(|m| m.annotations).unwrap_or_default()
    }

    /// Lines strictly between the method header and its closing line, trimmed and joined with
    /// `'\n'`. Empty if the method is absent or has no body lines.
    pub fn method_body(&self, name: &str) -> String {
        let Some(method) = self.method(name).filter(|m| m.has_body) else {
            return String::new();
        };

        let lines = self.code.as_slice();
        let first = method.header_end + 1;
        // Body on the header line itself, e.g. `int f() { return 1; }`.
        if self.depths.get(first).is_none_or(|&depth| depth <= 1) {
            return String::new();
        }

        let mut closing = first;
        while closing < lines.len() && self.depths[closing + 1] > 1 {
            closing += 1;
        }
        lines[first..closing.min(lines.len())]
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Body of the first constructor, between its balanced braces and trimmed.
    ///
    /// `None` if there is no type header, no constructor, or its braces never balance.
    pub fn constructor_body(&self) -> Option<String> {
        let header = self.type_header().ok()?;
        let regex = constructor_header(strip_generics(&header.name)).ok()?;
        let found = regex
            .find_iter(&self.text)
            .find(|m| self.is_member_line(self.line_of(m.start())))?;

        let open = found.end() - 1;
        let close = matching_brace(&self.text, open)?;
        Some(self.text[open + 1..close].trim().to_string())
    }
}
