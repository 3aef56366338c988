//! Tagged pattern table.
//!
//! Each structural fact is recognized by one regular expression. The table is a best-effort
//! structural matcher for a disciplined subset of Java-like source, not a compiler front end:
//! nested generics are matched one level deep, and annotation arguments may nest parentheses
//! once.

use regex::Regex;
use std::sync::LazyLock;

/// Which structural fact a pattern recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `@A public final class Foo<T> extends Bar implements Baz, Qux {` (over the full text).
    ///
    /// Groups: `annotations`, `keyword`, `name`, `extends`, `implements`.
    TypeHeader,
    /// `package com.example;` (group `name`).
    Package,
    /// `import [static] com.example.Name;` (group `name`).
    Import,
    /// A single-line field declaration.
    ///
    /// Groups: `annotations`, `scope`, `modifiers`, `type`, `name`, `value`.
    Field,
    /// A method header, possibly spanning lines (over the full text).
    ///
    /// Groups: `annotations`, `modifiers`, `returns`, `name`, `args`, `throws`, `end`.
    MethodHeader,
    /// One annotation with optional arguments.
    Annotation,
}

impl PatternKind {
    /// Every kind, in table order.
    pub const ALL: [PatternKind; 6] = [
        PatternKind::TypeHeader,
        PatternKind::Package,
        PatternKind::Import,
        PatternKind::Field,
        PatternKind::MethodHeader,
        PatternKind::Annotation,
    ];

    /// Regex source for this kind.
    pub fn source(self) -> &'static str {
        match self {
            PatternKind::TypeHeader => concat!(
                r"(?m)^[ \t]*",
                r"(?P<annotations>(?:@[\w.]+(?:\s*\((?:[^()]|\([^()]*\))*\))?\s*)*)",
                r"(?:(?:public|protected|private)\s+)?",
                r"(?:(?:final|abstract|static|sealed|strictfp)\s+)*",
                r"(?P<keyword>class|interface)\s+",
                r"(?P<name>[\w$]+(?:\s*<[^{]*?>)?)",
                r"(?:\s+extends\s+(?P<extends>[^{]+?))?",
                r"(?:\s+implements\s+(?P<implements>[^{]+?))?",
                r"\s*\{",
            ),
            PatternKind::Package => r"(?m)^[ \t]*package\s+(?P<name>[\w.]+)\s*;",
            PatternKind::Import => {
                r"(?m)^[ \t]*import\s+(?:static\s+)?(?P<name>[\w.$]+(?:\.\*)?)\s*;"
            }
            PatternKind::Field => concat!(
                r"^[ \t]*",
                r"(?P<annotations>(?:@[\w.]+(?:[ \t]*\((?:[^()]|\([^()]*\))*\))?[ \t]+)*)",
                r"(?:(?P<scope>public|protected|private)[ \t]+)?",
                r"(?P<modifiers>(?:(?:static|final|transient|volatile)[ \t]+)*)",
                r"(?P<type>[\w.$]+(?:[ \t]*<[^;=(){}]*>)?(?:[ \t]*\[[ \t]*\])*)[ \t]+",
                r"(?P<name>[\w$]+)(?:[ \t]*\[[ \t]*\])*[ \t]*",
                r"(?:=[ \t]*(?P<value>.+?))?[ \t]*;[ \t]*(?://.*)?$",
            ),
            PatternKind::MethodHeader => concat!(
                r"(?m)^[ \t]*",
                r"(?P<annotations>(?:@[\w.]+(?:[ \t]*\((?:[^()]|\([^()]*\))*\))?[ \t]+)*)",
                r"(?P<modifiers>(?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)[ \t]+)*)",
                r"(?:<[^<>(){};=]*(?:<[^<>(){};=]*>[^<>(){};=]*)*>[ \t]+)?",
                r"(?P<returns>[\w$]+(?:\s*\.\s*[\w$]+)*(?:\s*<[^(){};=]*>)?(?:[ \t]*\[[ \t]*\])*)\s+",
                r"(?P<name>[\w$]+)[ \t]*",
                r"\((?P<args>(?:[^()]|\([^()]*\))*)\)",
                r"(?:\s*throws\s+(?P<throws>[\w.$,\s]+?))?",
                r"\s*(?P<end>[{;])",
            ),
            PatternKind::Annotation => r"@[\w.]+(?:\s*\((?:[^()]|\([^()]*\))*\))?",
        }
    }

    /// The compiled pattern.
    pub fn regex(self) -> &'static Regex {
        &PATTERNS[self as usize]
    }
}

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PatternKind::ALL
        .iter()
        .map(|kind| Regex::new(kind.source()).expect("built-in source patterns compile"))
        .collect()
});

/// Header of a constructor of `type_name` (over the full text), ending at its `{`.
pub fn constructor_header(type_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        concat!(
            r"(?m)^[ \t]*(?:@[\w.]+(?:[ \t]*\((?:[^()]|\([^()]*\))*\))?[ \t]+)*",
            r"(?:(?:public|protected|private)[ \t]+)?",
            r"{name}[ \t]*\((?:[^()]|\([^()]*\))*\)",
            r"(?:\s*throws\s+[\w.$,\s]+?)?\s*\{{",
        ),
        name = regex::escape(type_name)
    ))
}

/// Words that can precede a parenthesis in a method-shaped match without being a return type.
pub(crate) const NON_RETURN_WORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "default",
    "strictfp",
    "new",
    "return",
    "throw",
    "else",
    "case",
];

/// Split a run of annotations into individual annotations.
pub fn split_annotations(text: &str) -> Vec<String> {
    PatternKind::Annotation
        .regex()
        .find_iter(text)
        .map(|m| normalize_whitespace(m.as_str()))
        .collect()
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`normalize_whitespace`], and also drops whitespace around the dots of qualified names.
pub fn normalize_type_name(text: &str) -> String {
    normalize_whitespace(text).replace(" .", ".").replace(". ", ".")
}

/// Split a comma separated type list, ignoring commas nested in `<...>`.
pub fn split_type_list(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);

    items
        .into_iter()
        .map(normalize_whitespace)
        .filter(|item| !item.is_empty())
        .collect()
}

/// The part of a type name before its generic parameter list.
pub fn strip_generics(name: &str) -> &str {
    name.split('<').next().unwrap_or(name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile_in_table_order() {
        for (index, kind) in PatternKind::ALL.into_iter().enumerate() {
            assert_eq!(kind as usize, index);
            assert!(Regex::new(kind.source()).is_ok(), "{kind:?}");
        }
    }

    #[test]
    fn test_type_header_groups() {
        let caps = PatternKind::TypeHeader
            .regex()
            .captures("public class Foo<Bar> extends Baz implements Qux, Zap {}")
            .unwrap();
        assert_eq!(&caps["keyword"], "class");
        assert_eq!(&caps["name"], "Foo<Bar>");
        assert_eq!(&caps["extends"], "Baz");
        assert_eq!(&caps["implements"], "Qux, Zap");
    }

    #[test]
    fn test_type_header_with_bounded_generics() {
        let caps = PatternKind::TypeHeader
            .regex()
            .captures("final class Box<K extends Comparable<K>> implements Holder<K> {")
            .unwrap();
        assert_eq!(&caps["name"], "Box<K extends Comparable<K>>");
        assert!(caps.name("extends").is_none());
        assert_eq!(&caps["implements"], "Holder<K>");
    }

    #[test]
    fn test_field_groups() {
        let caps = PatternKind::Field
            .regex()
            .captures(r#"    private static final String X = "a;b"; // note; here"#)
            .unwrap();
        assert_eq!(&caps["scope"], "private");
        assert_eq!(caps["modifiers"].trim(), "static final");
        assert_eq!(&caps["type"], "String");
        assert_eq!(&caps["name"], "X");
        assert_eq!(&caps["value"], r#""a;b""#);

        let caps = PatternKind::Field
            .regex()
            .captures("  Map<String, List<Integer>> index;")
            .unwrap();
        assert_eq!(&caps["type"], "Map<String, List<Integer>>");
        assert!(caps.name("value").is_none());
    }

    #[test]
    fn test_field_pattern_rejects_methods() {
        let field = PatternKind::Field.regex();
        assert!(!field.is_match("    void run();"));
        assert!(!field.is_match("    public String name() {"));
        assert!(!field.is_match("    // int commented;"));
    }

    #[test]
    fn test_method_header_spans_lines() {
        let text = "    public <T> List<T> load(\n        String a,\n        int b) throws IOException {\n";
        let caps = PatternKind::MethodHeader.regex().captures(text).unwrap();
        assert_eq!(&caps["returns"], "List<T>");
        assert_eq!(&caps["name"], "load");
        assert_eq!(normalize_whitespace(&caps["args"]), "String a, int b");
        assert_eq!(&caps["throws"], "IOException");
        assert_eq!(&caps["end"], "{");
    }

    #[test]
    fn test_method_header_with_wrapped_qualified_return_type() {
        let text = "    public java.util\n        .List<String>\n        names() {\n";
        let caps = PatternKind::MethodHeader.regex().captures(text).unwrap();
        assert_eq!(normalize_type_name(&caps["returns"]), "java.util.List<String>");
        assert_eq!(&caps["modifiers"], "public ");
        assert_eq!(&caps["name"], "names");
        assert_eq!(&caps["end"], "{");
    }

    #[test]
    fn test_normalize_type_name() {
        assert_eq!(
            normalize_type_name("java.util .List<java.lang. String>"),
            "java.util.List<java.lang.String>"
        );
        assert_eq!(normalize_type_name("Map<K,\n    V>"), "Map<K, V>");
    }

    #[test]
    fn test_constructor_header() {
        let regex = constructor_header("Foo").unwrap();
        assert!(regex.is_match("    public Foo(int a, Map<K, V> b) throws X {"));
        assert!(regex.is_match("  Foo() {"));
        assert!(!regex.is_match("    private Foo foo = new Foo();"));
        assert!(!regex.is_match("    FooBar() {"));
    }

    #[test]
    fn test_split_annotations() {
        assert_eq!(
            split_annotations(r#"@Entity @Table(name = "t", indexes = @Index(columnList = "a"))"#),
            vec![
                "@Entity".to_string(),
                r#"@Table(name = "t", indexes = @Index(columnList = "a"))"#.to_string()
            ]
        );
    }

    #[test]
    fn test_split_type_list() {
        assert_eq!(
            split_type_list(" Qux,  Map<K, V> , Zap "),
            vec!["Qux", "Map<K, V>", "Zap"]
        );
        assert!(split_type_list("  ").is_empty());
    }

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("Foo<Bar>"), "Foo");
        assert_eq!(strip_generics("Foo"), "Foo");
    }
}
