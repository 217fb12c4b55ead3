//! Case styles and the pattern registry.
//!
//! A built-in [`CaseStyle`] is defined generatively: a leading character class
//! followed by a continuation rule that every remaining character must
//! satisfy. Any name that is not a built-in style is treated as a raw regular
//! expression supplied by the configuration author. Both kinds require a
//! full-string match.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named, built-in spelling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStyle {
    /// `fooBar`
    CamelCase,
    /// `FooBar`
    PascalCase,
    /// `foo_bar`
    SnakeCase,
    /// `FOO_BAR`
    ScreamingSnakeCase,
    /// `foo-bar`
    KebabCase,
    /// `Foo-Bar`
    TrainCase,
    /// `foobar`
    FlatCase,
}

/// Character class required of an identifier's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leading {
    Lower,
    Upper,
}

impl Leading {
    fn accepts(self, c: char) -> bool {
        match self {
            Self::Lower => c.is_ascii_lowercase(),
            Self::Upper => c.is_ascii_uppercase(),
        }
    }
}

impl CaseStyle {
    /// All built-in styles.
    pub const ALL: [CaseStyle; 7] = [
        Self::CamelCase,
        Self::PascalCase,
        Self::SnakeCase,
        Self::ScreamingSnakeCase,
        Self::KebabCase,
        Self::TrainCase,
        Self::FlatCase,
    ];

    /// Name used in configuration documents and reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CamelCase => "CamelCase",
            Self::PascalCase => "PascalCase",
            Self::SnakeCase => "SnakeCase",
            Self::ScreamingSnakeCase => "ScreamingSnakeCase",
            Self::KebabCase => "KebabCase",
            Self::TrainCase => "TrainCase",
            Self::FlatCase => "FlatCase",
        }
    }

    fn leading(self) -> Option<Leading> {
        match self {
            Self::CamelCase | Self::SnakeCase | Self::KebabCase => Some(Leading::Lower),
            Self::PascalCase | Self::ScreamingSnakeCase | Self::TrainCase => Some(Leading::Upper),
            Self::FlatCase => None,
        }
    }

    /// Returns true if `ident` matches this style in full.
    #[must_use]
    pub fn matches(self, ident: &str) -> bool {
        let mut chars = ident.chars();

        if let Some(leading) = self.leading() {
            match chars.next() {
                Some(c) if leading.accepts(c) => {}
                _ => return false,
            }
        }

        let lower_or_digit = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();

        match self {
            Self::CamelCase | Self::PascalCase => chars.all(|c| c.is_ascii_alphanumeric()),
            Self::SnakeCase => chars.all(|c| c == '_' || lower_or_digit(c)),
            Self::ScreamingSnakeCase => {
                chars.all(|c| c == '_' || c.is_ascii_uppercase() || c.is_ascii_digit())
            }
            Self::KebabCase => chars.all(|c| c == '-' || lower_or_digit(c)),
            Self::FlatCase => chars.all(lower_or_digit),
            Self::TrainCase => {
                // A hyphen must be followed by an uppercase letter.
                while let Some(c) = chars.next() {
                    let ok = if c == '-' {
                        chars.next().is_some_and(|n| n.is_ascii_uppercase())
                    } else {
                        lower_or_digit(c)
                    };
                    if !ok {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Respells `ident` in this style.
    ///
    /// Returns `None` when the result would still not match the style (for
    /// example an identifier starting with a digit) or would be unchanged.
    #[must_use]
    pub fn convert(self, ident: &str) -> Option<String> {
        let words = split_words(ident);
        if words.is_empty() {
            return None;
        }

        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let converted = match self {
            Self::CamelCase => {
                let mut out = lower[0].clone();
                for word in &words[1..] {
                    out.push_str(&capitalize(word));
                }
                out
            }
            Self::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            Self::SnakeCase => lower.join("_"),
            Self::ScreamingSnakeCase => lower.join("_").to_uppercase(),
            Self::KebabCase => lower.join("-"),
            Self::TrainCase => words
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join("-"),
            Self::FlatCase => lower.concat(),
        };

        (converted != ident && self.matches(&converted)).then_some(converted)
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits an identifier into words on separators and case boundaries.
///
/// `HTTPServer_v2` splits into `HTTP`, `Server`, `v2`.
fn split_words(ident: &str) -> Vec<String> {
    let chars: Vec<char> = ident.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Error compiling a custom pattern literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid pattern `{pattern}`: {reason}")]
pub struct PatternError {
    /// The literal text as written in the configuration.
    pub pattern: String,
    /// Why the regex engine rejected it.
    pub reason: String,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Builtin(CaseStyle),
    Custom { source: String, regex: Regex },
}

/// A compiled full-match pattern: a built-in style or a custom regex.
#[derive(Debug, Clone)]
pub struct CasePattern {
    kind: PatternKind,
}

impl CasePattern {
    /// Wraps a built-in style.
    #[must_use]
    pub fn builtin(style: CaseStyle) -> Self {
        Self {
            kind: PatternKind::Builtin(style),
        }
    }

    /// Compiles a custom pattern literal, anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] carrying the literal when it does not compile.
    pub fn custom(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| PatternError {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            kind: PatternKind::Custom {
                source: source.to_string(),
                regex,
            },
        })
    }

    /// Returns true if the whole identifier matches.
    #[must_use]
    pub fn matches(&self, ident: &str) -> bool {
        match &self.kind {
            PatternKind::Builtin(style) => style.matches(ident),
            PatternKind::Custom { regex, .. } => regex.is_match(ident),
        }
    }

    /// Style name, or the raw pattern text for custom patterns.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            PatternKind::Builtin(style) => style.name(),
            PatternKind::Custom { source, .. } => source,
        }
    }

    /// The built-in style, if this is not a custom pattern.
    #[must_use]
    pub fn style(&self) -> Option<CaseStyle> {
        match &self.kind {
            PatternKind::Builtin(style) => Some(*style),
            PatternKind::Custom { .. } => None,
        }
    }

    /// Suggested respelling of `ident`; only built-in styles can suggest.
    #[must_use]
    pub fn suggest(&self, ident: &str) -> Option<String> {
        self.style().and_then(|style| style.convert(ident))
    }
}

impl fmt::Display for CasePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lookup table from style names to built-in styles.
///
/// Built once at startup and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct CaseRegistry {
    styles: HashMap<&'static str, CaseStyle>,
}

impl Default for CaseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseRegistry {
    /// Creates a registry holding every built-in style.
    #[must_use]
    pub fn new() -> Self {
        Self {
            styles: CaseStyle::ALL.into_iter().map(|s| (s.name(), s)).collect(),
        }
    }

    /// Looks up a built-in style by exact name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<CaseStyle> {
        self.styles.get(name).copied()
    }

    /// Resolves a configuration value to a pattern.
    ///
    /// Built-in names win; anything else is compiled verbatim as a regex.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when a custom literal does not compile.
    pub fn resolve(&self, name: &str) -> Result<CasePattern, PatternError> {
        match self.lookup(name) {
            Some(style) => Ok(CasePattern::builtin(style)),
            None => CasePattern::custom(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(style: CaseStyle, accepted: &[&str], rejected: &[&str]) {
        for ident in accepted {
            assert!(style.matches(ident), "{style} should accept {ident:?}");
        }
        for ident in rejected {
            assert!(!style.matches(ident), "{style} should reject {ident:?}");
        }
    }

    #[test]
    fn camel_case() {
        check(
            CaseStyle::CamelCase,
            &["fooBar", "f", "foo2Bar"],
            &["FooBar", "foo_bar", "", "2foo"],
        );
    }

    #[test]
    fn pascal_case() {
        check(
            CaseStyle::PascalCase,
            &["FooBar", "F", "HTTPServer"],
            &["fooBar", "Foo_Bar", ""],
        );
    }

    #[test]
    fn snake_case() {
        check(
            CaseStyle::SnakeCase,
            &["foo_bar2", "foo", "a__b_"],
            &["Foo_bar", "fooBar", "_foo", ""],
        );
    }

    #[test]
    fn screaming_snake_case() {
        check(
            CaseStyle::ScreamingSnakeCase,
            &["FOO_BAR", "MAX_2", "X"],
            &["Foo_BAR", "foo", "_FOO"],
        );
    }

    #[test]
    fn kebab_case() {
        check(
            CaseStyle::KebabCase,
            &["foo-bar", "foo", "a-1"],
            &["Foo-bar", "foo_bar", "-foo"],
        );
    }

    #[test]
    fn train_case() {
        check(
            CaseStyle::TrainCase,
            &["Foo-Bar", "Foo", "Foo-Bar2", "Http-Server"],
            &["Foo-bar", "foo-Bar", "Foo--Bar", "Foo-", "FOO"],
        );
    }

    #[test]
    fn flat_case() {
        check(
            CaseStyle::FlatCase,
            &["", "abc123", "123"],
            &["Abc", "foo_bar", "fooBar"],
        );
    }

    #[test]
    fn registry_resolves_builtin_names() {
        let registry = CaseRegistry::new();
        for style in CaseStyle::ALL {
            let pattern = registry.resolve(style.name()).unwrap();
            assert_eq!(pattern.style(), Some(style));
            assert_eq!(pattern.name(), style.name());
        }
    }

    fn grammar(style: CaseStyle) -> &'static str {
        match style {
            CaseStyle::CamelCase => "[a-z][A-Za-z0-9]*",
            CaseStyle::PascalCase => "[A-Z][A-Za-z0-9]*",
            CaseStyle::SnakeCase => "[a-z](?:_|[a-z0-9])*",
            CaseStyle::ScreamingSnakeCase => "[A-Z](?:_|[A-Z0-9])*",
            CaseStyle::KebabCase => "[a-z](?:-|[a-z0-9])*",
            CaseStyle::TrainCase => "[A-Z](?:-[A-Z]|[a-z0-9])*",
            CaseStyle::FlatCase => "[a-z0-9]*",
        }
    }

    #[test]
    fn builtin_matcher_agrees_with_grammar() {
        let samples = [
            "", "a", "A", "fooBar", "FooBar", "foo_bar", "FOO_BAR", "foo-bar", "Foo-Bar",
            "Foo-bar", "foo1", "_x", "x-", "X-Y-Z", "aB_c",
        ];
        for style in CaseStyle::ALL {
            let regex = CasePattern::custom(grammar(style)).unwrap();
            for sample in samples {
                assert_eq!(
                    style.matches(sample),
                    regex.matches(sample),
                    "{style} disagrees with its grammar on {sample:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_name_is_compiled_as_literal() {
        let registry = CaseRegistry::new();
        let pattern = registry.resolve("m_[a-z]+").unwrap();
        assert!(pattern.style().is_none());
        assert_eq!(pattern.name(), "m_[a-z]+");
        assert!(pattern.matches("m_count"));
        assert!(!pattern.matches("count"));
    }

    #[test]
    fn custom_pattern_requires_full_match() {
        let pattern = CasePattern::custom("[a-z]+").unwrap();
        assert!(pattern.matches("abc"));
        assert!(!pattern.matches("abcD"));
        assert!(!pattern.matches("Dabc"));

        let alternation = CasePattern::custom("foo|bar").unwrap();
        assert!(!alternation.matches("foobar"));
        assert!(alternation.matches("bar"));
    }

    #[test]
    fn invalid_literal_reports_its_text() {
        let err = CaseRegistry::new().resolve("([a-z]").unwrap_err();
        assert_eq!(err.pattern, "([a-z]");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn builtin_names_are_case_sensitive() {
        let registry = CaseRegistry::new();
        assert!(registry.lookup("pascalcase").is_none());
        // Falls back to a literal, which then only matches itself.
        let pattern = registry.resolve("pascalcase").unwrap();
        assert!(pattern.matches("pascalcase"));
        assert!(!pattern.matches("FooBar"));
    }

    #[test]
    fn splits_words_on_case_and_separators() {
        assert_eq!(split_words("myClass"), ["my", "Class"]);
        assert_eq!(split_words("HTTPServer_v2"), ["HTTP", "Server", "v2"]);
        assert_eq!(split_words("foo-bar_baz"), ["foo", "bar", "baz"]);
        assert_eq!(split_words("Foo2Bar"), ["Foo2", "Bar"]);
        assert!(split_words("__").is_empty());
    }

    #[test]
    fn converts_between_styles() {
        assert_eq!(
            CaseStyle::PascalCase.convert("myClass").as_deref(),
            Some("MyClass")
        );
        assert_eq!(
            CaseStyle::SnakeCase.convert("parseHTTPHeader").as_deref(),
            Some("parse_http_header")
        );
        assert_eq!(
            CaseStyle::ScreamingSnakeCase.convert("maxSize").as_deref(),
            Some("MAX_SIZE")
        );
        assert_eq!(
            CaseStyle::CamelCase.convert("Get_Value").as_deref(),
            Some("getValue")
        );
        assert_eq!(
            CaseStyle::TrainCase.convert("http_server").as_deref(),
            Some("Http-Server")
        );
        assert_eq!(
            CaseStyle::KebabCase.convert("FooBar").as_deref(),
            Some("foo-bar")
        );
        assert_eq!(
            CaseStyle::FlatCase.convert("Foo_Bar").as_deref(),
            Some("foobar")
        );
    }

    #[test]
    fn conversion_that_cannot_satisfy_style_is_dropped() {
        assert_eq!(CaseStyle::CamelCase.convert("_2fast"), None);
        assert_eq!(CaseStyle::PascalCase.convert("Already"), None);
    }
}
