//! Configuration model: the binding of each [`Context`] to a pattern.
//!
//! The on-disk document is a flat mapping from context key to case-style name
//! or pattern literal:
//!
//! ```yaml
//! classDef: PascalCase
//! privateVar: m_[a-z][A-Za-z0-9]*
//! ```
//!
//! Parsing only produces an ordered list of [`ConfigEntry`] values; all
//! validation happens in [`Configuration::build`], so a duplicated key is
//! reported as [`ConfigError::DuplicateContext`] rather than silently
//! overwritten by the parser.

use miette::Diagnostic;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::case::{CasePattern, CaseRegistry};
use crate::context::Context;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".ccase-check";

/// Configuration errors. All of them abort the run before scanning.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("failed to read config file {path}: {source}")]
    #[diagnostic(code(ccase::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The document is not a flat key/value mapping.
    #[error("failed to parse config: {message}")]
    #[diagnostic(code(ccase::config::parse))]
    Parse {
        /// Parser message.
        message: String,
    },

    /// A key that is not one of the recognized context keys.
    #[error("unknown context `{key}`")]
    #[diagnostic(
        code(ccase::config::unknown_context),
        help("recognized keys: classDef, structDef, enumDef, globalFunc, globalVar, publicFunc, publicVar, protectedFunc, protectedVar, privateFunc, privateVar")
    )]
    UnknownContext {
        /// The offending key, exactly as written.
        key: String,
    },

    /// Two entries bind the same context.
    #[error("duplicate context `{key}` (entries {first} and {second})")]
    #[diagnostic(
        code(ccase::config::duplicate_context),
        help("each context may be bound at most once")
    )]
    DuplicateContext {
        /// Key of the second, rejected entry.
        key: String,
        /// 1-based position of the entry that bound the context first.
        first: usize,
        /// 1-based position of the duplicate entry.
        second: usize,
    },

    /// A custom pattern literal failed to compile.
    #[error("invalid pattern `{pattern}` for `{key}`: {reason}")]
    #[diagnostic(code(ccase::config::invalid_pattern))]
    InvalidPattern {
        /// Context key the pattern was bound to.
        key: String,
        /// The literal text.
        pattern: String,
        /// Regex engine message.
        reason: String,
    },
}

/// One `key: value` pair from the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Context key as written.
    pub key: String,
    /// Style name or pattern literal as written.
    pub value: String,
    /// 1-based position of the entry in the document.
    pub position: usize,
}

impl ConfigEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, position: usize) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            position,
        }
    }
}

/// Syntax of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Flat YAML mapping (default).
    Yaml,
    /// Flat TOML table.
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension; `.toml` is TOML, anything
    /// else (including the extension-less default) is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Parsed configuration document, entries in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Entries in document order, duplicates preserved.
    pub entries: Vec<ConfigEntry>,
}

impl ConfigDocument {
    /// Parses a document in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a flat mapping of
    /// strings.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, ConfigError> {
        if is_blank(content) {
            return Ok(Self::default());
        }

        let parsed = match format {
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse { message })
    }
}

impl<'de> Deserialize<'de> for ConfigDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

/// True for documents holding nothing but whitespace and `#` comments.
fn is_blank(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Collects map entries one by one so that duplicates survive parsing.
struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = ConfigDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat mapping from context keys to case styles")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ConfigDocument::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, String>()? {
            entries.push(ConfigEntry::new(key, value, entries.len() + 1));
        }
        Ok(ConfigDocument { entries })
    }
}

/// Validated, duplicate-free binding of contexts to patterns.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    bindings: HashMap<Context, CasePattern>,
    order: Vec<Context>,
}

impl Configuration {
    /// Creates an empty configuration; nothing is validated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from document entries.
    ///
    /// Entries are processed in order: the key is resolved first, then the
    /// context is checked for an earlier binding, then the value is resolved
    /// through `registry`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; no partial
    /// configuration is produced.
    pub fn build<'a, I>(entries: I, registry: &CaseRegistry) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a ConfigEntry>,
    {
        let mut config = Self::new();
        let mut positions: HashMap<Context, usize> = HashMap::new();

        for entry in entries {
            let context = Context::from_key(&entry.key)?;

            if let Some(&first) = positions.get(&context) {
                return Err(ConfigError::DuplicateContext {
                    key: entry.key.clone(),
                    first,
                    second: entry.position,
                });
            }

            let pattern = registry
                .resolve(&entry.value)
                .map_err(|e| ConfigError::InvalidPattern {
                    key: entry.key.clone(),
                    pattern: e.pattern,
                    reason: e.reason,
                })?;

            debug!("Binding {} -> {}", context, pattern);
            positions.insert(context, entry.position);
            config.bindings.insert(context, pattern);
            config.order.push(context);
        }

        Ok(config)
    }

    /// Parses and builds a configuration from document text.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn parse(
        content: &str,
        format: DocumentFormat,
        registry: &CaseRegistry,
    ) -> Result<Self, ConfigError> {
        let document = ConfigDocument::parse(content, format)?;
        Self::build(&document.entries, registry)
    }

    /// Loads a configuration file; the format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path, registry: &CaseRegistry) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, DocumentFormat::from_path(path), registry)
    }

    /// Pattern bound to `context`, if any.
    #[must_use]
    pub fn pattern(&self, context: Context) -> Option<&CasePattern> {
        self.bindings.get(&context)
    }

    /// Bindings in document order.
    pub fn iter(&self) -> impl Iterator<Item = (Context, &CasePattern)> {
        self.order
            .iter()
            .filter_map(|c| self.bindings.get(c).map(|p| (*c, p)))
    }

    /// Number of bound contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no context is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseStyle;

    fn build(pairs: &[(&str, &str)]) -> Result<Configuration, ConfigError> {
        let entries: Vec<ConfigEntry> = pairs
            .iter()
            .enumerate()
            .map(|(i, (k, v))| ConfigEntry::new(*k, *v, i + 1))
            .collect();
        Configuration::build(&entries, &CaseRegistry::new())
    }

    #[test]
    fn binds_builtin_styles() {
        let config = build(&[("classDef", "PascalCase"), ("globalVar", "SnakeCase")])
            .expect("config should build");
        assert_eq!(config.len(), 2);
        assert_eq!(
            config.pattern(Context::Class).and_then(CasePattern::style),
            Some(CaseStyle::PascalCase)
        );
        assert!(config.pattern(Context::Enum).is_none());
    }

    #[test]
    fn preserves_document_order() {
        let config = build(&[
            ("privateVar", "SnakeCase"),
            ("classDef", "PascalCase"),
            ("enumDef", "PascalCase"),
        ])
        .unwrap();
        let order: Vec<Context> = config.iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            [Context::PrivateVariable, Context::Class, Context::Enum]
        );
    }

    #[test]
    fn duplicate_context_names_key_and_positions() {
        let err = build(&[
            ("classDef", "PascalCase"),
            ("enumDef", "PascalCase"),
            ("classDef", "SnakeCase"),
        ])
        .unwrap_err();
        match err {
            ConfigError::DuplicateContext { key, first, second } => {
                assert_eq!(key, "classDef");
                assert_eq!(first, 1);
                assert_eq!(second, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_context_aborts_load() {
        let err = build(&[("classDef", "PascalCase"), ("methodDef", "CamelCase")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownContext { ref key } if key == "methodDef"));
    }

    #[test]
    fn unknown_key_is_reported_before_pattern_errors() {
        let err = build(&[("bogus", "([")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownContext { .. }));
    }

    #[test]
    fn invalid_custom_pattern_carries_literal() {
        let err = build(&[("privateVar", "m_[a-z")]).unwrap_err();
        match err {
            ConfigError::InvalidPattern { key, pattern, .. } => {
                assert_eq!(key, "privateVar");
                assert_eq!(pattern, "m_[a-z");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_pattern_is_used_verbatim() {
        let config = build(&[("privateVar", "m_[a-z]+")]).unwrap();
        let pattern = config.pattern(Context::PrivateVariable).unwrap();
        assert_eq!(pattern.name(), "m_[a-z]+");
        assert!(pattern.matches("m_size"));
        assert!(!pattern.matches("size"));
    }

    #[test]
    fn parses_yaml_document_in_order() {
        let yaml = "classDef: PascalCase\nprivateVar: \"m_[a-z]+\"\n";
        let doc = ConfigDocument::parse(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(
            doc.entries,
            [
                ConfigEntry::new("classDef", "PascalCase", 1),
                ConfigEntry::new("privateVar", "m_[a-z]+", 2),
            ]
        );
    }

    #[test]
    fn yaml_duplicate_keys_reach_the_model() {
        let yaml = "classDef: PascalCase\nclassDef: SnakeCase\n";
        let err =
            Configuration::parse(yaml, DocumentFormat::Yaml, &CaseRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateContext { ref key, .. } if key == "classDef"));
    }

    #[test]
    fn parses_toml_document() {
        let toml = "classDef = \"PascalCase\"\nglobalFunc = \"SnakeCase\"\n";
        let config =
            Configuration::parse(toml, DocumentFormat::Toml, &CaseRegistry::new()).unwrap();
        assert_eq!(config.len(), 2);
        assert!(config.pattern(Context::GlobalFunction).is_some());
    }

    #[test]
    fn empty_document_is_empty_configuration() {
        let registry = CaseRegistry::new();
        assert!(Configuration::parse("", DocumentFormat::Yaml, &registry)
            .unwrap()
            .is_empty());
        assert!(Configuration::parse("# nothing yet\n", DocumentFormat::Yaml, &registry)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn nested_values_are_parse_errors() {
        let yaml = "classDef:\n  style: PascalCase\n";
        let err = ConfigDocument::parse(yaml, DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new(".ccase-check")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("naming.toml")),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("naming.yaml")),
            DocumentFormat::Yaml
        );
    }
}
