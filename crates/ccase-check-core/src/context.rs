//! Declaration contexts and the configuration key table.
//!
//! Every identifier the extractor reports is tagged with exactly one
//! [`Context`]. Configuration documents refer to contexts through the fixed,
//! case-sensitive keys listed in [`Context::ALL`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// Structural role of a declared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Context {
    /// `class Name`
    #[serde(rename = "classDef")]
    Class,
    /// `struct Name`
    #[serde(rename = "structDef")]
    Struct,
    /// `enum Name` / `enum class Name`
    #[serde(rename = "enumDef")]
    Enum,
    /// Function declared at file or namespace scope.
    #[serde(rename = "globalFunc")]
    GlobalFunction,
    /// Variable declared at file or namespace scope.
    #[serde(rename = "globalVar")]
    GlobalVariable,
    /// Member function under `public:`.
    #[serde(rename = "publicFunc")]
    PublicFunction,
    /// Data member under `public:`.
    #[serde(rename = "publicVar")]
    PublicVariable,
    /// Member function under `protected:`.
    #[serde(rename = "protectedFunc")]
    ProtectedFunction,
    /// Data member under `protected:`.
    #[serde(rename = "protectedVar")]
    ProtectedVariable,
    /// Member function under `private:`.
    #[serde(rename = "privateFunc")]
    PrivateFunction,
    /// Data member under `private:`.
    #[serde(rename = "privateVar")]
    PrivateVariable,
}

impl Context {
    /// All contexts, in configuration-key order.
    pub const ALL: [Context; 11] = [
        Self::Class,
        Self::Struct,
        Self::Enum,
        Self::GlobalFunction,
        Self::GlobalVariable,
        Self::PublicFunction,
        Self::PublicVariable,
        Self::ProtectedFunction,
        Self::ProtectedVariable,
        Self::PrivateFunction,
        Self::PrivateVariable,
    ];

    /// Returns the configuration key for this context (e.g. `"classDef"`).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Class => "classDef",
            Self::Struct => "structDef",
            Self::Enum => "enumDef",
            Self::GlobalFunction => "globalFunc",
            Self::GlobalVariable => "globalVar",
            Self::PublicFunction => "publicFunc",
            Self::PublicVariable => "publicVar",
            Self::ProtectedFunction => "protectedFunc",
            Self::ProtectedVariable => "protectedVar",
            Self::PrivateFunction => "privateFunc",
            Self::PrivateVariable => "privateVar",
        }
    }

    /// Resolves a configuration key to its context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownContext`] carrying the offending key when
    /// it is not one of the eleven recognized strings.
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| ConfigError::UnknownContext {
                key: key.to_string(),
            })
    }

    /// Member context for a function or variable declared under `access`.
    #[must_use]
    pub fn member(access: AccessLevel, is_function: bool) -> Self {
        match (access, is_function) {
            (AccessLevel::Public, true) => Self::PublicFunction,
            (AccessLevel::Public, false) => Self::PublicVariable,
            (AccessLevel::Protected, true) => Self::ProtectedFunction,
            (AccessLevel::Protected, false) => Self::ProtectedVariable,
            (AccessLevel::Private, true) => Self::PrivateFunction,
            (AccessLevel::Private, false) => Self::PrivateVariable,
        }
    }

    /// Global context for a function or variable at file scope.
    #[must_use]
    pub fn global(is_function: bool) -> Self {
        if is_function {
            Self::GlobalFunction
        } else {
            Self::GlobalVariable
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Context {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Member access level inside a class, struct or union body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    /// `public:`
    Public,
    /// `protected:`
    Protected,
    /// `private:`
    Private,
}

impl AccessLevel {
    /// Parses an access-specifier keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves_back_to_its_context() {
        for context in Context::ALL {
            assert_eq!(Context::from_key(context.key()).unwrap(), context);
        }
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!(Context::from_key("ClassDef").is_err());
        assert!(Context::from_key("classdef").is_err());
    }

    #[test]
    fn unknown_key_carries_offending_text() {
        let err = Context::from_key("privateFunction").unwrap_err();
        match err {
            ConfigError::UnknownContext { key } => assert_eq!(key, "privateFunction"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn member_contexts_follow_access() {
        assert_eq!(
            Context::member(AccessLevel::Protected, true),
            Context::ProtectedFunction
        );
        assert_eq!(
            Context::member(AccessLevel::Private, false),
            Context::PrivateVariable
        );
        assert_eq!(Context::global(false), Context::GlobalVariable);
    }

    #[test]
    fn display_uses_config_key() {
        assert_eq!(Context::PublicVariable.to_string(), "publicVar");
        assert_eq!("enumDef".parse::<Context>().unwrap(), Context::Enum);
    }
}
