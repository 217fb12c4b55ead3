//! Naming rule engine.
//!
//! Joins extracted [`Occurrence`]s against a [`Configuration`], producing
//! [`Violation`]s for identifiers whose spelling does not match.

use std::path::Path;

use crate::config::Configuration;
use crate::extractor::{ExtractError, Extractor, Occurrence};
use crate::types::{Location, Violation};

/// Evaluates extracted declarations against the configured patterns.
#[derive(Debug, Clone, Copy)]
pub struct ViolationEngine<'c> {
    config: &'c Configuration,
    extractor: Extractor,
}

impl<'c> ViolationEngine<'c> {
    /// Creates an engine over `config` with the default extractor.
    #[must_use]
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            extractor: Extractor::new(),
        }
    }

    /// Replaces the extractor, e.g. to change the nesting limit.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Checks one occurrence. Unconfigured contexts are never reported.
    #[must_use]
    pub fn evaluate(&self, file: &Path, occurrence: &Occurrence<'_>) -> Option<Violation> {
        let pattern = self.config.pattern(occurrence.context)?;
        if pattern.matches(occurrence.name) {
            return None;
        }

        let location = Location::new(file, occurrence.line, occurrence.column);
        Some(
            Violation::new(location, occurrence.name, occurrence.context, pattern.name())
                .with_suggestion(pattern.suggest(occurrence.name)),
        )
    }

    /// Checks a whole source text.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExtractError`]; violations found before it are
    /// discarded so a malformed file never contributes partial results.
    pub fn check_source(&self, file: &Path, text: &str) -> Result<Vec<Violation>, ExtractError> {
        let mut violations = Vec::new();
        for occurrence in self.extractor.extract(text) {
            if let Some(violation) = self.evaluate(file, &occurrence?) {
                violations.push(violation);
            }
        }
        Ok(violations)
    }
}
