//! Explicit scope stack for the extractor.
//!
//! One frame is pushed per `{` and popped per `}`; nesting depth is bounded
//! by a configurable limit instead of the host call stack.

use super::lexer::Token;
use super::ExtractError;
use crate::context::{AccessLevel, Context};

/// Kind of aggregate a member scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `class`, private by default.
    Class,
    /// `struct`, public by default.
    Struct,
    /// `union`, public by default.
    Union,
}

impl RecordKind {
    /// Parses a record introducer keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "union" => Some(Self::Union),
            _ => None,
        }
    }

    /// Access level in effect before any access specifier.
    #[must_use]
    pub fn default_access(self) -> AccessLevel {
        match self {
            Self::Class => AccessLevel::Private,
            Self::Struct | Self::Union => AccessLevel::Public,
        }
    }

    /// Context reported for the record's own name; unions have none.
    #[must_use]
    pub fn context(self) -> Option<Context> {
        match self {
            Self::Class => Some(Context::Class),
            Self::Struct => Some(Context::Struct),
            Self::Union => None,
        }
    }
}

/// What a `{ ... }` body belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind<'a> {
    /// `namespace` or `extern "C"`; declarations inside stay global.
    Namespace,
    /// Class, struct or union body.
    Record {
        /// Which aggregate.
        kind: RecordKind,
        /// Declared name, used to recognize constructors.
        name: Option<&'a str>,
        /// Access level currently in effect.
        access: AccessLevel,
    },
    /// Enumerator list.
    Enum,
    /// Function body.
    Function,
    /// Brace initializer; the enclosing declaration resumes after it.
    Initializer,
    /// Any other braces.
    Block,
}

impl ScopeKind<'_> {
    /// Opaque scopes hide their contents from classification.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            Self::Enum | Self::Function | Self::Initializer | Self::Block
        )
    }
}

/// One open scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    /// What the scope belongs to.
    pub kind: ScopeKind<'a>,
    /// Tokens of the declaration that opened a type body, restored when it
    /// closes so trailing declarators (`struct {} point;`) keep their head.
    pub declaration: Vec<Token<'a>>,
}

impl<'a> Frame<'a> {
    /// Creates a frame with no saved declaration.
    #[must_use]
    pub fn new(kind: ScopeKind<'a>) -> Self {
        Self {
            kind,
            declaration: Vec::new(),
        }
    }

    /// Saves the opening declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: Vec<Token<'a>>) -> Self {
        self.declaration = declaration;
        self
    }
}

/// Where a declaration statement sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<'a> {
    /// File or namespace scope.
    Global,
    /// Directly inside a record body.
    Member {
        /// Access level in effect.
        access: AccessLevel,
        /// Name of the enclosing record.
        record: Option<&'a str>,
    },
    /// Inside a body whose contents are not classified.
    Opaque,
}

/// Stack of open scopes.
#[derive(Debug, Clone)]
pub struct ScopeStack<'a> {
    frames: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a> ScopeStack<'a> {
    /// Creates an empty stack that refuses to grow beyond `max_depth`.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Pushes a scope opened at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NestingTooDeep`] once the limit is reached.
    pub fn push(&mut self, frame: Frame<'a>, at: &Token<'_>) -> Result<(), ExtractError> {
        if self.frames.len() >= self.max_depth {
            return Err(ExtractError::NestingTooDeep {
                line: at.line,
                column: at.column,
                limit: self.max_depth,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pops the innermost scope for the `}` at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnbalancedBrace`] when no scope is open.
    pub fn pop(&mut self, at: &Token<'_>) -> Result<Frame<'a>, ExtractError> {
        self.frames.pop().ok_or(ExtractError::UnbalancedBrace {
            line: at.line,
            column: at.column,
        })
    }

    /// Classifies the innermost scope.
    #[must_use]
    pub fn position(&self) -> Position<'a> {
        match self.frames.last().map(|f| &f.kind) {
            None | Some(ScopeKind::Namespace) => Position::Global,
            Some(ScopeKind::Record { name, access, .. }) => Position::Member {
                access: *access,
                record: *name,
            },
            Some(_) => Position::Opaque,
        }
    }

    /// Returns true when the innermost scope is opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.frames.last().is_some_and(|f| f.kind.is_opaque())
    }

    /// Changes the access level of the innermost record scope.
    pub fn set_access(&mut self, level: AccessLevel) {
        if let Some(Frame {
            kind: ScopeKind::Record { access, .. },
            ..
        }) = self.frames.last_mut()
        {
            *access = level;
        }
    }
}
