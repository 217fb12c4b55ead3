//! Declaration extraction from C and C++ source text.
//!
//! The extractor walks a token stream, keeps an explicit stack of open
//! scopes, and yields one [`Occurrence`] per recognized declaration:
//!
//! ```
//! use ccase_check_core::{Context, Extractor};
//!
//! let src = "class Widget {\npublic:\n    void draw();\n};\n";
//! let found: Vec<_> = Extractor::new()
//!     .extract(src)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(found[0].context, Context::Class);
//! assert_eq!(found[1].context, Context::PublicFunction);
//! assert_eq!((found[1].name, found[1].line), ("draw", 3));
//! ```

mod lexer;
mod scope;
mod statement;

use std::collections::VecDeque;
use std::iter::FusedIterator;

use thiserror::Error;

use crate::context::{AccessLevel, Context};
use lexer::{Lexer, Token, TokenKind};
use scope::{Frame, Position, ScopeKind, ScopeStack};
use statement::{classify_open, classify_statement, Opening};

/// Default bound on brace nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Reasons a file's text cannot be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The file content is not UTF-8.
    #[error("file is not valid UTF-8 (invalid byte at offset {offset})")]
    NotUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// A `}` with no matching `{`.
    #[error("unbalanced '}}' at line {line}, column {column}")]
    UnbalancedBrace {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
    },

    /// Braces nested beyond the configured limit.
    #[error("braces nested deeper than {limit} levels at line {line}, column {column}")]
    NestingTooDeep {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// The configured limit.
        limit: usize,
    },
}

/// Decodes raw file content, dropping a leading byte-order mark.
///
/// # Errors
///
/// Returns [`ExtractError::NotUtf8`] for content that is not UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str, ExtractError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::NotUtf8 {
        offset: e.valid_up_to(),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// One declared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// Structural role of the declaration.
    pub context: Context,
    /// Exact spelling of the declared name.
    pub name: &'a str,
    /// 1-based line of the name's first character.
    pub line: usize,
    /// 1-based column of the name's first character.
    pub column: usize,
}

/// Declaration extractor.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    max_depth: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Extractor {
    /// Creates an extractor with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum brace nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Lazily extracts the declarations of `src`.
    ///
    /// The iterator yields at most one error and then stops; callers that
    /// want all-or-nothing semantics collect into a `Result`.
    #[must_use]
    pub fn extract<'a>(&self, src: &'a str) -> Occurrences<'a> {
        Occurrences {
            lexer: Lexer::new(src),
            scopes: ScopeStack::new(self.max_depth),
            statement: Vec::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

/// Iterator returned by [`Extractor::extract`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    lexer: Lexer<'a>,
    scopes: ScopeStack<'a>,
    statement: Vec<Token<'a>>,
    pending: VecDeque<Occurrence<'a>>,
    finished: bool,
}

impl<'a> Occurrences<'a> {
    fn step(&mut self, token: Token<'a>) -> Result<(), ExtractError> {
        let punct = token.kind == TokenKind::Punct;

        if self.scopes.is_opaque() {
            if token.is_punct("{") {
                self.scopes.push(Frame::new(ScopeKind::Block), &token)?;
            } else if token.is_punct("}") {
                self.close(token)?;
            }
            return Ok(());
        }

        match token.text {
            "{" if punct => self.open(token)?,
            "}" if punct => self.close(token)?,
            ";" if punct => self.finish_statement(),
            ":" if punct && self.access_label() => {}
            _ => self.statement.push(token),
        }
        Ok(())
    }

    fn open(&mut self, token: Token<'a>) -> Result<(), ExtractError> {
        let position = self.scopes.position();

        match classify_open(&self.statement, position) {
            Opening::Initializer => {
                // The declaration resumes once the initializer closes.
                self.scopes.push(Frame::new(ScopeKind::Initializer), &token)?;
                return Ok(());
            }
            Opening::Record { kind, name } => {
                let declaration = std::mem::take(&mut self.statement);
                let frame = Frame::new(ScopeKind::Record {
                    kind,
                    name: name.map(|t| t.text),
                    access: kind.default_access(),
                });
                self.scopes.push(frame.with_declaration(declaration), &token)?;
                if let (Some(context), Some(name)) = (kind.context(), name) {
                    self.emit(context, name);
                }
            }
            Opening::Enum { name } => {
                let declaration = std::mem::take(&mut self.statement);
                let frame = Frame::new(ScopeKind::Enum).with_declaration(declaration);
                self.scopes.push(frame, &token)?;
                if let Some(name) = name {
                    self.emit(Context::Enum, name);
                }
            }
            Opening::Function { name } => {
                self.statement.clear();
                self.scopes.push(Frame::new(ScopeKind::Function), &token)?;
                if let (Some(context), Some(name)) = (declaration_context(position, true), name) {
                    self.emit(context, name);
                }
            }
            Opening::Namespace => {
                self.statement.clear();
                self.scopes.push(Frame::new(ScopeKind::Namespace), &token)?;
            }
            Opening::Block => {
                self.statement.clear();
                self.scopes.push(Frame::new(ScopeKind::Block), &token)?;
            }
        }
        Ok(())
    }

    fn close(&mut self, token: Token<'a>) -> Result<(), ExtractError> {
        let frame = self.scopes.pop(&token)?;
        if self.scopes.is_opaque() {
            return Ok(());
        }

        match frame.kind {
            ScopeKind::Initializer => self.statement.push(Token {
                kind: TokenKind::Group,
                ..token
            }),
            ScopeKind::Record { .. } | ScopeKind::Enum => {
                self.statement = frame.declaration;
                self.statement.push(Token {
                    kind: TokenKind::Body,
                    ..token
                });
            }
            _ => self.statement.clear(),
        }
        Ok(())
    }

    fn finish_statement(&mut self) {
        let statement = std::mem::take(&mut self.statement);
        let position = self.scopes.position();
        for declarator in classify_statement(&statement, position) {
            if let Some(context) = declaration_context(position, declarator.is_function) {
                self.emit(context, declarator.name);
            }
        }
    }

    /// Handles a `:` that ends an access label. Returns false when the colon
    /// belongs to the statement.
    fn access_label(&mut self) -> bool {
        if !matches!(self.scopes.position(), Position::Member { .. }) {
            return false;
        }

        let access_at = |i: usize| {
            self.statement
                .get(i)
                .filter(|t| t.kind == TokenKind::Ident)
                .and_then(|t| AccessLevel::from_keyword(t.text))
        };
        let n = self.statement.len();
        if n == 0 {
            return false;
        }

        // `public:` or `public slots:`
        let level = access_at(n - 1).or_else(|| {
            (n >= 2 && self.statement[n - 1].is_name())
                .then(|| access_at(n - 2))
                .flatten()
        });

        match level {
            Some(level) => self.scopes.set_access(level),
            // Bare labels such as Qt's `signals:`.
            None if n == 1 && self.statement[0].is_name() => {}
            None => return false,
        }
        self.statement.clear();
        true
    }

    fn emit(&mut self, context: Context, name: Token<'a>) {
        self.pending.push_back(Occurrence {
            context,
            name: name.text,
            line: name.line,
            column: name.column,
        });
    }
}

fn declaration_context(position: Position<'_>, is_function: bool) -> Option<Context> {
    match position {
        Position::Global => Some(Context::global(is_function)),
        Position::Member { access, .. } => Some(Context::member(access, is_function)),
        Position::Opaque => None,
    }
}

impl<'a> Iterator for Occurrences<'a> {
    type Item = Result<Occurrence<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(Ok(found));
            }
            if self.finished {
                return None;
            }
            let Some(token) = self.lexer.next() else {
                // Unclosed scopes and a trailing statement without `;` are
                // tolerated.
                self.finished = true;
                continue;
            };
            if let Err(e) = self.step(token) {
                self.finished = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

impl FusedIterator for Occurrences<'_> {}
