//! Declaration recognition for one statement's worth of tokens.
//!
//! A statement is everything collected at declaration level since the last
//! `;`, `{` or `}`. Classification is deliberately conservative: any shape
//! that could be either a declaration or something else yields nothing.

use super::lexer::{is_builtin_type, is_keyword, Token, TokenKind};
use super::scope::{Position, RecordKind};

/// A declared function or variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declarator<'a> {
    /// The name token.
    pub name: Token<'a>,
    /// Function (`true`) or variable (`false`).
    pub is_function: bool,
}

impl<'a> Declarator<'a> {
    fn function(name: Token<'a>) -> Self {
        Self {
            name,
            is_function: true,
        }
    }

    fn variable(name: Token<'a>) -> Self {
        Self {
            name,
            is_function: false,
        }
    }
}

/// What an opening `{` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening<'a> {
    /// `namespace x {` or `extern "C" {`.
    Namespace,
    /// Class, struct or union body.
    Record {
        /// Which aggregate.
        kind: RecordKind,
        /// Declared name; `None` for anonymous records.
        name: Option<Token<'a>>,
    },
    /// Enumerator list.
    Enum {
        /// Declared name; `None` for anonymous enums.
        name: Option<Token<'a>>,
    },
    /// Function body; `name` is `None` when the function is not reportable
    /// (constructors, operators, qualified definitions, macros).
    Function {
        /// Declared name.
        name: Option<Token<'a>>,
    },
    /// Brace initializer inside a declaration.
    Initializer,
    /// Anything else.
    Block,
}

/// Statement heads that never declare a reportable name.
const SKIP_HEADS: &[&str] = &[
    "using",
    "typedef",
    "friend",
    "static_assert",
    "_Static_assert",
    "return",
    "co_return",
    "namespace",
    "template",
    "concept",
    "requires",
    "asm",
    "__asm__",
    "goto",
    "break",
    "continue",
    "case",
    "default",
    "throw",
    "delete",
    "import",
    "module",
];

/// Heads of control statements; their braces are plain blocks.
const CONTROL_HEADS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "try", "catch",
];

/// Keywords that only appear in expressions.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "this",
    "true",
    "false",
    "nullptr",
    "sizeof",
    "alignof",
    "new",
    "delete",
    "static_cast",
    "dynamic_cast",
    "reinterpret_cast",
    "const_cast",
    "typeid",
    "noexcept",
    "throw",
];

/// Classifies the statement preceding a `{`.
#[must_use]
pub fn classify_open<'a>(statement: &[Token<'a>], position: Position<'a>) -> Opening<'a> {
    if paren_balance(statement) > 0 {
        return Opening::Initializer;
    }

    let tokens = normalize(statement);
    let Some(first) = tokens.first() else {
        return Opening::Block;
    };

    if tokens.iter().take(2).any(|t| t.is_word("namespace")) {
        return Opening::Namespace;
    }
    if first.is_word("extern") && tokens.len() == 2 && tokens[1].kind == TokenKind::Literal {
        return Opening::Namespace;
    }
    if first.kind == TokenKind::Ident && CONTROL_HEADS.contains(&first.text) {
        return Opening::Block;
    }
    // Hidden friends are not members.
    if first.is_word("friend") || tokens.iter().any(|t| t.is_word("operator")) {
        return Opening::Function { name: None };
    }

    let marks = top_level(&tokens);
    match first_top(&tokens, &marks, &["(", "="]) {
        Some(i) if tokens[i].is_punct("=") => Opening::Initializer,
        Some(paren) => {
            let close = matching_paren(&tokens, paren);
            let has_init_list = (close + 1..tokens.len())
                .any(|i| marks[i] && tokens[i].is_punct(":"));
            let ends_in_member = tokens
                .last()
                .is_some_and(|t| t.kind == TokenKind::Ident || t.is_punct(">"));
            if has_init_list && ends_in_member {
                // `Foo() : member{...}`
                return Opening::Initializer;
            }
            Opening::Function {
                name: function_name(&tokens, paren, position),
            }
        }
        None => {
            if let Some(opening) = record_opening(&tokens) {
                return opening;
            }
            // `int x{1}`, `Foo f{}`
            if tokens.len() >= 2 && tokens.last().is_some_and(Token::is_name) {
                return Opening::Initializer;
            }
            Opening::Block
        }
    }
}

/// Classifies a statement terminated by `;`.
#[must_use]
pub fn classify_statement<'a>(
    statement: &[Token<'a>],
    position: Position<'a>,
) -> Vec<Declarator<'a>> {
    let mut tokens = normalize(statement);
    if tokens.len() >= 2 && tokens[0].is_word("extern") && tokens[1].kind == TokenKind::Literal {
        tokens.drain(..2);
    }

    let Some(first) = tokens.first() else {
        return Vec::new();
    };
    if first.kind == TokenKind::Ident && SKIP_HEADS.contains(&first.text) {
        return Vec::new();
    }
    if tokens.iter().any(|t| t.is_word("operator")) {
        return Vec::new();
    }

    let marks = top_level(&tokens);
    match first_top(&tokens, &marks, &["(", "="]) {
        Some(paren) if tokens[paren].is_punct("(") => {
            parenthesized(&tokens, paren, position).into_iter().collect()
        }
        _ => variables(&tokens, &marks),
    }
}

/// Drops attributes and leading template headers.
fn normalize<'a>(tokens: &[Token<'a>]) -> Vec<Token<'a>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let t = tokens[i];
        let next = tokens.get(i + 1).copied();
        let next_is = |text: &str| next.is_some_and(|n| n.is_punct(text));

        if t.is_punct("[") && next_is("[") {
            i = skip_group(tokens, i, "[", "]");
        } else if t.kind == TokenKind::Ident
            && matches!(
                t.text,
                "__attribute__" | "__declspec" | "alignas" | "_Alignas"
            )
            && next_is("(")
        {
            i = skip_group(tokens, i + 1, "(", ")");
        } else if t.is_word("template") && next_is("<") {
            i = skip_group(tokens, i + 1, "<", ">");
        } else {
            out.push(t);
            i += 1;
        }
    }
    out
}

/// Index just past the group that opens at `start`.
fn skip_group(tokens: &[Token<'_>], start: usize, open: &str, close: &str) -> usize {
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate().skip(start) {
        if t.is_punct(open) {
            depth += 1;
        } else if t.is_punct(close) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
    }
    tokens.len()
}

/// Net count of unclosed `(` and `[`.
fn paren_balance(tokens: &[Token<'_>]) -> isize {
    tokens.iter().fold(0, |depth, t| match t.text {
        "(" | "[" if t.kind == TokenKind::Punct => depth + 1,
        ")" | "]" if t.kind == TokenKind::Punct => depth - 1,
        _ => depth,
    })
}

/// Marks tokens that sit outside every `()`, `[]` and template `<>` group.
///
/// Angle brackets are only tracked before a top-level `=`, where `<` cannot
/// be a comparison.
fn top_level(tokens: &[Token<'_>]) -> Vec<bool> {
    let mut marks = Vec::with_capacity(tokens.len());
    let mut nest = 0usize;
    let mut angles = 0usize;
    let mut in_initializer = false;

    for t in tokens {
        marks.push(nest == 0 && angles == 0);
        if t.kind != TokenKind::Punct {
            continue;
        }
        match t.text {
            "(" | "[" => nest += 1,
            ")" | "]" => nest = nest.saturating_sub(1),
            "<" if nest == 0 && !in_initializer => angles += 1,
            ">" if nest == 0 && angles > 0 => angles -= 1,
            "=" if nest == 0 && angles == 0 => in_initializer = true,
            "," if nest == 0 && angles == 0 => in_initializer = false,
            _ => {}
        }
    }
    marks
}

fn first_top(tokens: &[Token<'_>], marks: &[bool], texts: &[&str]) -> Option<usize> {
    tokens
        .iter()
        .zip(marks)
        .position(|(t, &top)| top && t.kind == TokenKind::Punct && texts.contains(&t.text))
}

/// Index of the `)` matching the `(` at `open`, or the last index.
fn matching_paren(tokens: &[Token<'_>], open: usize) -> usize {
    skip_group(tokens, open, "(", ")").saturating_sub(1)
}

/// Ranges of the segments between top-level commas.
fn split_top(tokens: &[Token<'_>], marks: &[bool]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, t) in tokens.iter().enumerate() {
        if marks[i] && t.is_punct(",") {
            ranges.push((start, i));
            start = i + 1;
        }
    }
    ranges.push((start, tokens.len()));
    ranges
}

/// True if `prefix` names a type: a non-keyword identifier, a builtin type
/// word, a type body, or the end of a template argument list.
fn has_type(prefix: &[Token<'_>]) -> bool {
    prefix.iter().any(|t| {
        t.is_name()
            || t.kind == TokenKind::Body
            || (t.kind == TokenKind::Ident && is_builtin_type(t.text))
            || t.is_punct(">")
    })
}

fn record_opening<'a>(tokens: &[Token<'a>]) -> Option<Opening<'a>> {
    let index = tokens.iter().position(|t| {
        t.kind == TokenKind::Ident && matches!(t.text, "class" | "struct" | "union" | "enum")
    })?;
    let keyword = tokens[index];

    let mut rest = &tokens[index + 1..];
    if keyword.text == "enum" && rest.first().is_some_and(|t| t.is_word("class") || t.is_word("struct")) {
        rest = &rest[1..];
    }

    let head_len = rest
        .iter()
        .position(|t| t.is_punct(":") || t.is_punct("<"))
        .unwrap_or(rest.len());
    let head = &rest[..head_len];
    // Qualifiers of a nested name (`Outer::Inner`) are not separate names.
    let mut names: Vec<Token<'a>> = head
        .iter()
        .enumerate()
        .filter(|&(i, t)| {
            t.is_name() && t.text != "final" && !head.get(i + 1).is_some_and(|n| n.is_punct("::"))
        })
        .map(|(_, t)| *t)
        .collect();
    if let Some((&last, leading)) = names.split_last() {
        names = leading
            .iter()
            .filter(|t| !is_export_macro(t.text))
            .copied()
            .chain(std::iter::once(last))
            .collect();
    }

    // `struct Config defaults{1}` declares a variable, not a type.
    if names.len() >= 2 {
        return Some(Opening::Initializer);
    }
    let name = names.last().copied();

    if keyword.text == "enum" {
        return Some(Opening::Enum { name });
    }
    RecordKind::from_keyword(keyword.text).map(|kind| Opening::Record { kind, name })
}

/// `DLL_EXPORT`, `MYLIB_API`, `Q_DECL_EXPORT` and the like.
fn is_export_macro(word: &str) -> bool {
    word.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && (word.contains('_') || word.ends_with("EXPORT") || word.ends_with("API"))
}

/// Name of a function whose parameter list opens at `paren`, if reportable.
fn function_name<'a>(tokens: &[Token<'a>], paren: usize, position: Position<'_>) -> Option<Token<'a>> {
    let name = *tokens.get(paren.checked_sub(1)?)?;
    if !name.is_name() {
        return None;
    }

    let prefix = &tokens[..paren - 1];
    if prefix
        .last()
        .is_some_and(|t| matches!(t.text, "::" | "~" | "." | "->" | ",") && t.kind == TokenKind::Punct)
    {
        return None;
    }
    if !has_type(prefix) {
        return None;
    }
    if let Position::Member {
        record: Some(record),
        ..
    } = position
    {
        if name.text == record {
            return None;
        }
    }
    Some(name)
}

/// A statement whose first top-level token of interest is `(`.
fn parenthesized<'a>(
    tokens: &[Token<'a>],
    paren: usize,
    position: Position<'_>,
) -> Option<Declarator<'a>> {
    let close = matching_paren(tokens, paren);
    let inner = &tokens[paren + 1..close.max(paren + 1)];

    // `T (*name)(args)` and `T (&name)[N]`
    if inner
        .first()
        .is_some_and(|t| t.is_punct("*") || t.is_punct("&") || t.is_punct("^"))
    {
        if !has_type(&tokens[..paren]) || inner.iter().any(|t| t.is_punct("(")) {
            return None;
        }
        return inner
            .iter()
            .find(|t| t.is_name())
            .map(|&name| Declarator::variable(name));
    }

    let name = function_name(tokens, paren, position)?;
    match parameter_shape(inner) {
        Shape::Parameters => Some(Declarator::function(name)),
        Shape::Initializer => Some(Declarator::variable(name)),
        Shape::Ambiguous => None,
    }
}

/// How the contents of a parenthesized list read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Parameter declarations: the statement declares a function.
    Parameters,
    /// Expressions: the statement direct-initializes a variable.
    Initializer,
    /// Could be either.
    Ambiguous,
}

fn parameter_shape(inner: &[Token<'_>]) -> Shape {
    if inner.is_empty() {
        return Shape::Parameters;
    }

    let marks = top_level(inner);
    let mut shape = Shape::Parameters;
    for (start, end) in split_top(inner, &marks) {
        let group = &inner[start..end];
        // Default arguments do not change what the parameter is.
        let declared = group
            .iter()
            .zip(&marks[start..end])
            .position(|(t, &top)| top && t.is_punct("="))
            .map_or(group, |eq| &group[..eq]);

        match group_shape(declared) {
            Shape::Initializer => return Shape::Initializer,
            Shape::Ambiguous => shape = Shape::Ambiguous,
            Shape::Parameters => {}
        }
    }
    shape
}

fn group_shape(group: &[Token<'_>]) -> Shape {
    if group.is_empty() {
        return Shape::Ambiguous;
    }
    if group.iter().all(|t| t.is_punct(".")) {
        // `...`
        return Shape::Parameters;
    }

    let expression = group.iter().any(|t| match t.kind {
        TokenKind::Literal | TokenKind::Group => true,
        TokenKind::Punct => matches!(
            t.text,
            "+" | "-" | "/" | "%" | "!" | "|" | "^" | "?" | "~" | "." | "->"
        ),
        TokenKind::Ident => EXPRESSION_KEYWORDS.contains(&t.text),
        TokenKind::Body => false,
    });
    if expression {
        return Shape::Initializer;
    }
    if group.iter().any(|t| t.is_punct("(")) {
        return Shape::Ambiguous;
    }

    let declaration_like = group.iter().any(|t| {
        t.is_punct("*") || t.is_punct("&") || (t.kind == TokenKind::Ident && is_keyword(t.text))
    });
    let names = group.iter().filter(|t| t.is_name()).count();
    if declaration_like || names >= 2 {
        Shape::Parameters
    } else {
        Shape::Ambiguous
    }
}

/// Variable declarators of a statement without a leading parameter list.
fn variables<'a>(tokens: &[Token<'a>], marks: &[bool]) -> Vec<Declarator<'a>> {
    let mut found = Vec::new();

    for (index, (start, end)) in split_top(tokens, marks).into_iter().enumerate() {
        let segment = &tokens[start..end];
        let stop = segment
            .iter()
            .zip(&marks[start..end])
            .position(|(t, &top)| top && ends_declarator(t))
            .unwrap_or(segment.len());
        let head = &segment[..stop];

        let Some(last) = head.last().filter(|t| t.is_name()) else {
            if index == 0 {
                return Vec::new();
            }
            continue;
        };

        let prefix = &head[..head.len() - 1];
        let qualified = prefix
            .last()
            .is_some_and(|t| t.kind == TokenKind::Punct && matches!(t.text, "::" | "." | "->"));
        // Later declarators inherit the type of the first.
        let typed = index > 0 || has_type(prefix);

        if qualified || !typed {
            if index == 0 {
                return Vec::new();
            }
            continue;
        }
        found.push(Declarator::variable(*last));
    }

    found
}

fn ends_declarator(t: &Token<'_>) -> bool {
    match t.kind {
        TokenKind::Group => true,
        TokenKind::Punct => matches!(t.text, "=" | "[" | ":" | "(" | "{"),
        _ => false,
    }
}
