//! Lightweight C/C++ tokenizer.
//!
//! Produces identifiers, literals and punctuation with 1-based positions.
//! Whitespace, comments and preprocessor lines are dropped; string and
//! character literals (including raw strings) are collapsed into a single
//! [`TokenKind::Literal`] so their contents can never look like code.

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric, string or character literal.
    Literal,
    /// Punctuation. `::` and `->` are single tokens, everything else is one
    /// character.
    Punct,
    /// Placeholder for an initializer `{ ... }` the extractor skipped over.
    Group,
    /// Placeholder for a closed class, struct, union or enum body.
    Body,
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Category.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: &'a str,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Returns true for punctuation with exactly this text.
    #[must_use]
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Returns true for an identifier or keyword with exactly this text.
    #[must_use]
    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    /// Returns true for an identifier that is not a reserved word.
    #[must_use]
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Ident && !is_keyword(self.text)
    }
}

/// Streaming tokenizer over one source text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut pred) {
            self.bump();
        }
    }

    /// Skips whitespace, comments and preprocessor directives.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_nth(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => self.bump_while(|c| c != '\n'),
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    while let Some(c) = self.bump() {
                        if c == '*' && self.peek() == Some('/') {
                            self.bump();
                            break;
                        }
                    }
                }
                (Some('#'), _) if self.at_line_start => self.skip_directive(),
                _ => return,
            }
        }
    }

    /// Skips a preprocessor line, following `\` continuations and block
    /// comments that run past the end of the line.
    fn skip_directive(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                '\n' => return,
                '/' if self.peek_nth(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    while let Some(c) = self.bump() {
                        if c == '*' && self.peek() == Some('/') {
                            self.bump();
                            break;
                        }
                    }
                }
                '"' | '\'' => self.quoted(c),
                '\\' if matches!(self.peek_nth(1), Some('\n')) => {
                    self.bump();
                    self.bump();
                }
                '\\' if matches!((self.peek_nth(1), self.peek_nth(2)), (Some('\r'), Some('\n'))) => {
                    self.bump();
                    self.bump();
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Consumes a quoted literal whose opening quote is the next character.
    fn quoted(&mut self, quote: char) {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '\n' => return,
                _ => {
                    self.bump();
                    if c == quote {
                        return;
                    }
                }
            }
        }
    }

    /// Consumes `"delim( ... )delim"`; the `R` prefix is already consumed.
    fn raw_string(&mut self) {
        self.bump();
        let rest = &self.src[self.pos..];
        let Some(open) = rest.find('(') else {
            self.quoted('"');
            return;
        };
        let delimiter = &rest[..open];
        if delimiter.len() > 16 || delimiter.contains(|c: char| c.is_whitespace() || c == '"') {
            self.quoted('"');
            return;
        }

        let terminator = format!("){delimiter}\"");
        let body_start = self.pos + open + 1;
        let end = self.src[body_start..]
            .find(&terminator)
            .map_or(self.src.len(), |i| body_start + i + terminator.len());
        while self.pos < end {
            self.bump();
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.src[start..self.pos],
            line,
            column,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.skip_trivia();

        let (start, line, column) = (self.pos, self.line, self.column);
        let c = self.peek()?;
        self.at_line_start = false;

        let kind = if is_ident_start(c) {
            self.bump_while(is_ident_continue);
            let word = &self.src[start..self.pos];
            match self.peek() {
                Some('"') if is_string_prefix(word) => {
                    if word.ends_with('R') {
                        self.raw_string();
                    } else {
                        self.quoted('"');
                    }
                    TokenKind::Literal
                }
                Some('\'') if is_char_prefix(word) => {
                    self.quoted('\'');
                    TokenKind::Literal
                }
                _ => TokenKind::Ident,
            }
        } else if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit())) {
            let mut prev = c;
            self.bump();
            while let Some(n) = self.peek() {
                let exponent_sign =
                    matches!(n, '+' | '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
                if n.is_ascii_alphanumeric() || n == '.' || n == '\'' || n == '_' || exponent_sign {
                    prev = n;
                    self.bump();
                } else {
                    break;
                }
            }
            TokenKind::Literal
        } else if c == '"' || c == '\'' {
            self.quoted(c);
            TokenKind::Literal
        } else {
            self.bump();
            match (c, self.peek()) {
                (':', Some(':')) | ('-', Some('>')) => {
                    self.bump();
                }
                _ => {}
            }
            TokenKind::Punct
        };

        Some(self.token(kind, start, line, column))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

fn is_string_prefix(word: &str) -> bool {
    matches!(word, "L" | "u" | "U" | "u8" | "R" | "LR" | "uR" | "UR" | "u8R")
}

fn is_char_prefix(word: &str) -> bool {
    matches!(word, "L" | "u" | "U" | "u8")
}

/// Reserved words of C and C++ that can never be declared names.
const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await", "co_return",
    "co_yield", "compl", "concept", "const", "consteval", "constexpr", "constinit", "const_cast",
    "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline",
    "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
    "requires", "restrict", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true", "try",
    "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
    "wchar_t", "while", "xor", "xor_eq", "_Bool", "_Complex", "_Atomic", "_Thread_local",
    "_Noreturn", "_Alignas", "_Static_assert",
];

/// Builtin type words; a parameter containing one is a declaration.
const BUILTIN_TYPES: &[&str] = &[
    "void", "bool", "char", "char8_t", "char16_t", "char32_t", "wchar_t", "short", "int", "long",
    "float", "double", "signed", "unsigned", "auto", "_Bool", "_Complex",
];

/// Returns true for a C or C++ reserved word.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Returns true for a builtin type word.
#[must_use]
pub fn is_builtin_type(word: &str) -> bool {
    BUILTIN_TYPES.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<&str> {
        Lexer::new(src).map(|t| t.text).collect()
    }

    #[test]
    fn splits_identifiers_and_punctuation() {
        assert_eq!(
            texts("int foo::bar(x->y);"),
            ["int", "foo", "::", "bar", "(", "x", "->", "y", ")", ";"]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens: Vec<Token<'_>> = Lexer::new("int a;\n  class B {}").collect();
        let b = tokens.iter().find(|t| t.text == "B").unwrap();
        assert_eq!((b.line, b.column), (2, 9));
        let a = tokens.iter().find(|t| t.text == "a").unwrap();
        assert_eq!((a.line, a.column), (1, 5));
    }

    #[test]
    fn columns_count_characters() {
        let tokens: Vec<Token<'_>> = Lexer::new("\"é\" x").collect();
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[1].column, 5);
    }

    #[test]
    fn drops_comments() {
        assert_eq!(
            texts("a // class X {\nb /* struct { */ c"),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn drops_preprocessor_lines_with_continuations() {
        let src = "#define WRAP(x) \\\n  { x }\nint y;\n  #include <map>\n";
        assert_eq!(texts(src), ["int", "y", ";"]);
    }

    #[test]
    fn block_comment_started_in_a_directive_runs_to_its_end() {
        let src = "#define LIMIT 8 /* upper bound\n   class Hidden { */\nint z;\n";
        assert_eq!(texts(src), ["int", "z", ";"]);

        let tokens: Vec<Token<'_>> = Lexer::new(src).collect();
        assert_eq!(tokens[0].line, 3);
    }

    #[test]
    fn comment_markers_inside_directive_strings_are_text() {
        let src = "#include \"gen/*.h\"\nint w;\n";
        assert_eq!(texts(src), ["int", "w", ";"]);
    }

    #[test]
    fn hash_inside_a_line_is_punctuation() {
        assert_eq!(texts("a # b"), ["a", "#", "b"]);
    }

    #[test]
    fn collapses_string_and_char_literals() {
        let tokens: Vec<Token<'_>> = Lexer::new(r#"s = "a { \" }"; c = '}';"#).collect();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Literal,
                TokenKind::Punct,
                TokenKind::Ident,
                TokenKind::Punct,
                TokenKind::Literal,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn raw_strings_span_lines_and_braces() {
        let src = "auto s = R\"sql(select { \"\n)\" from t)sql\"; int after;";
        let texts = texts(src);
        assert_eq!(texts[3].chars().next(), Some('R'));
        assert_eq!(&texts[4..], [";", "int", "after", ";"]);
    }

    #[test]
    fn prefixed_literals() {
        assert_eq!(texts("L\"wide\" u8'x' Lvalue"), ["L\"wide\"", "u8'x'", "Lvalue"]);
    }

    #[test]
    fn numbers_with_exponents_and_separators() {
        assert_eq!(texts("1'000 2.5e-3 0x1F .5f"), ["1'000", "2.5e-3", "0x1F", ".5f"]);
    }

    #[test]
    fn keyword_and_name_classification() {
        let tokens: Vec<Token<'_>> = Lexer::new("class value").collect();
        assert!(!tokens[0].is_name());
        assert!(tokens[1].is_name());
        assert!(is_builtin_type("unsigned"));
        assert!(!is_builtin_type("size_t"));
    }
}
