//! Token model shared by the lexer and the declaration parser.

use std::fmt;

/// Classification of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Reserved words and structural punctuation (`struct`, `{`, `->`, ...).
    Keyword,
    /// Lowercase-led snake_case name.
    Identifier,
    /// Built-in scalar type spelling (`i32`, `f64`, `bool`, `string`, ...).
    TypeName,
    StringLiteral,
    CharLiteral,
    IntegerLiteral,
    FloatLiteral,
    BoolLiteral,
    /// Colon-prefixed atom, e.g. `:foo`.
    Symbol,
    Whitespace,
}

impl TokenKind {
    /// Whether a token of this kind may appear as an array initializer value.
    pub fn is_literal_value(self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::BoolLiteral
                | TokenKind::Identifier
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::TypeName => "type name",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::BoolLiteral => "bool literal",
            TokenKind::Symbol => "symbol",
            TokenKind::Whitespace => "whitespace",
        };
        f.write_str(name)
    }
}

/// A classified slice of the source buffer.
///
/// `text` is exactly the bytes the token was scanned from, delimiting quotes
/// included, so concatenating every token's text reproduces the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a [u8],
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a [u8]) -> Self {
        Token { kind, text }
    }

    /// Token text as a string. Only string and character literals can carry
    /// non-UTF-8 bytes; those are replaced lossily.
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(self.text).into_owned()
    }

    /// Literal payload: string and character literals lose their delimiters,
    /// every other kind returns its text unchanged.
    pub fn value(&self) -> &'a [u8] {
        match self.kind {
            TokenKind::StringLiteral | TokenKind::CharLiteral if self.text.len() >= 2 => {
                &self.text[1..self.text.len() - 1]
            }
            _ => self.text,
        }
    }

    /// Whether this is the keyword or punctuation spelled `text`.
    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_strips_quotes() {
        let tok = Token::new(TokenKind::StringLiteral, b"\"hello\"");
        assert_eq!(tok.value(), b"hello");
        let tok = Token::new(TokenKind::CharLiteral, b"'x'");
        assert_eq!(tok.value(), b"x");
        let tok = Token::new(TokenKind::IntegerLiteral, b"42");
        assert_eq!(tok.value(), b"42");
    }

    #[test]
    fn test_is_keyword() {
        let tok = Token::new(TokenKind::Keyword, b"struct");
        assert!(tok.is_keyword("struct"));
        assert!(!tok.is_keyword("enum"));
        let ident = Token::new(TokenKind::Identifier, b"struct_name");
        assert!(!ident.is_keyword("struct_name"));
    }

    #[test]
    fn test_literal_value_kinds() {
        assert!(TokenKind::Identifier.is_literal_value());
        assert!(TokenKind::FloatLiteral.is_literal_value());
        assert!(!TokenKind::CharLiteral.is_literal_value());
        assert!(!TokenKind::Keyword.is_literal_value());
    }
}
