use crate::error::LexError;
use super::token::{Token, TokenKind};

/// Reserved words and punctuation, tried in order. Every spelling precedes
/// any shorter spelling it starts with.
const KEYWORDS: &[&[u8]] = &[
    b"func",
    b"return",
    b"if",
    b"for",
    b"break",
    b"continue",
    b"let",
    b"mut",
    b"type",
    b"struct",
    b"enum",
    b"interface",
    b"match",
    b"<->",
    b"<-",
    b"<<",
    b"<=",
    b"->",
    b"=>",
    b"==",
    b"!=",
    b">=",
    b">>",
    b"&&",
    b"||",
    b"(",
    b")",
    b"{",
    b"}",
    b"[",
    b"]",
    b":",
    b";",
    b",",
    b".",
    b"=",
    b"<",
    b">",
    b"+",
    b"-",
    b"*",
    b"/",
    b"%",
    b"!",
    b"&",
    b"|",
    b"^",
];

/// Built-in scalar type spellings.
const TYPE_NAMES: &[&[u8]] = &[
    b"i8", b"i16", b"i32", b"i64", b"i128", b"u8", b"u16", b"u32", b"u64", b"u128", b"f32",
    b"f64", b"bool", b"string",
];

/// Outcome of a single recognizer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognized {
    /// A token of this kind spans the first `len` bytes.
    Token(TokenKind, usize),
    /// The recognizer does not apply here.
    Reject,
    /// The recognizer applies but input ends inside the construct.
    Unterminated(&'static str),
}

type Recognizer = fn(&[u8]) -> Recognized;

/// Recognizers in precedence order; the first `Token` wins. The keyword
/// catalog claims `:` before the symbol recognizer sees it.
const RECOGNIZERS: [Recognizer; 9] = [
    recognize_keyword,
    recognize_string,
    recognize_char,
    recognize_float,
    recognize_integer,
    recognize_bool,
    recognize_symbol,
    recognize_identifier,
    recognize_whitespace,
];

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'
}

/// True when nothing identifier-like follows the first `len` bytes.
fn at_word_boundary(buf: &[u8], len: usize) -> bool {
    !buf.get(len).copied().is_some_and(is_ident_byte)
}

fn recognize_keyword(buf: &[u8]) -> Recognized {
    for &kw in KEYWORDS {
        if !buf.starts_with(kw) {
            continue;
        }
        // Words must not be the prefix of a longer name.
        if kw[0].is_ascii_lowercase() && !at_word_boundary(buf, kw.len()) {
            continue;
        }
        return Recognized::Token(TokenKind::Keyword, kw.len());
    }
    Recognized::Reject
}

fn recognize_quoted(
    buf: &[u8],
    quote: u8,
    kind: TokenKind,
    construct: &'static str,
) -> Recognized {
    if buf.first() != Some(&quote) {
        return Recognized::Reject;
    }
    match buf[1..].iter().position(|&b| b == quote) {
        Some(i) => Recognized::Token(kind, i + 2),
        None => Recognized::Unterminated(construct),
    }
}

fn recognize_string(buf: &[u8]) -> Recognized {
    recognize_quoted(buf, b'"', TokenKind::StringLiteral, "string literal")
}

fn recognize_char(buf: &[u8]) -> Recognized {
    recognize_quoted(buf, b'\'', TokenKind::CharLiteral, "character literal")
}

fn recognize_float(buf: &[u8]) -> Recognized {
    if !buf.first().is_some_and(u8::is_ascii_digit) {
        return Recognized::Reject;
    }
    let mut seen_dot = false;
    let mut len = 0;
    for &b in buf {
        match b {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        len += 1;
    }
    if seen_dot {
        Recognized::Token(TokenKind::FloatLiteral, len)
    } else {
        Recognized::Reject
    }
}

fn recognize_integer(buf: &[u8]) -> Recognized {
    let len = buf.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        Recognized::Reject
    } else {
        Recognized::Token(TokenKind::IntegerLiteral, len)
    }
}

fn recognize_bool(buf: &[u8]) -> Recognized {
    for word in [&b"true"[..], &b"false"[..]] {
        if buf.starts_with(word) && at_word_boundary(buf, word.len()) {
            return Recognized::Token(TokenKind::BoolLiteral, word.len());
        }
    }
    Recognized::Reject
}

fn recognize_symbol(buf: &[u8]) -> Recognized {
    if buf.first() != Some(&b':') || !buf.get(1).is_some_and(u8::is_ascii_lowercase) {
        return Recognized::Reject;
    }
    let tail = buf[1..]
        .iter()
        .take_while(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        .count();
    Recognized::Token(TokenKind::Symbol, 1 + tail)
}

fn recognize_identifier(buf: &[u8]) -> Recognized {
    if !buf.first().is_some_and(u8::is_ascii_lowercase) {
        return Recognized::Reject;
    }
    let len = buf.iter().take_while(|&&b| is_ident_byte(b)).count();
    let kind = if TYPE_NAMES.iter().any(|name| *name == &buf[..len]) {
        TokenKind::TypeName
    } else {
        TokenKind::Identifier
    };
    Recognized::Token(kind, len)
}

fn recognize_whitespace(buf: &[u8]) -> Recognized {
    match buf.first() {
        Some(b' ' | b'\t' | b'\r' | b'\n') => Recognized::Token(TokenKind::Whitespace, 1),
        _ => Recognized::Reject,
    }
}

/// Tokenizer for eureka schema text.
///
/// Yields tokens in source order, whitespace included. After the first error
/// the iterator is exhausted.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Lexer {
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Byte offset of the next unscanned byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Scan the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Result<Token<'a>, LexError>> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.pos..];

        for recognize in RECOGNIZERS {
            match recognize(rest) {
                Recognized::Token(kind, len) => {
                    self.pos += len;
                    return Some(Ok(Token::new(kind, &rest[..len])));
                }
                Recognized::Reject => {}
                Recognized::Unterminated(construct) => {
                    self.failed = true;
                    return Some(Err(LexError::UnexpectedEndOfInput {
                        offset: self.pos,
                        construct,
                    }));
                }
            }
        }

        self.failed = true;
        Some(Err(LexError::UnexpectedToken {
            offset: self.pos,
            found: snippet(rest),
        }))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// The unrecognised text up to the next whitespace, for error messages.
fn snippet(rest: &[u8]) -> String {
    let end = rest
        .iter()
        .take(32)
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or_else(|| rest.len().min(32));
    String::from_utf8_lossy(&rest[..end.max(1)]).into_owned()
}

/// Result of lexing a whole source unit.
///
/// `tokens` holds everything scanned before `error`, so callers can report
/// how far lexing got even on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized<'a> {
    pub tokens: Vec<Token<'a>>,
    pub error: Option<LexError>,
}

impl<'a> Tokenized<'a> {
    pub fn into_result(self) -> Result<Vec<Token<'a>>, LexError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tokens),
        }
    }
}

/// Lex `source` into tokens, whitespace included.
pub fn tokenize<S: AsRef<[u8]> + ?Sized>(source: &S) -> Tokenized<'_> {
    let source = source.as_ref();
    let mut tokens = Vec::new();
    let mut error = None;

    for item in Lexer::new(source) {
        match item {
            Ok(tok) => tokens.push(tok),
            Err(err) => {
                tracing::debug!(offset = err.offset(), %err, "lexing stopped");
                error = Some(err);
            }
        }
    }

    tracing::trace!(tokens = tokens.len(), bytes = source.len(), "tokenized source");
    Tokenized { tokens, error }
}

/// Drop every whitespace token.
pub fn strip_whitespace<'a>(tokens: &[Token<'a>]) -> Vec<Token<'a>> {
    tokens
        .iter()
        .filter(|tok| tok.kind != TokenKind::Whitespace)
        .copied()
        .collect()
}

/// Lex `source` and strip whitespace, failing on the first lexing error.
pub fn tokenize_significant<S: AsRef<[u8]> + ?Sized>(
    source: &S,
) -> Result<Vec<Token<'_>>, LexError> {
    let tokens = tokenize(source).into_result()?;
    Ok(strip_whitespace(&tokens))
}
