//! Recursive-descent productions over a whitespace-free token slice.
//!
//! Every production takes the remaining tokens and, on success, returns the
//! node it built together with the unconsumed suffix. On failure nothing is
//! returned except the error naming the first offending token, or
//! [`ParseError::UnexpectedEndOfInput`] if the tokens ran out first.

use crate::error::ParseError;
use super::ast::*;
use super::token::{Token, TokenKind};

/// A parsed node plus the tokens left after it.
pub type Parsed<'t, 'a, T> = Result<(T, &'t [Token<'a>]), ParseError>;

/// How many inline structs/interfaces a field type may nest. The keyword
/// opening the next level is reported as an unexpected token.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a sequence of top-level declarations until the tokens run out.
pub fn parse_declarations(tokens: &[Token<'_>]) -> Result<Vec<Declaration>, ParseError> {
    let mut rest = tokens;
    let mut decls = Vec::new();

    while !rest.is_empty() {
        let (decl, remains) = parse_declaration(rest)?;
        decls.push(decl);
        rest = remains;
    }

    Ok(decls)
}

/// Parse one top-level declaration, chosen by its leading token.
pub fn parse_declaration<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Declaration> {
    let tok = tokens.first().ok_or(ParseError::UnexpectedEndOfInput)?;

    let (decl, rest) = if tok.is_keyword("struct") {
        let (s, rest) = parse_struct(tokens)?;
        (Declaration::Struct(s), rest)
    } else if tok.is_keyword("interface") {
        let (i, rest) = parse_interface(tokens)?;
        (Declaration::Interface(i), rest)
    } else if tok.is_keyword("enum") {
        let (e, rest) = parse_enum(tokens)?;
        (Declaration::Enum(e), rest)
    } else if tok.is_keyword("[") {
        let (a, rest) = parse_array(tokens)?;
        (Declaration::Array(a), rest)
    } else {
        return Err(unexpected(tok));
    };

    tracing::debug!(
        kind = decl.kind(),
        name = decl.name().unwrap_or_default(),
        "parsed declaration"
    );
    Ok((decl, rest))
}

/// `Identifier ':' ( TypeName | Array | Struct | Interface )`
pub fn parse_field<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Field> {
    parse_field_at(tokens, 0)
}

fn parse_field_at<'t, 'a>(tokens: &'t [Token<'a>], depth: usize) -> Parsed<'t, 'a, Field> {
    let (name, rest) = expect_name(tokens)?;
    let rest = expect_keyword(rest, ":")?;

    let (tok, after) = next(rest)?;
    let (ty, rest) = match tok.kind {
        TokenKind::TypeName => (TypeRef::Named(tok.as_str()), after),
        TokenKind::Keyword if tok.is_keyword("[") => {
            let (array, rest) = parse_array(rest)?;
            (TypeRef::Array(array), rest)
        }
        TokenKind::Keyword if depth >= MAX_NESTING_DEPTH => return Err(unexpected(tok)),
        TokenKind::Keyword if tok.is_keyword("struct") => {
            let (inner, rest) = parse_struct_at(rest, depth + 1)?;
            (TypeRef::Struct(inner), rest)
        }
        TokenKind::Keyword if tok.is_keyword("interface") => {
            let (inner, rest) = parse_interface_at(rest, depth + 1)?;
            (TypeRef::Interface(inner), rest)
        }
        _ => return Err(unexpected(tok)),
    };

    Ok((Field { name, ty }, rest))
}

/// `'struct' Identifier '{' Field* '}'`
pub fn parse_struct<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Struct> {
    parse_struct_at(tokens, 0)
}

fn parse_struct_at<'t, 'a>(tokens: &'t [Token<'a>], depth: usize) -> Parsed<'t, 'a, Struct> {
    let rest = expect_keyword(tokens, "struct")?;
    let (name, rest) = expect_name(rest)?;
    let rest = expect_keyword(rest, "{")?;
    let (fields, rest) = parse_body(rest, |tokens| parse_field_at(tokens, depth))?;

    Ok((Struct { name, fields }, rest))
}

/// `'interface' Identifier '{' Func* '}'`
pub fn parse_interface<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Interface> {
    parse_interface_at(tokens, 0)
}

fn parse_interface_at<'t, 'a>(tokens: &'t [Token<'a>], depth: usize) -> Parsed<'t, 'a, Interface> {
    let rest = expect_keyword(tokens, "interface")?;
    let (name, rest) = expect_name(rest)?;
    let rest = expect_keyword(rest, "{")?;
    let (methods, rest) = parse_body(rest, |tokens| parse_func_at(tokens, depth))?;

    Ok((Interface { name, methods }, rest))
}

/// `'func' Identifier '(' (Field (',' Field)*)? ')' ReturnClause?`
pub fn parse_func<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Func> {
    parse_func_at(tokens, 0)
}

fn parse_func_at<'t, 'a>(tokens: &'t [Token<'a>], depth: usize) -> Parsed<'t, 'a, Func> {
    let rest = expect_keyword(tokens, "func")?;
    let (name, rest) = expect_name(rest)?;
    let mut rest = expect_keyword(rest, "(")?;

    let mut params = Vec::new();
    if peek_keyword(rest, ")") {
        rest = &rest[1..];
    } else {
        loop {
            let (param, remains) = parse_field_at(rest, depth)?;
            params.push(param);

            let (tok, after) = next(remains)?;
            rest = after;
            if tok.is_keyword(")") {
                break;
            }
            if !tok.is_keyword(",") {
                return Err(unexpected(tok));
            }
        }
    }

    let (returns, rest) = parse_returns(rest);

    Ok((
        Func {
            name,
            params,
            returns,
        },
        rest,
    ))
}

/// `( '->' '('? Type (',' Type)* ')'? )?` where `Type` is an identifier or a
/// scalar type name.
///
/// Never fails: the list ends at the first token that cannot continue it and
/// that token is left for the caller.
fn parse_returns<'t, 'a>(tokens: &'t [Token<'a>]) -> (Vec<String>, &'t [Token<'a>]) {
    if !peek_keyword(tokens, "->") {
        return (Vec::new(), tokens);
    }
    let mut rest = &tokens[1..];

    let parenthesized = peek_keyword(rest, "(");
    if parenthesized {
        rest = &rest[1..];
    }

    let mut returns = Vec::new();
    while let Some(tok) = rest.first().filter(|tok| is_return_type(tok)) {
        returns.push(tok.as_str());
        rest = &rest[1..];

        // A comma only belongs to the list if another type follows it.
        match rest {
            [comma, following, ..] if comma.is_keyword(",") && is_return_type(following) => {
                rest = &rest[1..];
            }
            _ => break,
        }
    }

    if parenthesized && peek_keyword(rest, ")") {
        rest = &rest[1..];
    }

    (returns, rest)
}

fn is_return_type(tok: &Token<'_>) -> bool {
    matches!(tok.kind, TokenKind::Identifier | TokenKind::TypeName)
}

/// `'enum' Identifier (':' TypeName)? '{' Identifier* '}'`
pub fn parse_enum<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Enum> {
    let rest = expect_keyword(tokens, "enum")?;
    let (name, rest) = expect_name(rest)?;

    let (backing_type, rest) = if peek_keyword(rest, ":") {
        let (tok, after) = next(&rest[1..])?;
        // Only the integer and float families can back an enum.
        if tok.kind != TokenKind::TypeName || !matches!(tok.text.first(), Some(b'i' | b'u' | b'f'))
        {
            return Err(unexpected(tok));
        }
        (tok.as_str(), after)
    } else {
        (DEFAULT_ENUM_TYPE.to_string(), rest)
    };

    let mut rest = expect_keyword(rest, "{")?;
    let mut members = Vec::new();
    loop {
        let (tok, after) = next(rest)?;
        rest = after;
        if tok.is_keyword("}") {
            break;
        }
        if tok.kind != TokenKind::Identifier {
            return Err(unexpected(tok));
        }
        members.push(tok.as_str());
    }

    Ok((
        Enum {
            name,
            backing_type,
            members,
        },
        rest,
    ))
}

/// `'[' IntegerLiteral ']' TypeName ( '{' (Literal (',' Literal)*)? '}' )?`
pub fn parse_array<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, Array> {
    let rest = expect_keyword(tokens, "[")?;

    let (tok, rest) = next(rest)?;
    if tok.kind != TokenKind::IntegerLiteral {
        return Err(unexpected(tok));
    }
    let length = std::str::from_utf8(tok.text)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| unexpected(tok))?;

    let rest = expect_keyword(rest, "]")?;
    let (element_type, rest) = expect_type_name(rest)?;

    if !peek_keyword(rest, "{") {
        return Ok((
            Array {
                length,
                element_type,
                values: Vec::new(),
            },
            rest,
        ));
    }
    let mut rest = &rest[1..];

    let mut values = Vec::new();
    if peek_keyword(rest, "}") {
        rest = &rest[1..];
    } else {
        loop {
            let (tok, after) = next(rest)?;
            if !tok.kind.is_literal_value() || values.len() == length {
                return Err(unexpected(tok));
            }
            values.push(tok.as_str());

            let (sep, after) = next(after)?;
            rest = after;
            if sep.is_keyword("}") {
                break;
            }
            if !sep.is_keyword(",") {
                return Err(unexpected(sep));
            }
        }
    }

    Ok((
        Array {
            length,
            element_type,
            values,
        },
        rest,
    ))
}

/// Repeat `item` until the closing `}`; the opening `{` is already consumed.
fn parse_body<'t, 'a, T>(
    tokens: &'t [Token<'a>],
    item: impl Fn(&'t [Token<'a>]) -> Parsed<'t, 'a, T>,
) -> Parsed<'t, 'a, Vec<T>> {
    let mut rest = tokens;
    let mut items = Vec::new();

    loop {
        let (tok, after) = next(rest)?;
        if tok.is_keyword("}") {
            return Ok((items, after));
        }
        let (parsed, remains) = item(rest)?;
        items.push(parsed);
        rest = remains;
    }
}

// Helper functions

fn unexpected(tok: &Token<'_>) -> ParseError {
    ParseError::UnexpectedToken {
        kind: tok.kind,
        text: tok.as_str(),
    }
}

fn next<'t, 'a>(tokens: &'t [Token<'a>]) -> Result<(&'t Token<'a>, &'t [Token<'a>]), ParseError> {
    tokens.split_first().ok_or(ParseError::UnexpectedEndOfInput)
}

fn peek_keyword(tokens: &[Token<'_>], keyword: &str) -> bool {
    tokens.first().is_some_and(|tok| tok.is_keyword(keyword))
}

fn expect_keyword<'t, 'a>(tokens: &'t [Token<'a>], keyword: &str) -> Result<&'t [Token<'a>], ParseError> {
    let (tok, rest) = next(tokens)?;
    if tok.is_keyword(keyword) {
        Ok(rest)
    } else {
        Err(unexpected(tok))
    }
}

fn expect_kind<'t, 'a>(tokens: &'t [Token<'a>], kind: TokenKind) -> Parsed<'t, 'a, String> {
    let (tok, rest) = next(tokens)?;
    if tok.kind == kind {
        Ok((tok.as_str(), rest))
    } else {
        Err(unexpected(tok))
    }
}

fn expect_name<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, String> {
    expect_kind(tokens, TokenKind::Identifier)
}

fn expect_type_name<'t, 'a>(tokens: &'t [Token<'a>]) -> Parsed<'t, 'a, String> {
    expect_kind(tokens, TokenKind::TypeName)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize_significant;

    fn toks(src: &str) -> Vec<Token<'_>> {
        tokenize_significant(src).unwrap()
    }

    #[test]
    fn test_parse_scalar_field() {
        let tokens = toks("id: u64 rest");
        let (field, rest) = parse_field(&tokens).unwrap();
        assert_eq!(field.name, "id");
        assert_eq!(field.ty, TypeRef::Named("u64".into()));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, b"rest");
    }

    #[test]
    fn test_field_rejects_user_type() {
        let tokens = toks("owner: person");
        let err = parse_field(&tokens).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                kind: TokenKind::Identifier,
                text: "person".into(),
            }
        );
    }

    #[test]
    fn test_field_missing_type() {
        let tokens = toks("id:");
        assert_eq!(parse_field(&tokens).unwrap_err(), ParseError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_parse_simple_struct() {
        let tokens = toks("struct person { name: string age: u8 }");
        let (s, rest) = parse_struct(&tokens).unwrap();
        assert_eq!(s.name, "person");
        assert_eq!(s.fields.len(), 2);
        assert_eq!(s.fields[1].name, "age");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_empty_struct() {
        let tokens = toks("struct unit {}");
        let (s, _) = parse_struct(&tokens).unwrap();
        assert!(s.fields.is_empty());
    }

    #[test]
    fn test_struct_name_must_be_identifier() {
        let tokens = toks("struct i32 {}");
        assert!(matches!(
            parse_struct(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::TypeName, .. })
        ));
    }

    #[test]
    fn test_nested_inline_struct() {
        let tokens = toks("struct outer { inner: struct point { x: f32 y: f32 } }");
        let (s, rest) = parse_struct(&tokens).unwrap();
        assert!(rest.is_empty());
        match &s.fields[0].ty {
            TypeRef::Struct(point) => {
                assert_eq!(point.name, "point");
                assert_eq!(point.fields.len(), 2);
            }
            other => panic!("expected inline struct, got {:?}", other),
        }
    }

    #[test]
    fn test_func_without_returns() {
        let tokens = toks("func ping() }");
        let (f, rest) = parse_func(&tokens).unwrap();
        assert_eq!(f.name, "ping");
        assert!(f.params.is_empty());
        assert!(f.returns.is_empty());
        assert_eq!(rest.len(), 1);
        assert!(rest[0].is_keyword("}"));
    }

    #[test]
    fn test_func_single_return_without_parens() {
        let tokens = toks("func len(s: string) -> u64");
        let (f, rest) = parse_func(&tokens).unwrap();
        assert_eq!(f.params.len(), 1);
        assert_eq!(f.returns, vec!["u64".to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_func_returns_identifiers() {
        let tokens = toks("func get(id: u64) -> (user, error)");
        let (f, rest) = parse_func(&tokens).unwrap();
        assert_eq!(f.returns, vec!["user".to_string(), "error".to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_func_return_list_stops_leniently() {
        let tokens = toks("func f() -> i32 ; next");
        let (f, rest) = parse_func(&tokens).unwrap();
        assert_eq!(f.returns, vec!["i32".to_string()]);
        assert_eq!(rest.len(), 2);
        assert!(rest[0].is_keyword(";"));
    }

    #[test]
    fn test_func_trailing_comma_left_for_caller() {
        let tokens = toks("func f() -> i32, }");
        let (f, rest) = parse_func(&tokens).unwrap();
        assert_eq!(f.returns.len(), 1);
        assert!(rest[0].is_keyword(","));
    }

    #[test]
    fn test_func_params_need_separator() {
        let tokens = toks("func f(a: i32 b: i32)");
        assert!(matches!(
            parse_func(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::Identifier, .. })
        ));
    }

    #[test]
    fn test_func_unclosed_params() {
        let tokens = toks("func f(a: i32,");
        assert_eq!(parse_func(&tokens).unwrap_err(), ParseError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_parse_interface() {
        let tokens = toks("interface store { func put(k: string, v: string) func get(k: string) -> string }");
        let (i, rest) = parse_interface(&tokens).unwrap();
        assert_eq!(i.name, "store");
        assert_eq!(i.methods.len(), 2);
        assert_eq!(i.methods[0].params.len(), 2);
        assert!(i.methods[0].returns.is_empty());
        assert_eq!(i.methods[1].returns, vec!["string".to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_interface_rejects_non_func() {
        let tokens = toks("interface svc { x: i32 }");
        assert!(matches!(
            parse_interface(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::Identifier, .. })
        ));
    }

    #[test]
    fn test_enum_backing_type_family() {
        let tokens = toks("enum flag : bool { on off }");
        assert_eq!(
            parse_enum(&tokens).unwrap_err(),
            ParseError::UnexpectedToken {
                kind: TokenKind::TypeName,
                text: "bool".into(),
            }
        );

        let tokens = toks("enum ratio : f32 { half }");
        let (e, _) = parse_enum(&tokens).unwrap();
        assert_eq!(e.backing_type, "f32");
    }

    #[test]
    fn test_enum_rejects_non_identifier_member() {
        let tokens = toks("enum color { red 1 }");
        assert!(matches!(
            parse_enum(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::IntegerLiteral, .. })
        ));
    }

    #[test]
    fn test_enum_unclosed() {
        let tokens = toks("enum color { red green");
        assert_eq!(parse_enum(&tokens).unwrap_err(), ParseError::UnexpectedEndOfInput);
    }

    #[test]
    fn test_array_without_initializer() {
        let tokens = toks("[4]u8 struct");
        let (a, rest) = parse_array(&tokens).unwrap();
        assert_eq!(a.length, 4);
        assert_eq!(a.element_type, "u8");
        assert!(a.values.is_empty());
        assert_eq!(rest.len(), 1);
        assert!(rest[0].is_keyword("struct"));
    }

    #[test]
    fn test_array_literal_kinds() {
        let tokens = toks(r#"[5]string{"a", 1, 2.5, true, red}"#);
        let (a, _) = parse_array(&tokens).unwrap();
        assert_eq!(a.values, vec!["\"a\"", "1", "2.5", "true", "red"]);
    }

    #[test]
    fn test_array_empty_initializer() {
        let tokens = toks("[2]i32{}");
        let (a, rest) = parse_array(&tokens).unwrap();
        assert!(a.values.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_array_length_must_be_integer() {
        let tokens = toks("[n]i32");
        assert!(matches!(
            parse_array(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::Identifier, .. })
        ));
    }

    #[test]
    fn test_array_element_must_be_scalar() {
        let tokens = toks("[2]point");
        assert!(matches!(
            parse_array(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::Identifier, .. })
        ));
    }

    #[test]
    fn test_array_rejects_char_value() {
        let tokens = toks("[1]string{'c'}");
        assert!(matches!(
            parse_array(&tokens),
            Err(ParseError::UnexpectedToken { kind: TokenKind::CharLiteral, .. })
        ));
    }

    #[test]
    fn test_array_unclosed_initializer() {
        let tokens = toks("[3]i32{1, 2");
        assert_eq!(parse_array(&tokens).unwrap_err(), ParseError::UnexpectedEndOfInput);
    }

    /// A struct whose field type nests `levels` inline structs.
    fn nested_struct(levels: usize) -> String {
        let mut src = String::from("struct top { ");
        for i in 0..levels {
            src.push_str(&format!("f: struct s{} {{ ", i));
        }
        src.push_str(&"} ".repeat(levels + 1));
        src
    }

    #[test]
    fn test_nesting_up_to_limit() {
        let src = nested_struct(MAX_NESTING_DEPTH);
        let tokens = toks(&src);
        let (s, rest) = parse_struct(&tokens).unwrap();
        assert!(rest.is_empty());
        assert_eq!(s.name, "top");
    }

    #[test]
    fn test_nesting_past_limit_is_rejected() {
        let expected = ParseError::UnexpectedToken {
            kind: TokenKind::Keyword,
            text: "struct".into(),
        };
        for levels in [MAX_NESTING_DEPTH + 1, 50_000] {
            let src = nested_struct(levels);
            let tokens = toks(&src);
            assert_eq!(parse_struct(&tokens).unwrap_err(), expected, "{} levels", levels);
        }
    }

    #[test]
    fn test_nesting_counts_interfaces() {
        let mut src = String::from("struct top { ");
        for i in 0..=MAX_NESTING_DEPTH {
            src.push_str(&format!("f: interface i{} {{ func m(p: ", i));
        }
        src.push_str("u8");
        src.push_str(&") } ".repeat(MAX_NESTING_DEPTH + 1));
        src.push('}');
        let tokens = toks(&src);
        assert_eq!(
            parse_struct(&tokens).unwrap_err(),
            ParseError::UnexpectedToken {
                kind: TokenKind::Keyword,
                text: "interface".into(),
            }
        );
    }

    #[test]
    fn test_parse_declarations_threads_remainder() {
        let tokens = toks("struct a { x: i32 } enum b { c } [1]u8{7} interface d {}");
        let decls = parse_declarations(&tokens).unwrap();
        let kinds: Vec<&str> = decls.iter().map(Declaration::kind).collect();
        assert_eq!(kinds, ["struct", "enum", "array", "interface"]);
        assert_eq!(decls[3].name(), Some("d"));
        assert_eq!(decls[2].name(), None);
    }

    #[test]
    fn test_parse_declaration_rejects_unknown_leader() {
        let tokens = toks("func f()");
        assert_eq!(
            parse_declaration(&tokens).unwrap_err(),
            ParseError::UnexpectedToken {
                kind: TokenKind::Keyword,
                text: "func".into(),
            }
        );
        assert_eq!(parse_declaration(&[]).unwrap_err(), ParseError::UnexpectedEndOfInput);
    }
}
