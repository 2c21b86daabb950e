pub mod token;
pub mod lexer;
pub mod ast;
pub mod grammar;

use crate::error::Result;
use self::ast::Declaration;

/// Parse eureka schema text into its top-level declarations.
///
/// This is the main entry point for the parser module: it lexes the whole
/// source, drops whitespace and parses declarations until the tokens run
/// out, stopping at the first error.
pub fn parse<S: AsRef<[u8]> + ?Sized>(source: &S) -> Result<Vec<Declaration>> {
    let tokens = lexer::tokenize_significant(source)?;
    let decls = grammar::parse_declarations(&tokens)?;
    tracing::trace!(declarations = decls.len(), "parsed source");
    Ok(decls)
}
