//! Eureka: lexer and parser front end for a small schema definition language.
//!
//! A schema describes data and service shapes: structs, interfaces with
//! method signatures, enums and fixed-size typed arrays. This crate turns
//! source text into an AST for downstream tooling such as code generators
//! or RPC stub emitters.
//!
//! # Quick Start
//!
//! ```rust
//! use eureka::parser;
//! use eureka::parser::ast::{Declaration, TypeRef};
//!
//! let decls = parser::parse(r#"
//!     struct person {
//!         name: string
//!         scores: [3]u8{90, 85}
//!     }
//!
//!     enum role: u8 { admin member }
//! "#).unwrap();
//!
//! assert_eq!(decls.len(), 2);
//! match &decls[0] {
//!     Declaration::Struct(s) => {
//!         assert_eq!(s.name, "person");
//!         assert_eq!(s.fields[0].ty, TypeRef::Named("string".into()));
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! The individual stages are public as well: [`parser::lexer::tokenize`]
//! produces tokens, [`parser::lexer::strip_whitespace`] filters them and the
//! productions in [`parser::grammar`] each return a node plus the unconsumed
//! tokens, so callers can drive parsing declaration by declaration.

pub mod error;
pub mod parser;

pub use error::{Error, LexError, ParseError};
pub use parser::ast::Declaration;
pub use parser::token::{Token, TokenKind};
