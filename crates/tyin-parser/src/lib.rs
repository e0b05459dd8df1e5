//! Lexer and parser for the tyin type inference engine.
//!
//! This crate provides:
//! - `Lexer` - hand-written tokenizer for the source language
//! - `Parser` - recursive-descent parser with statement-boundary recovery
//! - `ast` - the node-id-carrying AST consumed by `tyin-infer`

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{NodeId, Program};
pub use parser::{ParseResult, Parser};

/// Parse a source file. Errors are collected in the result's
/// diagnostics; the returned program covers whatever parsed.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse_program()
}
