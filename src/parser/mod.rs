//! mel source code parser
//!
//! This module transforms mel source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization with comment and whitespace skipping
//! - [`parse`]: Parser struct, error type and entry point
//! - [`ast`]: AST node definitions, tree rendering and traversal
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser. Binary operators are handled by
//! layering one rule per precedence level, each folding its chain left to
//! right. No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse, Parser, SyntaxError};
