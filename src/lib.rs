//! # Introduction
//!
//! `mel` is the front end of a small imperative teaching language. It parses
//! source text into an abstract syntax tree and renders that tree as a
//! box-drawing diagram.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → tree lines
//! ```
//!
//! 1. [`parser::lexer`] pulls tokens on demand, skipping whitespace plus
//!    `/* ... */` and `// ...` comments before each one.
//! 2. [`parser::parse`] runs the recursive descent grammar and either returns
//!    the program's root [`parser::ast::StmtListNode`] or a
//!    [`parser::SyntaxError`]. There is no partial result.
//! 3. [`parser::ast::AstNode::tree`] renders any node as lines of text.
//!
//! ## Language summary
//!
//! Statements: `input`, `output`, assignment, typed declarations
//! (`int`, `real`, `bool`, `char`), `if/elif/else ... end if`,
//! `loop ... end loop`, `while`, `for`, `begin ... end`.
//! Expressions: numbers, identifiers, parentheses, `* /`, `+ -`, and the
//! comparisons `< <= > >= == !=`.

pub mod parser;

pub use parser::ast::{AstNode, NodeCensus};
pub use parser::{parse, SyntaxError};
