//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, cursor helpers, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: statement rules (`input`, `if`, `for`, `begin`, ...)
//! - `expressions`: expression rules layered by precedence
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! Tokens are pulled from the [`Lexer`] on demand. The cursor holds the
//! current token plus at most one buffered lookahead token.

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use thiserror::Error;
use tracing::debug;

/// Raised for any lexical or grammatical failure. Parsing stops at the first
/// one; no partial tree is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("syntax error at {location}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: SourceLocation,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// Character offset of the failure in the source text.
    pub fn offset(&self) -> usize {
        self.location.offset
    }
}

/// Parse a complete mel program into its root statement list.
pub fn parse(source: &str) -> Result<StmtListNode, SyntaxError> {
    Parser::new(source)?.parse_program()
}

/// Recursive descent parser for mel
pub struct Parser {
    lexer: Lexer,
    current: Token,
    lookahead: Option<Token>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            lookahead: None,
        })
    }

    /// Parse the entire program: a statement list followed by end of input.
    pub fn parse_program(&mut self) -> Result<StmtListNode, SyntaxError> {
        let result = self.parse_to_end();

        match &result {
            Ok(program) => debug!(statements = program.len(), "parsed program"),
            Err(err) => debug!(
                offset = err.offset(),
                line = err.location.line,
                column = err.location.column,
                "parse failed: {}",
                err.message
            ),
        }

        result
    }

    fn parse_to_end(&mut self) -> Result<StmtListNode, SyntaxError> {
        let program = self.parse_stmt_list()?;

        if !self.is_at_end() {
            return Err(self.error(format!(
                "Expected statement or end of input, found {}",
                self.peek()
            )));
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    fn fill_lookahead(&mut self) -> Result<&Token, SyntaxError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek_ahead(&mut self) -> Result<&TokenKind, SyntaxError> {
        Ok(&self.fill_lookahead()?.kind)
    }

    /// Location of the token after the current one.
    pub(crate) fn peek_ahead_location(&mut self) -> Result<SourceLocation, SyntaxError> {
        Ok(self.fill_lookahead()?.location)
    }

    /// Consume the current token and return it.
    pub(crate) fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> Result<bool, SyntaxError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.current.location
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.current_location())
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        message: &str,
    ) -> Result<(), SyntaxError> {
        if self.check(kind) {
            self.advance()?;
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<IdentNode, SyntaxError> {
        if let TokenKind::Ident(name) = self.peek() {
            let node = IdentNode::new(name.clone());
            self.advance()?;
            Ok(node)
        } else {
            Err(self.error(format!(
                "Expected identifier {ctx}, found {}",
                self.peek()
            )))
        }
    }

    /// Consume `end` followed by the keyword that closes the construct.
    pub(crate) fn expect_end(&mut self, closing: &TokenKind) -> Result<(), SyntaxError> {
        self.expect_token(
            &TokenKind::End,
            &format!("Expected 'end {}'", keyword_text(closing)),
        )?;
        self.expect_token(closing, &format!("Expected {} after 'end'", closing))
    }
}

fn keyword_text(kind: &TokenKind) -> String {
    kind.to_string().trim_matches('\'').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_program() {
        let program = parse("input a output a").unwrap();

        assert_eq!(program.len(), 2);
        match &program.stmts[0] {
            Stmt::Input(InputNode { var }) => assert_eq!(var.name, "a"),
            other => panic!("Expected input statement, got {:?}", other),
        }
        assert!(matches!(program.stmts[1], Stmt::Output(_)));
    }

    #[test]
    fn test_parse_empty_program() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  // only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse("input a )").unwrap_err();
        assert_eq!(err.offset(), 8);
        assert!(err.message.contains("end of input"), "{}", err.message);
    }

    #[test]
    fn test_lookahead_does_not_skip_tokens() {
        let mut parser = Parser::new("a = 1").unwrap();

        assert_eq!(parser.peek_ahead().unwrap(), &TokenKind::Eq);
        assert_eq!(parser.advance().unwrap().kind, TokenKind::Ident("a".into()));
        assert_eq!(parser.peek(), &TokenKind::Eq);
        parser.advance().unwrap();
        assert_eq!(parser.peek(), &TokenKind::Number(1.0));
    }

    #[test]
    fn test_error_display() {
        let err = parse("if a then b = 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error at line 1, column 16: Expected 'end if', found end of input"
        );
    }
}
