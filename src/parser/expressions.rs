//! Expression parsing implementation
//!
//! Expressions are layered by precedence, loosest first:
//!
//! ```text
//! expression     ::= additive (("<" | "<=" | ">" | ">=" | "==" | "!=") additive)*
//! additive       ::= multiplicative (("+" | "-") multiplicative)*
//! multiplicative ::= primary (("*" | "/") primary)*
//! primary        ::= IDENT | NUMBER | "(" expression ")"
//! ```
//!
//! Every level collects a flat chain `t0 op1 t1 op2 t2 ...` and folds it
//! left to right, so `1 - 2 - 3` becomes `(1 - 2) - 3`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

type Operand = fn(&mut Parser) -> Result<Expr, SyntaxError>;

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_comparison()
    }

    /// Parse comparison (< <= > >= == !=)
    fn parse_comparison(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_binary_chain(Parser::parse_additive, |kind| match kind {
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::Ne),
            _ => None,
        })
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_binary_chain(Parser::parse_multiplicative, |kind| match kind {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    /// Parse multiplicative (* /)
    fn parse_multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_binary_chain(Parser::parse_primary, |kind| match kind {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            _ => None,
        })
    }

    /// Match `operand (op operand)*` and fold the chain left to right.
    fn parse_binary_chain(
        &mut self,
        operand: Operand,
        operator: fn(&TokenKind) -> Option<BinOp>,
    ) -> Result<Expr, SyntaxError> {
        let first = operand(self)?;

        let mut rest = Vec::new();
        while let Some(op) = operator(self.peek()) {
            self.advance()?;
            rest.push((op, operand(self)?));
        }

        Ok(fold_left(first, rest))
    }

    /// Parse primary: identifier, number, or parenthesized expression
    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek() {
            TokenKind::Ident(_) => {
                let ident = self.expect_identifier("in expression")?;
                Ok(Expr::Ident(ident))
            }
            TokenKind::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expr::num(value))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect_token(&TokenKind::RParen, "Expected ')' after expression")?;
                Ok(expr)
            }
            TokenKind::Plus | TokenKind::Minus => self.parse_signed_number(),
            _ => Err(self.error(format!(
                "Expected identifier, number or '(', found {}",
                self.peek()
            ))),
        }
    }

    /// A sign directly touching a number literal (`-1`, `+2.5`) is part of the
    /// literal. With anything in between it is not a valid primary.
    fn parse_signed_number(&mut self) -> Result<Expr, SyntaxError> {
        let sign_loc = self.current_location();
        let negative = matches!(self.peek(), TokenKind::Minus);

        let adjacent = self.peek_ahead_location()?.offset == sign_loc.offset + 1;
        let literal = match self.peek_ahead()? {
            TokenKind::Number(value) if adjacent => Some(*value),
            _ => None,
        };

        if let Some(value) = literal {
            self.advance()?; // sign
            self.advance()?; // number
            return Ok(Expr::num(if negative { -value } else { value }));
        }

        Err(self.error(format!(
            "Expected identifier, number or '(', found {}",
            self.peek()
        )))
    }
}

/// Fold `first (op, term)*` into left-nested binary nodes.
pub(crate) fn fold_left(first: Expr, rest: Vec<(BinOp, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |left, (op, right)| Expr::binop(op, left, right))
}
