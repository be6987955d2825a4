//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! stmt_list ::= stmt*
//! stmt      ::= "input" IDENT
//!             | "output" expression
//!             | IDENT "=" expression
//!             | vartype IDENT "=" expression
//!             | "if" expression "then" stmt_list
//!                 ("elif" expression "then" stmt_list)*
//!                 ["else" stmt_list] "end" "if"
//!             | "loop" stmt_list "end" "loop"
//!             | "while" expression loop_body
//!             | "for" clause "," expression "," clause loop_body
//!             | "begin" stmt_list "end"
//! loop_body ::= "loop" stmt_list "end" "loop"
//! clause    ::= IDENT "=" expression | expression
//! vartype   ::= "int" | "real" | "bool" | "char"
//! ```
//!
//! Each statement is chosen by its leading token alone. A statement list has
//! no separators and ends at the first token that cannot start a statement.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};
use tracing::trace;

impl Parser {
    /// Parse statements until a token that cannot start one.
    pub(crate) fn parse_stmt_list(&mut self) -> Result<StmtListNode, SyntaxError> {
        let mut stmts = Vec::new();

        while self.starts_statement() {
            stmts.push(self.parse_statement()?);
        }

        Ok(StmtListNode::new(stmts))
    }

    fn starts_statement(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Input
                | TokenKind::Output
                | TokenKind::Ident(_)
                | TokenKind::Int
                | TokenKind::Real
                | TokenKind::Bool
                | TokenKind::Char
                | TokenKind::If
                | TokenKind::Loop
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Begin
        )
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, SyntaxError> {
        trace!(token = %self.peek(), at = %self.current_location(), "statement");

        match self.peek() {
            TokenKind::Input => self.parse_input_statement(),
            TokenKind::Output => self.parse_output_statement(),
            TokenKind::Ident(_) => Ok(Stmt::Assign(self.parse_assignment()?)),
            TokenKind::Int | TokenKind::Real | TokenKind::Bool | TokenKind::Char => {
                self.parse_declaration()
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Loop => Ok(Stmt::Loop(LoopNode {
                body: self.parse_loop_body()?,
            })),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Begin => self.parse_scope(),
            _ => Err(self.error(format!("Expected statement, found {}", self.peek()))),
        }
    }

    /// Parse input statement: input IDENT
    fn parse_input_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::Input, "Expected 'input'")?;
        let var = self.expect_identifier("after 'input'")?;
        Ok(Stmt::Input(InputNode { var }))
    }

    /// Parse output statement: output expression
    fn parse_output_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::Output, "Expected 'output'")?;
        let arg = self.parse_expression()?;
        Ok(Stmt::Output(OutputNode { arg }))
    }

    /// Parse assignment: IDENT = expression
    fn parse_assignment(&mut self) -> Result<AssignNode, SyntaxError> {
        let var = self.expect_identifier("as assignment target")?;
        self.expect_token(&TokenKind::Eq, "Expected '=' after assignment target")?;
        let val = self.parse_expression()?;
        Ok(AssignNode { var, val })
    }

    /// Parse declaration: vartype IDENT = expression
    fn parse_declaration(&mut self) -> Result<Stmt, SyntaxError> {
        let vartype = match self.peek() {
            TokenKind::Int => Vartype::Int,
            TokenKind::Real => Vartype::Real,
            TokenKind::Bool => Vartype::Bool,
            TokenKind::Char => Vartype::Char,
            _ => return Err(self.error(format!("Expected type name, found {}", self.peek()))),
        };
        self.advance()?;

        let assign = self.parse_assignment()?;
        Ok(Stmt::Declare(DeclareNode {
            vartype: VartypeNode { vartype },
            assign,
        }))
    }

    /// Parse if statement with optional elif and else branches
    fn parse_if_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::If, "Expected 'if'")?;
        let cond = self.parse_expression()?;
        self.expect_token(&TokenKind::Then, "Expected 'then' after if condition")?;
        let then_branch = self.parse_stmt_list()?;

        let mut elif_branches = Vec::new();
        while self.match_token(&TokenKind::Elif)? {
            let cond = self.parse_expression()?;
            self.expect_token(&TokenKind::Then, "Expected 'then' after elif condition")?;
            let body = self.parse_stmt_list()?;
            elif_branches.push(ElifBranch { cond, body });
        }

        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(self.parse_stmt_list()?)
        } else {
            None
        };

        self.expect_end(&TokenKind::If)?;

        Ok(Stmt::If(IfNode {
            cond,
            then_branch,
            elif_branches,
            else_branch,
        }))
    }

    /// Parse `loop stmt_list end loop`, shared by all loop forms
    fn parse_loop_body(&mut self) -> Result<StmtListNode, SyntaxError> {
        self.expect_token(&TokenKind::Loop, "Expected 'loop'")?;
        let body = self.parse_stmt_list()?;
        self.expect_end(&TokenKind::Loop)?;
        Ok(body)
    }

    /// Parse while statement: while expression loop ... end loop
    fn parse_while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::While, "Expected 'while'")?;
        let cond = self.parse_expression()?;
        let body = self.parse_loop_body()?;
        Ok(Stmt::While(WhileNode { cond, body }))
    }

    /// Parse for statement: for init, cond, incr loop ... end loop
    fn parse_for_statement(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::For, "Expected 'for'")?;

        let init = self.parse_for_clause()?;
        self.expect_token(&TokenKind::Comma, "Expected ',' after for initializer")?;

        let cond = self.parse_expression()?;
        self.expect_token(&TokenKind::Comma, "Expected ',' after for condition")?;

        let incr = self.parse_for_clause()?;
        let body = self.parse_loop_body()?;

        Ok(Stmt::For(ForNode {
            init,
            cond,
            incr,
            body,
        }))
    }

    /// A for clause is an assignment when an identifier is followed by `=`,
    /// otherwise a plain expression.
    fn parse_for_clause(&mut self) -> Result<ForClause, SyntaxError> {
        if matches!(self.peek(), TokenKind::Ident(_))
            && matches!(self.peek_ahead()?, TokenKind::Eq)
        {
            return Ok(ForClause::Assign(self.parse_assignment()?));
        }
        Ok(ForClause::Expr(self.parse_expression()?))
    }

    /// Parse scope: begin stmt_list end
    fn parse_scope(&mut self) -> Result<Stmt, SyntaxError> {
        self.expect_token(&TokenKind::Begin, "Expected 'begin'")?;
        let body = self.parse_stmt_list()?;
        self.expect_token(&TokenKind::End, "Expected 'end' to close 'begin' block")?;
        Ok(Stmt::Scope(ScopeNode { body }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse;

    fn single(source: &str) -> Stmt {
        let mut program = parse(source).unwrap();
        assert_eq!(program.len(), 1, "expected one statement in {:?}", source);
        program.stmts.remove(0)
    }

    fn assign(name: &str, value: f64) -> Stmt {
        Stmt::Assign(AssignNode::new(name, Expr::num(value)))
    }

    #[test]
    fn test_parse_declaration() {
        match single("real x = 2.5") {
            Stmt::Declare(DeclareNode { vartype, assign }) => {
                assert_eq!(vartype.vartype, Vartype::Real);
                assert_eq!(assign, AssignNode::new("x", Expr::num(2.5)));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_elif_else() {
        let stmt = single("if a then b = 1 elif c then b = 2 else b = 3 end if");
        let expected = Stmt::If(IfNode {
            cond: Expr::ident("a"),
            then_branch: StmtListNode::new(vec![assign("b", 1.0)]),
            elif_branches: vec![ElifBranch {
                cond: Expr::ident("c"),
                body: StmtListNode::new(vec![assign("b", 2.0)]),
            }],
            else_branch: Some(StmtListNode::new(vec![assign("b", 3.0)])),
        });
        assert_eq!(stmt, expected);
    }

    #[test]
    fn test_parse_loop_forms() {
        assert!(matches!(single("loop x = 1 end loop"), Stmt::Loop(_)));
        assert!(matches!(single("while a loop end loop"), Stmt::While(_)));
        assert!(matches!(single("begin end"), Stmt::Scope(_)));
    }

    #[test]
    fn test_parse_for_clauses() {
        match single("for i = 0, i < 10, i = i + 1 loop end loop") {
            Stmt::For(ForNode { init, cond, incr, body }) => {
                assert_eq!(init, ForClause::Assign(AssignNode::new("i", Expr::num(0.0))));
                assert_eq!(
                    cond,
                    Expr::binop(BinOp::Lt, Expr::ident("i"), Expr::num(10.0))
                );
                assert!(matches!(incr, ForClause::Assign(_)));
                assert!(body.is_empty());
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_end_keywords_may_be_split_by_comments() {
        let stmt = single("loop x = 1 end /* closes */\n loop");
        assert!(matches!(stmt, Stmt::Loop(_)));
    }

    #[test]
    fn test_scope_followed_by_if() {
        let program = parse("begin end if a then end if").unwrap();
        assert!(matches!(program.stmts[0], Stmt::Scope(_)));
        assert!(matches!(program.stmts[1], Stmt::If(_)));
    }

    #[test]
    fn test_missing_then() {
        let err = parse("if a b = 1 end if").unwrap_err();
        assert!(err.message.contains("'then'"), "{}", err.message);
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn test_wrong_closing_keyword() {
        let err = parse("while a loop end if").unwrap_err();
        assert!(err.message.contains("'loop' after 'end'"), "{}", err.message);
        assert_eq!(err.offset(), 17);
    }

    #[test]
    fn test_declaration_requires_initializer() {
        let err = parse("int x").unwrap_err();
        assert!(err.message.contains("'='"), "{}", err.message);
    }
}
