//! Statement and declaration parsing.

use std::rc::Rc;

use flint_ir::{Expr, FunctionDecl, LiteralValue, Stmt, TokenKind};
use tracing::trace;

use crate::error::ParseResult;
use crate::Parser;

/// Parameter lists are capped; exceeding the cap is reported but not fatal.
const MAX_PARAMS: usize = 255;

impl Parser<'_> {
    /// function → IDENTIFIER `(` parameters? `)` block
    ///
    /// The `fn` keyword is already consumed by `declaration`.
    pub(crate) fn function_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_ident("Expect function name.")?;
        self.consume(&TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    let current = self.cursor.current().clone();
                    self.report_non_fatal(&current, "Can't have more than 255 parameters.");
                }
                params.push(self.consume_ident("Expect parameter name.")?);
                if !self.cursor.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.consume(&TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.block_statements()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    /// var-declaration → IDENTIFIER ( `=` expression )? `;`
    ///
    /// The `var` keyword is already consumed by `declaration`.
    pub(crate) fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_ident("Expect variable name.")?;

        let initializer = if self.cursor.match_kind(&TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            &TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    pub(crate) fn statement(&mut self) -> ParseResult<Stmt> {
        trace!(token = ?self.cursor.current().kind, "statement");

        if self.cursor.match_kind(&TokenKind::For) {
            return self.for_statement();
        }
        if self.cursor.match_kind(&TokenKind::If) {
            return self.if_statement();
        }
        if self.cursor.match_kind(&TokenKind::While) {
            return self.while_statement();
        }
        if self.cursor.match_kind(&TokenKind::Print) {
            return self.print_statement();
        }
        if self.cursor.match_kind(&TokenKind::Return) {
            return self.return_statement();
        }
        if self.cursor.match_kind(&TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block_statements()?));
        }
        self.expression_statement()
    }

    /// for-stmt → `(` ( var-decl | expr-stmt | `;` ) expr? `;` expr? `)` stmt
    ///
    /// Desugared at parse time into a `Block` wrapping the initializer and a
    /// `While` whose condition defaults to `true` and whose body appends the
    /// increment.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.cursor.match_kind(&TokenKind::Semicolon) {
            None
        } else if self.cursor.match_kind(&TokenKind::Var) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.cursor.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }
        let condition = condition.unwrap_or(Expr::Literal(LiteralValue::Bool(true)));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(&TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.cursor.match_kind(&TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(&TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.cursor.previous().clone();
        let value = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(&TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    /// The statements of a `{ ... }` block. The opening brace is already
    /// consumed. Declarations inside the block recover independently, so an
    /// error on one line doesn't lose the rest of the block.
    pub(crate) fn block_statements(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.cursor.check(&TokenKind::RightBrace) && !self.cursor.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.consume(&TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }
}
