//! Expression parsing: precedence climbing, lowest binding first.
//!
//! assignment → or → and → equality → comparison → term → factor → unary
//! → call → primary. All binary operators are left-associative; assignment
//! is right-associative.

use flint_ir::{Expr, LiteralValue, TokenKind};
use tracing::trace;

use crate::error::ParseResult;
use crate::Parser;

/// Argument lists are capped; exceeding the cap is reported but not fatal.
const MAX_CALL_ARGS: usize = 255;

impl Parser<'_> {
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// assignment → or ( `=` assignment )?
    ///
    /// The left side must have parsed as a plain variable reference;
    /// anything else reports "Invalid assignment target." without aborting.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or_expr()?;

        if self.cursor.match_kind(&TokenKind::Equal) {
            let equals = self.cursor.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                other => {
                    self.report_non_fatal(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    /// or → and ( `or` and )*
    fn or_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and_expr()?;
        while self.cursor.match_kind(&TokenKind::Or) {
            let operator = self.cursor.previous().clone();
            let right = self.and_expr()?;
            expr = Expr::Logical {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// and → equality ( `and` equality )*
    fn and_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;
        while self.cursor.match_kind(&TokenKind::And) {
            let operator = self.cursor.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// equality → comparison ( ( `!=` | `==` ) comparison )*
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        while let Some(operator) = self
            .cursor
            .match_any(&[TokenKind::BangEqual, TokenKind::EqualEqual])
        {
            let right = self.comparison()?;
            expr = Expr::Binary {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// comparison → term ( ( `>` | `>=` | `<` | `<=` ) term )*
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        while let Some(operator) = self.cursor.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let right = self.term()?;
            expr = Expr::Binary {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// term → factor ( ( `-` | `+` ) factor )*
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        while let Some(operator) = self.cursor.match_any(&[TokenKind::Minus, TokenKind::Plus]) {
            let right = self.factor()?;
            expr = Expr::Binary {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// factor → unary ( ( `*` | `/` ) unary )*
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        while let Some(operator) = self.cursor.match_any(&[TokenKind::Star, TokenKind::Slash]) {
            let right = self.unary()?;
            expr = Expr::Binary {
                operator,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// unary → ( `!` | `-` ) unary | call
    fn unary(&mut self) -> ParseResult<Expr> {
        if let Some(operator) = self.cursor.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
            });
        }
        self.call()
    }

    /// call → primary ( `(` arguments? `)` )*
    ///
    /// Postfix chaining allows `f()(x)` style invocation.
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while self.cursor.match_kind(&TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    /// Parse the argument list and closing paren of a call.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();
        if !self.cursor.check(&TokenKind::RightParen) {
            loop {
                if arguments.len() >= MAX_CALL_ARGS {
                    let current = self.cursor.current().clone();
                    self.report_non_fatal(&current, "Can't have more than 255 arguments.");
                }
                arguments.push(self.expression()?);
                if !self.cursor.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let paren = self.consume(&TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    /// primary → literal | identifier | `(` expression `)`
    fn primary(&mut self) -> ParseResult<Expr> {
        trace!(token = ?self.cursor.current().kind, "primary");

        if self.cursor.match_kind(&TokenKind::False) {
            return Ok(Expr::Literal(LiteralValue::Bool(false)));
        }
        if self.cursor.match_kind(&TokenKind::True) {
            return Ok(Expr::Literal(LiteralValue::Bool(true)));
        }
        if self.cursor.match_kind(&TokenKind::Nil) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        let current = self.cursor.current().kind.clone();
        match current {
            TokenKind::Number(bits) => {
                self.cursor.advance();
                return Ok(Expr::Literal(LiteralValue::Number(f64::from_bits(bits))));
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                return Ok(Expr::Literal(LiteralValue::Str(name)));
            }
            TokenKind::Ident(_) => {
                let name = self.cursor.advance().clone();
                return Ok(Expr::Variable { name });
            }
            _ => {}
        }

        if self.cursor.match_kind(&TokenKind::LeftParen) {
            let inner = self.expression()?;
            self.consume(&TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(inner)));
        }

        Err(self.error_at_current("Expect expression."))
    }
}
