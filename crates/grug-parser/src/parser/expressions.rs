use grug_common::TokenKind;

use crate::ast::{BinaryOp, Expr, ExprResult, UnaryOp};
use crate::error::ParseError;

use super::Parser;

impl<'t> Parser<'t> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_or();
        self.leave();
        result
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == TokenKind::Space && self.peek_kind_at(1) == TokenKind::Or {
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.peek_kind() == TokenKind::Space && self.peek_kind_at(1) == TokenKind::And {
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match (self.peek_kind(), self.peek_kind_at(1)) {
                (TokenKind::Space, TokenKind::EqEq) => BinaryOp::Eq,
                (TokenKind::Space, TokenKind::NotEq) => BinaryOp::NotEq,
                _ => break,
            };
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match (self.peek_kind(), self.peek_kind_at(1)) {
                (TokenKind::Space, TokenKind::GtEq) => BinaryOp::Ge,
                (TokenKind::Space, TokenKind::LtEq) => BinaryOp::Le,
                (TokenKind::Space, TokenKind::Gt) => BinaryOp::Gt,
                (TokenKind::Space, TokenKind::Lt) => BinaryOp::Lt,
                _ => break,
            };
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match (self.peek_kind(), self.peek_kind_at(1)) {
                (TokenKind::Space, TokenKind::Plus) => BinaryOp::Plus,
                (TokenKind::Space, TokenKind::Minus) => BinaryOp::Minus,
                _ => break,
            };
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match (self.peek_kind(), self.peek_kind_at(1)) {
                (TokenKind::Space, TokenKind::Star) => BinaryOp::Mul,
                (TokenKind::Space, TokenKind::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            self.bump();
            self.expect(TokenKind::Space)?;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::Not => {
                self.bump();
                self.expect(TokenKind::Space)?;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                    result: ExprResult::default(),
                })
            }
            TokenKind::Minus => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                    result: ExprResult::default(),
                })
            }
            _ => self.parse_call_or_primary(),
        }
    }

    fn parse_call_or_primary(&mut self) -> Result<Expr, ParseError> {
        if self.peek_kind() == TokenKind::Word && self.peek_kind_at(1) == TokenKind::LParen {
            let name = self.expect_word()?;
            let args = self.parse_call_arguments()?;
            self.called_names.insert(name.clone());
            return Ok(Expr::Call {
                name,
                args,
                result: ExprResult::default(),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::True => {
                self.bump();
                Ok(Expr::True {
                    result: ExprResult::default(),
                })
            }
            TokenKind::False => {
                self.bump();
                Ok(Expr::False {
                    result: ExprResult::default(),
                })
            }
            TokenKind::Number => {
                let lexeme = self.bump().lexeme.clone();
                let value = str_to_number(&lexeme).map_err(|e| self.error(e))?;
                Ok(Expr::Number {
                    value,
                    result: ExprResult::default(),
                })
            }
            TokenKind::String => {
                let lexeme = self.bump().lexeme.clone();
                let value = lexeme[1..lexeme.len() - 1].to_string();
                Ok(Expr::String {
                    value,
                    result: ExprResult::default(),
                })
            }
            TokenKind::Word => {
                let name = self.bump().lexeme.clone();
                Ok(Expr::Identifier {
                    name,
                    result: ExprResult::default(),
                })
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Parenthesized {
                    inner: Box::new(inner),
                    result: ExprResult::default(),
                })
            }
            other => Err(self.error(format!("expected an expression, found {other:?}"))),
        }
    }

    /// `(expr, expr, ...)`, shared by call statements and call expressions.
    pub(crate) fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                args.push(self.parse_expression()?);
                if self.peek_kind() == TokenKind::Comma {
                    self.bump();
                    self.expect(TokenKind::Space)?;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        result: ExprResult::default(),
    }
}

/// Parses a number literal the way the tokenizer hands it over: digits,
/// at most one decimal point. Rejects values that overflow `f64`.
fn str_to_number(lexeme: &str) -> Result<f64, String> {
    match lexeme.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("number literal '{lexeme}' is out of range")),
        Err(_) => Err(format!("'{lexeme}' is not a valid number")),
    }
}
