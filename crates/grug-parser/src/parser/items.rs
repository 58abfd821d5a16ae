use grug_common::{Token, TokenKind, Type};

use crate::ast::{Argument, Declaration, Expr, ExprResult, GlobalVariable, HelperFn, OnFn, Statement};
use crate::error::ParseError;

use super::{Parser, SPACES_PER_INDENT};

impl<'t> Parser<'t> {
    /// Parses one top-level item, or a comment line standing between two
    /// items. Doesn't decide ordering or blank-line placement — `parse()`
    /// does that once it knows what came before and what this item is.
    pub(crate) fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        if self.peek_kind() == TokenKind::Comment {
            let text = self.bump().lexeme.clone();
            self.expect(TokenKind::Newline)?;
            return Ok(Declaration::Comment(text));
        }

        let name = self.expect_word()?;
        match self.peek_kind() {
            TokenKind::Colon => {
                let global = self.parse_global_variable_rest(name)?;
                Ok(Declaration::Global(global))
            }
            TokenKind::LParen if name.starts_with("on_") => {
                let on_fn = self.parse_on_fn_rest(name)?;
                Ok(Declaration::OnFn(on_fn))
            }
            TokenKind::LParen => {
                let helper_fn = self.parse_helper_fn_rest(name)?;
                if !self.called_names.contains(&helper_fn.name) {
                    return Err(self.error(format!(
                        "helper function '{}' is defined but never called before its definition",
                        helper_fn.name
                    )));
                }
                Ok(Declaration::HelperFn(helper_fn))
            }
            other => Err(self.error(format!("expected ':' or '(' after '{name}', found {other:?}"))),
        }
    }

    /// True when the upcoming tokens start a global-variable declaration,
    /// i.e. `word ':'`, looking past a single pending blank-line token if
    /// one hasn't been consumed yet. Used to decide blank-line placement
    /// one item ahead, without consuming anything.
    pub(crate) fn next_is_global(&self) -> bool {
        let offset = if self.peek_kind() == TokenKind::Newline { 1 } else { 0 };
        self.peek_kind_at(offset) == TokenKind::Word && self.peek_kind_at(offset + 1) == TokenKind::Colon
    }

    fn parse_global_variable_rest(&mut self, name: String) -> Result<GlobalVariable, ParseError> {
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Space)?;
        let (declared_type, declared_type_name) = self.parse_type_name()?;
        self.expect(TokenKind::Space)?;
        self.expect(TokenKind::Assign)?;
        self.expect(TokenKind::Space)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Newline)?;
        Ok(GlobalVariable {
            name,
            declared_type,
            declared_type_name,
            value,
        })
    }

    fn parse_type_name(&mut self) -> Result<(Type, Option<String>), ParseError> {
        let word = self.expect_word()?;
        let ty = Type::from_name(&word);
        let type_name = if ty == Type::Id { Some(word) } else { None };
        Ok((ty, type_name))
    }

    fn parse_parameters(&mut self) -> Result<Vec<Argument>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            loop {
                let name = self.expect_word()?;
                self.expect(TokenKind::Colon)?;
                self.expect(TokenKind::Space)?;
                let (ty, type_name) = self.parse_type_name()?;
                args.push(Argument { name, ty, type_name });
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

    fn parse_on_fn_rest(&mut self, name: String) -> Result<OnFn, ParseError> {
        let arguments = self.parse_parameters()?;
        self.expect(TokenKind::Space)?;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Newline)?;
        let body = self.parse_block(1)?;
        self.expect_block_indentation(0)?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Newline)?;
        Ok(OnFn { name, arguments, body })
    }

    fn parse_helper_fn_rest(&mut self, name: String) -> Result<HelperFn, ParseError> {
        let arguments = self.parse_parameters()?;
        let (return_type, return_type_name) = if self.peek_kind() == TokenKind::Colon {
            self.bump();
            self.expect(TokenKind::Space)?;
            let (ty, type_name) = self.parse_type_name()?;
            (Some(ty), type_name)
        } else {
            (None, None)
        };
        self.expect(TokenKind::Space)?;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Newline)?;
        let body = self.parse_block(1)?;
        self.expect_block_indentation(0)?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Newline)?;
        Ok(HelperFn {
            name,
            arguments,
            return_type,
            return_type_name,
            body,
        })
    }

    /// Parses the statements of a block at nesting `level` (1 = directly
    /// inside a function body), stopping just before the indentation and
    /// `}` that close it — the caller consumes those itself, since it
    /// already knows what level they belong to.
    pub(crate) fn parse_block(&mut self, level: usize) -> Result<Vec<Statement>, ParseError> {
        self.enter()?;
        let mut statements = Vec::new();
        while !self.at_block_end(level) {
            if self.peek_kind() == TokenKind::Newline {
                self.bump();
                statements.push(Statement::EmptyLine);
                continue;
            }
            self.expect_block_indentation(level)?;
            if self.peek_kind() == TokenKind::Comment {
                let text = self.bump().lexeme.clone();
                self.expect(TokenKind::Newline)?;
                statements.push(Statement::Comment(text));
                continue;
            }
            statements.push(self.parse_statement(level)?);
        }
        self.leave();
        if statements.is_empty() {
            return Err(self.error("a block can't be empty"));
        }
        Ok(statements)
    }

    fn at_block_end(&self, level: usize) -> bool {
        if self.peek_kind() == TokenKind::Eof {
            return true;
        }
        if level == 0 {
            return self.peek_kind() == TokenKind::RBrace;
        }
        let outer = level - 1;
        if outer == 0 {
            self.peek_kind() == TokenKind::RBrace
        } else {
            self.peek_kind() == TokenKind::Indentation
                && indentation_len(self.current()) == SPACES_PER_INDENT * outer
                && self.peek_kind_at(1) == TokenKind::RBrace
        }
    }

    fn expect_block_indentation(&mut self, level: usize) -> Result<(), ParseError> {
        if level == 0 {
            return Ok(());
        }
        let expected = SPACES_PER_INDENT * level;
        if self.peek_kind() == TokenKind::Indentation && indentation_len(self.current()) == expected {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("expected {expected} spaces of indentation")))
        }
    }

    fn parse_statement(&mut self, level: usize) -> Result<Statement, ParseError> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if_statement(level),
            TokenKind::While => self.parse_while_statement(level),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                self.bump();
                self.expect(TokenKind::Newline)?;
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.bump();
                self.expect(TokenKind::Newline)?;
                Ok(Statement::Continue)
            }
            TokenKind::Word => self.parse_variable_or_call_statement(),
            other => Err(self.error(format!("expected a statement, found {other:?}"))),
        }
    }

    fn parse_return_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Return)?;
        if self.peek_kind() == TokenKind::Newline {
            self.bump();
            Ok(Statement::Return(None))
        } else {
            self.expect(TokenKind::Space)?;
            let value = self.parse_expression()?;
            self.expect(TokenKind::Newline)?;
            Ok(Statement::Return(Some(value)))
        }
    }

    fn parse_variable_or_call_statement(&mut self) -> Result<Statement, ParseError> {
        let name = self.expect_word()?;
        match self.peek_kind() {
            TokenKind::Colon => {
                self.bump();
                self.expect(TokenKind::Space)?;
                let (ty, type_name) = self.parse_type_name()?;
                self.expect(TokenKind::Space)?;
                self.expect(TokenKind::Assign)?;
                self.expect(TokenKind::Space)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::Newline)?;
                Ok(Statement::Variable {
                    name,
                    declared_type: Some(ty),
                    declared_type_name: type_name,
                    value,
                })
            }
            TokenKind::Space if self.peek_kind_at(1) == TokenKind::Assign => {
                self.bump();
                self.bump();
                self.expect(TokenKind::Space)?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::Newline)?;
                Ok(Statement::Variable {
                    name,
                    declared_type: None,
                    declared_type_name: None,
                    value,
                })
            }
            TokenKind::LParen => {
                let args = self.parse_call_arguments()?;
                self.expect(TokenKind::Newline)?;
                self.called_names.insert(name.clone());
                Ok(Statement::Call(Expr::Call {
                    name,
                    args,
                    result: ExprResult::default(),
                }))
            }
            other => Err(self.error(format!(
                "expected ':', ' =', or '(' after identifier '{name}', found {other:?}"
            ))),
        }
    }

    fn parse_if_statement(&mut self, level: usize) -> Result<Statement, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::Space)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Space)?;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Newline)?;
        let if_body = self.parse_block(level + 1)?;
        self.expect_block_indentation(level)?;
        self.expect(TokenKind::RBrace)?;

        let else_body = if self.peek_kind() == TokenKind::Space && self.peek_kind_at(1) == TokenKind::Else {
            self.bump();
            self.bump();
            if self.peek_kind() == TokenKind::Space && self.peek_kind_at(1) == TokenKind::If {
                self.bump();
                vec![self.parse_if_statement(level)?]
            } else {
                self.expect(TokenKind::Space)?;
                self.expect(TokenKind::LBrace)?;
                self.expect(TokenKind::Newline)?;
                let body = self.parse_block(level + 1)?;
                self.expect_block_indentation(level)?;
                self.expect(TokenKind::RBrace)?;
                self.expect(TokenKind::Newline)?;
                body
            }
        } else {
            self.expect(TokenKind::Newline)?;
            Vec::new()
        };

        Ok(Statement::If {
            condition,
            if_body,
            else_body,
        })
    }

    fn parse_while_statement(&mut self, level: usize) -> Result<Statement, ParseError> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::Space)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Space)?;
        self.expect(TokenKind::LBrace)?;
        self.expect(TokenKind::Newline)?;
        let body = self.parse_block(level + 1)?;
        self.expect_block_indentation(level)?;
        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Newline)?;
        Ok(Statement::While { condition, body })
    }
}

fn indentation_len(tok: &Token) -> usize {
    tok.lexeme.chars().count()
}
