use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use grug_common::Type;
use grug_parser::ast::{BinaryOp, CompiledFile, Expr, Statement, UnaryOp};

use crate::engine::GrugRuntime;
use crate::error::RuntimeError;
use crate::flow::Flow;
use crate::value::Value;

/// Interpreter depth ceiling: the on-function body itself is depth 0,
/// each helper-function call nests one deeper.
pub const MAX_DEPTH: usize = 100;

pub(crate) struct Interpreter<'a> {
    pub(crate) runtime: &'a GrugRuntime,
    pub(crate) file: &'a CompiledFile,
    pub(crate) globals: &'a mut FxHashMap<String, Value>,
    pub(crate) locals: Vec<FxHashMap<String, Value>>,
    pub(crate) start_time: Instant,
    pub(crate) time_limit: Duration,
    pub(crate) current_mod: &'a str,
    pub(crate) on_fn_name: &'a str,
    pub(crate) file_path: &'a str,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn exec_statements(&mut self, statements: &[Statement]) -> Result<Flow, RuntimeError> {
        for stmt in statements {
            let flow = self.exec_statement(stmt)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_statement(&mut self, stmt: &Statement) -> Result<Flow, RuntimeError> {
        match stmt {
            Statement::Variable { name, declared_type, value, .. } => {
                let v = self.eval_expr(value)?;
                if declared_type.is_some() {
                    self.locals.last_mut().expect("at least one frame").insert(name.clone(), v);
                } else {
                    self.assign_existing(name, v);
                }
                Ok(Flow::Normal)
            }
            Statement::Call(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            Statement::If { condition, if_body, else_body } => {
                let cond = self.eval_expr(condition)?.as_bool().expect("condition is bool");
                self.locals.push(FxHashMap::default());
                let flow = if cond {
                    self.exec_statements(if_body)
                } else {
                    self.exec_statements(else_body)
                };
                self.locals.pop();
                flow
            }
            Statement::While { condition, body } => {
                loop {
                    self.check_time_limit()?;
                    let cond = self.eval_expr(condition)?.as_bool().expect("condition is bool");
                    if !cond {
                        break;
                    }
                    self.locals.push(FxHashMap::default());
                    let flow = self.exec_statements(body);
                    self.locals.pop();
                    match flow? {
                        Flow::Broke => break,
                        Flow::Returned(v) => return Ok(Flow::Returned(v)),
                        Flow::Normal | Flow::Continued => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::Return(value) => {
                let v = match value {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(Flow::Returned(v))
            }
            Statement::Break => Ok(Flow::Broke),
            Statement::Continue => Ok(Flow::Continued),
            Statement::Comment(_) | Statement::EmptyLine => Ok(Flow::Normal),
        }
    }

    /// Walks every local scope from innermost to outermost, then the
    /// globals, and overwrites the first binding found. Reassigning a
    /// name the propagator already resolved always finds one.
    fn assign_existing(&mut self, name: &str, value: Value) {
        for scope in self.locals.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        self.globals.insert(name.to_string(), value);
    }

    fn lookup(&self, name: &str) -> Value {
        for scope in self.locals.iter().rev() {
            if let Some(v) = scope.get(name) {
                return v.clone();
            }
        }
        self.globals
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("'{name}' resolved by the type propagator but missing at runtime"))
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::True { .. } => Ok(Value::Bool(true)),
            Expr::False { .. } => Ok(Value::Bool(false)),
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::String { value, result } => Ok(Value::String(self.format_string_literal(value, result.ty))),
            Expr::Identifier { name, .. } => Ok(self.lookup(name)),
            Expr::Parenthesized { inner, .. } => self.eval_expr(inner),
            Expr::Unary { op, operand, .. } => {
                let v = self.eval_expr(operand)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!v.as_bool().expect("unary 'not' operand is bool")),
                    UnaryOp::Negate => Value::Number(-v.as_number().expect("unary '-' operand is number")),
                })
            }
            Expr::Binary { op: BinaryOp::And, left, right, .. } => {
                let l = self.eval_expr(left)?.as_bool().expect("'and' operand is bool");
                if !l {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(right)?.as_bool().expect("'and' operand is bool")))
            }
            Expr::Binary { op: BinaryOp::Or, left, right, .. } => {
                let l = self.eval_expr(left)?.as_bool().expect("'or' operand is bool");
                if l {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(right)?.as_bool().expect("'or' operand is bool")))
            }
            Expr::Binary { op, left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(eval_binary(*op, l, r))
            }
            Expr::Call { name, args, .. } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                self.call(name, &values)
            }
        }
    }

    /// Resource and entity literals are plain strings by the time the
    /// type propagator has validated them; they're formatted once here.
    fn format_string_literal(&self, raw: &str, ty: Option<Type>) -> String {
        match ty {
            Some(Type::Resource) => format!("{}/{}", self.current_mod, raw),
            Some(Type::Entity) => {
                if raw.contains(':') {
                    raw.to_string()
                } else {
                    format!("{}:{}", self.current_mod, raw)
                }
            }
            _ => raw.to_string(),
        }
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.check_time_limit()?;

        if let Some(helper) = self.file.helper_fns.iter().find(|h| h.name == name) {
            let depth = self.runtime.push_call_frame();
            if depth > MAX_DEPTH {
                self.runtime.pop_call_frame();
                return Err(RuntimeError::stack_overflow(name, self.on_fn_name, self.file_path));
            }
            let mut frame = FxHashMap::default();
            for (param, value) in helper.arguments.iter().zip(args.iter()) {
                frame.insert(param.name.clone(), value.clone());
            }
            self.locals.push(frame);
            let flow = self.exec_statements(&helper.body);
            self.locals.pop();
            self.runtime.pop_call_frame();
            return match flow? {
                Flow::Returned(v) => Ok(v.unwrap_or(Value::Bool(false))),
                _ => Ok(Value::Bool(false)),
            };
        }

        match self.runtime.call_game_fn(name, args) {
            Ok(v) => Ok(v.unwrap_or(Value::Bool(false))),
            Err(message) => {
                let err = RuntimeError::game_fn_error(name, &message, self.on_fn_name, self.file_path);
                self.runtime.report_error(&err);
                Err(err)
            }
        }
    }

    fn check_time_limit(&self) -> Result<(), RuntimeError> {
        if self.start_time.elapsed() > self.time_limit {
            let err = RuntimeError::time_limit_exceeded(self.on_fn_name, self.file_path);
            self.runtime.report_error(&err);
            return Err(err);
        }
        Ok(())
    }
}

/// Plain IEEE-754 arithmetic: division by zero produces `inf`/`nan`, not
/// a trapped error, matching how the rest of the numeric tower behaves.
fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Value {
    match op {
        BinaryOp::Plus => Value::Number(left.as_number().unwrap() + right.as_number().unwrap()),
        BinaryOp::Minus => Value::Number(left.as_number().unwrap() - right.as_number().unwrap()),
        BinaryOp::Mul => Value::Number(left.as_number().unwrap() * right.as_number().unwrap()),
        BinaryOp::Div => Value::Number(left.as_number().unwrap() / right.as_number().unwrap()),
        BinaryOp::Eq => Value::Bool(left == right),
        BinaryOp::NotEq => Value::Bool(left != right),
        BinaryOp::Gt => Value::Bool(left.as_number().unwrap() > right.as_number().unwrap()),
        BinaryOp::Ge => Value::Bool(left.as_number().unwrap() >= right.as_number().unwrap()),
        BinaryOp::Lt => Value::Bool(left.as_number().unwrap() < right.as_number().unwrap()),
        BinaryOp::Le => Value::Bool(left.as_number().unwrap() <= right.as_number().unwrap()),
        BinaryOp::And => Value::Bool(left.as_bool().unwrap() && right.as_bool().unwrap()),
        BinaryOp::Or => Value::Bool(left.as_bool().unwrap() || right.as_bool().unwrap()),
    }
}
