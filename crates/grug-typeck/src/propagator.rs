use indexmap::IndexMap;

use grug_common::Type;
use grug_parser::ast::{BinaryOp, CompiledFile, Expr, ExprResult, GlobalVariable, HelperFn, OnFn, Statement, UnaryOp};

use crate::env::TypeEnv;
use crate::error::TypeError;
use crate::mod_api::ModApi;
use crate::validate::{validate_entity_string, validate_resource_string};

/// What's needed to check one call argument: its closed type, an `id` tag
/// (if any), and a required file extension (if it's a `resource`).
#[derive(Debug, Clone)]
struct ExpectedArg {
    ty: Type,
    type_name: Option<String>,
    resource_extension: Option<String>,
}

/// The signature of a helper function, collected in a first pass so
/// bodies can call helpers declared later in the same file.
#[derive(Debug, Clone)]
struct HelperSignature {
    arguments: Vec<ExpectedArg>,
    return_type: Option<(Type, Option<String>)>,
}

/// Checks and back-annotates an already-parsed file against a mod API.
///
/// Order of operations mirrors the three things a file can declare:
/// globals first, then `on_` functions, then helper functions — each
/// stage's bindings are visible to the ones after it.
pub fn check(
    file: &mut CompiledFile,
    mod_api: &ModApi,
    entity_type: &str,
    current_mod: &str,
) -> Result<(), TypeError> {
    let helper_sigs = collect_helper_signatures(&file.helper_fns)?;

    let mut checker = Checker {
        mod_api,
        entity_type,
        current_mod,
        env: TypeEnv::new(),
        loop_depth: 0,
    };

    checker.env.insert("me", Type::Id, Some(entity_type.to_string()));

    checker.fill_global_variables(&mut file.global_variables, &helper_sigs)?;
    checker.fill_on_fns(&mut file.on_fns, &helper_sigs)?;
    checker.fill_helper_fns(&mut file.helper_fns, &helper_sigs)?;
    Ok(())
}

fn collect_helper_signatures(helper_fns: &[HelperFn]) -> Result<IndexMap<String, HelperSignature>, TypeError> {
    let mut sigs = IndexMap::new();
    for helper in helper_fns {
        if sigs.contains_key(&helper.name) {
            return Err(TypeError::new(format!(
                "helper function '{}' is defined more than once",
                helper.name
            )));
        }
        let arguments = helper
            .arguments
            .iter()
            .map(|a| ExpectedArg {
                ty: a.ty,
                type_name: a.type_name.clone(),
                resource_extension: None,
            })
            .collect();
        let return_type = helper.return_type.map(|ty| (ty, helper.return_type_name.clone()));
        sigs.insert(helper.name.clone(), HelperSignature { arguments, return_type });
    }
    Ok(sigs)
}

fn check_global_expr(expr: &Expr, helper_sigs: &IndexMap<String, HelperSignature>) -> Result<(), TypeError> {
    match expr {
        Expr::Call { name, args, .. } => {
            if helper_sigs.contains_key(name) {
                return Err(TypeError::new(format!(
                    "global variable initializers can't call helper function '{name}'"
                )));
            }
            for arg in args {
                check_global_expr(arg, helper_sigs)?;
            }
            Ok(())
        }
        Expr::Unary { operand, .. } => check_global_expr(operand, helper_sigs),
        Expr::Binary { left, right, .. } => {
            check_global_expr(left, helper_sigs)?;
            check_global_expr(right, helper_sigs)
        }
        Expr::Parenthesized { inner, .. } => check_global_expr(inner, helper_sigs),
        Expr::True { .. } | Expr::False { .. } | Expr::String { .. } | Expr::Number { .. } | Expr::Identifier { .. } => {
            Ok(())
        }
    }
}

struct Checker<'a> {
    mod_api: &'a ModApi,
    entity_type: &'a str,
    current_mod: &'a str,
    env: TypeEnv,
    loop_depth: usize,
}

type ReturnSlot = Option<(Type, Option<String>)>;

impl<'a> Checker<'a> {
    fn fill_global_variables(
        &mut self,
        globals: &mut [GlobalVariable],
        helper_sigs: &IndexMap<String, HelperSignature>,
    ) -> Result<(), TypeError> {
        for global in globals.iter_mut() {
            check_global_expr(&global.value, helper_sigs)?;
            self.fill_expr(&mut global.value, helper_sigs)?;
            self.expect_assignable(global.declared_type, global.declared_type_name.as_deref(), global.value.result())
                .map_err(|msg| TypeError::new(format!("global variable '{}': {msg}", global.name)))?;
            self.env
                .declare(global.name.clone(), global.declared_type, global.declared_type_name.clone())
                .map_err(|msg| TypeError::new(format!("global variable '{}': {msg}", global.name)))?;
        }
        Ok(())
    }

    fn fill_on_fns(
        &mut self,
        on_fns: &mut [OnFn],
        helper_sigs: &IndexMap<String, HelperSignature>,
    ) -> Result<(), TypeError> {
        let entity_api = self.mod_api.entities.get(self.entity_type).ok_or_else(|| {
            TypeError::new(format!("the mod API declares no entity type '{}'", self.entity_type))
        })?;

        let declared_order: Vec<&str> = entity_api.on_functions.keys().map(String::as_str).collect();
        let mut cursor = 0;
        for on_fn in on_fns.iter() {
            let found = declared_order[cursor..].iter().position(|name| *name == on_fn.name);
            match found {
                Some(offset) => cursor += offset + 1,
                None => {
                    return Err(TypeError::new(format!(
                        "on-function '{}' is declared out of order relative to the mod API, or isn't declared for entity '{}'",
                        on_fn.name, self.entity_type
                    )));
                }
            }
        }

        for on_fn in on_fns.iter_mut() {
            let api_fn = entity_api.on_functions.get(&on_fn.name).ok_or_else(|| {
                TypeError::new(format!(
                    "entity '{}' has no on-function '{}' in the mod API",
                    self.entity_type, on_fn.name
                ))
            })?;
            if api_fn.arguments.len() != on_fn.arguments.len() {
                return Err(TypeError::new(format!(
                    "on-function '{}' takes {} argument(s) per the mod API, but {} are declared here",
                    on_fn.name,
                    api_fn.arguments.len(),
                    on_fn.arguments.len()
                )));
            }
            for (declared, expected) in on_fn.arguments.iter().zip(api_fn.arguments.iter()) {
                if declared.name != expected.name {
                    return Err(TypeError::new(format!(
                        "on-function '{}' argument '{}' must be named '{}' per the mod API",
                        on_fn.name, declared.name, expected.name
                    )));
                }
                let expected_type = Type::from_name(&expected.type_name);
                if declared.ty != expected_type {
                    return Err(TypeError::new(format!(
                        "on-function '{}' argument '{}' must have type '{}' per the mod API",
                        on_fn.name, declared.name, expected.type_name
                    )));
                }
            }

            self.env.push_scope();
            for arg in &on_fn.arguments {
                self.env
                    .declare(arg.name.clone(), arg.ty, arg.type_name.clone())
                    .map_err(|msg| {
                        TypeError::new(format!("on-function '{}' argument '{}': {msg}", on_fn.name, arg.name))
                    })?;
            }
            self.loop_depth = 0;
            self.fill_statements(&mut on_fn.body, helper_sigs, &None)?;
            self.env.pop_scope();
        }
        Ok(())
    }

    fn fill_helper_fns(
        &mut self,
        helper_fns: &mut [HelperFn],
        helper_sigs: &IndexMap<String, HelperSignature>,
    ) -> Result<(), TypeError> {
        for helper in helper_fns.iter_mut() {
            self.env.push_scope();
            for arg in &helper.arguments {
                self.env
                    .declare(arg.name.clone(), arg.ty, arg.type_name.clone())
                    .map_err(|msg| {
                        TypeError::new(format!("helper function '{}' argument '{}': {msg}", helper.name, arg.name))
                    })?;
            }
            self.loop_depth = 0;
            let expected_return: ReturnSlot = helper.return_type.map(|ty| (ty, helper.return_type_name.clone()));
            self.fill_statements(&mut helper.body, helper_sigs, &expected_return)?;
            self.env.pop_scope();

            let last_real_statement = helper
                .body
                .iter()
                .rev()
                .find(|s| !matches!(s, Statement::Comment(_) | Statement::EmptyLine));
            match (helper.return_type, last_real_statement) {
                (Some(_), Some(Statement::Return(Some(_)))) => {}
                (Some(ty), _) => {
                    return Err(TypeError::new(format!(
                        "helper function '{}' must end with a return statement because it returns '{ty}'",
                        helper.name
                    )));
                }
                (None, _) => {}
            }
        }
        Ok(())
    }

    fn fill_statements(
        &mut self,
        statements: &mut [Statement],
        helper_sigs: &IndexMap<String, HelperSignature>,
        expected_return: &ReturnSlot,
    ) -> Result<(), TypeError> {
        for stmt in statements.iter_mut() {
            self.fill_statement(stmt, helper_sigs, expected_return)?;
        }
        Ok(())
    }

    fn fill_statement(
        &mut self,
        stmt: &mut Statement,
        helper_sigs: &IndexMap<String, HelperSignature>,
        expected_return: &ReturnSlot,
    ) -> Result<(), TypeError> {
        match stmt {
            Statement::Variable {
                name,
                declared_type,
                declared_type_name,
                value,
            } => {
                self.fill_expr(value, helper_sigs)?;
                match declared_type {
                    Some(ty) => {
                        self.expect_assignable(*ty, declared_type_name.as_deref(), value.result())
                            .map_err(|msg| TypeError::new(format!("variable '{name}': {msg}")))?;
                        self.env
                            .declare(name.clone(), *ty, declared_type_name.clone())
                            .map_err(|msg| TypeError::new(format!("variable '{name}': {msg}")))?;
                    }
                    None => {
                        let existing = self
                            .env
                            .lookup(name)
                            .cloned()
                            .ok_or_else(|| TypeError::new(format!("'{name}' is assigned to before it's declared")))?;
                        if existing.ty == Type::Id && self.env.is_global(name) {
                            return Err(TypeError::new(format!("global id variable '{name}' can't be reassigned")));
                        }
                        self.expect_assignable(existing.ty, existing.type_name.as_deref(), value.result())
                            .map_err(|msg| TypeError::new(format!("variable '{name}': {msg}")))?;
                    }
                }
                Ok(())
            }
            Statement::Call(expr) => self.fill_expr(expr, helper_sigs),
            Statement::If {
                condition,
                if_body,
                else_body,
            } => {
                self.fill_expr(condition, helper_sigs)?;
                self.expect_bool(condition.result())?;
                self.env.push_scope();
                self.fill_statements(if_body, helper_sigs, expected_return)?;
                self.env.pop_scope();
                self.env.push_scope();
                self.fill_statements(else_body, helper_sigs, expected_return)?;
                self.env.pop_scope();
                Ok(())
            }
            Statement::While { condition, body } => {
                self.fill_expr(condition, helper_sigs)?;
                self.expect_bool(condition.result())?;
                self.env.push_scope();
                self.loop_depth += 1;
                let result = self.fill_statements(body, helper_sigs, expected_return);
                self.loop_depth -= 1;
                self.env.pop_scope();
                result
            }
            Statement::Return(value) => match (value.as_mut(), expected_return) {
                (None, None) => Ok(()),
                (None, Some((ty, _))) => Err(TypeError::new(format!("must return a value of type '{ty}'"))),
                (Some(expr), None) => {
                    self.fill_expr(expr, helper_sigs)?;
                    Err(TypeError::new("can't return a value from a function with no return type"))
                }
                (Some(expr), Some((ty, type_name))) => {
                    self.fill_expr(expr, helper_sigs)?;
                    self.expect_assignable(*ty, type_name.as_deref(), expr.result())
                        .map_err(|msg| TypeError::new(format!("return value: {msg}")))?;
                    Ok(())
                }
            },
            Statement::Break | Statement::Continue => {
                if self.loop_depth == 0 {
                    return Err(TypeError::new("'break'/'continue' can only appear inside a 'while' loop"));
                }
                Ok(())
            }
            Statement::Comment(_) | Statement::EmptyLine => Ok(()),
        }
    }

    fn fill_expr(&mut self, expr: &mut Expr, helper_sigs: &IndexMap<String, HelperSignature>) -> Result<(), TypeError> {
        match expr {
            Expr::True { result } | Expr::False { result } => {
                result.ty = Some(Type::Bool);
                Ok(())
            }
            Expr::Number { result, .. } => {
                result.ty = Some(Type::Number);
                Ok(())
            }
            Expr::String { result, .. } => {
                result.ty = Some(Type::String);
                Ok(())
            }
            Expr::Identifier { name, result } => {
                let binding = self
                    .env
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| TypeError::new(format!("'{name}' is not defined")))?;
                result.ty = Some(binding.ty);
                result.type_name = binding.type_name;
                Ok(())
            }
            Expr::Parenthesized { inner, result } => {
                self.fill_expr(inner, helper_sigs)?;
                *result = inner.result().clone();
                Ok(())
            }
            Expr::Unary { op, operand, result } => {
                if let Expr::Unary { op: inner_op, .. } = operand.as_ref() {
                    if *inner_op == *op {
                        return Err(TypeError::new("double negation is redundant"));
                    }
                }
                self.fill_expr(operand, helper_sigs)?;
                match op {
                    UnaryOp::Not => {
                        if operand.result().ty != Some(Type::Bool) {
                            return Err(TypeError::new("'not' requires a 'bool' operand"));
                        }
                        result.ty = Some(Type::Bool);
                    }
                    UnaryOp::Negate => {
                        if operand.result().ty != Some(Type::Number) {
                            return Err(TypeError::new("unary '-' requires a 'number' operand"));
                        }
                        result.ty = Some(Type::Number);
                    }
                }
                Ok(())
            }
            Expr::Binary { op, left, right, result } => {
                self.fill_expr(left, helper_sigs)?;
                self.fill_expr(right, helper_sigs)?;
                *result = fill_binary(*op, left.result(), right.result())?;
                Ok(())
            }
            Expr::Call { name, args, result } => {
                for arg in args.iter_mut() {
                    self.fill_expr(arg, helper_sigs)?;
                }
                *result = self.fill_call(name, args, helper_sigs)?;
                Ok(())
            }
        }
    }

    fn fill_call(
        &self,
        name: &str,
        args: &[Expr],
        helper_sigs: &IndexMap<String, HelperSignature>,
    ) -> Result<ExprResult, TypeError> {
        if name.starts_with("on_") {
            return Err(TypeError::new(format!("'{name}' is an on-function and can't be called directly")));
        }

        if let Some(sig) = helper_sigs.get(name) {
            self.check_call_arguments(name, &sig.arguments, args)?;
            return Ok(match &sig.return_type {
                Some((ty, type_name)) => ExprResult {
                    ty: Some(*ty),
                    type_name: type_name.clone(),
                },
                None => ExprResult::default(),
            });
        }

        if let Some(api_fn) = self.mod_api.game_functions.get(name) {
            let expected: Vec<ExpectedArg> = api_fn
                .arguments
                .iter()
                .map(|a| {
                    let ty = Type::from_name(&a.type_name);
                    let type_name = match ty {
                        Type::Id => Some(a.entity_type.clone().unwrap_or_else(|| a.type_name.clone())),
                        _ => None,
                    };
                    ExpectedArg {
                        ty,
                        type_name,
                        resource_extension: a.resource_extension.clone(),
                    }
                })
                .collect();
            self.check_call_arguments(name, &expected, args)?;
            return Ok(match &api_fn.return_type {
                Some(type_name) => {
                    let ty = Type::from_name(type_name);
                    let tag = if ty == Type::Id { Some(type_name.clone()) } else { None };
                    ExprResult { ty: Some(ty), type_name: tag }
                }
                None => ExprResult::default(),
            });
        }

        Err(TypeError::new(format!(
            "'{name}' is neither a declared helper function nor a game function in the mod API"
        )))
    }

    fn check_call_arguments(&self, name: &str, expected: &[ExpectedArg], args: &[Expr]) -> Result<(), TypeError> {
        if expected.len() != args.len() {
            return Err(TypeError::new(format!(
                "'{name}' takes {} argument(s), but {} were given",
                expected.len(),
                args.len()
            )));
        }
        for (i, (expected, arg)) in expected.iter().zip(args.iter()).enumerate() {
            let actual = arg.result();
            match (expected.ty, actual.ty) {
                (Type::Resource, Some(Type::String)) => match arg {
                    Expr::String { value, .. } => validate_resource_string(value, expected.resource_extension.as_deref())
                        .map_err(|msg| TypeError::new(format!("argument {} of '{name}': {msg}", i + 1)))?,
                    _ => {
                        return Err(TypeError::new(format!(
                            "argument {} of '{name}' must be a string literal naming a resource",
                            i + 1
                        )))
                    }
                },
                (Type::Entity, Some(Type::String)) => match arg {
                    Expr::String { value, .. } => validate_entity_string(value, self.current_mod)
                        .map_err(|msg| TypeError::new(format!("argument {} of '{name}': {msg}", i + 1)))?,
                    _ => {
                        return Err(TypeError::new(format!(
                            "argument {} of '{name}' must be a string literal naming an entity",
                            i + 1
                        )))
                    }
                },
                (expected_ty, Some(found_ty)) if expected_ty == found_ty => {
                    if expected_ty == Type::Id {
                        match (expected.type_name.as_deref(), actual.type_name.as_deref()) {
                            (None, _) | (_, None) => {}
                            (Some(a), Some(b)) if a == b => {}
                            (Some(a), Some(b)) => {
                                return Err(TypeError::new(format!(
                                    "argument {} of '{name}' must be an id tagged '{a}', found '{b}'",
                                    i + 1
                                )));
                            }
                        }
                    }
                }
                (expected_ty, found_ty) => {
                    return Err(TypeError::new(format!(
                        "argument {} of '{name}' must have type '{expected_ty}', found {found_ty:?}",
                        i + 1
                    )));
                }
            }
        }
        Ok(())
    }

    fn expect_assignable(&self, declared_ty: Type, declared_type_name: Option<&str>, actual: &ExprResult) -> Result<(), String> {
        let actual_ty = actual.ty.expect("expression type is filled before this check runs");
        if declared_ty != actual_ty {
            return Err(format!("expected type '{declared_ty}', found '{actual_ty}'"));
        }
        if declared_ty == Type::Id {
            match (declared_type_name, actual.type_name.as_deref()) {
                (None, _) | (_, None) => {}
                (Some(a), Some(b)) if a == b => {}
                (Some(a), Some(b)) => return Err(format!("expected an id tagged '{a}', found '{b}'")),
            }
        }
        Ok(())
    }

    fn expect_bool(&self, result: &ExprResult) -> Result<(), TypeError> {
        if result.ty != Some(Type::Bool) {
            return Err(TypeError::new("condition must be of type 'bool'"));
        }
        Ok(())
    }
}

fn fill_binary(op: BinaryOp, left: &ExprResult, right: &ExprResult) -> Result<ExprResult, TypeError> {
    let lt = left.ty.expect("left operand type filled");
    let rt = right.ty.expect("right operand type filled");
    match op {
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mul | BinaryOp::Div => {
            if lt != Type::Number || rt != Type::Number {
                return Err(TypeError::new("arithmetic operators require 'number' operands"));
            }
            Ok(ExprResult {
                ty: Some(Type::Number),
                type_name: None,
            })
        }
        BinaryOp::Eq | BinaryOp::NotEq => {
            check_comparable(lt, left.type_name.as_deref(), rt, right.type_name.as_deref())?;
            Ok(ExprResult {
                ty: Some(Type::Bool),
                type_name: None,
            })
        }
        BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le => {
            if lt != Type::Number || rt != Type::Number {
                return Err(TypeError::new("comparison operators require 'number' operands"));
            }
            Ok(ExprResult {
                ty: Some(Type::Bool),
                type_name: None,
            })
        }
        BinaryOp::And | BinaryOp::Or => {
            if lt != Type::Bool || rt != Type::Bool {
                return Err(TypeError::new("'and'/'or' require 'bool' operands"));
            }
            Ok(ExprResult {
                ty: Some(Type::Bool),
                type_name: None,
            })
        }
    }
}

fn check_comparable(lt: Type, lt_name: Option<&str>, rt: Type, rt_name: Option<&str>) -> Result<(), TypeError> {
    if lt != rt {
        return Err(TypeError::new(format!("can't compare '{lt}' with '{rt}'")));
    }
    if lt == Type::Id {
        match (lt_name, rt_name) {
            (None, _) | (_, None) => {}
            (Some(a), Some(b)) if a == b => {}
            (Some(a), Some(b)) => {
                return Err(TypeError::new(format!("can't compare id tagged '{a}' with id tagged '{b}'")));
            }
        }
    }
    Ok(())
}
