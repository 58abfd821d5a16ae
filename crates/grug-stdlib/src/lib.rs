//! The built-in game function package: string and number printing, a
//! small id-handle-backed number list type, and two math functions.
//!
//! Mirrors the engine's own standard library package: a flat, unprefixed
//! namespace (`print_number`, `list_number_append`, ...) registered
//! against a fresh [`GrugRuntime`](grug_rt::GrugRuntime) once at startup.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use grug_rt::{GameFn, Package, Value};

/// Tag carried on every `id` value this package hands back, so a script
/// declaring a `list_number: id` argument can be type-checked against it.
pub const NUMBER_LIST_TYPE_NAME: &str = "number_list";

#[derive(Default)]
struct Lists {
    by_id: FxHashMap<u64, Vec<f64>>,
    next_id: u64,
}

impl Lists {
    fn alloc(&mut self, values: Vec<f64>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.by_id.insert(id, values);
        id
    }
}

/// Builds the package. Each call returns an independent list store, so
/// tests (and hosts that want isolated runtimes) never share state.
pub fn package() -> Package {
    let lists = Arc::new(Mutex::new(Lists::default()));

    Package::new("")
        .add("print_string", print_string())
        .add("print_number", print_number())
        .add("print_bool", print_bool())
        .add("print_id", print_id())
        .add("assert_string", assert_string())
        .add("assert_number", assert_number())
        .add("assert_bool", assert_bool())
        .add("assert_id", assert_id())
        .add("list_number", list_number(lists.clone()))
        .add("list_number_append", list_number_append(lists.clone()))
        .add("list_number_len", list_number_len(lists.clone()))
        .add("print_list_number", print_list_number(lists.clone()))
        .add("list_number_extend", list_number_extend(lists.clone()))
        .add("list_number_insert", list_number_insert(lists.clone()))
        .add("list_number_remove", list_number_remove(lists.clone()))
        .add("list_number_pop", list_number_pop(lists.clone()))
        .add("list_number_pop_index", list_number_pop_index(lists.clone()))
        .add("list_number_index", list_number_index(lists.clone()))
        .add("list_number_count", list_number_count(lists.clone()))
        .add("list_number_sort", list_number_sort(lists.clone()))
        .add("list_number_reverse", list_number_reverse(lists.clone()))
        .add("list_number_copy", list_number_copy(lists.clone()))
        .add("list_number_clear", list_number_clear(lists.clone()))
        .add("ceil", ceil())
        .add("sqrt", sqrt())
}

fn number(v: &Value) -> f64 {
    v.as_number().expect("argument type-checked as number")
}

fn list_id(v: &Value) -> u64 {
    v.as_id().expect("argument type-checked as a number list")
}

fn print_string() -> GameFn {
    Box::new(|args: &[Value]| {
        println!("{}", args[0].as_str().expect("argument type-checked as string"));
        Ok(None)
    })
}

fn print_number() -> GameFn {
    Box::new(|args: &[Value]| {
        println!("{}", format_number(number(&args[0])));
        Ok(None)
    })
}

/// Python's `int(x) if x.is_integer() else x` rendering, so whole numbers
/// print without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn print_bool() -> GameFn {
    Box::new(|args: &[Value]| {
        println!("{}", args[0].as_bool().expect("argument type-checked as bool"));
        Ok(None)
    })
}

fn print_id() -> GameFn {
    Box::new(|args: &[Value]| {
        println!("{}", args[0].as_id().expect("argument type-checked as id"));
        Ok(None)
    })
}

fn assert_string() -> GameFn {
    Box::new(|args: &[Value]| {
        let expected = args[0].as_str().expect("argument type-checked as string");
        let actual = args[1].as_str().expect("argument type-checked as string");
        if expected == actual {
            Ok(None)
        } else {
            Err(format!("assertion failed: '{expected}' != '{actual}'"))
        }
    })
}

fn assert_number() -> GameFn {
    Box::new(|args: &[Value]| {
        let expected = number(&args[0]);
        let actual = number(&args[1]);
        if expected == actual {
            Ok(None)
        } else {
            Err(format!("assertion failed: {expected} != {actual}"))
        }
    })
}

fn assert_bool() -> GameFn {
    Box::new(|args: &[Value]| {
        let expected = args[0].as_bool().expect("argument type-checked as bool");
        let actual = args[1].as_bool().expect("argument type-checked as bool");
        if expected == actual {
            Ok(None)
        } else {
            Err(format!("assertion failed: {expected} != {actual}"))
        }
    })
}

fn assert_id() -> GameFn {
    Box::new(|args: &[Value]| {
        let expected = args[0].as_id().expect("argument type-checked as id");
        let actual = args[1].as_id().expect("argument type-checked as id");
        if expected == actual {
            Ok(None)
        } else {
            Err(format!("assertion failed: {expected} != {actual}"))
        }
    })
}

fn list_number(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |_args: &[Value]| {
        let id = lists.lock().unwrap().alloc(Vec::new());
        Ok(Some(Value::Id(id)))
    })
}

fn list_number_append(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let n = number(&args[1]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        list.push(n);
        Ok(None)
    })
}

fn list_number_len(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let lists = lists.lock().unwrap();
        let list = lists.by_id.get(&id).expect("valid list handle");
        Ok(Some(Value::Number(list.len() as f64)))
    })
}

fn print_list_number(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let lists = lists.lock().unwrap();
        let list = lists.by_id.get(&id).expect("valid list handle");
        let rendered: Vec<String> = list.iter().copied().map(format_number).collect();
        println!("[{}]", rendered.join(", "));
        Ok(None)
    })
}

fn list_number_extend(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let dst_id = list_id(&args[0]);
        let src_id = list_id(&args[1]);
        let mut lists = lists.lock().unwrap();
        let src = lists.by_id.get(&src_id).expect("valid list handle").clone();
        let dst = lists.by_id.get_mut(&dst_id).expect("valid list handle");
        dst.extend(src);
        Ok(None)
    })
}

fn list_number_insert(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let index = number(&args[1]) as usize;
        let n = number(&args[2]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        if index > list.len() {
            return Err(format!("index {index} is out of range for a list of length {}", list.len()));
        }
        list.insert(index, n);
        Ok(None)
    })
}

fn list_number_remove(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let n = number(&args[1]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        match list.iter().position(|&x| x == n) {
            Some(pos) => {
                list.remove(pos);
                Ok(None)
            }
            None => Err(format!("{n} is not in the list")),
        }
    })
}

fn list_number_pop(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        list.pop().map(|n| Some(Value::Number(n))).ok_or_else(|| "pop from an empty list".to_string())
    })
}

fn list_number_pop_index(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let index = number(&args[1]) as usize;
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        if index >= list.len() {
            return Err(format!("index {index} is out of range for a list of length {}", list.len()));
        }
        Ok(Some(Value::Number(list.remove(index))))
    })
}

fn list_number_index(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let n = number(&args[1]);
        let lists = lists.lock().unwrap();
        let list = lists.by_id.get(&id).expect("valid list handle");
        list.iter()
            .position(|&x| x == n)
            .map(|i| Some(Value::Number(i as f64)))
            .ok_or_else(|| format!("{n} is not in the list"))
    })
}

fn list_number_count(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let n = number(&args[1]);
        let lists = lists.lock().unwrap();
        let list = lists.by_id.get(&id).expect("valid list handle");
        let count = list.iter().filter(|&&x| x == n).count();
        Ok(Some(Value::Number(count as f64)))
    })
}

fn list_number_sort(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        list.sort_by(|a, b| a.partial_cmp(b).expect("grug numbers are never NaN by construction"));
        Ok(None)
    })
}

fn list_number_reverse(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let mut lists = lists.lock().unwrap();
        let list = lists.by_id.get_mut(&id).expect("valid list handle");
        list.reverse();
        Ok(None)
    })
}

fn list_number_copy(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let mut lists = lists.lock().unwrap();
        let copy = lists.by_id.get(&id).expect("valid list handle").clone();
        let new_id = lists.alloc(copy);
        Ok(Some(Value::Id(new_id)))
    })
}

fn list_number_clear(lists: Arc<Mutex<Lists>>) -> GameFn {
    Box::new(move |args: &[Value]| {
        let id = list_id(&args[0]);
        let mut lists = lists.lock().unwrap();
        lists.by_id.get_mut(&id).expect("valid list handle").clear();
        Ok(None)
    })
}

fn ceil() -> GameFn {
    Box::new(|args: &[Value]| Ok(Some(Value::Number(number(&args[0]).ceil()))))
}

fn sqrt() -> GameFn {
    Box::new(|args: &[Value]| Ok(Some(Value::Number(number(&args[0]).sqrt()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call<'a>(pkg: &'a Package, name: &str) -> &'a GameFn {
        pkg.game_fns.iter().find(|(n, _)| n == name).map(|(_, f)| f).expect("registered")
    }

    #[test]
    fn list_number_round_trips_append_and_len() {
        let pkg = package();
        let id = (call(&pkg, "list_number"))(&[]).unwrap().unwrap();
        (call(&pkg, "list_number_append"))(&[id.clone(), Value::Number(3.0)]).unwrap();
        (call(&pkg, "list_number_append"))(&[id.clone(), Value::Number(4.0)]).unwrap();
        let len = (call(&pkg, "list_number_len"))(&[id]).unwrap().unwrap();
        assert_eq!(len, Value::Number(2.0));
    }

    #[test]
    fn popping_an_empty_list_is_an_error() {
        let pkg = package();
        let id = (call(&pkg, "list_number"))(&[]).unwrap().unwrap();
        assert!((call(&pkg, "list_number_pop"))(&[id]).is_err());
    }

    #[test]
    fn ceil_and_sqrt_match_std_math() {
        let pkg = package();
        assert_eq!((call(&pkg, "ceil"))(&[Value::Number(2.1)]).unwrap(), Some(Value::Number(3.0)));
        assert_eq!((call(&pkg, "sqrt"))(&[Value::Number(9.0)]).unwrap(), Some(Value::Number(3.0)));
    }

    #[test]
    fn formats_whole_numbers_without_a_decimal_point() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(3.5), "3.5");
    }

    #[test]
    fn assert_number_errors_on_mismatch() {
        let pkg = package();
        assert!((call(&pkg, "assert_number"))(&[Value::Number(1.0), Value::Number(1.0)]).is_ok());
        assert!((call(&pkg, "assert_number"))(&[Value::Number(1.0), Value::Number(2.0)]).is_err());
    }

    #[test]
    fn assert_bool_and_assert_id_compare_their_two_arguments() {
        let pkg = package();
        assert!((call(&pkg, "assert_bool"))(&[Value::Bool(true), Value::Bool(true)]).is_ok());
        assert!((call(&pkg, "assert_bool"))(&[Value::Bool(true), Value::Bool(false)]).is_err());
        assert!((call(&pkg, "assert_id"))(&[Value::Id(1), Value::Id(1)]).is_ok());
        assert!((call(&pkg, "assert_id"))(&[Value::Id(1), Value::Id(2)]).is_err());
    }
}
