use skink_core::{ApplyFn, Env, Value};

use crate::register_fn;

pub fn register(env: &Env, apply: ApplyFn) {
    register_fn(env, "cons", |_env, args| {
        if args.list_len() != 2 {
            return Value::error("'cons' expects 2 arguments");
        }
        Value::cons(args.car(), args.cdr().car())
    });

    register_fn(env, "car", |_env, args| match args.car() {
        Value::Pair(p) => p.car.clone(),
        _ => Value::error("'car' expects a cons"),
    });

    register_fn(env, "cdr", |_env, args| match args.car() {
        Value::Pair(p) => p.cdr.clone(),
        _ => Value::error("'cdr' expects a cons"),
    });

    // The evaluated argument list already is the result.
    register_fn(env, "list", |_env, args| args.clone());

    register_fn(env, "length", |_env, args| match args.as_pair() {
        Some(p) => Value::number(p.car.list_len() as f64),
        None => Value::error("'length' expects a parameter"),
    });

    register_fn(env, "map", move |env, args| {
        let f = args.car();
        let list = args.cdr().car();
        if !f.is_procedure() || !list.is_list() {
            return Value::error("'map' expects a procedure and a list");
        }
        let mut out = Vec::new();
        for item in list.iter() {
            let res = apply(env, &f, &Value::list(vec![item.clone()]));
            if res.is_error() {
                return res;
            }
            out.push(res);
        }
        Value::list(out)
    });

    register_fn(env, "filter", move |env, args| {
        let f = args.car();
        let list = args.cdr().car();
        if !f.is_procedure() || !list.is_list() {
            return Value::error("'filter' expects a procedure and a list");
        }
        let mut out = Vec::new();
        for item in list.iter() {
            let res = apply(env, &f, &Value::list(vec![item.clone()]));
            if res.is_error() {
                return res;
            }
            if res.is_truthy() {
                out.push(item.clone());
            }
        }
        Value::list(out)
    });

    register_fn(env, "append", |_env, args| {
        let first = args.car();
        let second = args.cdr().car();
        if args.list_len() < 2 || !first.is_list() || !second.is_list() {
            return Value::error("'append' expects two lists");
        }
        // Copy the first list's spine; the second is shared as the tail.
        let head: Vec<Value> = first.iter().cloned().collect();
        Value::list_with_tail(head, second)
    });

    register_fn(env, "apply", move |env, args| {
        let f = args.car();
        let arg_list = args.cdr().car();
        if args.list_len() != 2 || !arg_list.is_list() {
            return Value::error("'apply' expects a function and a list of arguments");
        }
        apply(env, &f, &arg_list)
    });
}
