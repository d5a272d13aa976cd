use skink_core::{Env, Value};

use crate::register_fn;

pub fn register(env: &Env) {
    register_pred(env, "list?", Value::is_list);
    register_pred(env, "null?", Value::is_nil);
    register_pred(env, "symbol?", Value::is_symbol);
    register_pred(env, "pair?", Value::is_pair);
    register_pred(env, "procedure?", Value::is_procedure);
    register_pred(env, "foreign?", Value::is_foreign);
    register_pred(env, "atom?", Value::is_atom);
    register_pred(env, "number?", Value::is_numeric);
    register_pred(env, "boolean?", Value::is_boolean);
    register_pred(env, "not", |v| !v.is_truthy());

    register_fn(env, "equal?", |_env, args| {
        if args.list_len() != 2 {
            return Value::error("'equal?' expects 2 arguments");
        }
        Value::bool(args.car() == args.cdr().car())
    });

    register_fn(env, "eq?", |_env, args| {
        if args.list_len() != 2 {
            return Value::error("'eq?' expects 2 arguments");
        }
        Value::bool(args.car().identical(&args.cdr().car()))
    });
}

fn register_pred(env: &Env, name: &'static str, f: impl Fn(&Value) -> bool + 'static) {
    register_fn(env, name, move |_env, args| match args.as_pair() {
        Some(p) => Value::bool(f(&p.car)),
        None => Value::error(format!("'{name}' expects a parameter")),
    });
}
