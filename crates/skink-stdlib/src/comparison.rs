use skink_core::{Env, Value};

use crate::register_fn;

/// Numeric comparisons look at exactly two arguments; extras are
/// accepted and ignored rather than chained.
pub fn register(env: &Env) {
    register_cmp(env, "=", |a, b| a == b);
    register_cmp(env, ">", |a, b| a > b);
    register_cmp(env, "<", |a, b| a < b);
    register_cmp(env, ">=", |a, b| a >= b);
    register_cmp(env, "<=", |a, b| a <= b);
}

fn register_cmp(env: &Env, name: &'static str, f: impl Fn(f64, f64) -> bool + 'static) {
    register_fn(env, name, move |_env, args| {
        if args.list_len() < 2 {
            return Value::error(format!("'{name}' expects two arguments"));
        }
        Value::bool(f(args.car().to_f64(), args.cdr().car().to_f64()))
    });
}
