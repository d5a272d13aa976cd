use skink_core::{Env, Value};

use crate::{leading_int, register_fn};

/// `+`, `-`, `*`, and `/` fold left over their arguments' numeric
/// coercions, so `(- 5)` is 5 and an empty call is 0. `%` works the same
/// way over integer coercions.
pub fn register(env: &Env) {
    register_fn(env, "+", |_env, args| fold(args, |a, b| a + b));
    register_fn(env, "-", |_env, args| fold(args, |a, b| a - b));
    register_fn(env, "*", |_env, args| fold(args, |a, b| a * b));

    register_fn(env, "/", |_env, args| {
        let mut iter = args.iter();
        let Some(first) = iter.next() else {
            return Value::number(0.0);
        };
        let mut acc = first.to_f64();
        for v in iter {
            let b = v.to_f64();
            if b == 0.0 {
                return Value::error("divide by 0");
            }
            acc /= b;
        }
        Value::number(acc)
    });

    register_fn(env, "%", |_env, args| {
        let mut iter = args.iter();
        let Some(first) = iter.next() else {
            return Value::number(0.0);
        };
        let mut acc = leading_int(&first.text());
        for v in iter {
            let b = leading_int(&v.text());
            if b == 0 {
                return Value::error("divide by 0");
            }
            acc %= b;
        }
        Value::number(acc as f64)
    });
}

fn fold(args: &Value, op: impl Fn(f64, f64) -> f64) -> Value {
    let mut iter = args.iter();
    let Some(first) = iter.next() else {
        return Value::number(0.0);
    };
    let mut acc = first.to_f64();
    for v in iter {
        acc = op(acc, v.to_f64());
    }
    Value::number(acc)
}
