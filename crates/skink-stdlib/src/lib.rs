mod arithmetic;
mod comparison;
mod hash;
mod io;
mod list;
mod math;
mod predicates;
mod string;

use skink_core::{intern, ApplyFn, Env, Value};

/// Install every native function into `env`. `apply` is the evaluator's
/// application entry point, passed in so natives like `map` can call
/// procedures without this crate depending on the evaluator.
pub fn register_stdlib(env: &Env, apply: ApplyFn) {
    arithmetic::register(env);
    comparison::register(env);
    hash::register(env);
    io::register(env);
    list::register(env, apply);
    math::register(env);
    predicates::register(env);
    string::register(env);
}

fn register_fn(env: &Env, name: &str, f: impl Fn(&Env, &Value) -> Value + 'static) {
    env.put(intern(name), Value::native(name, f));
}

/// `atoi`-style integer coercion: leading whitespace, an optional sign,
/// then digits. Anything else stops the parse; no digits means 0.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut n: i64 = 0;
    for c in digits.chars().take_while(|c| c.is_ascii_digit()) {
        n = n.saturating_mul(10).saturating_add((c as u8 - b'0') as i64);
    }
    if neg {
        -n
    } else {
        n
    }
}
