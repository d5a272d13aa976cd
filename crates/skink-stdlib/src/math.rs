use skink_core::{intern, Env, Value};

use crate::register_fn;

pub fn register(env: &Env) {
    register_unary(env, "sin", f64::sin);
    register_unary(env, "cos", f64::cos);
    register_unary(env, "tan", f64::tan);
    register_unary(env, "asin", f64::asin);
    register_unary(env, "acos", f64::acos);
    register_unary(env, "log", f64::ln);
    register_unary(env, "exp", f64::exp);
    register_unary(env, "sqrt", f64::sqrt);
    register_unary(env, "ceil", f64::ceil);
    register_unary(env, "floor", f64::floor);
    register_unary(env, "abs", f64::abs);

    register_fn(env, "atan", |_env, args| {
        let p = args.car().to_f64();
        let q = args.cdr().car();
        if q.is_nil() {
            Value::number(p.atan())
        } else {
            Value::number(p.atan2(q.to_f64()))
        }
    });

    register_fn(env, "pow", |_env, args| {
        Value::number(args.car().to_f64().powf(args.cdr().car().to_f64()))
    });

    env.put(intern("pi"), Value::number(std::f64::consts::PI));
}

fn register_unary(env: &Env, name: &str, f: impl Fn(f64) -> f64 + 'static) {
    register_fn(env, name, move |_env, args| Value::number(f(args.car().to_f64())));
}
