use std::cell::Cell;

use skink_core::{intern, Env, Spur, Value};

use crate::eval::{self, eval_body, Trampoline};

/// Pre-interned `Spur` handles for the special form names.
///
/// Special form dispatch is the hottest path in the evaluator; every
/// list expression checks whether its head is a special form. Caching
/// the interned `Spur` for each name makes that check a u32 comparison
/// instead of a string resolve.
struct SpecialFormSpurs {
    and: Spur,
    begin: Spur,
    define: Spur,
    if_: Spur,
    lambda: Spur,
    let_: Spur,
    let_star: Spur,
    or: Spur,
    quote: Spur,
    set_bang: Spur,
}

impl SpecialFormSpurs {
    fn init() -> Self {
        Self {
            and: intern("and"),
            begin: intern("begin"),
            define: intern("define"),
            if_: intern("if"),
            lambda: intern("lambda"),
            let_: intern("let"),
            let_star: intern("let*"),
            or: intern("or"),
            quote: intern("quote"),
            set_bang: intern("set!"),
        }
    }
}

thread_local! {
    static SF: Cell<Option<&'static SpecialFormSpurs>> = const { Cell::new(None) };
}

fn special_forms() -> &'static SpecialFormSpurs {
    SF.with(|cell| match cell.get() {
        Some(sf) => sf,
        None => {
            let sf: &'static SpecialFormSpurs = Box::leak(Box::new(SpecialFormSpurs::init()));
            cell.set(Some(sf));
            sf
        }
    })
}

/// Canonical list of the special form names recognized by the
/// evaluator, for the REPL and anything else that enumerates them.
pub const SPECIAL_FORM_NAMES: &[&str] = &[
    "and", "begin", "define", "if", "lambda", "let", "let*", "or", "quote", "set!",
];

/// Evaluate a special form. `args` is the tail of the form. Returns
/// `Some(step)` when the head names a special form, `None` otherwise.
pub(crate) fn try_eval_special(head: Spur, args: &Value, env: &Env) -> Option<Trampoline> {
    let sf = special_forms();

    // Hot path forms first
    if head == sf.if_ {
        Some(eval_if(args, env))
    } else if head == sf.define {
        Some(eval_define(args, env, BindScope::Global))
    } else if head == sf.set_bang {
        Some(eval_define(args, env, BindScope::Current))
    } else if head == sf.let_ {
        Some(eval_let(args, env))
    } else if head == sf.begin {
        Some(eval_body(args, env.clone()))
    } else if head == sf.lambda {
        Some(eval_lambda(args, env))
    } else if head == sf.and {
        Some(eval_and(args, env))
    } else if head == sf.or {
        Some(eval_or(args, env))
    } else if head == sf.let_star {
        Some(eval_let_star(args, env))
    } else if head == sf.quote {
        Some(eval_quote(args))
    } else {
        None
    }
}

/// Where a `define`/`set!` binding lands.
#[derive(Clone, Copy)]
enum BindScope {
    Global,
    Current,
}

/// `define` and `set!` share one shape: `(define name expr)`, or the
/// function shorthand `(define (name . params) body...)`. They differ
/// only in the scope the binding lands in.
fn eval_define(args: &Value, env: &Env, scope: BindScope) -> Trampoline {
    let what = match scope {
        BindScope::Global => "define",
        BindScope::Current => "set!",
    };
    if args.list_len() < 2 {
        return Trampoline::Value(Value::error(format!("bad {what}")));
    }

    let target = args.car();
    let (name, value) = if target.is_pair() {
        // `(define (f a b c) body...)` form
        let Some(name) = target.car().as_symbol() else {
            return Trampoline::Value(Value::error("define lambda needs function name"));
        };
        let params = target.cdr();
        if !valid_params(&params) {
            return Trampoline::Value(Value::error("invalid lambda define"));
        }
        let body = Value::cons(Value::symbol("begin"), args.cdr());
        (name, eval::make_lambda(params, body, env))
    } else {
        // `(define v expr)` form
        if args.list_len() != 2 {
            return Trampoline::Value(Value::error(format!("bad {what}")));
        }
        let Some(name) = target.as_symbol() else {
            return Trampoline::Value(Value::error(format!("bad {what}")));
        };
        let value = eval::eval(env, &args.cdr().car());
        if value.is_error() {
            return Trampoline::Value(value);
        }
        (name, value)
    };

    let target_env = match scope {
        BindScope::Global => env.global(),
        BindScope::Current => env.clone(),
    };
    target_env.put(name, value);
    Trampoline::Value(Value::Nil)
}

/// Parameters are valid when they are nil, a bare rest symbol, or a
/// chain of symbols ending in nil or a rest symbol.
fn valid_params(params: &Value) -> bool {
    let mut current = params;
    loop {
        match current {
            Value::Nil | Value::Symbol(_) => return true,
            Value::Pair(pair) => {
                if !pair.car.is_symbol() {
                    return false;
                }
                current = &pair.cdr;
            }
            _ => return false,
        }
    }
}

fn eval_lambda(args: &Value, env: &Env) -> Trampoline {
    if args.list_len() < 2 {
        return Trampoline::Value(Value::error("bad lambda"));
    }
    let params = args.car();
    if !valid_params(&params) {
        return Trampoline::Value(Value::error("invalid lambda"));
    }
    let body = Value::cons(Value::symbol("begin"), args.cdr());
    Trampoline::Value(eval::make_lambda(params, body, env))
}

fn eval_if(args: &Value, env: &Env) -> Trampoline {
    if args.list_len() != 3 {
        return Trampoline::Value(Value::error("bad if"));
    }
    let cond = eval::eval(env, &args.car());
    if cond.is_error() {
        return Trampoline::Value(cond);
    }
    let rest = args.cdr();
    let branch = if cond.is_truthy() {
        rest.car()
    } else {
        rest.cdr().car()
    };
    Trampoline::Eval(branch, env.clone())
}

/// A well-formed clause is a two-element list headed by a symbol.
fn split_clause(clause: &Value) -> Option<(Spur, Value)> {
    if !clause.is_list() || clause.list_len() != 2 {
        return None;
    }
    clause
        .car()
        .as_symbol()
        .map(|name| (name, clause.cdr().car()))
}

fn eval_let(args: &Value, env: &Env) -> Trampoline {
    if args.list_len() < 2 || !args.car().is_list() {
        return Trampoline::Value(Value::error("bad let"));
    }
    let scope = Env::with_parent(env.clone());
    for clause in args.car().iter() {
        let Some((name, expr)) = split_clause(clause) else {
            return Trampoline::Value(Value::error("bad clause in 'let'"));
        };
        // Clause expressions see the outer scope, not earlier clauses
        let value = eval::eval(env, &expr);
        if value.is_error() {
            return Trampoline::Value(value);
        }
        scope.put(name, value);
    }
    eval_body(&args.cdr(), scope)
}

fn eval_let_star(args: &Value, env: &Env) -> Trampoline {
    if args.list_len() < 2 || !args.car().is_list() {
        return Trampoline::Value(Value::error("bad let*"));
    }
    let mut scope = Env::with_parent(env.clone());
    for clause in args.car().iter() {
        let Some((name, expr)) = split_clause(clause) else {
            return Trampoline::Value(Value::error("bad clause in 'let*'"));
        };
        // Each clause may refer to the ones before it
        let value = eval::eval(&scope, &expr);
        if value.is_error() {
            return Trampoline::Value(value);
        }
        let inner = Env::with_parent(scope);
        inner.put(name, value);
        scope = inner;
    }
    eval_body(&args.cdr(), scope)
}

fn eval_and(args: &Value, env: &Env) -> Trampoline {
    for form in args.iter() {
        let v = eval::eval(env, form);
        if v.is_error() {
            return Trampoline::Value(v);
        }
        if !v.is_truthy() {
            return Trampoline::Value(Value::False);
        }
    }
    Trampoline::Value(Value::True)
}

fn eval_or(args: &Value, env: &Env) -> Trampoline {
    for form in args.iter() {
        let v = eval::eval(env, form);
        if v.is_error() {
            return Trampoline::Value(v);
        }
        if v.is_truthy() {
            return Trampoline::Value(Value::True);
        }
    }
    Trampoline::Value(Value::False)
}

fn eval_quote(args: &Value) -> Trampoline {
    match args.as_pair() {
        Some(pair) => Trampoline::Value(pair.car.clone()),
        None => Trampoline::Value(Value::error("bad quote")),
    }
}
