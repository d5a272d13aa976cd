use std::rc::Rc;

use skink_core::{Env, Lambda, Value};
use skink_reader::ReadError;

use crate::prelude;
use crate::special_forms;

/// Trampoline for tail-call optimization.
pub enum Trampoline {
    Value(Value),
    Eval(Value, Env),
}

/// Evaluate an expression with the trampoline. Tail positions rewrite
/// the loop state instead of recursing, so tail-recursive programs run
/// in constant stack depth.
pub fn eval(env: &Env, expr: &Value) -> Value {
    let mut current_expr = expr.clone();
    let mut current_env = env.clone();

    loop {
        match eval_step(&current_env, &current_expr) {
            Trampoline::Value(v) => return v,
            Trampoline::Eval(next_expr, next_env) => {
                current_expr = next_expr;
                current_env = next_env;
            }
        }
    }
}

fn eval_step(env: &Env, expr: &Value) -> Trampoline {
    match expr {
        // Symbol lookup; unbound names come back as error values
        Value::Symbol(name) => Trampoline::Value(env.lookup(*name)),

        // Function application / special forms
        Value::Pair(pair) => {
            if !expr.is_list() {
                let head = pair.car.text();
                let what: &str = if head.is_empty() { "list" } else { &head };
                return Trampoline::Value(Value::error(format!("bad {what}")));
            }

            // Check for special forms before evaluating the head
            if let Some(name) = pair.car.as_symbol() {
                if let Some(step) = special_forms::try_eval_special(name, &pair.cdr, env) {
                    return step;
                }
            }

            eval_call(env, expr)
        }

        // Everything else is self-evaluating, error values included
        other => Trampoline::Value(other.clone()),
    }
}

/// Evaluate the whole call form left to right, head first. The first
/// error aborts the call and becomes its result.
fn eval_call(env: &Env, form: &Value) -> Trampoline {
    let mut evaled = Vec::with_capacity(form.list_len());
    for item in form.iter() {
        let v = eval(env, item);
        if v.is_error() {
            return Trampoline::Value(v);
        }
        evaled.push(v);
    }

    let mut parts = evaled.into_iter();
    let Some(callee) = parts.next() else {
        return Trampoline::Value(Value::Nil);
    };
    let args: Vec<Value> = parts.collect();

    match callee {
        Value::NativeFn(native) => Trampoline::Value((native.func)(env, &Value::list(args))),
        Value::Lambda(lambda) => match bind_params(&lambda, args) {
            Ok(call_env) => Trampoline::Eval(lambda.body.clone(), call_env),
            Err(err) => Trampoline::Value(err),
        },
        _ => Trampoline::Value(Value::error(
            "attempt to call something that is not a function",
        )),
    }
}

/// Bind evaluated arguments to a lambda's parameters in a fresh scope
/// under the captured environment. A bare symbol in tail position of
/// the parameter list absorbs the remaining arguments as a list.
fn bind_params(lambda: &Lambda, args: Vec<Value>) -> Result<Env, Value> {
    let call_env = Env::with_parent(lambda.env.clone());
    let mut params = &lambda.params;
    let mut args = args.into_iter();

    loop {
        match params {
            Value::Nil => {
                if args.next().is_some() {
                    return Err(Value::error("too many arguments passed to lambda"));
                }
                return Ok(call_env);
            }
            Value::Symbol(rest) => {
                call_env.put(*rest, Value::list(args.collect()));
                return Ok(call_env);
            }
            Value::Pair(pair) => {
                let Some(name) = pair.car.as_symbol() else {
                    return Err(Value::error("invalid lambda"));
                };
                match args.next() {
                    Some(v) => call_env.put(name, v),
                    None => return Err(Value::error("too few arguments passed to lambda")),
                }
                params = &pair.cdr;
            }
            _ => return Err(Value::error("invalid lambda")),
        }
    }
}

/// Apply an already-evaluated procedure to an already-evaluated list of
/// arguments. This is the callback handed to the native library so
/// higher-order builtins can call back into the evaluator.
pub fn apply(env: &Env, func: &Value, args: &Value) -> Value {
    match func {
        Value::NativeFn(native) => (native.func)(env, args),
        Value::Lambda(lambda) => {
            let args: Vec<Value> = args.iter().cloned().collect();
            match bind_params(lambda, args) {
                Ok(call_env) => eval(&call_env, &lambda.body),
                Err(err) => err,
            }
        }
        _ => Value::error("attempt to call something that is not a function"),
    }
}

/// Evaluate every form of a body but the last, then hand the last to
/// the trampoline as the tail position. An empty body yields nil.
pub(crate) fn eval_body(body: &Value, env: Env) -> Trampoline {
    let mut current = body;
    loop {
        match current {
            Value::Pair(pair) if pair.cdr.is_nil() => {
                return Trampoline::Eval(pair.car.clone(), env);
            }
            Value::Pair(pair) => {
                let v = eval(&env, &pair.car);
                if v.is_error() {
                    return Trampoline::Value(v);
                }
                current = &pair.cdr;
            }
            _ => return Trampoline::Value(Value::Nil),
        }
    }
}

pub(crate) fn make_lambda(params: Value, body: Value, env: &Env) -> Value {
    Value::Lambda(Rc::new(Lambda {
        params,
        body,
        env: env.clone(),
    }))
}

/// The interpreter holds the global environment. Top-level evaluation
/// runs directly against it, so definitions and `set!` persist across
/// calls.
pub struct Interpreter {
    pub global_env: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let global_env = Env::new();
        skink_stdlib::register_stdlib(&global_env, apply);
        prelude::install(&global_env);
        Interpreter { global_env }
    }

    pub fn eval(&self, expr: &Value) -> Value {
        eval(&self.global_env, expr)
    }

    /// Read and evaluate a program. Read errors come back as in-language
    /// error values, like any other failure.
    pub fn eval_str(&self, input: &str) -> Value {
        match skink_reader::read_program(input) {
            Ok(program) => eval(&self.global_env, &program),
            Err(err) => err.into(),
        }
    }

    /// Like `eval_str`, but keeps read errors on the host side so a
    /// caller can report line information.
    pub fn eval_source(&self, input: &str) -> Result<Value, ReadError> {
        let program = skink_reader::read_program(input)?;
        Ok(eval(&self.global_env, &program))
    }
}
