use skink_core::Value;
use skink_eval::Interpreter;

/// Evaluate a program on a fresh interpreter.
pub fn eval(input: &str) -> Value {
    Interpreter::new().eval_str(input)
}

/// Evaluate and serialize the result.
pub fn eval_to_string(input: &str) -> String {
    eval(input).to_string()
}

/// Evaluate, expecting an error value; returns its message.
pub fn eval_err(input: &str) -> String {
    let v = eval(input);
    assert!(v.is_error(), "expected error for `{input}`, got: {v}");
    v.text().into_owned()
}
