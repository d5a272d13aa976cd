use skink_core::{Env, Value};

use crate::{leading_int, register_fn};

/// Text functions index by character, not byte, so multi-byte input
/// cannot split a code point.
pub fn register(env: &Env) {
    register_fn(env, "string-length", |_env, args| {
        Value::number(args.car().text().chars().count() as f64)
    });

    register_fn(env, "string-append", |_env, args| {
        let mut out = String::new();
        for v in args.iter() {
            out.push_str(&v.text());
        }
        Value::atom(out)
    });

    register_fn(env, "string-replace", |_env, args| {
        let text = args.car();
        let search = args.cdr().car().text().into_owned();
        let rep = args.cdr().cdr().car().text().into_owned();
        if search.is_empty() {
            return text;
        }
        Value::atom(text.text().replace(&search, &rep))
    });

    register_fn(env, "string-split", |_env, args| {
        let text = args.car().text().into_owned();
        let sep = args.cdr().car().text().into_owned();
        let sep: &str = if sep.is_empty() { " \t\r\n" } else { &sep };
        // Every character of the separator splits on its own.
        let parts = text
            .split(|c: char| sep.contains(c))
            .map(Value::atom)
            .collect();
        Value::list(parts)
    });

    register_fn(env, "substring", |_env, args| {
        let chars: Vec<char> = args.car().text().chars().collect();
        let len = chars.len() as i64;
        let start = leading_int(&args.cdr().car().text());
        let end_arg = args.cdr().cdr().car();
        let mut end = if end_arg.is_nil() {
            len
        } else {
            leading_int(&end_arg.text())
        };
        if end > len {
            end = len;
        }
        if start < 0 || end <= start || start >= len {
            return Value::atom("");
        }
        let out: String = chars[start as usize..end as usize].iter().collect();
        Value::atom(out)
    });

    register_fn(env, "string-upcase", |_env, args| {
        Value::atom(args.car().text().to_ascii_uppercase())
    });

    register_fn(env, "string-downcase", |_env, args| {
        Value::atom(args.car().text().to_ascii_lowercase())
    });

    register_fn(env, "string-ascii", |_env, args| {
        let code = args.car().text().chars().next().map(|c| c as u32).unwrap_or(0);
        Value::number(code as f64)
    });

    register_fn(env, "string-char", |_env, args| {
        let code = leading_int(&args.car().text()) & 0x7f;
        Value::atom(((code as u8) as char).to_string())
    });

    register_fn(env, "string-trim", |_env, args| {
        Value::atom(args.car().text().trim().to_string())
    });

    register_fn(env, "string-find", |_env, args| {
        let haystack = args.car().text().into_owned();
        let needle = args.cdr().car().text().into_owned();
        if haystack.is_empty() {
            return Value::Nil;
        }
        if needle.is_empty() {
            return Value::error("`string-find` requires a haystack and a needle");
        }
        match haystack.find(&needle) {
            Some(pos) => Value::number(haystack[..pos].chars().count() as f64),
            None => Value::Nil,
        }
    });

    register_fn(env, "string=?", |_env, args| {
        if args.list_len() < 2 {
            return Value::error("'string=?' expects two arguments");
        }
        Value::bool(args.car().text() == args.cdr().car().text())
    });

    register_fn(env, "string<?", |_env, args| {
        if args.list_len() < 2 {
            return Value::error("'string<?' expects two arguments");
        }
        Value::bool(args.car().text() < args.cdr().car().text())
    });
}
