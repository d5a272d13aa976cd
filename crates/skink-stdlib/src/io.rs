use skink_core::{Env, Value};

use crate::register_fn;

pub fn register(env: &Env) {
    register_fn(env, "serialize", |_env, args| match args.as_pair() {
        Some(p) => Value::atom(p.car.serialize()),
        None => Value::error("'serialize' expects an argument"),
    });

    // Writes each argument's text separated by spaces, with a newline
    // after the last one. No arguments writes nothing at all.
    register_fn(env, "display", |_env, args| {
        let mut iter = args.iter().peekable();
        while let Some(v) = iter.next() {
            print!("{}", v.text());
            if iter.peek().is_some() {
                print!(" ");
            } else {
                println!();
            }
        }
        Value::Nil
    });

    register_fn(env, "read-file", |_env, args| {
        if args.is_nil() {
            return Value::error("'read-file' expects a path");
        }
        let path = args.car().text().into_owned();
        match std::fs::read_to_string(&path) {
            Ok(content) => Value::atom(content),
            Err(e) => Value::error(format!("'read-file' {path}: {e}")),
        }
    });

    register_fn(env, "write-file", |_env, args| {
        if args.list_len() != 2 {
            return Value::error("'write-file' expects a path and text");
        }
        let path = args.car().text().into_owned();
        let content = args.cdr().car().text().into_owned();
        match std::fs::write(&path, content) {
            Ok(()) => Value::Nil,
            Err(e) => Value::error(format!("'write-file' {path}: {e}")),
        }
    });
}
