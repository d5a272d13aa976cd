use std::any::Any;

use skink_core::{intern, Env, ForeignDtor, Value};

use crate::register_fn;

/// Hash tables are parentless environments behind foreign handles, with
/// the destructor address as the type tag. Keys are coerced to text, so
/// `(hash-set h 'a 1)` and `(hash-set h "a" 2)` hit the same slot.
/// Storing a table inside itself forms a cycle and is never freed.
fn table_dtor(_data: Box<dyn Any>) {}

fn with_table<R>(v: &Value, f: impl FnOnce(&Env) -> R) -> Option<R> {
    match v {
        Value::Foreign(h) if std::ptr::fn_addr_eq(h.dtor(), table_dtor as ForeignDtor) => {
            h.downcast_ref::<Env>().map(f)
        }
        _ => None,
    }
}

pub fn register(env: &Env) {
    register_fn(env, "make-hash", |_env, _args| {
        Value::foreign(Box::new(Env::new()), table_dtor)
    });

    register_fn(env, "hash?", |_env, args| match args.as_pair() {
        Some(p) => Value::bool(with_table(&p.car, |_| ()).is_some()),
        None => Value::error("'hash?' expects a parameter"),
    });

    register_fn(env, "hash-set", |_env, args| {
        let key = intern(&args.cdr().car().text());
        let val = args.cdr().cdr().car();
        match with_table(&args.car(), |t| t.put(key, val.clone())) {
            Some(()) => val,
            None => Value::error("'hash-set' expects a hash"),
        }
    });

    register_fn(env, "hash-get", |_env, args| {
        let key = intern(&args.cdr().car().text());
        match with_table(&args.car(), |t| t.get(key)) {
            Some(Some(v)) => v,
            Some(None) => Value::Nil,
            None => Value::error("'hash-get' expects a hash"),
        }
    });

    register_fn(env, "hash-has?", |_env, args| {
        let key = intern(&args.cdr().car().text());
        match with_table(&args.car(), |t| t.get(key).is_some()) {
            Some(found) => Value::bool(found),
            None => Value::error("'hash-has?' expects a hash"),
        }
    });

    register_fn(env, "hash-keys", |_env, args| {
        match with_table(&args.car(), Env::locals) {
            Some(entries) => {
                Value::list(entries.into_iter().map(|(k, _)| Value::atom(k)).collect())
            }
            None => Value::error("'hash-keys' expects a hash"),
        }
    });
}
