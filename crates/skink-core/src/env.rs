use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use lasso::Spur;

use crate::value::{with_resolved, Value};

/// A lexical scope: a mutable binding table plus a parent link. Cloning
/// an `Env` clones the handle, so all clones see the same bindings.
#[derive(Clone, Default)]
pub struct Env {
    bindings: Rc<RefCell<HashMap<Spur, Value>>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Env) -> Self {
        Self {
            bindings: Rc::new(RefCell::new(HashMap::new())),
            parent: Some(Rc::new(parent)),
        }
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn put(&self, name: Spur, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Look `name` up along the parent chain.
    pub fn get(&self, name: Spur) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(v) = env.bindings.borrow().get(&name) {
                return Some(v.clone());
            }
            match &env.parent {
                Some(parent) => env = parent,
                None => return None,
            }
        }
    }

    /// Like `get`, but evaluates to an error value for unbound names.
    pub fn lookup(&self, name: Spur) -> Value {
        match self.get(name) {
            Some(v) => v,
            None => with_resolved(name, |n| Value::error(format!("no such variable '{n}'"))),
        }
    }

    /// The root of the parent chain. Definitions always land here.
    pub fn global(&self) -> Env {
        let mut env = self;
        while let Some(parent) = &env.parent {
            env = parent;
        }
        env.clone()
    }

    /// Snapshot of the bindings in this scope alone, unsorted.
    pub fn locals(&self) -> Vec<(String, Value)> {
        self.bindings
            .borrow()
            .iter()
            .map(|(k, v)| (crate::value::resolve(*k), v.clone()))
            .collect()
    }
}
