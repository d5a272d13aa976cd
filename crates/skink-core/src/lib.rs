pub mod env;
pub mod value;

pub use env::Env;
pub use lasso::Spur;
pub use value::{
    format_number, intern, is_numeric_text, resolve, with_resolved, ApplyFn, Foreign, ForeignDtor,
    Lambda, ListIter, NativeFn, Pair, Value,
};
