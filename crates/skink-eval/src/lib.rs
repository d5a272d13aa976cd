mod eval;
mod prelude;
mod special_forms;

pub use eval::{apply, eval, Interpreter};
pub use prelude::PRELUDE;
pub use special_forms::SPECIAL_FORM_NAMES;
