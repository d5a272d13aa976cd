mod error;
pub mod lexer;
mod reader;

pub use error::ReadError;
pub use reader::{read, read_program};
