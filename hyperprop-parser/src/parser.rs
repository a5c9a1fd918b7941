mod common;
mod errors;
mod formula;
mod sexpr;

pub use errors::{Arity, ParseError};
pub use formula::parse_formula;
pub use sexpr::{parse_sexpr, SExpr};
