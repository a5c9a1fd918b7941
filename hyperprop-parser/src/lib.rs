//! Parse HyperPLTL formulas from strings into hyperprop properties.
//!
//! # Testing
//!
//! Run the parser tests from the workspace root:
//!
//! ```bash
//! cargo test -p hyperprop-parser
//! ```
//!
//! # Parsing strings into properties
//!
//! Formulas are fully parenthesized prefix expressions such as
//! `(G+ (IMPLIES (EQ x) (X+ (EQ y))))`. Parsing happens in two layers:
//!
//! - [`parse_sexpr`] reads the text into an untyped [`SExpr`] tree, reporting unbalanced
//!   parentheses and trailing input.
//! - [`parse_formula`] lowers that tree into a [`Property`], checking operator arities and
//!   identifiers and resolving every variable against a [`VariableCatalog`].
//!
//! ```rust
//! use hyperprop_parser::{parse_formula, VariableCatalog};
//!
//! let mut catalog = VariableCatalog::new();
//! catalog.add_term_var("x").unwrap();
//!
//! let property = parse_formula("(G (EQ x))", &catalog).unwrap();
//!
//! assert_eq!(property.to_string(), "(G+ (EQ x))");
//! ```

mod parser;

pub use hyperprop_core::property::Property;
pub use hyperprop_core::{Formula, Trace, VariableCatalog};

pub use parser::{parse_formula, parse_sexpr, Arity, ParseError, SExpr};
