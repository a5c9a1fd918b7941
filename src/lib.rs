//! An offline monitor for [HyperPLTL] formulas over finite execution traces.
//!
//! Hyperproperties relate several executions of a system to each other. A typical example is
//! non-interference: _whenever two runs start with the same public inputs, their public outputs
//! must agree at every cycle_. Checking such a requirement needs more than one trace at a time, so
//! every formula in this crate is evaluated over a list of [`Trace`]s that are sampled in lockstep,
//! one discrete cycle at a time. The logic has the usual boolean connectives, the future operators
//! `X+`, `G+`, `F+` and `U`, and the past operators `X-`, `G-` and `F-`.
//!
//! [HyperPLTL]: https://en.wikipedia.org/wiki/Linear_temporal_logic
//!
//! # Examples
//!
//! Variables are registered in a [`VariableCatalog`] before any formula mentioning them is parsed.
//! The catalog assigns each variable a slot, and traces store one signal per slot:
//!
//! ```rust
//! use hyperprop::{evaluate, parse_formula, Trace, VariableCatalog};
//! use hyperprop::trace::Value;
//!
//! let mut catalog = VariableCatalog::new();
//! let x = catalog.add_term_var("x").unwrap();
//!
//! let mut first = Trace::new(catalog.num_props(), catalog.num_terms());
//! let mut second = Trace::new(catalog.num_props(), catalog.num_terms());
//!
//! for (cycle, value) in [3, 5, 5, 8].into_iter().enumerate() {
//!     first.update_term_value(x, cycle as u32, Value::Scalar(value));
//!     second.update_term_value(x, cycle as u32, Value::Scalar(value));
//! }
//!
//! let property = parse_formula("(G+ (EQ x))", &catalog).unwrap();
//!
//! assert!(evaluate(&[first, second], &property).unwrap());
//! ```
//!
//! Properties may also be assembled directly from the [`operators`], which accept any
//! [`Formula`] as an operand.

extern crate hyperprop_core as core;

#[doc(inline)]
pub use core::{evaluate, evaluate_at, horizon, EvaluationError, Formula};

#[doc(inline)]
pub use core::{catalog, codec, monitor, operators, predicate, property, trace, verdicts};

#[doc(inline)]
pub use core::{Monitor, Property, Trace, VariableCatalog, Verdicts};

#[cfg(feature = "parser")]
#[doc(inline)]
pub use hyperprop_parser::{parse_formula, parse_sexpr, ParseError, SExpr};
