//! Core types for monitoring HyperPLTL properties over finite execution traces.
//!
//! A property relates several executions of the same system, for example "whenever two runs agree
//! on their inputs, they agree on their outputs at the next cycle". Executions are recorded as
//! [`Trace`]s holding one step-function [`Signal`](trace::Signal) per variable, and properties are
//! evaluated against an ordered list of traces.
//!
//! Every formula implements [`Formula`], which evaluates the whole list of traces at once and
//! returns the truth value of the formula at every cycle as [`Verdicts`]. Temporal operators
//! compute their table with a single sweep over the verdicts of their operands, so evaluating a
//! formula costs time linear in both the formula size and the trace length.
//!
//! ```rust
//! use hyperprop_core::{evaluate, Trace};
//! use hyperprop_core::catalog::Slot;
//! use hyperprop_core::operators::Always;
//! use hyperprop_core::predicate::{Equal, Variable};
//! use hyperprop_core::trace::Value;
//!
//! let mut first = Trace::new(0, 1);
//! let mut second = Trace::new(0, 1);
//!
//! for cycle in 0..4 {
//!     first.update_term_value(0, cycle, Value::Scalar(cycle));
//!     second.update_term_value(0, cycle, Value::Scalar(cycle));
//! }
//!
//! let x = Variable::new("x", Slot::Term(0));
//! let formula = Always::new(Equal::across(x));
//!
//! assert!(evaluate(&[first, second], &formula).unwrap());
//! ```

use std::borrow::Borrow;
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;

pub mod catalog;
pub mod codec;
pub mod monitor;
pub mod operators;
pub mod predicate;
pub mod property;
pub mod trace;
pub mod verdicts;

pub use crate::catalog::VariableCatalog;
pub use crate::monitor::Monitor;
pub use crate::property::Property;
pub use crate::trace::Trace;
pub use crate::verdicts::Verdicts;

/// A formula evaluated over an ordered list of traces.
///
/// The traces may be owned or borrowed, so a formula can be checked against any selection of
/// recorded traces without copying them:
///
/// ```rust
/// # use hyperprop_core::{Formula, Trace, Verdicts};
/// let (first, second) = (Trace::new(0, 0), Trace::new(0, 0));
/// let formula = Verdicts::from([true]);
///
/// assert_eq!(formula.evaluate(&[&second, &first]), Ok(Verdicts::from([true])));
/// ```
pub trait Formula {
    type Error;
    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error>;
}

impl<T> Formula for &T
where
    T: Formula + ?Sized,
{
    type Error = T::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        (**self).evaluate(traces)
    }
}

impl<T> Formula for Box<T>
where
    T: Formula + ?Sized,
{
    type Error = T::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        (**self).evaluate(traces)
    }
}

impl<T> Formula for Arc<T>
where
    T: Formula + ?Sized,
{
    type Error = T::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        (**self).evaluate(traces)
    }
}

impl<T> Formula for Rc<T>
where
    T: Formula + ?Sized,
{
    type Error = T::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        (**self).evaluate(traces)
    }
}

/// A table of verdicts is a formula that ignores its traces.
impl Formula for Verdicts {
    type Error = std::convert::Infallible;

    fn evaluate<B: Borrow<Trace>>(&self, _: &[B]) -> Result<Verdicts, Self::Error> {
        Ok(self.clone())
    }
}

/// Number of cycles shared by every trace in `traces`.
///
/// Traces of different lengths are evaluated over the length of the shortest one. Returns `None`
/// when no traces are given.
pub fn horizon<B: Borrow<Trace>>(traces: &[B]) -> Option<usize> {
    traces.iter().map(|trace| Borrow::<Trace>::borrow(trace).len()).min()
}

#[derive(Debug, Error)]
enum ErrorKind<Err> {
    #[error("Error evaluating formula: {0}")]
    FormulaError(Err),

    #[error("Empty verdict table")]
    EmptyVerdicts,

    #[error("Cycle {cycle} is outside of the evaluated {len} cycles")]
    CycleOutOfRange { cycle: usize, len: usize },
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct EvaluationError<Err>(ErrorKind<Err>);

impl<Err> EvaluationError<Err> {
    fn wrap(err: Err) -> Self {
        Self(ErrorKind::FormulaError(err))
    }

    fn empty() -> Self {
        Self(ErrorKind::EmptyVerdicts)
    }

    fn out_of_range(cycle: usize, len: usize) -> Self {
        Self(ErrorKind::CycleOutOfRange { cycle, len })
    }

    /// The error produced by the formula, if evaluation failed inside it.
    pub fn formula_error(&self) -> Option<&Err> {
        match &self.0 {
            ErrorKind::FormulaError(err) => Some(err),
            _ => None,
        }
    }
}

/// Evaluate `formula` over `traces` and return its verdict at cycle 0.
///
/// This answers whether the formula holds from the very start of the traces.
pub fn evaluate<B, F>(traces: &[B], formula: F) -> Result<bool, EvaluationError<F::Error>>
where
    B: Borrow<Trace>,
    F: Formula,
{
    formula
        .evaluate(traces)
        .map_err(EvaluationError::wrap)
        .and_then(|verdicts| verdicts.at(0).ok_or_else(EvaluationError::empty))
}

/// Evaluate `formula` over `traces` and return its verdict at `cycle`.
pub fn evaluate_at<B, F>(traces: &[B], formula: F, cycle: usize) -> Result<bool, EvaluationError<F::Error>>
where
    B: Borrow<Trace>,
    F: Formula,
{
    let verdicts = formula.evaluate(traces).map_err(EvaluationError::wrap)?;

    verdicts
        .at(cycle)
        .ok_or_else(|| EvaluationError::out_of_range(cycle, verdicts.len()))
}
