//! Atomic formulas that read variable values out of the traces.
//!
//! Predicates are the leaves of every formula. Unlike operators they evaluate the traces
//! directly, producing one verdict per cycle for as many cycles as the shortest trace holds.
//!
//! | predicate      | syntax      | holds at cycle `c` when                                 |
//! | -------------- | ----------- | ------------------------------------------------------- |
//! | [`Equal`]      | `(EQ x)`    | `x` has the same value in every trace                   |
//! | [`Equal`]      | `(EQ x.n)`  | `x` has the same value in the first and `n`-th trace    |
//! | [`Select`]     | `x.n`       | `x` is true (or non-zero) in the `n`-th trace           |
//!
//! Trace indices are 1-based.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::catalog::Slot;
use crate::trace::{Trace, TraceError, Value};
use crate::verdicts::Verdicts;
use crate::{horizon, Formula};

/// A variable name together with the slot it occupies in each trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
    slot: Slot,
}

impl Variable {
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        Self {
            name: name.into(),
            slot,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    fn sample<'t>(&self, trace: &'t Trace, cycle: usize) -> Result<Sample<'t>, TraceError> {
        let cycle = cycle as u32;

        match self.slot {
            Slot::Prop(slot) => trace.prop_value_at(slot, cycle).map(Sample::Prop),
            Slot::Term(slot) => trace.term_value_at(slot, cycle).map(Sample::Term),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, PartialEq)]
enum Sample<'t> {
    Prop(bool),
    Term(&'t Value),
}

impl Sample<'_> {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Prop(value) => *value,
            Self::Term(value) => value.is_truthy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("cannot evaluate a predicate without traces")]
    NoTraces,

    #[error("trace index {index} out of range for {count} traces")]
    TraceIndexOutOfRange { index: usize, count: usize },

    #[error("error reading variable \"{name}\": {source}")]
    Read { name: String, source: TraceError },
}

fn select_trace<B: Borrow<Trace>>(traces: &[B], index: usize) -> Result<&Trace, PredicateError> {
    index
        .checked_sub(1)
        .and_then(|offset| traces.get(offset))
        .map(Borrow::borrow)
        .ok_or(PredicateError::TraceIndexOutOfRange {
            index,
            count: traces.len(),
        })
}

/// Predicate comparing the value of a variable between traces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equal {
    variable: Variable,
    trace: Option<usize>,
}

impl Equal {
    /// Require `variable` to hold the same value in every trace.
    pub fn across(variable: Variable) -> Self {
        Self { variable, trace: None }
    }

    /// Require `variable` to hold the same value in the first trace and the trace at `index`.
    pub fn with_trace(variable: Variable, index: usize) -> Self {
        Self {
            variable,
            trace: Some(index),
        }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn trace(&self) -> Option<usize> {
        self.trace
    }

    fn holds(&self, first: &Trace, others: &[&Trace], cycle: usize) -> Result<bool, TraceError> {
        let reference = self.variable.sample(first, cycle)?;

        for other in others {
            if self.variable.sample(other, cycle)? != reference {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl Formula for Equal {
    type Error = PredicateError;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let len = horizon(traces).ok_or(PredicateError::NoTraces)?;
        let first = traces[0].borrow();
        let others: Vec<&Trace> = match self.trace {
            Some(index) => vec![select_trace(traces, index)?],
            None => traces[1..].iter().map(Borrow::borrow).collect(),
        };

        (0..len)
            .map(|cycle| self.holds(first, &others, cycle))
            .collect::<Result<Verdicts, TraceError>>()
            .map_err(|source| PredicateError::Read {
                name: self.variable.name.clone(),
                source,
            })
    }
}

impl Display for Equal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.trace {
            Some(index) => write!(f, "(EQ {}.{})", self.variable, index),
            None => write!(f, "(EQ {})", self.variable),
        }
    }
}

/// Predicate reading a variable of a single trace as a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Select {
    variable: Variable,
    trace: usize,
}

impl Select {
    pub fn new(variable: Variable, trace: usize) -> Self {
        Self { variable, trace }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn trace(&self) -> usize {
        self.trace
    }
}

impl Formula for Select {
    type Error = PredicateError;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let len = horizon(traces).ok_or(PredicateError::NoTraces)?;
        let trace = select_trace(traces, self.trace)?;

        (0..len)
            .map(|cycle| self.variable.sample(trace, cycle).map(|sample| sample.is_truthy()))
            .collect::<Result<Verdicts, TraceError>>()
            .map_err(|source| PredicateError::Read {
                name: self.variable.name.clone(),
                source,
            })
    }
}

impl Display for Select {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.variable, self.trace)
    }
}
