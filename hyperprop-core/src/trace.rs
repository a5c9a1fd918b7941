//! Sparse step-function storage for the signals of one execution.
//!
//! A [`Signal`] stores the value of a single variable across cycles. Rather than keeping one value
//! per cycle, a signal only records the cycles where its value _changes_ and answers queries by
//! sampling the most recent change-point at or before the requested cycle:
//!
//! ```text
//! cycle:  0  1  2  3  4  5
//! write:  4  4  7  7  7  2
//! stored: (0, 4) (2, 7) (5, 2)
//! ```
//!
//! A [`Trace`] groups the proposition (boolean) signals and term ([`Value`]) signals of one
//! execution together with the highest cycle written to any of them.
//!
//! # Writes
//!
//! Writes must arrive in strictly increasing cycle order, and the first write to a signal must
//! happen at cycle 0. A signal that has been extended with [`Trace::extend_to_cycle`] instead
//! accepts its first write at any cycle after the extension. Breaking these rules is a bug in the
//! code populating the trace, so [`Trace::update_term_value`] and [`Trace::update_prop_value`]
//! panic. Callers working from untrusted data can use the `try_` variants instead.
//!
//! ```rust
//! use hyperprop_core::trace::{Trace, Value};
//!
//! let mut trace = Trace::new(1, 1);
//!
//! trace.update_prop_value(0, 0, true);
//! trace.update_term_value(0, 0, Value::Scalar(4));
//! trace.update_term_value(0, 1, Value::Scalar(4));
//! trace.update_term_value(0, 2, Value::Scalar(7));
//!
//! assert_eq!(trace.len(), 3);
//! assert_eq!(trace.term_value_at(0, 1).unwrap(), &Value::Scalar(4));
//! assert_eq!(trace.prop_value_at(0, 2).unwrap(), true);
//! assert_eq!(trace.term_signal(0).unwrap().change_points().len(), 2);
//! ```
//!
//! # Equality
//!
//! Two signals are equal only when their change-point sequences are identical. A signal that
//! stored a redundant change-point is therefore not equal to a compressed signal describing the
//! same step function.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::catalog::Namespace;

/// The value held by a term variable at one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Scalar(u32),
    Array(Vec<u32>),
}

impl Value {
    pub fn width(&self) -> Width {
        match self {
            Self::Scalar(_) => Width::Scalar,
            Self::Array(elements) => Width::Array(elements.len()),
        }
    }

    /// A scalar is truthy when non-zero, an array when any element is non-zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Scalar(value) => *value != 0,
            Self::Array(elements) => elements.iter().any(|element| *element != 0),
        }
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<u32>> for Value {
    fn from(elements: Vec<u32>) -> Self {
        Self::Array(elements)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{}", value),
            Self::Array(elements) => {
                let parts: Vec<String> = elements.iter().map(u32::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Shape of the values stored in a term signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Scalar,
    Array(usize),
}

impl Width {
    /// Number of bytes one value of this shape occupies in the binary trace format.
    pub fn bytes(&self) -> usize {
        match self {
            Self::Scalar => 4,
            Self::Array(arity) => 4 * arity,
        }
    }
}

impl Display for Width {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Array(arity) => write!(f, "array[{}]", arity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("{namespace} slot {slot} out of range for trace with {count} slots")]
    SlotOutOfRange { namespace: Namespace, slot: usize, count: usize },

    #[error("first write to a signal must happen at cycle 0, got cycle {0}")]
    NonInitialWrite(u32),

    #[error("cycle {cycle} is not after the last written cycle {last}")]
    CycleOutOfOrder { cycle: u32, last: u32 },

    #[error("cannot extend to cycle {cycle} which is before cycle {last}")]
    ShrinkingExtent { cycle: u32, last: u32 },

    #[error("term slot {slot} holds {expected} values, cannot write a {found} value")]
    VariantMismatch { slot: usize, expected: Width, found: Width },

    #[error("signal contains no data")]
    EmptySignal,

    #[error("cycle {cycle} precedes the first value of the signal at cycle {first}")]
    CycleBeforeFirst { cycle: u32, first: u32 },
}

/// Step-function time series of a single variable.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    points: Vec<(u32, T)>,
    last_cycle: Option<u32>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            last_cycle: None,
        }
    }
}

impl<T> PartialEq for Signal<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highest cycle written to or extended over, if any.
    pub fn last_cycle(&self) -> Option<u32> {
        self.last_cycle
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The stored `(cycle, value)` pairs in increasing cycle order.
    pub fn change_points(&self) -> &[(u32, T)] {
        &self.points
    }

    /// The first stored value, which determines the shape of the signal.
    pub fn first(&self) -> Option<&T> {
        self.points.first().map(|(_, value)| value)
    }

    fn check_write(&self, cycle: u32) -> Result<(), TraceError> {
        match self.last_cycle {
            None if cycle != 0 => Err(TraceError::NonInitialWrite(cycle)),
            Some(last) if cycle <= last => Err(TraceError::CycleOutOfOrder { cycle, last }),
            _ => Ok(()),
        }
    }

    /// Record `value` at `cycle`.
    ///
    /// A value equal to the most recent change-point is not stored again, though the highest
    /// observed cycle still advances.
    pub fn update(&mut self, cycle: u32, value: T) -> Result<(), TraceError>
    where
        T: PartialEq,
    {
        self.check_write(cycle)?;

        let repeated = matches!(self.points.last(), Some((_, last)) if *last == value);

        if !repeated {
            self.points.push((cycle, value));
        }

        self.last_cycle = Some(cycle);
        Ok(())
    }

    /// Declare the signal present up to `cycle` without writing a value.
    ///
    /// Extending an untouched signal to cycle 0 declares nothing, so it is left untouched and will
    /// still accept its first write at cycle 0.
    pub fn extend_to_cycle(&mut self, cycle: u32) -> Result<(), TraceError> {
        match self.last_cycle {
            Some(last) if cycle < last => Err(TraceError::ShrinkingExtent { cycle, last }),
            _ => {
                self.stretch(cycle);
                Ok(())
            }
        }
    }

    /// Extend to `cycle`, which must not precede the highest observed cycle.
    fn stretch(&mut self, cycle: u32) {
        if self.last_cycle.is_some() || cycle > 0 {
            self.last_cycle = Some(cycle);
        }
    }

    /// Sample the step function at `cycle`.
    pub fn at(&self, cycle: u32) -> Result<&T, TraceError> {
        let index = self.points.partition_point(|(time, _)| *time <= cycle);

        match index.checked_sub(1) {
            Some(index) => Ok(&self.points[index].1),
            None => match self.points.first() {
                Some((first, _)) => Err(TraceError::CycleBeforeFirst { cycle, first: *first }),
                None => Err(TraceError::EmptySignal),
            },
        }
    }
}

impl<T> FromIterator<(u32, T)> for Signal<T>
where
    T: PartialEq,
{
    /// Collect a signal from writes, panicking if they break the write ordering rules.
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (u32, T)>,
    {
        let mut signal = Self::new();

        for (cycle, value) in iter {
            if let Err(err) = signal.update(cycle, value) {
                panic!("invalid signal write: {}", err);
            }
        }

        signal
    }
}

/// The proposition and term signals of a single execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    props: Vec<Signal<bool>>,
    terms: Vec<Signal<Value>>,
    last_cycle: u32,
}

// A trace always covers cycle 0, so it has no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl Trace {
    /// Create a trace with `num_props` proposition slots and `num_terms` term slots.
    pub fn new(num_props: usize, num_terms: usize) -> Self {
        Self {
            props: (0..num_props).map(|_| Signal::new()).collect(),
            terms: (0..num_terms).map(|_| Signal::new()).collect(),
            last_cycle: 0,
        }
    }

    pub fn num_props(&self) -> usize {
        self.props.len()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn last_cycle(&self) -> u32 {
        self.last_cycle
    }

    /// Number of cycles in the trace, which is one more than the highest cycle.
    pub fn len(&self) -> usize {
        self.last_cycle as usize + 1
    }

    pub fn prop_signal(&self, slot: usize) -> Result<&Signal<bool>, TraceError> {
        self.props.get(slot).ok_or(TraceError::SlotOutOfRange {
            namespace: Namespace::Prop,
            slot,
            count: self.props.len(),
        })
    }

    pub fn term_signal(&self, slot: usize) -> Result<&Signal<Value>, TraceError> {
        self.terms.get(slot).ok_or(TraceError::SlotOutOfRange {
            namespace: Namespace::Term,
            slot,
            count: self.terms.len(),
        })
    }

    pub fn prop_signals(&self) -> &[Signal<bool>] {
        &self.props
    }

    pub fn term_signals(&self) -> &[Signal<Value>] {
        &self.terms
    }

    fn advance(&mut self, cycle: u32) {
        self.last_cycle = self.last_cycle.max(cycle);
    }

    /// Write a proposition value, reporting ordering and range violations as errors.
    pub fn try_update_prop_value(&mut self, slot: usize, cycle: u32, value: bool) -> Result<(), TraceError> {
        let count = self.props.len();
        let signal = self.props.get_mut(slot).ok_or(TraceError::SlotOutOfRange {
            namespace: Namespace::Prop,
            slot,
            count,
        })?;

        signal.update(cycle, value)?;
        self.advance(cycle);
        Ok(())
    }

    /// Write a term value, reporting ordering, range and shape violations as errors.
    pub fn try_update_term_value(&mut self, slot: usize, cycle: u32, value: Value) -> Result<(), TraceError> {
        let count = self.terms.len();
        let signal = self.terms.get_mut(slot).ok_or(TraceError::SlotOutOfRange {
            namespace: Namespace::Term,
            slot,
            count,
        })?;

        if let Some(first) = signal.first() {
            let (expected, found) = (first.width(), value.width());

            if expected != found {
                return Err(TraceError::VariantMismatch { slot, expected, found });
            }
        }

        signal.update(cycle, value)?;
        self.advance(cycle);
        Ok(())
    }

    /// Write a proposition value.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range or `cycle` breaks the write ordering of the signal.
    pub fn update_prop_value(&mut self, slot: usize, cycle: u32, value: bool) {
        if let Err(err) = self.try_update_prop_value(slot, cycle, value) {
            panic!("invalid proposition update: {}", err);
        }
    }

    /// Write a term value.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range, `cycle` breaks the write ordering of the signal, or the
    /// shape of `value` differs from the values already stored in the slot.
    pub fn update_term_value(&mut self, slot: usize, cycle: u32, value: Value) {
        if let Err(err) = self.try_update_term_value(slot, cycle, value) {
            panic!("invalid term update: {}", err);
        }
    }

    pub fn prop_value_at(&self, slot: usize, cycle: u32) -> Result<bool, TraceError> {
        self.prop_signal(slot)?.at(cycle).copied()
    }

    pub fn term_value_at(&self, slot: usize, cycle: u32) -> Result<&Value, TraceError> {
        self.term_signal(slot)?.at(cycle)
    }

    /// Advance the trace and every signal in it to `cycle` without writing data.
    ///
    /// No signal ever runs past the trace, so checking the trace alone covers every signal.
    pub fn try_extend_to_cycle(&mut self, cycle: u32) -> Result<(), TraceError> {
        if cycle < self.last_cycle {
            return Err(TraceError::ShrinkingExtent {
                cycle,
                last: self.last_cycle,
            });
        }

        self.props.iter_mut().for_each(|signal| signal.stretch(cycle));
        self.terms.iter_mut().for_each(|signal| signal.stretch(cycle));

        self.last_cycle = cycle;
        Ok(())
    }

    /// Advance the trace and every signal in it to `cycle` without writing data.
    ///
    /// # Panics
    ///
    /// Panics if `cycle` is before the last cycle of the trace.
    pub fn extend_to_cycle(&mut self, cycle: u32) {
        if let Err(err) = self.try_extend_to_cycle(cycle) {
            panic!("invalid trace extension: {}", err);
        }
    }
}
