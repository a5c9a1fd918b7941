//! Combinatorial operators for constructing formulas.
//!
//! Operators never read the traces themselves. They delegate that to their operands and combine
//! the [`Verdicts`](crate::Verdicts) the operands produce, so every formula must bottom out in a
//! [`predicate`](crate::predicate) such as [`Equal`](crate::predicate::Equal).
//!
//! # First Order Operators
//!
//!   - [`Not`]
//!   - [`And`]
//!   - [`Or`]
//!   - [`Implies`]
//!
//! These operators are time-invariant: the verdict at a cycle only depends on the verdicts of the
//! operands at the same cycle. [`And`] and [`Or`] accept any non-zero number of operands.
//!
//! # Temporal Operators
//!
//! Temporal operators look at cycles other than the current one. Each comes in a future flavour,
//! which looks from the current cycle toward the end of the trace, and a past flavour, which looks
//! from the current cycle back to cycle 0:
//!
//! | future             | syntax | past                | syntax |
//! | ------------------ | ------ | ------------------- | ------ |
//! | [`Next`]           | `X+`   | [`Previous`]        | `X-`   |
//! | [`Always`]         | `G+`   | [`Historically`]    | `G-`   |
//! | [`Eventually`]     | `F+`   | [`Once`]            | `F-`   |
//! | [`Until`]          | `U`    |                     |        |
//!
//! For a trace with `N` cycles, the operators follow these recurrences:
//!
//! ```text
//! X+ f (c) = f(c + 1)                    X+ f (N - 1) = false
//! X- f (c) = f(c - 1)                    X- f (0)     = false
//! G+ f (c) = f(c) and G+ f (c + 1)       G+ f (N)     = true
//! G- f (c) = f(c) and G- f (c - 1)       G- f (-1)    = true
//! F+ f (c) = f(c) or F+ f (c + 1)        F+ f (N)     = false
//! F- f (c) = f(c) or F- f (c - 1)        F- f (-1)    = false
//! l U r (c) = l(c) and (r(c) or l U r (c + 1))    l U r (N) = false
//! ```
//!
//! Future operators fill their table with one sweep from the last cycle down to cycle 0, and past
//! operators with one sweep from cycle 0 up to the last cycle. Because every operand is evaluated
//! into a full table first, future and past operators can be nested freely.
//!
//! # Examples
//!
//! ```rust
//! use hyperprop_core::catalog::Slot;
//! use hyperprop_core::operators::{Always, Implies, Next};
//! use hyperprop_core::predicate::{Equal, Variable};
//!
//! let input = Equal::across(Variable::new("input", Slot::Term(0)));
//! let output = Equal::across(Variable::new("output", Slot::Term(1)));
//!
//! let noninterference = Always::new(Implies::new(input, Next::new(output)));
//! ```
//!
//! # Custom Operators
//!
//! Users can define their own operators by implementing the [`Formula`](crate::Formula) trait for
//! their own types.

use either::Either;

use crate::verdicts::Verdicts;

mod backward;
mod first_order;
mod forward;

pub use backward::{Historically, Once, Previous};
pub use first_order::{And, Implies, NaryOperatorError, Not, Or, BinaryEvaluationError, BinaryOperatorError};
pub use forward::{Always, Eventually, Next, Until};

pub(crate) use backward::{historically, once, previous};
pub(crate) use first_order::{conjoin, disjoin, imply, negate};
pub(crate) use forward::{always, eventually, next, until};

/// Order in which a temporal operator visits the cycles of its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// From cycle 0 up to the last cycle, used by past operators.
    FromStart,
    /// From the last cycle down to cycle 0, used by future operators.
    FromEnd,
}

impl Sweep {
    fn cycles(self, len: usize) -> impl Iterator<Item = usize> {
        match self {
            Self::FromStart => Either::Left(0..len),
            Self::FromEnd => Either::Right((0..len).rev()),
        }
    }
}

/// Fold `combine` over the cycles of `inner` in `sweep` order, starting from `init`, and record
/// the running value at every cycle.
fn accumulate<F>(inner: &Verdicts, sweep: Sweep, init: bool, combine: F) -> Verdicts
where
    F: Fn(bool, bool) -> bool,
{
    let mut table = vec![init; inner.len()];
    let mut state = init;

    for cycle in sweep.cycles(inner.len()) {
        state = combine(inner[cycle], state);
        table[cycle] = state;
    }

    Verdicts::from(table)
}

/// Move every verdict one cycle against the `sweep` direction, filling the vacated cycle with
/// `false`.
fn shift(inner: &Verdicts, sweep: Sweep) -> Verdicts {
    let mut previous = false;
    let mut table = vec![false; inner.len()];

    for cycle in sweep.cycles(inner.len()) {
        table[cycle] = previous;
        previous = inner[cycle];
    }

    Verdicts::from(table)
}

#[cfg(test)]
mod tests {
    use super::{accumulate, shift, Sweep};
    use crate::verdicts::Verdicts;

    #[test]
    fn sweep_order() {
        assert_eq!(Sweep::FromStart.cycles(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(Sweep::FromEnd.cycles(3).collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(Sweep::FromEnd.cycles(0).count(), 0);
    }

    #[test]
    fn accumulate_records_running_value() {
        let inner = Verdicts::from([true, false, true, true]);

        assert_eq!(accumulate(&inner, Sweep::FromEnd, true, |v, s| v && s), Verdicts::from([false, false, true, true]));
        assert_eq!(accumulate(&inner, Sweep::FromStart, false, |v, s| v || s), Verdicts::from([true; 4]));
    }

    #[test]
    fn shift_fills_boundary() {
        let inner = Verdicts::from([true, false, true]);

        assert_eq!(shift(&inner, Sweep::FromEnd), Verdicts::from([false, true, false]));
        assert_eq!(shift(&inner, Sweep::FromStart), Verdicts::from([false, true, false]));
        assert_eq!(shift(&Verdicts::from([true, true, false]), Sweep::FromEnd), Verdicts::from([true, false, false]));
        assert_eq!(shift(&Verdicts::from([true, true, false]), Sweep::FromStart), Verdicts::from([false, true, true]));
    }
}
