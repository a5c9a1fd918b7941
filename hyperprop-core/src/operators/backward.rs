//! Past temporal operators.
//!
//! These mirror [`Next`](super::Next), [`Always`](super::Always) and
//! [`Eventually`](super::Eventually), looking from the current cycle back toward cycle 0.

use std::borrow::Borrow;

use crate::verdicts::Verdicts;
use crate::{Formula, Trace};
use super::{accumulate, shift, Sweep};

pub(crate) fn previous(inner: &Verdicts) -> Verdicts {
    shift(inner, Sweep::FromStart)
}

pub(crate) fn historically(inner: &Verdicts) -> Verdicts {
    accumulate(inner, Sweep::FromStart, true, |verdict, earlier| verdict && earlier)
}

pub(crate) fn once(inner: &Verdicts) -> Verdicts {
    accumulate(inner, Sweep::FromStart, false, |verdict, earlier| verdict || earlier)
}

/// Temporal operator that requires its subformula to have held at the previous cycle, written
/// `X-`. Cycle 0 has no predecessor, so `Previous` never holds there.
///
/// | cycle | subformula | previous |
/// | ----- | ---------- | -------- |
/// |     0 |       true |    false |
/// |     1 |      false |     true |
/// |     2 |       true |    false |
#[derive(Clone, Debug)]
pub struct Previous<F> {
    subformula: F,
}

impl<F> Previous<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Previous<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| previous(&inner))
    }
}

/// Temporal operator that requires its subformula to have held at every cycle from cycle 0 up to
/// and including the current one, written `G-`.
#[derive(Clone, Debug)]
pub struct Historically<F> {
    subformula: F,
}

impl<F> Historically<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Historically<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| historically(&inner))
    }
}

/// Temporal operator that requires its subformula to have held at some cycle up to and including
/// the current one, written `F-`.
#[derive(Clone, Debug)]
pub struct Once<F> {
    subformula: F,
}

impl<F> Once<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Once<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| once(&inner))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use crate::operators::{Always, Next};
    use crate::verdicts::Verdicts;
    use crate::{Formula, Trace};
    use super::{Historically, Once, Previous};

    #[test]
    fn previous() -> Result<(), Infallible> {
        let formula = Previous::new(Verdicts::from([true, false, true]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, true, false]));
        Ok(())
    }

    #[test]
    fn historically() -> Result<(), Infallible> {
        let formula = Historically::new(Verdicts::from([true, true, false, true]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, true, false, false]));
        Ok(())
    }

    #[test]
    fn once() -> Result<(), Infallible> {
        let formula = Once::new(Verdicts::from([false, false, true, false]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, false, true, true]));
        Ok(())
    }

    #[test]
    fn mixed_polarity() -> Result<(), Infallible> {
        let input = Verdicts::from([true, false, true, true, true]);

        // Always over Previous is false at cycle 0 because Previous is false there.
        let always_previous = Always::new(Previous::new(input.clone()));
        assert_eq!(always_previous.evaluate::<Trace>(&[])?, Verdicts::from([false, false, false, true, true]));

        let once_next = Once::new(Next::new(input));
        assert_eq!(once_next.evaluate::<Trace>(&[])?, Verdicts::from([false, true, true, true, true]));

        Ok(())
    }
}
