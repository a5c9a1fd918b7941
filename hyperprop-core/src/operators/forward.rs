use std::borrow::Borrow;

use crate::verdicts::Verdicts;
use crate::{Formula, Trace};
use super::{accumulate, shift, BinaryEvaluationError, BinaryOperatorError, Sweep};

pub(crate) fn next(inner: &Verdicts) -> Verdicts {
    shift(inner, Sweep::FromEnd)
}

pub(crate) fn always(inner: &Verdicts) -> Verdicts {
    accumulate(inner, Sweep::FromEnd, true, |verdict, later| verdict && later)
}

pub(crate) fn eventually(inner: &Verdicts) -> Verdicts {
    accumulate(inner, Sweep::FromEnd, false, |verdict, later| verdict || later)
}

pub(crate) fn until(left: &Verdicts, right: &Verdicts) -> Result<Verdicts, BinaryEvaluationError> {
    if left.len() != right.len() {
        return Err(BinaryEvaluationError::MismatchedLengths(left.len(), right.len()));
    }

    let mut table = vec![false; left.len()];
    let mut later = false;

    for cycle in Sweep::FromEnd.cycles(left.len()) {
        later = left[cycle] && (right[cycle] || later);
        table[cycle] = later;
    }

    Ok(Verdicts::from(table))
}

/// Temporal operator that requires its subformula to hold at the next cycle, written `X+`.
///
/// `Next` shifts the verdicts of its subformula one cycle toward the start of the trace. The last
/// cycle has no successor, so `Next` never holds there:
///
/// | cycle | subformula | next  |
/// | ----- | ---------- | ----- |
/// |     0 |       true | false |
/// |     1 |      false |  true |
/// |     2 |       true |  true |
/// |     3 |       true | false |
///
/// ```rust
/// use hyperprop_core::catalog::Slot;
/// use hyperprop_core::operators::Next;
/// use hyperprop_core::predicate::{Equal, Variable};
///
/// let formula = Next::new(Equal::across(Variable::new("ack", Slot::Prop(0))));
/// ```
#[derive(Clone, Debug)]
pub struct Next<F> {
    subformula: F,
}

impl<F> Next<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Next<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| next(&inner))
    }
}

/// Temporal operator that requires its subformula to hold at every cycle from the current one to
/// the end of the trace, written `G+`.
///
/// | cycle | subformula | always |
/// | ----- | ---------- | ------ |
/// |     0 |       true |  false |
/// |     1 |      false |  false |
/// |     2 |       true |   true |
/// |     3 |       true |   true |
#[derive(Clone, Debug)]
pub struct Always<F> {
    subformula: F,
}

impl<F> Always<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Always<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| always(&inner))
    }
}

/// Temporal operator that requires its subformula to hold at the current cycle or some later
/// cycle, written `F+`.
///
/// | cycle | subformula | eventually |
/// | ----- | ---------- | ---------- |
/// |     0 |      false |       true |
/// |     1 |       true |       true |
/// |     2 |      false |      false |
/// |     3 |      false |      false |
#[derive(Clone, Debug)]
pub struct Eventually<F> {
    subformula: F,
}

impl<F> Eventually<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Eventually<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| eventually(&inner))
    }
}

/// Temporal operator that requires its left subformula to hold at every cycle up to and
/// including the first cycle where its right subformula holds, written `U`.
///
/// The right subformula must hold within the trace, and only counts at a cycle where the left
/// subformula holds too. A left subformula that holds until the end of the trace without the
/// right subformula ever holding does not satisfy `Until`.
///
/// | cycle | left  | right | until |
/// | ----- | ----- | ----- | ----- |
/// |     0 |  true | false |  true |
/// |     1 |  true | false |  true |
/// |     2 |  true |  true |  true |
/// |     3 | false |  true | false |
/// |     4 |  true | false | false |
///
/// ```rust
/// use hyperprop_core::catalog::Slot;
/// use hyperprop_core::operators::Until;
/// use hyperprop_core::predicate::{Select, Variable};
///
/// let busy = Select::new(Variable::new("busy", Slot::Prop(0)), 1);
/// let done = Select::new(Variable::new("done", Slot::Prop(1)), 1);
///
/// let formula = Until::new(busy, done);
/// ```
pub struct Until<Left, Right> {
    left: Left,
    right: Right,
}

impl<Left, Right> Until<Left, Right> {
    pub fn new(left: Left, right: Right) -> Self {
        Self { left, right }
    }
}

impl<Left, Right> Formula for Until<Left, Right>
where
    Left: Formula,
    Right: Formula,
{
    type Error = BinaryOperatorError<Left::Error, Right::Error>;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let left_verdicts = self
            .left
            .evaluate(traces)
            .map_err(BinaryOperatorError::LeftError)?;

        let right_verdicts = self
            .right
            .evaluate(traces)
            .map_err(BinaryOperatorError::RightError)?;

        let result = until(&left_verdicts, &right_verdicts)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use crate::operators::BinaryOperatorError;
    use crate::verdicts::Verdicts;
    use crate::{Formula, Trace};
    use super::{Always, Eventually, Next, Until};

    #[test]
    fn always() -> Result<(), Infallible> {
        let input = Verdicts::from([true, false, true, true]);
        let formula = Always::new(input);

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, false, true, true]));
        Ok(())
    }

    #[test]
    fn always_is_conjunction_of_suffix() -> Result<(), Infallible> {
        let input = Verdicts::from([true, true, true]);

        assert_eq!(Always::new(input).evaluate::<Trace>(&[])?, Verdicts::from([true; 3]));
        assert_eq!(Always::new(Verdicts::new()).evaluate::<Trace>(&[])?, Verdicts::new());
        Ok(())
    }

    #[test]
    fn eventually() -> Result<(), Infallible> {
        let input = Verdicts::from([false, true, false, false]);
        let formula = Eventually::new(input);

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, true, false, false]));
        Ok(())
    }

    #[test]
    fn next() -> Result<(), Infallible> {
        let input = Verdicts::from([true, false, true, true]);
        let formula = Next::new(input);

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, true, true, false]));
        Ok(())
    }

    #[test]
    fn until() -> Result<(), BinaryOperatorError<Infallible, Infallible>> {
        let left = Verdicts::from([true, true, true, false, true]);
        let right = Verdicts::from([false, false, true, true, false]);
        let formula = Until::new(left, right);

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, true, true, false, false]));
        Ok(())
    }

    #[test]
    fn until_requires_left_operand_with_right() -> Result<(), BinaryOperatorError<Infallible, Infallible>> {
        let formula = Until::new(Verdicts::from([false, false]), Verdicts::from([true, true]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, false]));
        Ok(())
    }

    #[test]
    fn until_requires_right_operand() -> Result<(), BinaryOperatorError<Infallible, Infallible>> {
        let formula = Until::new(Verdicts::from([true; 3]), Verdicts::from([false; 3]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false; 3]));
        Ok(())
    }
}
