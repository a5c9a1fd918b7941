use std::borrow::Borrow;

use nonempty::NonEmpty;
use thiserror::Error;

use crate::verdicts::Verdicts;
use crate::{Formula, Trace};

/// Error produced when combining the verdict tables of several operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryEvaluationError {
    #[error("Verdict tables have mismatched lengths: [{0}] [{1}]")]
    MismatchedLengths(usize, usize),
}

/// Error produced during the evaluation of a binary operator.
///
/// An error can occur when evaluating a binary operator in the following circumstances:
///
///   1. An error occurs during the evaluation of the left subformula
///   2. An error occurs during the evaluation of the right subformula
///   3. The verdict tables of the two subformulas cannot be combined, resulting in a
///      [`BinaryEvaluationError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinaryOperatorError<L, R> {
    /// An error produced by the subformula on the left of the operator
    #[error("Left subformula error: {0}")]
    LeftError(L),

    /// An error produced by the subformula on the right of the operator
    #[error("Right subformula error: {0}")]
    RightError(R),

    #[error("Error evaluating binary operator: {0}")]
    EvaluationError(#[from] BinaryEvaluationError),
}

/// Error produced during the evaluation of an operator with any number of operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NaryOperatorError<E> {
    #[error("Operand {index} error: {error}")]
    OperandError { index: usize, error: E },

    #[error("Error evaluating operator: {0}")]
    EvaluationError(#[from] BinaryEvaluationError),
}

pub(crate) fn negate(inner: &Verdicts) -> Verdicts {
    inner.iter().map(|verdict| !verdict).collect()
}

fn pointwise<F>(left: &Verdicts, right: &Verdicts, f: F) -> Result<Verdicts, BinaryEvaluationError>
where
    F: Fn(bool, bool) -> bool,
{
    if left.len() != right.len() {
        return Err(BinaryEvaluationError::MismatchedLengths(left.len(), right.len()));
    }

    Ok(left.iter().zip(right.iter()).map(|(l, r)| f(l, r)).collect())
}

fn fold<'a, I, F>(mut operands: I, f: F) -> Result<Verdicts, BinaryEvaluationError>
where
    I: Iterator<Item = &'a Verdicts>,
    F: Fn(bool, bool) -> bool + Copy,
{
    let first = operands.next().cloned().unwrap_or_default();
    operands.try_fold(first, |acc, operand| pointwise(&acc, operand, f))
}

pub(crate) fn conjoin<'a, I>(operands: I) -> Result<Verdicts, BinaryEvaluationError>
where
    I: IntoIterator<Item = &'a Verdicts>,
{
    fold(operands.into_iter(), |l, r| l && r)
}

pub(crate) fn disjoin<'a, I>(operands: I) -> Result<Verdicts, BinaryEvaluationError>
where
    I: IntoIterator<Item = &'a Verdicts>,
{
    fold(operands.into_iter(), |l, r| l || r)
}

pub(crate) fn imply(antecedent: &Verdicts, consequent: &Verdicts) -> Result<Verdicts, BinaryEvaluationError> {
    pointwise(antecedent, consequent, |l, r| !l || r)
}

/// First-order operator that inverts its subformula, written `NOT`.
///
/// | cycle | subformula | not   |
/// | ----- | ---------- | ----- |
/// |     0 |       true | false |
/// |     1 |      false |  true |
#[derive(Debug, Clone, PartialEq)]
pub struct Not<F> {
    subformula: F,
}

impl<F> Not<F> {
    pub fn new(subformula: F) -> Self {
        Self { subformula }
    }
}

impl<F> Formula for Not<F>
where
    F: Formula,
{
    type Error = F::Error;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        self.subformula.evaluate(traces).map(|inner| negate(&inner))
    }
}

#[derive(Debug, Clone)]
struct Nary<F> {
    operands: NonEmpty<F>,
}

impl<F> Nary<F>
where
    F: Formula,
{
    fn evaluate_operands<B>(&self, traces: &[B]) -> Result<Vec<Verdicts>, NaryOperatorError<F::Error>>
    where
        B: Borrow<Trace>,
    {
        self.operands
            .iter()
            .enumerate()
            .map(|(index, operand)| {
                operand
                    .evaluate(traces)
                    .map_err(|error| NaryOperatorError::OperandError { index, error })
            })
            .collect()
    }
}

/// First-order operator that requires all of its operands to hold, written `AND`.
///
/// | cycle | first | second | and   |
/// | ----- | ----- | ------ | ----- |
/// |     0 |  true |   true |  true |
/// |     1 |  true |  false | false |
/// |     2 | false |  false | false |
///
/// ```rust
/// use hyperprop_core::catalog::Slot;
/// use hyperprop_core::operators::And;
/// use hyperprop_core::predicate::{Equal, Variable};
///
/// let x = Equal::across(Variable::new("x", Slot::Term(0)));
/// let y = Equal::across(Variable::new("y", Slot::Term(1)));
///
/// let formula = And::new(x, y);
/// ```
#[derive(Debug, Clone)]
pub struct And<F>(Nary<F>);

impl<F> And<F> {
    pub fn new(left: F, right: F) -> Self {
        Self::from_operands(NonEmpty { head: left, tail: vec![right] })
    }

    pub fn from_operands(operands: NonEmpty<F>) -> Self {
        Self(Nary { operands })
    }
}

impl<F> Formula for And<F>
where
    F: Formula,
{
    type Error = NaryOperatorError<F::Error>;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let operands = self.0.evaluate_operands(traces)?;
        let result = conjoin(&operands)?;

        Ok(result)
    }
}

/// First-order operator that requires any of its operands to hold, written `OR`.
///
/// | cycle | first | second | or    |
/// | ----- | ----- | ------ | ----- |
/// |     0 |  true |   true |  true |
/// |     1 |  true |  false |  true |
/// |     2 | false |  false | false |
#[derive(Debug, Clone)]
pub struct Or<F>(Nary<F>);

impl<F> Or<F> {
    pub fn new(left: F, right: F) -> Self {
        Self::from_operands(NonEmpty { head: left, tail: vec![right] })
    }

    pub fn from_operands(operands: NonEmpty<F>) -> Self {
        Self(Nary { operands })
    }
}

impl<F> Formula for Or<F>
where
    F: Formula,
{
    type Error = NaryOperatorError<F::Error>;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let operands = self.0.evaluate_operands(traces)?;
        let result = disjoin(&operands)?;

        Ok(result)
    }
}

/// First-order operator that requires its consequent to hold whenever its antecedent holds,
/// written `IMPLIES`.
///
/// A cycle where the antecedent does not hold satisfies the implication vacuously.
///
/// | cycle | antecedent | consequent | implies |
/// | ----- | ---------- | ---------- | ------- |
/// |     0 |       true |       true |    true |
/// |     1 |       true |      false |   false |
/// |     2 |      false |      false |    true |
#[derive(Debug, Clone)]
pub struct Implies<Left, Right> {
    antecedent: Left,
    consequent: Right,
}

impl<Left, Right> Implies<Left, Right> {
    pub fn new(antecedent: Left, consequent: Right) -> Self {
        Self { antecedent, consequent }
    }
}

impl<Left, Right> Formula for Implies<Left, Right>
where
    Left: Formula,
    Right: Formula,
{
    type Error = BinaryOperatorError<Left::Error, Right::Error>;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        let antecedent = self
            .antecedent
            .evaluate(traces)
            .map_err(BinaryOperatorError::LeftError)?;

        let consequent = self
            .consequent
            .evaluate(traces)
            .map_err(BinaryOperatorError::RightError)?;

        let result = imply(&antecedent, &consequent)?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use nonempty::NonEmpty;

    use super::{And, BinaryEvaluationError, BinaryOperatorError, Implies, NaryOperatorError, Not, Or};
    use crate::verdicts::Verdicts;
    use crate::{Formula, Trace};

    #[test]
    fn not() -> Result<(), Infallible> {
        let formula = Not::new(Verdicts::from([true, false, false]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([false, true, true]));
        Ok(())
    }

    #[test]
    fn and() -> Result<(), NaryOperatorError<Infallible>> {
        let formula = And::from_operands(NonEmpty {
            head: Verdicts::from([true, true, false, true]),
            tail: vec![Verdicts::from([true, false, false, true]), Verdicts::from([true, true, true, false])],
        });

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, false, false, false]));
        Ok(())
    }

    #[test]
    fn or() -> Result<(), NaryOperatorError<Infallible>> {
        let formula = Or::new(Verdicts::from([true, false, false]), Verdicts::from([false, false, true]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, false, true]));
        Ok(())
    }

    #[test]
    fn implies() -> Result<(), BinaryOperatorError<Infallible, Infallible>> {
        let formula = Implies::new(Verdicts::from([true, true, false, false]), Verdicts::from([true, false, true, false]));

        assert_eq!(formula.evaluate::<Trace>(&[])?, Verdicts::from([true, false, true, true]));
        Ok(())
    }

    #[test]
    fn mismatched_lengths() {
        let formula = Implies::new(Verdicts::from([true, true]), Verdicts::from([true]));

        assert_eq!(
            formula.evaluate::<Trace>(&[]),
            Err(BinaryOperatorError::EvaluationError(BinaryEvaluationError::MismatchedLengths(2, 1)))
        );
    }
}
