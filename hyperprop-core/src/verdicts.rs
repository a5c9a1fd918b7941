//! Per-cycle truth values produced by evaluating a formula.

use std::ops::Index;

/// The truth value of a formula at every cycle `0..len` of the evaluated traces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdicts(Vec<bool>);

impl Verdicts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The verdict at `cycle`, or `None` past the end of the table.
    pub fn at(&self, cycle: usize) -> Option<bool> {
        self.0.get(cycle).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + ExactSizeIterator + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// True when the verdict holds at every cycle.
    pub fn all(&self) -> bool {
        self.0.iter().all(|verdict| *verdict)
    }

    /// True when the verdict holds at some cycle.
    pub fn any(&self) -> bool {
        self.0.iter().any(|verdict| *verdict)
    }
}

impl Index<usize> for Verdicts {
    type Output = bool;

    fn index(&self, cycle: usize) -> &Self::Output {
        &self.0[cycle]
    }
}

impl From<Vec<bool>> for Verdicts {
    fn from(verdicts: Vec<bool>) -> Self {
        Self(verdicts)
    }
}

impl<const N: usize> From<[bool; N]> for Verdicts {
    fn from(verdicts: [bool; N]) -> Self {
        Self(Vec::from(verdicts))
    }
}

impl FromIterator<bool> for Verdicts {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self(iter.into_iter().collect())
    }
}

impl From<Verdicts> for Vec<bool> {
    fn from(verdicts: Verdicts) -> Self {
        verdicts.0
    }
}
