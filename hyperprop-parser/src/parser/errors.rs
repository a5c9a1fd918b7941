use std::fmt::{Display, Formatter};

use hyperprop_core::catalog::CatalogError;
use thiserror::Error;

/// Number of operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Self::Exactly(expected) => count == *expected,
            Self::AtLeast(minimum) => count >= *minimum,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(expected) => write!(f, "{}", expected),
            Self::AtLeast(minimum) => write!(f, "at least {}", minimum),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error at offset {offset}: could not parse \"{rest}\"")]
    Syntax { offset: usize, rest: String },

    #[error("formula is empty")]
    EmptyFormula,

    #[error("\"{0}\" is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("keyword {0} cannot be used as an identifier")]
    ReservedKeyword(String),

    #[error("variable \"{0}\" must appear inside EQ or carry a trace index")]
    BareIdentifier(String),

    #[error("{op} expects {expected} operands, found {found}")]
    Arity { op: String, expected: Arity, found: usize },

    #[error("unknown operator \"{0}\"")]
    UnknownOperator(String),

    #[error(transparent)]
    UnknownVariable(#[from] CatalogError),

    #[error("trace index of \"{0}\" must be at least 1")]
    InvalidTraceIndex(String),
}

impl ParseError {
    pub(crate) fn syntax(input: &str, rest: &str) -> Self {
        Self::Syntax {
            offset: input.len() - rest.len(),
            rest: rest.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Arity, ParseError};

    #[test]
    fn arity_bounds() {
        assert!(Arity::Exactly(2).accepts(2));
        assert!(!Arity::Exactly(2).accepts(3));
        assert!(Arity::AtLeast(2).accepts(5));
        assert!(!Arity::AtLeast(2).accepts(1));
    }

    #[test]
    fn messages() {
        let error = ParseError::Arity {
            op: "AND".to_string(),
            expected: Arity::AtLeast(2),
            found: 1,
        };

        assert_eq!(error.to_string(), "AND expects at least 2 operands, found 1");
        assert_eq!(
            ParseError::syntax("(NOT x", "").to_string(),
            "syntax error at offset 6: could not parse \"\""
        );
    }
}
