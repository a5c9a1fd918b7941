//! Syntax tree of a HyperPLTL property.
//!
//! [`Property`] is the closed set of formulas that can be written in the surface syntax, as
//! opposed to the open set of [`Formula`] implementations. It is usually produced by the parser,
//! and its [`Display`] implementation prints the canonical surface syntax back:
//!
//! ```rust
//! use hyperprop_core::catalog::Slot;
//! use hyperprop_core::predicate::{Equal, Variable};
//! use hyperprop_core::property::Property;
//!
//! let x = Property::Equal(Equal::across(Variable::new("x", Slot::Term(0))));
//! let y = Property::Equal(Equal::with_trace(Variable::new("y", Slot::Term(1)), 2));
//! let property = Property::always(Property::implies(x, Property::next(y)));
//!
//! assert_eq!(property.to_string(), "(G+ (IMPLIES (EQ x) (X+ (EQ y.2))))");
//! ```
//!
//! Every node of a property is identified by its [`NodeId`], the position of the node in a
//! post-order traversal of the tree. Node ids key the verdict tables kept by a
//! [`Monitor`](crate::Monitor).

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

use nonempty::NonEmpty;
use thiserror::Error;

use crate::operators::{
    Always, And, BinaryEvaluationError, BinaryOperatorError, Eventually, Historically, Implies,
    NaryOperatorError, Next, Not, Once, Or, Previous, Until,
};
use crate::predicate::{Equal, PredicateError, Select};
use crate::verdicts::Verdicts;
use crate::{Formula, Trace};

/// Position of a node in the post-order traversal of a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The operands of an `AND` or `OR` node, of which there are always at least two.
///
/// `rest` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operands {
    first: Box<Property>,
    rest: Vec<Property>,
}

#[allow(clippy::len_without_is_empty)]
impl Operands {
    pub fn new(first: Property, second: Property) -> Self {
        Self {
            first: Box::new(first),
            rest: vec![second],
        }
    }

    /// Build operands from a list, returning `None` when it holds fewer than two properties.
    pub fn from_vec(mut properties: Vec<Property>) -> Option<Self> {
        if properties.len() < 2 {
            return None;
        }

        let rest = properties.split_off(1);
        let first = properties.pop()?;

        Some(Self {
            first: Box::new(first),
            rest,
        })
    }

    pub fn push(&mut self, property: Property) {
        self.rest.push(property);
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> + '_ {
        std::iter::once(self.first.as_ref()).chain(self.rest.iter())
    }

    fn as_nonempty(&self) -> NonEmpty<&Property> {
        NonEmpty {
            head: self.first.as_ref(),
            tail: self.rest.iter().collect(),
        }
    }
}

/// A HyperPLTL property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// `(EQ x)` or `(EQ x.n)`
    Equal(Equal),
    /// `x.n`
    Select(Select),
    /// `(NOT f)`
    Not(Box<Property>),
    /// `(IMPLIES f g)`
    Implies(Box<Property>, Box<Property>),
    /// `(AND f g ...)`
    And(Operands),
    /// `(OR f g ...)`
    Or(Operands),
    /// `(X+ f)`
    Next(Box<Property>),
    /// `(X- f)`
    Previous(Box<Property>),
    /// `(G+ f)`
    Always(Box<Property>),
    /// `(G- f)`
    Historically(Box<Property>),
    /// `(F+ f)`
    Eventually(Box<Property>),
    /// `(F- f)`
    Once(Box<Property>),
    /// `(U f g)`
    Until(Box<Property>, Box<Property>),
}

impl Property {
    pub fn not(inner: Property) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn implies(antecedent: Property, consequent: Property) -> Self {
        Self::Implies(Box::new(antecedent), Box::new(consequent))
    }

    pub fn and(left: Property, right: Property) -> Self {
        Self::And(Operands::new(left, right))
    }

    pub fn or(left: Property, right: Property) -> Self {
        Self::Or(Operands::new(left, right))
    }

    pub fn next(inner: Property) -> Self {
        Self::Next(Box::new(inner))
    }

    pub fn previous(inner: Property) -> Self {
        Self::Previous(Box::new(inner))
    }

    pub fn always(inner: Property) -> Self {
        Self::Always(Box::new(inner))
    }

    pub fn historically(inner: Property) -> Self {
        Self::Historically(Box::new(inner))
    }

    pub fn eventually(inner: Property) -> Self {
        Self::Eventually(Box::new(inner))
    }

    pub fn once(inner: Property) -> Self {
        Self::Once(Box::new(inner))
    }

    pub fn until(left: Property, right: Property) -> Self {
        Self::Until(Box::new(left), Box::new(right))
    }

    /// Keyword of the node in the surface syntax, `None` for atoms.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Equal(_) => Some("EQ"),
            Self::Select(_) => None,
            Self::Not(_) => Some("NOT"),
            Self::Implies(..) => Some("IMPLIES"),
            Self::And(_) => Some("AND"),
            Self::Or(_) => Some("OR"),
            Self::Next(_) => Some("X+"),
            Self::Previous(_) => Some("X-"),
            Self::Always(_) => Some("G+"),
            Self::Historically(_) => Some("G-"),
            Self::Eventually(_) => Some("F+"),
            Self::Once(_) => Some("F-"),
            Self::Until(..) => Some("U"),
        }
    }

    /// The direct subproperties of this node, in order.
    pub fn children(&self) -> Vec<&Property> {
        match self {
            Self::Equal(_) | Self::Select(_) => Vec::new(),
            Self::Not(inner)
            | Self::Next(inner)
            | Self::Previous(inner)
            | Self::Always(inner)
            | Self::Historically(inner)
            | Self::Eventually(inner)
            | Self::Once(inner) => vec![inner.as_ref()],
            Self::Implies(left, right) | Self::Until(left, right) => vec![left.as_ref(), right.as_ref()],
            Self::And(operands) | Self::Or(operands) => operands.iter().collect(),
        }
    }

    /// Every node of the property in post-order, so that the node at index `i` has [`NodeId`] `i`
    /// and the root comes last.
    pub fn nodes(&self) -> Vec<&Property> {
        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);
        nodes
    }

    fn collect_nodes<'a>(&'a self, nodes: &mut Vec<&'a Property>) {
        for child in self.children() {
            child.collect_nodes(nodes);
        }

        nodes.push(self);
    }

    /// Number of nodes in the property.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|child| child.size()).sum::<usize>()
    }

    /// The id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(self.size() - 1)
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal(equal) => write!(f, "{}", equal),
            Self::Select(select) => write!(f, "{}", select),
            _ => {
                write!(f, "({}", self.keyword().unwrap_or_default())?;

                for child in self.children() {
                    write!(f, " {}", child)?;
                }

                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error(transparent)]
    PredicateError(#[from] PredicateError),

    #[error(transparent)]
    EvaluationError(#[from] BinaryEvaluationError),
}

impl From<BinaryOperatorError<PropertyError, PropertyError>> for PropertyError {
    fn from(err: BinaryOperatorError<PropertyError, PropertyError>) -> Self {
        match err {
            BinaryOperatorError::LeftError(err) | BinaryOperatorError::RightError(err) => err,
            BinaryOperatorError::EvaluationError(err) => Self::EvaluationError(err),
        }
    }
}

impl From<NaryOperatorError<PropertyError>> for PropertyError {
    fn from(err: NaryOperatorError<PropertyError>) -> Self {
        match err {
            NaryOperatorError::OperandError { error, .. } => error,
            NaryOperatorError::EvaluationError(err) => Self::EvaluationError(err),
        }
    }
}

impl Formula for Property {
    type Error = PropertyError;

    fn evaluate<B: Borrow<Trace>>(&self, traces: &[B]) -> Result<Verdicts, Self::Error> {
        match self {
            Self::Equal(equal) => Ok(equal.evaluate(traces)?),
            Self::Select(select) => Ok(select.evaluate(traces)?),
            Self::Not(inner) => Not::new(inner.as_ref()).evaluate(traces),
            Self::Implies(left, right) => Ok(Implies::new(left.as_ref(), right.as_ref()).evaluate(traces)?),
            Self::And(operands) => Ok(And::from_operands(operands.as_nonempty()).evaluate(traces)?),
            Self::Or(operands) => Ok(Or::from_operands(operands.as_nonempty()).evaluate(traces)?),
            Self::Next(inner) => Next::new(inner.as_ref()).evaluate(traces),
            Self::Previous(inner) => Previous::new(inner.as_ref()).evaluate(traces),
            Self::Always(inner) => Always::new(inner.as_ref()).evaluate(traces),
            Self::Historically(inner) => Historically::new(inner.as_ref()).evaluate(traces),
            Self::Eventually(inner) => Eventually::new(inner.as_ref()).evaluate(traces),
            Self::Once(inner) => Once::new(inner.as_ref()).evaluate(traces),
            Self::Until(left, right) => Ok(Until::new(left.as_ref(), right.as_ref()).evaluate(traces)?),
        }
    }
}
