//! Whole-trace evaluation that keeps the verdicts of every node of a property.
//!
//! [`Monitor::new`] evaluates each node of a [`Property`] exactly once, children first, and stores
//! the resulting [`Verdicts`] indexed by [`NodeId`]. Queries for any cycle are then plain table
//! lookups, so they may be issued in any order:
//!
//! ```rust
//! use hyperprop_core::{Monitor, Trace};
//! use hyperprop_core::catalog::Slot;
//! use hyperprop_core::predicate::{Equal, Variable};
//! use hyperprop_core::property::Property;
//! use hyperprop_core::trace::Value;
//!
//! let mut first = Trace::new(0, 1);
//! let mut second = Trace::new(0, 1);
//!
//! for (cycle, (a, b)) in [(1, 1), (2, 5), (3, 3)].into_iter().enumerate() {
//!     first.update_term_value(0, cycle as u32, Value::Scalar(a));
//!     second.update_term_value(0, cycle as u32, Value::Scalar(b));
//! }
//!
//! let x = Property::Equal(Equal::across(Variable::new("x", Slot::Term(0))));
//! let property = Property::once(Property::not(x));
//! let monitor = Monitor::new(&property, &[first, second]).unwrap();
//!
//! assert_eq!(monitor.at(2), Some(true));
//! assert_eq!(monitor.at(0), Some(false));
//! assert!(!monitor.holds());
//! ```

use std::borrow::Borrow;

use tracing::debug;

use crate::operators::{
    always, conjoin, disjoin, eventually, historically, imply, negate, next, once, previous, until,
};
use crate::property::{NodeId, Property, PropertyError};
use crate::verdicts::Verdicts;
use crate::{Formula, Trace};

/// The verdict table of every node of a property over one list of traces.
#[derive(Debug, Clone)]
pub struct Monitor {
    tables: Vec<Verdicts>,
}

impl Monitor {
    pub fn new<B: Borrow<Trace>>(property: &Property, traces: &[B]) -> Result<Self, PropertyError> {
        let mut tables = Vec::with_capacity(property.size());
        build(property, traces, &mut tables)?;

        debug!(
            nodes = tables.len(),
            cycles = tables.last().map_or(0, Verdicts::len),
            traces = traces.len(),
            "evaluated property"
        );

        Ok(Self { tables })
    }

    /// The id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(self.tables.len() - 1)
    }

    /// Verdicts of the root node.
    pub fn verdicts(&self) -> &Verdicts {
        &self.tables[self.tables.len() - 1]
    }

    /// Verdicts of an arbitrary node, by post-order id.
    pub fn node(&self, id: NodeId) -> Option<&Verdicts> {
        self.tables.get(id.0)
    }

    /// Number of evaluated cycles.
    pub fn len(&self) -> usize {
        self.verdicts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts().is_empty()
    }

    /// Verdict of the property at `cycle`, or `None` past the evaluated cycles.
    pub fn at(&self, cycle: usize) -> Option<bool> {
        self.verdicts().at(cycle)
    }

    /// Whether the property holds from the start of the traces.
    pub fn holds(&self) -> bool {
        self.at(0).unwrap_or(false)
    }

    pub fn into_verdicts(mut self) -> Verdicts {
        self.tables.pop().unwrap_or_default()
    }
}

fn build<B: Borrow<Trace>>(
    property: &Property,
    traces: &[B],
    tables: &mut Vec<Verdicts>,
) -> Result<NodeId, PropertyError> {
    let children = property
        .children()
        .into_iter()
        .map(|child| build(child, traces, tables))
        .collect::<Result<Vec<NodeId>, _>>()?;

    let operand = |index: usize| &tables[children[index].0];

    let table = match property {
        Property::Equal(equal) => equal.evaluate(traces)?,
        Property::Select(select) => select.evaluate(traces)?,
        Property::Not(_) => negate(operand(0)),
        Property::Implies(..) => imply(operand(0), operand(1))?,
        Property::And(_) => conjoin(children.iter().map(|id| &tables[id.0]))?,
        Property::Or(_) => disjoin(children.iter().map(|id| &tables[id.0]))?,
        Property::Next(_) => next(operand(0)),
        Property::Previous(_) => previous(operand(0)),
        Property::Always(_) => always(operand(0)),
        Property::Historically(_) => historically(operand(0)),
        Property::Eventually(_) => eventually(operand(0)),
        Property::Once(_) => once(operand(0)),
        Property::Until(..) => until(operand(0), operand(1))?,
    };

    tables.push(table);
    Ok(NodeId(tables.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::Monitor;
    use crate::catalog::Slot;
    use crate::predicate::{Equal, Variable};
    use crate::property::{Property, PropertyError};
    use crate::trace::{Trace, Value};
    use crate::verdicts::Verdicts;
    use crate::Formula;

    fn pair(xs: &[(u32, u32)]) -> [Trace; 2] {
        let mut first = Trace::new(0, 1);
        let mut second = Trace::new(0, 1);

        for (cycle, (a, b)) in xs.iter().enumerate() {
            first.update_term_value(0, cycle as u32, Value::Scalar(*a));
            second.update_term_value(0, cycle as u32, Value::Scalar(*b));
        }

        [first, second]
    }

    fn x() -> Property {
        Property::Equal(Equal::across(Variable::new("x", Slot::Term(0))))
    }

    #[test]
    fn tables_for_every_node() -> Result<(), PropertyError> {
        let traces = pair(&[(1, 1), (2, 3), (4, 4), (5, 5)]);
        let property = Property::always(Property::previous(x()));
        let monitor = Monitor::new(&property, &traces)?;

        let nodes = property.nodes();
        assert_eq!(nodes.len(), 3);

        assert_eq!(monitor.node(property.root()), Some(monitor.verdicts()));
        assert_eq!(monitor.verdicts(), &Verdicts::from([false, false, false, true]));

        for (index, node) in nodes.iter().enumerate() {
            let table = monitor.node(crate::property::NodeId(index));
            assert_eq!(table, Some(&node.evaluate(&traces)?));
        }

        Ok(())
    }

    #[test]
    fn matches_recursive_evaluation() -> Result<(), PropertyError> {
        let traces = pair(&[(1, 2), (2, 2), (3, 3), (0, 1), (7, 7)]);
        let property = Property::until(
            Property::historically(Property::once(Property::not(x()))),
            Property::and(x(), Property::next(x())),
        );

        let monitor = Monitor::new(&property, &traces)?;

        assert_eq!(monitor.len(), 5);
        assert_eq!(monitor.verdicts(), &property.evaluate(&traces)?);
        assert_eq!(monitor.clone().into_verdicts(), property.evaluate(&traces)?);

        Ok(())
    }

    #[test]
    fn no_traces() {
        let property = Property::always(x());

        assert!(Monitor::new::<Trace>(&property, &[]).is_err());
    }
}
