use std::error::Error;

use hyperprop_core::catalog::{Slot, VariableCatalog};
use hyperprop_core::operators::{Always, And, Eventually, Implies, Next, Previous};
use hyperprop_core::predicate::{Equal, Select, Variable};
use hyperprop_core::property::Property;
use hyperprop_core::trace::Value;
use hyperprop_core::{evaluate, evaluate_at, Monitor, Trace};
use proptest::collection::vec;
use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::TestRunner;

/// `len` variable values, the same on every run.
fn values(len: usize) -> Vec<u32> {
    sample(vec(2u32..1000, len))
}

/// `len` pairs of independent variable values, the same on every run.
fn value_pairs(len: usize) -> Vec<(u32, u32)> {
    sample(vec((2u32..1000, 2u32..1000), len))
}

fn sample<S: Strategy>(strategy: S) -> S::Value {
    let mut runner = TestRunner::deterministic();

    strategy
        .new_tree(&mut runner)
        .expect("strategy has no filters")
        .current()
}

struct Pair {
    first: Trace,
    second: Trace,
}

impl Pair {
    fn new(num_terms: usize) -> Self {
        Self {
            first: Trace::new(0, num_terms),
            second: Trace::new(0, num_terms),
        }
    }

    fn write(&mut self, slot: usize, cycle: u32, first: u32, second: u32) {
        self.first.update_term_value(slot, cycle, Value::Scalar(first));
        self.second.update_term_value(slot, cycle, Value::Scalar(second));
    }

    fn traces(self) -> [Trace; 2] {
        [self.first, self.second]
    }
}

fn equal(name: &str, slot: usize) -> Equal {
    Equal::across(Variable::new(name, Slot::Term(slot)))
}

#[test]
fn always_next_fails_at_trace_end() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(1);

    for (cycle, x) in values(25).into_iter().enumerate() {
        pair.write(0, cycle as u32, x, x);
    }

    let traces = pair.traces();
    let next_x = Next::new(equal("x", 0));

    assert!(evaluate(&traces, &next_x)?);
    assert!(!evaluate_at(&traces, &next_x, 24)?);
    assert!(!evaluate(&traces, Always::new(&next_x))?);

    Ok(())
}

#[test]
fn always_previous_fails_at_trace_start() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(1);

    for (cycle, x) in values(30).into_iter().enumerate() {
        pair.write(0, cycle as u32, x, x);
    }

    let traces = pair.traces();
    let previous_x = Previous::new(equal("x", 0));

    assert!(!evaluate(&traces, &previous_x)?);
    assert!(evaluate_at(&traces, &previous_x, 29)?);
    assert!(!evaluate(&traces, Always::new(&previous_x))?);

    Ok(())
}

#[test]
fn divergence_at_final_cycle() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(1);
    let mut last = 0;

    for (cycle, x) in values(35).into_iter().enumerate() {
        pair.write(0, cycle as u32, x, x);
        last = x;
    }

    pair.write(0, 35, last, last + 1);

    let traces = pair.traces();

    assert!(!evaluate(&traces, Always::new(Next::new(equal("x", 0))))?);
    assert!(!evaluate(&traces, Always::new(equal("x", 0)))?);
    assert!(evaluate_at(&traces, Always::new(equal("x", 0)), 34).is_ok_and(|verdict| !verdict));
    assert!(evaluate_at(&traces, Always::new(equal("x", 0)), 36).is_err());

    Ok(())
}

#[test]
fn vacuous_implication() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(2);

    for (cycle, (x, y)) in value_pairs(30).into_iter().enumerate() {
        pair.write(0, cycle as u32, x, x + 1);
        pair.write(1, cycle as u32, y, y / 2 + 1);
    }

    let traces = pair.traces();
    let property = Implies::new(equal("x", 0), Previous::new(equal("y", 1)));

    assert!(evaluate(&traces, &property)?);
    assert!(evaluate(&traces, Always::new(&property))?);

    Ok(())
}

#[test]
fn implication_with_previous() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(2);

    pair.write(0, 0, 20, 21);
    pair.write(1, 0, 12, 10);
    pair.write(0, 1, 20, 20);
    pair.write(1, 1, 10, 11);
    pair.write(0, 2, 7, 7);
    pair.write(1, 2, 4, 4);

    let traces = pair.traces();
    let property = Implies::new(equal("x", 0), Previous::new(equal("y", 1)));

    assert!(evaluate_at(&traces, &property, 0)?);
    assert!(!evaluate_at(&traces, &property, 1)?);
    assert!(!evaluate_at(&traces, &property, 2)?);
    assert!(!evaluate(&traces, Always::new(&property))?);

    Ok(())
}

#[test]
fn eventually_all_equal() -> Result<(), Box<dyn Error>> {
    let mut pair = Pair::new(2);
    let mut cycle = 0;

    for (x, y) in value_pairs(20) {
        pair.write(0, cycle, x, x + 3);
        pair.write(1, cycle, y, y + 3);
        cycle += 1;
    }

    pair.write(0, cycle, 10, 10);
    pair.write(1, cycle, 11, 11);
    cycle += 1;

    for (x, y) in value_pairs(20) {
        pair.write(0, cycle, x, x + 3);
        pair.write(1, cycle, y, y + 3);
        cycle += 1;
    }

    let traces = pair.traces();
    let both = And::new(equal("x", 0), equal("y", 1));

    assert!(evaluate(&traces, Eventually::new(&both))?);
    assert!(!evaluate_at(&traces, Eventually::new(&both), 21)?);

    Ok(())
}

#[test]
fn selected_propositions() -> Result<(), Box<dyn Error>> {
    let mut catalog = VariableCatalog::new();
    let good = catalog.add_prop_var("good")?;

    let mut first = Trace::new(catalog.num_props(), catalog.num_terms());
    let mut second = Trace::new(catalog.num_props(), catalog.num_terms());

    for cycle in 0..6 {
        first.update_prop_value(good, cycle, cycle >= 2);
        second.update_prop_value(good, cycle, cycle >= 4);
    }

    let traces = [first, second];
    let good = |trace| Property::Select(Select::new(Variable::new("good", Slot::Prop(0)), trace));

    let leads = Property::always(Property::implies(good(2), good(1)));
    let lags = Property::always(Property::implies(good(1), good(2)));

    assert!(evaluate(&traces, &leads)?);
    assert!(!evaluate(&traces, &lags)?);
    assert!(Monitor::new(&lags, &traces)?.at(4) == Some(true));

    Ok(())
}

#[test]
fn three_traces() -> Result<(), Box<dyn Error>> {
    let mut traces = [Trace::new(0, 1), Trace::new(0, 1), Trace::new(0, 1)];

    for cycle in 0..4u32 {
        traces[0].update_term_value(0, cycle, Value::Scalar(cycle));
        traces[1].update_term_value(0, cycle, Value::Scalar(cycle));
        traces[2].update_term_value(0, cycle, Value::Scalar(cycle.min(2)));
    }

    let x = Variable::new("x", Slot::Term(0));

    assert!(!evaluate(&traces, Always::new(Equal::across(x.clone())))?);
    assert!(evaluate(&traces, Always::new(Equal::with_trace(x.clone(), 2)))?);
    assert!(!evaluate(&traces, Always::new(Equal::with_trace(x, 3)))?);

    Ok(())
}
