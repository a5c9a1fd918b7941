//! Pairwise checking of specifications against every pair of recorded traces.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use hyperprop_core::property::{Property, PropertyError};
use hyperprop_core::{evaluate, EvaluationError, Trace, VariableCatalog};
use hyperprop_parser::parse_formula;
use tracing::{debug, info};

use crate::facts::FactBase;

pub const SPECIFICATIONS: &str = "Specifications";
pub const NEGATED_SPECIFICATIONS: &str = "Negated_Specifications";
pub const SATISFIED: &str = "Satisfied_LibProp";

/// A formula together with its negation, both parsed.
#[derive(Debug, Clone)]
pub struct Specification {
    pub source: String,
    pub property: Property,
    pub negated: Property,
}

impl Specification {
    pub fn parse(source: &str, negated: &str, catalog: &VariableCatalog) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            property: parse_formula(source, catalog).with_context(|| format!("parsing \"{}\"", source))?,
            negated: parse_formula(negated, catalog).with_context(|| format!("parsing \"{}\"", negated))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The property holds on at least one pair and its negation on none.
    Satisfied,
    /// The negation holds on some pair.
    Rejected,
    /// Neither the property nor its negation holds on any pair.
    Unsupported,
}

/// The ordered trace pairs `(i, j)` with `i < j`, the shorter trace first.
pub fn pairs(traces: &[Trace]) -> impl Iterator<Item = [&Trace; 2]> + '_ {
    (0..traces.len()).flat_map(move |i| {
        (i + 1..traces.len()).map(move |j| {
            let (first, second) = (&traces[i], &traces[j]);

            if first.len() < second.len() {
                [first, second]
            } else {
                [second, first]
            }
        })
    })
}

/// Evaluate a specification over every trace pair, stopping at the first pair satisfying its
/// negation.
pub fn check(spec: &Specification, traces: &[Trace]) -> Result<Outcome, EvaluationError<PropertyError>> {
    let mut satisfied = false;

    for pair in pairs(traces) {
        if evaluate(&pair, &spec.negated)? {
            debug!(formula = %spec.source, "negation holds");
            return Ok(Outcome::Rejected);
        }

        satisfied = satisfied || evaluate(&pair, &spec.property)?;
    }

    Ok(if satisfied {
        Outcome::Satisfied
    } else {
        Outcome::Unsupported
    })
}

/// Formulas of a specification file, one per non-blank line.
pub fn parse_formulas(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_formulas(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_formulas(&text))
}

/// Check every specification of `dir` and return the satisfied ones in file order.
pub fn run(dir: &Path) -> Result<Vec<String>> {
    let base = FactBase::load(dir)?;
    let formulas = read_formulas(&dir.join(SPECIFICATIONS))?;
    let negated = read_formulas(&dir.join(NEGATED_SPECIFICATIONS))?;

    ensure!(!formulas.is_empty(), "no specifications to check");
    ensure!(
        formulas.len() == negated.len(),
        "{} specifications but {} negated specifications",
        formulas.len(),
        negated.len()
    );

    info!(formulas = formulas.len(), traces = base.traces.len(), "checking specifications");

    let mut satisfied = Vec::new();

    for (source, negated) in formulas.iter().zip(&negated) {
        let spec = Specification::parse(source, negated, &base.catalog)?;
        let outcome = check(&spec, &base.traces).with_context(|| format!("evaluating \"{}\"", source))?;

        info!(formula = %source, ?outcome, "checked");

        if outcome == Outcome::Satisfied {
            satisfied.push(spec.source);
        }
    }

    Ok(satisfied)
}

pub fn write_satisfied(path: &Path, satisfied: &[String]) -> Result<()> {
    let contents: String = satisfied.iter().map(|formula| format!("{}\n", formula)).collect();
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use hyperprop_core::trace::Value;
    use hyperprop_core::{Trace, VariableCatalog};

    use std::fs;

    use super::{
        check, pairs, parse_formulas, run, write_satisfied, Outcome, Specification, NEGATED_SPECIFICATIONS, SATISFIED,
        SPECIFICATIONS,
    };

    fn trace(xs: &[u32]) -> Trace {
        let mut trace = Trace::new(0, 1);

        for (cycle, x) in xs.iter().enumerate() {
            trace.update_term_value(0, cycle as u32, Value::Scalar(*x));
        }

        trace
    }

    fn catalog() -> anyhow::Result<VariableCatalog> {
        let mut catalog = VariableCatalog::new();
        catalog.add_term_var("x")?;
        Ok(catalog)
    }

    #[test]
    fn shorter_trace_first() {
        let traces = [trace(&[1, 2, 3]), trace(&[1]), trace(&[4, 5])];
        let lengths: Vec<[usize; 2]> = pairs(&traces).map(|[a, b]| [a.len(), b.len()]).collect();

        assert_eq!(lengths, vec![[1, 3], [2, 3], [1, 2]]);
    }

    #[test]
    fn outcomes() -> anyhow::Result<()> {
        let catalog = catalog()?;
        let spec = Specification::parse("(G+ (EQ x))", "(F+ (NOT (EQ x)))", &catalog)?;

        let same = [trace(&[1, 2, 3]), trace(&[1, 2, 3])];
        assert_eq!(check(&spec, &same)?, Outcome::Satisfied);

        let diverging = [trace(&[1, 2, 3]), trace(&[1, 2, 3]), trace(&[1, 5, 3])];
        assert_eq!(check(&spec, &diverging)?, Outcome::Rejected);

        assert_eq!(check(&spec, &[trace(&[1])])?, Outcome::Unsupported);

        Ok(())
    }

    fn flagged(len: u32, ok: bool) -> Trace {
        let mut trace = Trace::new(1, 0);
        trace.update_prop_value(0, 0, ok);
        trace.extend_to_cycle(len - 1);
        trace
    }

    #[test]
    fn pair_reaches_evaluation_shorter_first() -> anyhow::Result<()> {
        let mut catalog = VariableCatalog::new();
        catalog.add_prop_var("ok")?;

        // Only the pair of the last two traces puts the failing trace first, by length.
        let traces = [flagged(1, true), flagged(3, true), flagged(2, false)];
        let spec = Specification::parse("ok.1", "(NOT ok.1)", &catalog)?;

        assert_eq!(check(&spec, &traces)?, Outcome::Rejected);
        assert_eq!(check(&spec, &traces[..2])?, Outcome::Satisfied);

        Ok(())
    }

    #[test]
    fn blank_lines_ignored() {
        let formulas = parse_formulas("(G+ (EQ x))\n\n  \n(F+ (EQ x))\n");

        assert_eq!(formulas, vec!["(G+ (EQ x))", "(F+ (EQ x))"]);
    }

    #[test]
    fn fact_directory() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("hyperprop-driver-{}", std::process::id()));
        fs::create_dir_all(&dir)?;

        fs::write(dir.join("IntVars"), "x\n")?;
        fs::write(dir.join("BoolVars"), "ok\n")?;
        fs::write(dir.join("x.facts"), "0 0 1\n0 1 2\n1 0 1\n1 1 2\n1 2 9\n")?;
        fs::write(dir.join("ok.facts"), "0 0 1\n0 1 0\n1 0 1\n1 1 1\n1 2 1\n")?;
        fs::write(dir.join(SPECIFICATIONS), "(G+ (EQ x))\n\n(G+ (EQ ok))\n")?;
        fs::write(dir.join(NEGATED_SPECIFICATIONS), "(F+ (NOT (EQ x)))\n(F+ (NOT (EQ ok)))\n")?;

        let satisfied = run(&dir)?;
        write_satisfied(&dir.join(SATISFIED), &satisfied)?;

        assert_eq!(satisfied, vec!["(G+ (EQ x))"]);
        assert_eq!(fs::read_to_string(dir.join(SATISFIED))?, "(G+ (EQ x))\n");

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn parse_failure() -> anyhow::Result<()> {
        let catalog = catalog()?;
        let err = Specification::parse("(G+ (EQ x)", "(F+ (EQ x))", &catalog).unwrap_err();

        assert!(err.chain().any(|cause| cause.is::<hyperprop_parser::ParseError>()));
        Ok(())
    }
}
