//! Loading of traces from fact files.
//!
//! A fact directory holds two variable lists, `IntVars` and `BoolVars`, with whitespace separated
//! names. Every listed variable has a `<name>.facts` file of whitespace separated triples
//! `trace cycle value`, in any order.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use hyperprop_core::trace::Value;
use hyperprop_core::{Trace, VariableCatalog};
use tracing::{debug, warn};

pub const INT_VARS: &str = "IntVars";
pub const BOOL_VARS: &str = "BoolVars";

/// One observation of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fact {
    pub trace: u32,
    pub cycle: u32,
    pub value: u32,
}

pub fn parse_names(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

pub fn parse_facts(text: &str) -> Result<Vec<Fact>> {
    let numbers = text
        .split_whitespace()
        .map(|token| token.parse::<u32>().with_context(|| format!("invalid number \"{}\"", token)))
        .collect::<Result<Vec<_>>>()?;

    ensure!(
        numbers.len() % 3 == 0,
        "expected triples of trace, cycle and value, found {} numbers",
        numbers.len()
    );

    let facts = numbers
        .chunks_exact(3)
        .map(|triple| Fact {
            trace: triple[0],
            cycle: triple[1],
            value: triple[2],
        })
        .collect();

    Ok(facts)
}

/// The variables of a fact directory and one trace per trace id, ordered by id.
#[derive(Debug)]
pub struct FactBase {
    pub catalog: VariableCatalog,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Int,
    Bool,
}

impl FactBase {
    /// Build the catalog and the traces from already parsed facts, keyed by variable name.
    pub fn build(int_vars: &[String], bool_vars: &[String], facts: &HashMap<String, Vec<Fact>>) -> Result<Self> {
        ensure!(!int_vars.is_empty() || !bool_vars.is_empty(), "no variables declared");

        let mut catalog = VariableCatalog::new();
        let mut columns = Vec::new();

        for name in int_vars {
            columns.push((name, Kind::Int, catalog.add_term_var(name)?));
        }

        for name in bool_vars {
            columns.push((name, Kind::Bool, catalog.add_prop_var(name)?));
        }

        let mut traces: BTreeMap<u32, Trace> = BTreeMap::new();

        for (name, kind, slot) in columns {
            let mut observations = facts.get(name.as_str()).cloned().unwrap_or_default();
            observations.sort();

            if observations.is_empty() {
                warn!(variable = %name, "no facts recorded");
            }

            for fact in observations {
                let trace = traces
                    .entry(fact.trace)
                    .or_insert_with(|| Trace::new(catalog.num_props(), catalog.num_terms()));

                let written = match kind {
                    Kind::Int => trace.try_update_term_value(slot, fact.cycle, Value::Scalar(fact.value)),
                    Kind::Bool => match fact.value {
                        0 | 1 => trace.try_update_prop_value(slot, fact.cycle, fact.value == 1),
                        value => bail!("{} holds non-boolean value {} in trace {}", name, value, fact.trace),
                    },
                };

                written.with_context(|| format!("invalid fact for {} in trace {}", name, fact.trace))?;
            }
        }

        debug!(
            traces = traces.len(),
            variables = catalog.num_terms() + catalog.num_props(),
            "built traces"
        );

        Ok(Self {
            catalog,
            traces: traces.into_values().collect(),
        })
    }

    /// Read the variable lists and every fact file of `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let int_vars = read_names(&dir.join(INT_VARS))?;
        let bool_vars = read_names(&dir.join(BOOL_VARS))?;
        let mut facts = HashMap::new();

        for name in int_vars.iter().chain(&bool_vars) {
            let path = dir.join(format!("{}.facts", name));
            let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;

            facts.insert(name.clone(), parse_facts(&text).with_context(|| format!("parsing {}", path.display()))?);
        }

        Self::build(&int_vars, &bool_vars, &facts)
    }
}

/// A missing variable list declares no variables.
fn read_names(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_names(&text)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "variable list not found");
            Ok(Vec::new())
        }
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}
