//! Mapping from variable names to the storage slots of a [`Trace`](crate::Trace).
//!
//! Variables live in one of two independent namespaces. _Term_ variables hold unsigned scalar or
//! array values, while _proposition_ variables hold booleans. Ids are dense and 0-based within a
//! namespace and are assigned in registration order, so a trace built with
//! `Trace::new(catalog.num_props(), catalog.num_terms())` has exactly one slot per variable.
//!
//! ```rust
//! use hyperprop_core::catalog::{Slot, VariableCatalog};
//!
//! let mut catalog = VariableCatalog::new();
//! let x = catalog.add_term_var("x").unwrap();
//! let valid = catalog.add_prop_var("valid").unwrap();
//!
//! assert_eq!(catalog.term_id("x").unwrap(), x);
//! assert_eq!(catalog.resolve("valid").unwrap(), Slot::Prop(valid));
//! assert!(catalog.term_id("y").is_err());
//! ```

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use thiserror::Error;

/// The namespace a variable name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Term,
    Prop,
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Term => write!(f, "term"),
            Self::Prop => write!(f, "proposition"),
        }
    }
}

/// Storage location of a variable inside a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Term(usize),
    Prop(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{namespace} variable \"{name}\" not found")]
    NotFound { namespace: Namespace, name: String },

    #[error("variable \"{0}\" not found in any namespace")]
    Unresolved(String),

    #[error("{namespace} variable \"{name}\" is already registered")]
    DuplicateVariable { namespace: Namespace, name: String },
}

#[derive(Debug, Clone, Default)]
struct Names {
    ids: HashMap<String, usize>,
    names: Vec<String>,
}

impl Names {
    fn add(&mut self, namespace: Namespace, name: &str) -> Result<usize, CatalogError> {
        if self.ids.contains_key(name) {
            return Err(CatalogError::DuplicateVariable {
                namespace,
                name: name.to_string(),
            });
        }

        let id = self.names.len();
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());

        Ok(id)
    }

    fn get(&self, namespace: Namespace, name: &str) -> Result<usize, CatalogError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::NotFound {
                namespace,
                name: name.to_string(),
            })
    }
}

/// Two-namespace registry of variable names.
///
/// The catalog is built once before any formula referencing it is parsed and is then shared
/// read-only. Registering the same name twice in a namespace is an error, but a name may exist in
/// both namespaces at once.
#[derive(Debug, Clone, Default)]
pub struct VariableCatalog {
    terms: Names,
    props: Names,
}

impl VariableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a term (scalar or array) variable and return its slot.
    pub fn add_term_var(&mut self, name: &str) -> Result<usize, CatalogError> {
        self.terms.add(Namespace::Term, name)
    }

    /// Register a proposition (boolean) variable and return its slot.
    pub fn add_prop_var(&mut self, name: &str) -> Result<usize, CatalogError> {
        self.props.add(Namespace::Prop, name)
    }

    pub fn term_id(&self, name: &str) -> Result<usize, CatalogError> {
        self.terms.get(Namespace::Term, name)
    }

    pub fn prop_id(&self, name: &str) -> Result<usize, CatalogError> {
        self.props.get(Namespace::Prop, name)
    }

    pub fn term_name(&self, id: usize) -> Option<&str> {
        self.terms.names.get(id).map(String::as_str)
    }

    pub fn prop_name(&self, id: usize) -> Option<&str> {
        self.props.names.get(id).map(String::as_str)
    }

    /// Look a name up in the term namespace first, then in the proposition namespace.
    pub fn resolve(&self, name: &str) -> Result<Slot, CatalogError> {
        self.term_id(name)
            .map(Slot::Term)
            .or_else(|_| self.prop_id(name).map(Slot::Prop))
            .map_err(|_| CatalogError::Unresolved(name.to_string()))
    }

    pub fn num_terms(&self) -> usize {
        self.terms.names.len()
    }

    pub fn num_props(&self) -> usize {
        self.props.names.len()
    }
}
