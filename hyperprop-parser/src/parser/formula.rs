//! Lowering of s-expressions into [`Property`] trees.

use hyperprop_core::catalog::VariableCatalog;
use hyperprop_core::predicate::{Equal, Select, Variable};
use hyperprop_core::property::{Operands, Property};
use tracing::debug;

use super::common::{is_keyword, var_ref};
use super::errors::{Arity, ParseError};
use super::sexpr::{parse_sexpr, SExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equal,
    Not,
    Implies,
    And,
    Or,
    Next,
    Previous,
    Always,
    Historically,
    Eventually,
    Once,
    Until,
}

impl Operator {
    fn from_keyword(keyword: &str) -> Option<Self> {
        let op = match keyword {
            "EQ" => Self::Equal,
            "NOT" => Self::Not,
            "IMPLIES" => Self::Implies,
            "AND" => Self::And,
            "OR" => Self::Or,
            "X+" | "X" => Self::Next,
            "X-" => Self::Previous,
            "G+" | "G" => Self::Always,
            "G-" => Self::Historically,
            "F+" | "F" => Self::Eventually,
            "F-" => Self::Once,
            "U" => Self::Until,
            _ => return None,
        };

        Some(op)
    }

    fn arity(self) -> Arity {
        match self {
            Self::And | Self::Or => Arity::AtLeast(2),
            Self::Implies | Self::Until => Arity::Exactly(2),
            _ => Arity::Exactly(1),
        }
    }
}

struct Lowering<'c> {
    catalog: &'c VariableCatalog,
}

impl<'c> Lowering<'c> {
    fn variable(&self, token: &str) -> Result<(Variable, Option<usize>), ParseError> {
        if is_keyword(token) {
            return Err(ParseError::ReservedKeyword(token.to_string()));
        }

        let (name, index) = var_ref(token).ok_or_else(|| ParseError::InvalidIdentifier(token.to_string()))?;

        if index == Some(0) {
            return Err(ParseError::InvalidTraceIndex(token.to_string()));
        }

        let slot = self.catalog.resolve(name)?;
        Ok((Variable::new(name, slot), index))
    }

    fn atom(&self, token: &str) -> Result<Property, ParseError> {
        match self.variable(token)? {
            (variable, Some(index)) => Ok(Property::Select(Select::new(variable, index))),
            (variable, None) => Err(ParseError::BareIdentifier(variable.name().to_string())),
        }
    }

    fn equal(&self, argument: &SExpr) -> Result<Property, ParseError> {
        let token = argument
            .as_atom()
            .ok_or_else(|| ParseError::InvalidIdentifier(argument.to_string()))?;

        let equal = match self.variable(token)? {
            (variable, Some(index)) => Equal::with_trace(variable, index),
            (variable, None) => Equal::across(variable),
        };

        Ok(Property::Equal(equal))
    }

    fn operands(&self, keyword: &str, arguments: &[SExpr]) -> Result<Operands, ParseError> {
        let properties = arguments
            .iter()
            .map(|argument| self.lower(argument))
            .collect::<Result<Vec<_>, _>>()?;

        Operands::from_vec(properties).ok_or(ParseError::Arity {
            op: keyword.to_string(),
            expected: Arity::AtLeast(2),
            found: arguments.len(),
        })
    }

    fn list(&self, items: &[SExpr]) -> Result<Property, ParseError> {
        let (head, arguments) = items.split_first().ok_or(ParseError::EmptyFormula)?;
        let keyword = head
            .as_atom()
            .ok_or_else(|| ParseError::UnknownOperator(head.to_string()))?;
        let op = Operator::from_keyword(keyword).ok_or_else(|| ParseError::UnknownOperator(keyword.to_string()))?;

        if !op.arity().accepts(arguments.len()) {
            return Err(ParseError::Arity {
                op: keyword.to_string(),
                expected: op.arity(),
                found: arguments.len(),
            });
        }

        let mut operands = arguments.iter().map(|argument| self.lower(argument));
        let mut operand = || operands.next().unwrap_or(Err(ParseError::EmptyFormula));

        let property = match op {
            Operator::Equal => self.equal(&arguments[0])?,
            Operator::Not => Property::not(operand()?),
            Operator::Implies => Property::implies(operand()?, operand()?),
            Operator::Next => Property::next(operand()?),
            Operator::Previous => Property::previous(operand()?),
            Operator::Always => Property::always(operand()?),
            Operator::Historically => Property::historically(operand()?),
            Operator::Eventually => Property::eventually(operand()?),
            Operator::Once => Property::once(operand()?),
            Operator::Until => Property::until(operand()?, operand()?),
            Operator::And => Property::And(self.operands(keyword, arguments)?),
            Operator::Or => Property::Or(self.operands(keyword, arguments)?),
        };

        Ok(property)
    }

    fn lower(&self, expr: &SExpr) -> Result<Property, ParseError> {
        match expr {
            SExpr::Atom(token) => self.atom(token),
            SExpr::List(items) => self.list(items),
        }
    }
}

/// Parse `input` into a [`Property`], resolving its variables against `catalog`.
///
/// Variables are looked up among the term variables first, then among the proposition variables.
pub fn parse_formula(input: &str, catalog: &VariableCatalog) -> Result<Property, ParseError> {
    let expr = parse_sexpr(input)?;
    let property = Lowering { catalog }.lower(&expr)?;

    debug!(formula = %property, nodes = property.size(), "parsed formula");
    Ok(property)
}
