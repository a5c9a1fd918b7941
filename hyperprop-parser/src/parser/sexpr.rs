//! Untyped s-expression layer of the formula syntax.

use std::fmt::{Display, Formatter};

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::multispace0;
use nom::combinator::map;
use nom::error::Error as NomError;
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

use super::common::op0;
use super::errors::ParseError;

/// A parenthesized tree of whitespace separated tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    Atom(String),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(token) => Some(token),
            Self::List(_) => None,
        }
    }
}

impl Display for SExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atom(token) => write!(f, "{}", token),
            Self::List(items) => {
                write!(f, "(")?;

                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, " ")?;
                    }

                    write!(f, "{}", item)?;
                }

                write!(f, ")")
            }
        }
    }
}

fn is_token_char(c: char) -> bool {
    !c.is_whitespace() && c != '(' && c != ')'
}

struct AtomParser;

impl<'i> Parser<&'i str, SExpr, NomError<&'i str>> for AtomParser {
    fn parse(&mut self, input: &'i str) -> IResult<&'i str, SExpr> {
        let mut parser = map(take_while1(is_token_char), |token: &str| SExpr::Atom(token.to_string()));
        parser.parse(input)
    }
}

struct ListParser;

impl<'i> Parser<&'i str, SExpr, NomError<&'i str>> for ListParser {
    fn parse(&mut self, input: &'i str) -> IResult<&'i str, SExpr> {
        let items = many0(preceded(multispace0, SExprParser));
        let mut parser = map(delimited(op0("("), items, op0(")")), SExpr::List);

        parser.parse(input)
    }
}

struct SExprParser;

impl<'i> Parser<&'i str, SExpr, NomError<&'i str>> for SExprParser {
    fn parse(&mut self, input: &'i str) -> IResult<&'i str, SExpr> {
        let mut parser = alt((ListParser, AtomParser));
        parser.parse(input)
    }
}

/// Parse `input` into a single s-expression, rejecting unbalanced parentheses and trailing input.
pub fn parse_sexpr(input: &str) -> Result<SExpr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    let mut parser = delimited(multispace0, SExprParser, multispace0);

    match parser.parse(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(ParseError::syntax(input, rest)),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(ParseError::syntax(input, err.input)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::syntax(input, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_sexpr, SExpr};
    use crate::parser::errors::ParseError;

    fn atom(token: &str) -> SExpr {
        SExpr::Atom(token.to_string())
    }

    #[test]
    fn nested_lists() -> Result<(), ParseError> {
        let expr = parse_sexpr("  (G+ ( IMPLIES (EQ x)(EQ y.2) ) ) ")?;
        let expected = SExpr::List(vec![
            atom("G+"),
            SExpr::List(vec![
                atom("IMPLIES"),
                SExpr::List(vec![atom("EQ"), atom("x")]),
                SExpr::List(vec![atom("EQ"), atom("y.2")]),
            ]),
        ]);

        assert_eq!(expr, expected);
        assert_eq!(expr.to_string(), "(G+ (IMPLIES (EQ x) (EQ y.2)))");

        Ok(())
    }

    #[test]
    fn bare_atom() -> Result<(), ParseError> {
        assert_eq!(parse_sexpr("good.1")?, atom("good.1"));
        Ok(())
    }

    #[test]
    fn empty_list() -> Result<(), ParseError> {
        assert_eq!(parse_sexpr("( )")?, SExpr::List(Vec::new()));
        Ok(())
    }

    #[test]
    fn unbalanced() {
        assert!(matches!(parse_sexpr("(NOT (EQ xy)"), Err(ParseError::Syntax { .. })));
        assert!(matches!(parse_sexpr("(EQ x))"), Err(ParseError::Syntax { offset: 6, .. })));
        assert!(matches!(parse_sexpr(")"), Err(ParseError::Syntax { offset: 0, .. })));
        assert_eq!(parse_sexpr(" \n "), Err(ParseError::EmptyFormula));
    }
}
