use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{digit1, multispace0};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

/// Every keyword of the surface syntax, including the aliases of the future operators.
pub const KEYWORDS: [&str; 15] = [
    "EQ", "NOT", "IMPLIES", "AND", "OR", "G+", "G-", "X+", "X-", "F+", "F-", "U", "G", "X", "F",
];

pub fn is_keyword(token: &str) -> bool {
    KEYWORDS.contains(&token)
}

pub fn var_name(input: &str) -> IResult<&str, &str> {
    // Identifiers start with an ASCII letter, followed by any combination of ASCII letters,
    // digits, or '_' (e.g. `x`, `y12a`, `aes_reg_start`).
    fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic()
    }
    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    recognize(pair(take_while1(is_ident_start), take_while(is_ident_char)))(input)
}

pub fn trace_index(input: &str) -> IResult<&str, usize> {
    map_res(preceded(tag("."), digit1), str::parse::<usize>)(input)
}

/// A variable reference `name` or `name.N`, consuming the whole token.
pub fn var_ref(token: &str) -> Option<(&str, Option<usize>)> {
    all_consuming(pair(var_name, opt(trace_index)))(token)
        .ok()
        .map(|(_, reference)| reference)
}

pub fn op0<'a>(op: &'a str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| -> IResult<&'a str, &'a str> {
        let mut parser = delimited(multispace0, tag(op), multispace0);
        parser(input)
    }
}
