//! Parser for knowledge base files
//!
//! ```text
//! # blocks world
//! fact: (isa cube block)
//! rule: ((isa ?x block) (on ?x ?y)) -> (covered ?y)
//! ```
//!
//! One item per line. Blank lines and lines starting with `#` are skipped.
//! `?name` is a variable, any other word is a constant.

use crate::error::{KbError, KbResult};
use crate::kb::{Fact, Item, Rule};
use crate::logic::{Statement, Term};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt},
    multi::{many0, many1},
    sequence::{delimited, preceded, terminated},
    IResult,
};
use std::fs;
use std::path::Path;

/// Parse a single statement such as `(on ?x table)`
pub fn parse_statement(input: &str) -> KbResult<Statement> {
    run(delimited(multispace0, parse_statement_expr, multispace0), input, 1)
}

/// Parse a single `fact:` or `rule:` line
pub fn parse_item(input: &str) -> KbResult<Item> {
    run(delimited(multispace0, parse_item_expr, multispace0), input, 1)
}

/// Parse every item in a file's contents
pub fn parse_items(input: &str) -> KbResult<Vec<Item>> {
    let mut items = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();

        // Skip blanks and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        items.push(run(parse_item_expr, line, idx + 1)?);
    }
    Ok(items)
}

/// Read and parse a knowledge base file
pub fn read_items(path: impl AsRef<Path>) -> KbResult<Vec<Item>> {
    let content = fs::read_to_string(path)?;
    parse_items(&content)
}

/// Run a parser over the whole input, mapping failures to `KbError::Parse`
fn run<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    input: &'a str,
    line: usize,
) -> KbResult<O> {
    match all_consuming(parser)(input) {
        Ok((_, output)) => Ok(output),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(KbError::Parse {
            line,
            message: format!("unexpected input at '{}'", snippet(e.input)),
        }),
        Err(nom::Err::Incomplete(_)) => Err(KbError::Parse {
            line,
            message: "incomplete input".to_string(),
        }),
    }
}

fn snippet(input: &str) -> &str {
    match input.char_indices().nth(20) {
        Some((end, _)) => &input[..end],
        None => input,
    }
}

/// Parse `fact: <statement>` or `rule: (<statement> ...) -> <statement>`
fn parse_item_expr(input: &str) -> IResult<&str, Item> {
    alt((
        map(parse_fact_expr, Item::Fact),
        map(parse_rule_expr, Item::Rule),
    ))(input)
}

fn parse_fact_expr(input: &str) -> IResult<&str, Fact> {
    let (input, _) = tag("fact:")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, statement) = parse_statement_expr(input)?;
    Ok((input, Fact::new(statement)))
}

fn parse_rule_expr(input: &str) -> IResult<&str, Rule> {
    let (input, _) = tag("rule:")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, lhs) = many1(delimited(
        multispace0,
        parse_statement_expr,
        terminated(multispace0, opt(char(','))),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = tag("->")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, rhs) = parse_statement_expr(input)?;
    Ok((input, Rule::new(lhs, rhs)))
}

/// Parse `(predicate term ...)`
fn parse_statement_expr(input: &str) -> IResult<&str, Statement> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, predicate) = parse_word(input)?;
    let (input, terms) = many0(preceded(multispace1, parse_term))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Statement::new(predicate, terms)))
}

fn parse_term(input: &str) -> IResult<&str, Term> {
    alt((
        map(preceded(char('?'), parse_word), |name: &str| Term::variable(name)),
        map(parse_word, |name: &str| Term::constant(name)),
    ))(input)
}

fn parse_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}
