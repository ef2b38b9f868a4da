//! Parser for the pipe-separated event query DSL.
//!
//! A query is a sequence of clauses joined by `|`:
//!
//! ```text
//! where event_name == "Schedule" and isfire == true | count by status | limit 10
//! ```
//!
//! Clause keywords are case-insensitive. Later clauses of the same kind
//! override earlier ones.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map, value},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use crate::error::{GriddleError, Result};

/// One `where` condition over a normalized column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals { column: String, value: String },
    NotEquals { column: String, value: String },
    EqualsBool { column: String, value: bool },
    In { column: String, values: Vec<String> },
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Equals { column, .. }
            | Condition::NotEquals { column, .. }
            | Condition::EqualsBool { column, .. }
            | Condition::In { column, .. } => column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Where(Vec<Condition>),
    CountBy(Vec<String>),
    GroupBy(Vec<String>),
    SelectAll,
    /// `None` means `limit all` — explicitly unbounded.
    Limit(Option<usize>),
    Offset(usize),
}

/// A parsed query, ready for execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub conditions: Vec<Condition>,
    pub group_by: Option<Vec<String>>,
    pub want_count: bool,
    pub select_all: bool,
    /// `None` covers both "no limit clause" and `limit all`.
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Parse a DSL string into a [`ParsedQuery`].
///
/// # Errors
///
/// [`GriddleError::InvalidQuery`] with the offending input on any syntax
/// error, including invalid `limit`/`offset` numbers.
pub fn parse_query(input: &str) -> Result<ParsedQuery> {
    let (_, clauses) = all_consuming(delimited(
        multispace0,
        separated_list1(delimited(multispace0, char('|'), multispace0), clause),
        multispace0,
    ))(input)
    .map_err(|_| GriddleError::InvalidQuery(format!("could not parse query: {}", input.trim())))?;

    let mut query = ParsedQuery::default();
    for clause in clauses {
        match clause {
            Clause::Where(conditions) => query.conditions = conditions,
            Clause::CountBy(columns) => {
                query.want_count = true;
                query.group_by = Some(columns);
            }
            Clause::GroupBy(columns) => query.group_by = Some(columns),
            Clause::SelectAll => query.select_all = true,
            Clause::Limit(n) => query.limit = n,
            Clause::Offset(n) => query.offset = n,
        }
    }
    Ok(query)
}

fn clause(input: &str) -> IResult<&str, Clause> {
    alt((
        where_clause,
        count_by_clause,
        group_by_clause,
        select_all_clause,
        limit_clause,
        offset_clause,
    ))(input)
}

fn where_clause(input: &str) -> IResult<&str, Clause> {
    map(
        preceded(
            tuple((tag_no_case("where"), multispace1)),
            separated_list1(
                delimited(multispace1, tag_no_case("and"), multispace1),
                condition,
            ),
        ),
        Clause::Where,
    )(input)
}

fn condition(input: &str) -> IResult<&str, Condition> {
    alt((in_condition, comparison_condition))(input)
}

fn comparison_condition(input: &str) -> IResult<&str, Condition> {
    let (input, (column, op)) = separated_pair(
        identifier,
        multispace0,
        alt((tag("=="), tag("!="))),
    )(input)?;
    let (input, _) = multispace0(input)?;
    // Bool literals only make sense with `==`; `!= true` is rejected upstream
    // by the string-value branch failing to match.
    if op == "==" {
        if let Ok((rest, b)) = bool_literal(input) {
            return Ok((
                rest,
                Condition::EqualsBool {
                    column: column.to_string(),
                    value: b,
                },
            ));
        }
    }
    let (input, value) = quoted_string(input)?;
    let condition = if op == "==" {
        Condition::Equals {
            column: column.to_string(),
            value,
        }
    } else {
        Condition::NotEquals {
            column: column.to_string(),
            value,
        }
    };
    Ok((input, condition))
}

fn in_condition(input: &str) -> IResult<&str, Condition> {
    map(
        separated_pair(
            identifier,
            tuple((multispace1, tag_no_case("in"), multispace0)),
            delimited(
                tuple((char('('), multispace0)),
                separated_list1(
                    delimited(multispace0, char(','), multispace0),
                    quoted_string,
                ),
                tuple((multispace0, char(')'))),
            ),
        ),
        |(column, values)| Condition::In {
            column: column.to_string(),
            values,
        },
    )(input)
}

fn count_by_clause(input: &str) -> IResult<&str, Clause> {
    map(
        preceded(
            tuple((tag_no_case("count"), multispace1, tag_no_case("by"), multispace1)),
            column_list,
        ),
        Clause::CountBy,
    )(input)
}

fn group_by_clause(input: &str) -> IResult<&str, Clause> {
    map(
        preceded(
            tuple((tag_no_case("group"), multispace1, tag_no_case("by"), multispace1)),
            column_list,
        ),
        Clause::GroupBy,
    )(input)
}

fn select_all_clause(input: &str) -> IResult<&str, Clause> {
    value(
        Clause::SelectAll,
        tuple((tag_no_case("select"), multispace0, char('*'))),
    )(input)
}

fn limit_clause(input: &str) -> IResult<&str, Clause> {
    preceded(
        tuple((tag_no_case("limit"), multispace1)),
        alt((
            value(Clause::Limit(None), tag_no_case("all")),
            value(Clause::Limit(None), tag("*")),
            map(number, |n| Clause::Limit(Some(n))),
        )),
    )(input)
}

fn offset_clause(input: &str) -> IResult<&str, Clause> {
    map(
        preceded(tuple((tag_no_case("offset"), multispace1)), number),
        Clause::Offset,
    )(input)
}

fn column_list(input: &str) -> IResult<&str, Vec<String>> {
    separated_list1(
        delimited(multispace0, char(','), multispace0),
        map(identifier, |s: &str| s.to_string()),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
        |s: &str| s.to_string(),
    )(input)
}

fn bool_literal(input: &str) -> IResult<&str, bool> {
    // A bool literal must not be a prefix of an identifier-like token.
    let (rest, b) = alt((
        value(true, tag_no_case("true")),
        value(false, tag_no_case("false")),
    ))(input)?;
    if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, b))
}

fn number(input: &str) -> IResult<&str, usize> {
    let (rest, digits) = digit1(input)?;
    match digits.parse::<usize>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}
