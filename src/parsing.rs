//! Recursive-descent parser for the query language.
//!
//! Tokens are carved straight out of the input string: bare literals
//! (`[A-Za-z0-9._*]+`), single- and double-quoted strings (verbatim bodies,
//! no escapes), the five operators and the grouping punctuation. Keywords
//! `and`, `or` and `not` are ordinary literal tokens reinterpreted in
//! position, so backtracking through `alt` replaces explicit token
//! lookahead when discriminating the three `(`-forms of a value.

use thiserror::Error;
use winnow::{
	ascii::multispace0,
	combinator::{alt, delimited, eof, opt, preceded, repeat},
	error::{ContextError, ErrMode, StrContext, StrContextValue},
	prelude::*,
	token::take_while,
};

use crate::ast::{
	AtomicValue, ComparisonOperator, Conjunction, Disjunction, Expression, MatchPayload,
	PropertyMatch, SubExpression, Term,
};

/// --- Helper aliases ---
type Input<'a> = &'a str;
/// Result for internal parser functions
type ParserResult<T> = winnow::Result<T, ErrMode<ContextError>>;

/// A rejected query. Fatal for the query in question; parsing has no
/// partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid query at offset {offset}: {message}")]
pub struct ParseError {
	/// Byte offset of the failure in the original query string.
	pub offset: usize,
	message: String,
}

/// Parses a query into an [`Expression`].
pub fn parse(query: &str) -> Result<Expression, ParseError> {
	tracing::trace!(query, "parsing query");

	let mut full_query_parser =
		(parse_disjunction, multispace0, eof).map(|(root, _, _)| Expression { root });

	full_query_parser.parse(query).map_err(|error| ParseError {
		offset: error.offset(),
		message: error.to_string(),
	})
}

// Helper to check for keywords
fn is_keyword(word: &str) -> bool {
	matches!(word, "and" | "or" | "not")
}

/// Parses a bare literal token: letters, digits, dots, underscores, stars
fn literal_token<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
	take_while(1.., |c: char| {
		c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '*')
	})
	.parse_next(input)
}

/// Parses one specific keyword as a full token
fn keyword<'a>(word: &'static str) -> impl Parser<Input<'a>, &'a str, ErrMode<ContextError>> {
	preceded(multispace0, literal_token.verify(move |token: &str| token == word))
}

/// Parses an atomic value: a bare literal or a quoted string. Quoted bodies
/// are taken verbatim; the quote character itself cannot appear inside.
fn parse_atomic<'a>(input: &mut Input<'a>) -> ParserResult<AtomicValue> {
	preceded(
		multispace0,
		alt((
			delimited('\'', take_while(0.., |c| c != '\''), '\''),
			delimited('"', take_while(0.., |c| c != '"'), '"'),
			literal_token.verify(|token: &str| !is_keyword(token)),
		)),
	)
	.map(AtomicValue::new)
	.context(StrContext::Expected(StrContextValue::Description(
		"literal or quoted string",
	)))
	.parse_next(input)
}

/// Parses a property path and splits it into its dotted segments
fn parse_property_path(input: &mut Input<'_>) -> ParserResult<Vec<String>> {
	preceded(
		multispace0,
		literal_token.verify(|token: &str| {
			!is_keyword(token) && token.split('.').all(|segment| !segment.is_empty())
		}),
	)
	.map(|token: &str| token.split('.').map(str::to_owned).collect())
	.context(StrContext::Expected(StrContextValue::Description(
		"property name",
	)))
	.parse_next(input)
}

fn parse_operator(input: &mut Input<'_>) -> ParserResult<ComparisonOperator> {
	preceded(
		multispace0,
		alt((
			"<=".value(ComparisonOperator::Lte),
			">=".value(ComparisonOperator::Gte),
			":".value(ComparisonOperator::Eq),
			"<".value(ComparisonOperator::Lt),
			">".value(ComparisonOperator::Gt),
		)),
	)
	.context(StrContext::Expected(StrContextValue::Description(
		"comparison operator (':', '<', '>', '<=' or '>=')",
	)))
	.parse_next(input)
}

/// Parses the inline-object payload `{ expression }`
fn parse_nested_value(input: &mut Input<'_>) -> ParserResult<MatchPayload> {
	delimited(
		(multispace0, '{'),
		parse_disjunction,
		(multispace0, '}').context(StrContext::Expected(StrContextValue::CharLiteral('}'))),
	)
	.map(|inner| MatchPayload::Nested(Box::new(inner)))
	.parse_next(input)
}

/// Parses the set-literal payload `( v1 or v2 ... )`
fn parse_any_of_values(input: &mut Input<'_>) -> ParserResult<MatchPayload> {
	delimited(
		(multispace0, '('),
		(
			parse_atomic,
			repeat(1.., preceded(keyword("or"), parse_atomic)),
		),
		(multispace0, ')'),
	)
	.map(|(first, rest): (AtomicValue, Vec<AtomicValue>)| {
		let mut values = vec![first];
		values.extend(rest);
		MatchPayload::AnyOf(values)
	})
	.parse_next(input)
}

/// Parses the set-literal payload `( v1 and v2 ... )`
fn parse_all_of_values(input: &mut Input<'_>) -> ParserResult<MatchPayload> {
	delimited(
		(multispace0, '('),
		(
			parse_atomic,
			repeat(1.., preceded(keyword("and"), parse_atomic)),
		),
		(multispace0, ')'),
	)
	.map(|(first, rest): (AtomicValue, Vec<AtomicValue>)| {
		let mut values = vec![first];
		values.extend(rest);
		MatchPayload::AllOf(values)
	})
	.parse_next(input)
}

/// Parses a property match: `name op value`
fn parse_property_match(input: &mut Input<'_>) -> ParserResult<PropertyMatch> {
	let path = parse_property_path(input)?;
	let operation = parse_operator(input)?;
	let payload = alt((
		parse_nested_value,
		parse_any_of_values,
		parse_all_of_values,
		parse_atomic.map(MatchPayload::Atomic),
	))
	.context(StrContext::Expected(StrContextValue::Description(
		"value, '{...}' sub-expression or '(...)' set literal",
	)))
	.parse_next(input)?;

	// Set literals are an equality form; ordering operators make no sense
	// over them and are rejected here rather than at match time.
	if operation != ComparisonOperator::Eq
		&& matches!(payload, MatchPayload::AnyOf(_) | MatchPayload::AllOf(_))
	{
		let mut context = ContextError::new();
		context.push(StrContext::Label("set literals require the ':' operator"));
		return Err(ErrMode::Cut(context));
	}

	Ok(PropertyMatch {
		path,
		operation,
		payload,
	})
}

/// Parses a sub-expression: an optional `not` followed by a parenthesised
/// expression or a property match
fn parse_sub_expression(input: &mut Input<'_>) -> ParserResult<SubExpression> {
	let negated = opt(keyword("not")).parse_next(input)?.is_some();
	let term = alt((
		delimited(
			(multispace0, '('),
			parse_disjunction,
			(multispace0, ')').context(StrContext::Expected(StrContextValue::CharLiteral(')'))),
		)
		.map(|inner| Term::Grouped(Box::new(inner))),
		parse_property_match.map(Term::Property),
	))
	.context(StrContext::Expected(StrContextValue::Description(
		"property match or parenthesized expression",
	)))
	.parse_next(input)?;

	Ok(SubExpression { negated, term })
}

fn parse_conjunction(input: &mut Input<'_>) -> ParserResult<Conjunction> {
	let first = parse_sub_expression(input)?;
	let rest = repeat(0.., preceded(keyword("and"), parse_sub_expression)).parse_next(input)?;
	Ok(Conjunction { first, rest })
}

fn parse_disjunction(input: &mut Input<'_>) -> ParserResult<Disjunction> {
	let first = parse_conjunction(input)?;
	let rest = repeat(0.., preceded(keyword("or"), parse_conjunction)).parse_next(input)?;
	Ok(Disjunction { first, rest })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn canonical(query: &str) -> String {
		parse(query)
			.unwrap_or_else(|error| panic!("query '{}' failed to parse: {}", query, error))
			.to_string()
	}

	#[test]
	fn test_canonical_reconstruction() {
		assert_eq!(canonical("a.b.c.d:'1'"), "a.b.c.d:1");
		assert_eq!(canonical("a:'1'"), "a:1");
		assert_eq!(canonical("a_b:'1'"), "a_b:1");
		assert_eq!(canonical("a:c or b:2"), "(a:c or b:2)");
		assert_eq!(canonical("a:c or b:2 and c:3"), "(a:c or (b:2 and c:3))");
		assert_eq!(canonical("(a:c or b:2) and c:3"), "((a:c or b:2) and c:3)");
		assert_eq!(
			canonical("a.b:c or b:2 and (c<=3 or d:{da:a or db:'b'}) or list:(1 or 2 or 3)"),
			"(a.b:c or (b:2 and (c<=3 or d:{(da:a or db:b)})) or list:(1 or 2 or 3))"
		);
		assert_eq!(
			canonical("a>0 or b<1 or c>=1 or d<=1"),
			"(a>0 or b<1 or c>=1 or d<=1)"
		);
	}

	#[test]
	fn test_canonical_form_of_set_literals() {
		assert_eq!(canonical("a:(1 or 2)"), "a:(1 or 2)");
		assert_eq!(canonical("a:(1 and 2 and 3)"), "a:(1 and 2 and 3)");
	}

	#[test]
	fn test_negation_and_grouping() {
		assert_eq!(canonical("not a:1"), "not a:1");
		assert_eq!(canonical("not (a:1 or b:2)"), "not (a:1 or b:2)");
		assert_eq!(canonical("not(a:1)"), "not a:1");
	}

	#[test]
	fn test_quoting_styles() {
		assert_eq!(canonical("a:\"double\""), "a:double");
		assert_eq!(canonical("a:'it is'"), "a:it is");
		// A quoted keyword is an ordinary value.
		assert_eq!(canonical("a:'or'"), "a:or");
	}

	#[test]
	fn test_whitespace_is_insignificant() {
		assert_eq!(canonical("  a : 1  "), "a:1");
		assert_eq!(canonical("a:1\n\tand b:2"), "(a:1 and b:2)");
	}

	#[test]
	fn test_rejects_malformed_queries() {
		for query in [
			"",
			"a:",
			":1",
			"a:1 and",
			"or a:1",
			"a..b:1",
			".a:1",
			"a.:1",
			"a:(1)",
			"a:()",
			"a:(1 or 2",
			"a:{b:1",
			"(a:1 or b:2",
			"a:1 b:2",
			"a==1",
			"and:1",
			"a:or",
			"a:(1 or 2 and 3)",
		] {
			assert!(parse(query).is_err(), "query '{}' should be rejected", query);
		}
	}

	#[test]
	fn test_rejects_ordering_operators_on_set_literals() {
		for query in ["a>(1 or 2)", "a<=(1 and 2)"] {
			let error = parse(query).unwrap_err();
			assert!(
				error.to_string().contains("set literals"),
				"unexpected message for '{}': {}",
				query,
				error
			);
		}
	}

	#[test]
	fn test_parse_error_reports_offset() {
		let error = parse("a:1 and !").unwrap_err();
		assert!(error.offset >= 3, "offset {} too small", error.offset);
	}

	#[test]
	fn test_wildcards_survive_quoting() {
		let expression = parse("a:'value*'").unwrap();
		assert_eq!(expression.to_string(), "a:value*");
	}
}
