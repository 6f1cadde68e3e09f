mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use kumi::config::MathContext;
use kumi::parser::combinators::AlternativesParser;
use kumi::parser::leaf::{BigDecimalParser, LongParser, QuotedParser};
use kumi::parser::prelude::*;
use kumi::token::binary::BinaryOperatorClassifier;
use kumi::{CharPredicate, ParseError, ParserContext, ParserRef, ParserToken, TextCursor};
use pretty_assertions::assert_eq;

fn context() -> ParserContext {
    ParserContext::default()
}

#[test]
fn test_long_radix_16_max() {
    let parser = LongParser::with(16).unwrap();
    let (token, rest) = parser
        .parse_text("7fffffffffffffff///", &context())
        .unwrap()
        .unwrap();

    assert_eq!(token.as_long(), Some(i64::MAX));
    assert_eq!(token.text(), "7fffffffffffffff");
    assert_eq!(rest, "///");
}

#[test]
fn test_long_overflow_is_an_error() {
    let parser = LongParser::with(16).unwrap();
    let result = parser.parse_text("8000000000000000", &context());
    assert!(matches!(result, Err(ParseError::Overflow { .. })));

    let big = big_integer(16).unwrap();
    let (token, _) = big.parse_text("8000000000000000", &context()).unwrap().unwrap();
    assert_eq!(
        token.as_big_integer().map(|v| v.to_string()).as_deref(),
        Some("9223372036854775808")
    );
}

#[test]
fn test_big_decimal_with_exponent() {
    let parser = BigDecimalParser::with(MathContext::UNLIMITED);
    let (token, rest) = parser.parse_text("123.5E-67", &context()).unwrap().unwrap();

    assert_eq!(
        token.as_big_decimal(),
        Some(&BigDecimal::from_str("123.5E-67").unwrap())
    );
    assert_eq!(token.text(), "123.5E-67");
    assert_eq!(rest, "");
}

#[test]
fn test_sequence_with_missing_optional() {
    let parser = sequence()
        .required(string("abc").unwrap())
        .required(string("xyz").unwrap())
        .optional(string("123").unwrap())
        .build()
        .unwrap();

    let (token, rest) = parser.parse_text("abcxyz", &context()).unwrap().unwrap();
    assert_eq!(
        token,
        ParserToken::sequence(vec![
            ParserToken::string("abc", "abc"),
            ParserToken::string("xyz", "xyz"),
            ParserToken::missing("\"123\""),
        ])
    );
    assert_eq!(token.text(), "abcxyz");
    assert_eq!(rest, "");
}

struct Arithmetic;

impl BinaryOperatorClassifier for Arithmetic {
    fn priority(&self, token: &ParserToken) -> u32 {
        match token.as_char() {
            Some('*') => 2,
            Some('+') => 1,
            _ => 0,
        }
    }

    fn highest_priority(&self) -> u32 {
        2
    }

    fn lowest_priority(&self) -> u32 {
        1
    }

    fn binary_operand(
        &self,
        children: Vec<ParserToken>,
        _text: &str,
        symbol: &ParserToken,
    ) -> ParserToken {
        let name = if symbol.as_char() == Some('*') {
            "Multiply"
        } else {
            "Add"
        };
        ParserToken::node(name, children)
    }
}

#[test]
fn test_binary_operators_from_parsed_input() {
    let operand = long(10).unwrap();
    let operator = character(CharPredicate::any_of("+*"));
    let expression = sequence()
        .required(operand.clone())
        .required(operator.and_then(operand).repeated())
        .build()
        .unwrap()
        .binary_operators(Arithmetic);

    let (token, _) = expression.parse_text("1+2*3", &context()).unwrap().unwrap();

    let long = |v: i64| ParserToken::long(v, v.to_string());
    let op = |c: char| ParserToken::character(c, c.to_string());
    assert_eq!(
        token,
        ParserToken::node(
            "Add",
            vec![
                long(1),
                op('+'),
                ParserToken::node("Multiply", vec![long(2), op('*'), long(3)]),
            ]
        )
    );
}

#[test]
fn test_invalid_backslash_escape() {
    let parser = QuotedParser::double_quoted();
    let error = parser.parse_text(r#""ab\!c""#, &context()).unwrap_err();
    assert!(
        error.to_string().contains("invalid backslash escape char '!'"),
        "{}",
        error
    );
}

#[test]
fn test_single_alternative_is_the_same_instance() {
    let parser = string("abc").unwrap();
    let alternatives = AlternativesParser::with(vec![parser.clone()]).unwrap();
    assert!(alternatives.ptr_eq(&parser));
}

#[test]
fn test_string_parser_display_round_trip() {
    for literal in ["abc", "say \"hi\"", r"back\slash", "tab\there"] {
        let parser = string(literal).unwrap();
        let described = parser.to_string();

        let (quoted, _) = double_quoted().parse_text(&described, &context()).unwrap().unwrap();
        let value = quoted.as_str().unwrap();
        assert_eq!(value, literal);

        let (token, rest) = parser.parse_text(value, &context()).unwrap().unwrap();
        assert_eq!(token, ParserToken::string(literal, literal));
        assert_eq!(rest, "");
    }
}

#[test]
fn test_no_match_leaves_cursor_in_place() {
    let parsers: Vec<ParserRef> = vec![
        string("abd").unwrap(),
        sequence()
            .required(string("ab").unwrap())
            .required(long(10).unwrap())
            .build()
            .unwrap(),
        long(10).unwrap(),
        double(),
        local_date("yyyy-MM-dd").unwrap(),
    ];

    for parser in parsers {
        let mut cursor = TextCursor::new("abc--1");
        assert_eq!(parser.parse(&mut cursor, &context()), Ok(None), "{}", parser);
        assert_eq!(cursor.offset(), 0, "{}", parser);
    }
}

#[test]
fn test_signs_without_digits_do_not_match() {
    for text in ["++1", "--1", "+-1", "-+1", "-", "+"] {
        assert_eq!(long(10).unwrap().parse_text(text, &context()), Ok(None), "{}", text);
        assert_eq!(double().parse_text(text, &context()), Ok(None), "{}", text);
    }
    let (token, _) = long(10)
        .unwrap()
        .parse_text("-9223372036854775808", &context())
        .unwrap()
        .unwrap();
    assert_eq!(token.as_long(), Some(i64::MIN));
}
