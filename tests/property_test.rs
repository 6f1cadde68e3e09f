mod common;

use kumi::config::MathContext;
use kumi::parser::prelude::*;
use kumi::{CharPredicate, ParserContext, ParserRef, ParserToken, TextCursor};
use proptest::prelude::*;

fn parsers() -> Vec<ParserRef> {
    let digits = chars(CharPredicate::ascii_digit(), 1, 4).unwrap();
    vec![
        string("ab").unwrap(),
        string_ignore_case("aB").unwrap(),
        chars(CharPredicate::letter(), 1, 3).unwrap(),
        long(10).unwrap(),
        big_integer(16).unwrap(),
        big_decimal(MathContext::UNLIMITED),
        double(),
        decimal(),
        double_quoted(),
        whitespace(),
        sequence()
            .required(string("a").unwrap())
            .optional(digits.clone())
            .required(string("b").unwrap())
            .build()
            .unwrap(),
        digits.or(whitespace()).repeated(),
        chars(CharPredicate::letter(), 1, 8)
            .unwrap()
            .and_not(string("abc").unwrap()),
        local_date("yyyy-MM-dd").unwrap(),
        long(10).unwrap().optional(),
    ]
}

fn leaf() -> impl Strategy<Value = ParserToken> {
    prop_oneof![
        any::<i64>().prop_map(|v| ParserToken::long(v, v.to_string())),
        "[ \t]{1,3}".prop_map(|s| ParserToken::whitespace(s)),
        "[a-z]{1,4}".prop_map(|s| ParserToken::string(s.clone(), s)),
        "[a-z]{1,4}".prop_map(|s| ParserToken::missing(s)),
        "[a-z]{0,4}".prop_map(|s| ParserToken::comment(s.clone(), format!("/*{}*/", s))),
    ]
}

fn tree() -> impl Strategy<Value = ParserToken> {
    leaf().prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(ParserToken::sequence),
            prop::collection::vec(inner.clone(), 0..5).prop_map(ParserToken::repeated),
            prop::collection::vec(inner, 0..5).prop_map(|c| ParserToken::node("Group", c)),
        ]
    })
}

fn is_subsequence(short: &[ParserToken], long: &[ParserToken]) -> bool {
    let mut rest = long.iter();
    short.iter().all(|s| rest.any(|l| l == s))
}

proptest! {
    #[test]
    fn no_match_consumes_nothing_and_matches_account_for_all_text(
        input in "[-+0-9a-fA-F.,\"\\\\ $E]{0,16}"
    ) {
        let context = ParserContext::default();
        for parser in parsers() {
            let mut cursor = TextCursor::new(&input);
            match parser.parse(&mut cursor, &context) {
                Ok(None) => prop_assert_eq!(cursor.offset(), 0, "{}", parser),
                Ok(Some(token)) => {
                    let consumed = &input[..cursor.offset()];
                    prop_assert_eq!(token.text(), consumed, "{}", parser);
                    prop_assert_eq!(format!("{}{}", consumed, cursor.remaining()), input.clone());
                }
                Err(_) => {}
            }
        }
    }

    #[test]
    fn flat_is_idempotent_and_keeps_text(token in tree()) {
        let flat = token.flat();
        prop_assert_eq!(flat.flat(), flat.clone());
        prop_assert_eq!(flat.text(), token.text());
    }

    #[test]
    fn removals_are_idempotent_and_order_preserving(token in tree()) {
        let quiet = token.remove_noise();
        prop_assert_eq!(quiet.remove_noise(), quiet.clone());
        prop_assert!(is_subsequence(quiet.children(), token.children()));
        prop_assert!(quiet.children().iter().all(|c| !c.is_noise()));

        let tight = token.remove_whitespace();
        prop_assert_eq!(tight.remove_whitespace(), tight.clone());
        prop_assert!(is_subsequence(tight.children(), token.children()));
        prop_assert!(tight.children().iter().all(|c| !c.is_whitespace()));

        let present = token.remove_missing();
        prop_assert_eq!(present.remove_missing(), present.clone());
        prop_assert!(is_subsequence(present.children(), token.children()));
    }

    #[test]
    fn cursor_restore_returns_to_mark(input in "\\PC{0,20}", steps in 0usize..25) {
        let mut cursor = TextCursor::new(&input);
        let mark = cursor.save();
        for _ in 0..steps {
            if cursor.next().is_err() {
                break;
            }
        }
        let taken = cursor.text_since(mark).to_string();
        prop_assert_eq!(format!("{}{}", taken, cursor.remaining()), input.clone());

        cursor.restore(mark);
        prop_assert_eq!(cursor.offset(), 0);
        prop_assert_eq!(cursor.remaining(), input.as_str());
    }
}
