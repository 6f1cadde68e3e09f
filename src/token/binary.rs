//! Regroups a flat run of operands and operators into binary expression nodes.
//!
//! Grammars for expressions are usually written as `operand (op operand)*`,
//! which yields a flat list. [`transform`] folds that list by precedence,
//! leftmost first within a priority, so `1-2-3` becomes `(1-2)-3`.

use super::ParserToken;

pub trait BinaryOperatorClassifier: Send + Sync {
    /// Priority of an operator token, `0` for operands.
    fn priority(&self, token: &ParserToken) -> u32;

    /// The tightest binding priority.
    fn highest_priority(&self) -> u32;

    /// The loosest binding priority, at least `1`.
    fn lowest_priority(&self) -> u32;

    /// Builds the node for `left op right`. `children` includes any
    /// whitespace between the operands and the operator.
    fn binary_operand(
        &self,
        children: Vec<ParserToken>,
        text: &str,
        symbol: &ParserToken,
    ) -> ParserToken;

    /// Whether `token` can act as a leading negative sign.
    fn is_negative_sign(&self, token: &ParserToken) -> bool {
        let _ = token;
        false
    }

    fn negative(&self, children: Vec<ParserToken>, text: &str) -> ParserToken {
        let _ = text;
        ParserToken::node("Negative", children)
    }
}

/// Applies `classifier` to the operands and operators of `token`.
///
/// Nested sequence and repeated containers are flattened first and missing
/// tokens dropped; leaves and named nodes are returned unchanged.
pub fn transform<C>(token: &ParserToken, classifier: &C) -> ParserToken
where
    C: BinaryOperatorClassifier + ?Sized,
{
    if !matches!(token, ParserToken::Sequence(_) | ParserToken::Repeated(_)) {
        return token.clone();
    }

    let mut items = Vec::new();
    flatten(token, &mut items);

    fold_negative_signs(&mut items, classifier);

    let (lowest, highest) = (classifier.lowest_priority(), classifier.highest_priority());
    for priority in (lowest.max(1)..=highest).rev() {
        while let Some((left, operator, right)) = find_operator(&items, priority, classifier) {
            let group: Vec<ParserToken> = items.drain(left..=right).collect();
            let text = text_of(&group);
            let symbol = group[operator - left].clone();
            let node = classifier.binary_operand(group, &text, &symbol);
            tracing::trace!(target: "kumi::token::binary", %text, name = node.name(), "grouped");
            items.insert(left, node);
        }
    }

    if items.len() == 1 {
        items.remove(0)
    } else {
        ParserToken::sequence(items)
    }
}

fn flatten(token: &ParserToken, out: &mut Vec<ParserToken>) {
    for child in token.children() {
        match child {
            ParserToken::Sequence(_) | ParserToken::Repeated(_) => flatten(child, out),
            ParserToken::Missing(_) => {}
            _ => out.push(child.clone()),
        }
    }
}

fn text_of(tokens: &[ParserToken]) -> String {
    tokens.iter().map(ParserToken::text).collect()
}

fn previous_solid(items: &[ParserToken], index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| !items[i].is_whitespace())
}

fn next_solid(items: &[ParserToken], index: usize) -> Option<usize> {
    (index + 1..items.len()).find(|&i| !items[i].is_whitespace())
}

/// A sign is leading when nothing but an operator precedes it and an
/// operand follows it. Signs are folded right to left so `--1` nests.
fn fold_negative_signs<C>(items: &mut Vec<ParserToken>, classifier: &C)
where
    C: BinaryOperatorClassifier + ?Sized,
{
    let mut index = items.len();
    while index > 0 {
        index -= 1;
        if !classifier.is_negative_sign(&items[index]) {
            continue;
        }
        let leading = previous_solid(items, index)
            .map_or(true, |previous| classifier.priority(&items[previous]) > 0);
        let operand = next_solid(items, index).filter(|&next| {
            classifier.priority(&items[next]) == 0 && !classifier.is_negative_sign(&items[next])
        });
        if let (true, Some(operand)) = (leading, operand) {
            let group: Vec<ParserToken> = items.drain(index..=operand).collect();
            let text = text_of(&group);
            items.insert(index, classifier.negative(group, &text));
        }
    }
}

/// The leftmost operator of `priority` with an operand on each side, as
/// `(left operand, operator, right operand)` indices. An operator whose
/// nearest neighbour is another operator is left in place.
fn find_operator<C>(
    items: &[ParserToken],
    priority: u32,
    classifier: &C,
) -> Option<(usize, usize, usize)>
where
    C: BinaryOperatorClassifier + ?Sized,
{
    items.iter().enumerate().find_map(|(index, item)| {
        if item.is_whitespace() || classifier.priority(item) != priority {
            return None;
        }
        let operand = |i: &usize| classifier.priority(&items[*i]) == 0;
        let left = previous_solid(items, index).filter(operand)?;
        let right = next_solid(items, index).filter(operand)?;
        Some((left, index, right))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Arithmetic;

    impl BinaryOperatorClassifier for Arithmetic {
        fn priority(&self, token: &ParserToken) -> u32 {
            match token.as_char() {
                Some('*' | '/') => 2,
                Some('+' | '-') => 1,
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
            let name = match symbol.as_char() {
                Some('+') => "Add",
                Some('-') => "Subtract",
                Some('*') => "Multiply",
                _ => "Divide",
            };
            ParserToken::node(name, children)
        }

        fn is_negative_sign(&self, token: &ParserToken) -> bool {
            token.as_char() == Some('-')
        }
    }

    fn n(value: i64) -> ParserToken {
        ParserToken::long(value, value.to_string())
    }

    fn op(c: char) -> ParserToken {
        ParserToken::character(c, c.to_string())
    }

    fn ws() -> ParserToken {
        ParserToken::whitespace(" ")
    }

    #[test]
    fn test_precedence() {
        let input = ParserToken::sequence(vec![n(1), op('+'), n(2), op('*'), n(3)]);
        let result = transform(&input, &Arithmetic);

        assert_eq!(
            result,
            ParserToken::node(
                "Add",
                vec![
                    n(1),
                    op('+'),
                    ParserToken::node("Multiply", vec![n(2), op('*'), n(3)])
                ]
            )
        );
        assert_eq!(result.text(), "1+2*3");
    }

    #[test]
    fn test_left_associative_with_whitespace() {
        let input = ParserToken::sequence(vec![
            n(1),
            ws(),
            op('-'),
            ws(),
            n(2),
            ParserToken::repeated(vec![ParserToken::sequence(vec![op('-'), n(3)])]),
            ws(),
        ]);
        let result = transform(&input, &Arithmetic);

        let inner = ParserToken::node("Subtract", vec![n(1), ws(), op('-'), ws(), n(2)]);
        assert_eq!(
            result,
            ParserToken::sequence(vec![
                ParserToken::node("Subtract", vec![inner, op('-'), n(3)]),
                ws()
            ])
        );
        assert_eq!(result.text(), "1 - 2-3 ");
    }

    #[test]
    fn test_negative_signs() {
        let input = ParserToken::sequence(vec![op('-'), n(1), op('*'), op('-'), op('-'), n(2)]);
        let result = transform(&input, &Arithmetic);

        let negative = |children| ParserToken::node("Negative", children);
        assert_eq!(
            result,
            ParserToken::node(
                "Multiply",
                vec![
                    negative(vec![op('-'), n(1)]),
                    op('*'),
                    negative(vec![op('-'), negative(vec![op('-'), n(2)])]),
                ]
            )
        );
    }

    #[test]
    fn test_leaves_and_nodes_are_unchanged() {
        assert_eq!(transform(&n(4), &Arithmetic), n(4));
        let node = ParserToken::node("Add", vec![n(1), op('+'), n(2)]);
        assert_eq!(transform(&node, &Arithmetic), node);
    }

    #[test]
    fn test_dangling_operator_is_kept() {
        let input = ParserToken::sequence(vec![n(1), op('*')]);
        assert_eq!(transform(&input, &Arithmetic), input);
    }

    #[test]
    fn test_operator_is_never_an_operand() {
        let input = ParserToken::sequence(vec![n(1), op('+'), op('*'), n(2)]);
        assert_eq!(transform(&input, &Arithmetic), input);

        // a later well-formed operator still groups
        let input = ParserToken::sequence(vec![op('*'), n(1), op('+'), n(2)]);
        assert_eq!(
            transform(&input, &Arithmetic),
            ParserToken::sequence(vec![
                op('*'),
                ParserToken::node("Add", vec![n(1), op('+'), n(2)])
            ])
        );
    }
}
