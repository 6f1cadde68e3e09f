//! Visitor dispatch over [`ParserToken`] trees.
//!
//! [`ParserToken::accept`] calls [`ParserTokenVisitor::start_visit`] for every
//! token. When that returns [`Visiting::Continue`] the kind specific method
//! runs (and for containers, the children are visited between
//! `start_visit_*` and `end_visit_*`). [`ParserTokenVisitor::end_visit`] is
//! always called.

use super::{ContainerToken, LeafToken, MissingToken, NodeToken, OffsetTime, ParserToken};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use num_bigint::BigInt;

/// Traversal control returned by the `start_visit*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visiting {
    Continue,
    Skip,
}

#[allow(unused_variables)]
pub trait ParserTokenVisitor {
    fn start_visit(&mut self, token: &ParserToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit(&mut self, token: &ParserToken) {}

    fn visit_character(&mut self, token: &LeafToken<char>) {}
    fn visit_string(&mut self, token: &LeafToken<String>) {}
    fn visit_whitespace(&mut self, token: &LeafToken<String>) {}
    fn visit_comment(&mut self, token: &LeafToken<String>) {}
    fn visit_single_quoted(&mut self, token: &LeafToken<String>) {}
    fn visit_double_quoted(&mut self, token: &LeafToken<String>) {}
    fn visit_long(&mut self, token: &LeafToken<i64>) {}
    fn visit_big_integer(&mut self, token: &LeafToken<BigInt>) {}
    fn visit_big_decimal(&mut self, token: &LeafToken<BigDecimal>) {}
    fn visit_double(&mut self, token: &LeafToken<f64>) {}
    fn visit_local_date(&mut self, token: &LeafToken<NaiveDate>) {}
    fn visit_local_time(&mut self, token: &LeafToken<NaiveTime>) {}
    fn visit_local_date_time(&mut self, token: &LeafToken<NaiveDateTime>) {}
    fn visit_offset_time(&mut self, token: &LeafToken<OffsetTime>) {}
    fn visit_offset_date_time(&mut self, token: &LeafToken<DateTime<FixedOffset>>) {}
    fn visit_zoned_date_time(&mut self, token: &LeafToken<DateTime<Tz>>) {}
    fn visit_missing(&mut self, token: &MissingToken) {}

    fn start_visit_sequence(&mut self, token: &ContainerToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_sequence(&mut self, token: &ContainerToken) {}

    fn start_visit_repeated(&mut self, token: &ContainerToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_repeated(&mut self, token: &ContainerToken) {}

    fn start_visit_node(&mut self, token: &NodeToken) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_node(&mut self, token: &NodeToken) {}
}

impl ParserToken {
    /// Walks this token and its children with `visitor`.
    pub fn accept<V: ParserTokenVisitor + ?Sized>(&self, visitor: &mut V) {
        if visitor.start_visit(self) == Visiting::Continue {
            match self {
                ParserToken::Character(t) => visitor.visit_character(t),
                ParserToken::String(t) => visitor.visit_string(t),
                ParserToken::Whitespace(t) => visitor.visit_whitespace(t),
                ParserToken::Comment(t) => visitor.visit_comment(t),
                ParserToken::SingleQuoted(t) => visitor.visit_single_quoted(t),
                ParserToken::DoubleQuoted(t) => visitor.visit_double_quoted(t),
                ParserToken::Long(t) => visitor.visit_long(t),
                ParserToken::BigInteger(t) => visitor.visit_big_integer(t),
                ParserToken::BigDecimal(t) => visitor.visit_big_decimal(t),
                ParserToken::Double(t) => visitor.visit_double(t),
                ParserToken::LocalDate(t) => visitor.visit_local_date(t),
                ParserToken::LocalTime(t) => visitor.visit_local_time(t),
                ParserToken::LocalDateTime(t) => visitor.visit_local_date_time(t),
                ParserToken::OffsetTime(t) => visitor.visit_offset_time(t),
                ParserToken::OffsetDateTime(t) => visitor.visit_offset_date_time(t),
                ParserToken::ZonedDateTime(t) => visitor.visit_zoned_date_time(t),
                ParserToken::Missing(t) => visitor.visit_missing(t),
                ParserToken::Sequence(t) => {
                    if visitor.start_visit_sequence(t) == Visiting::Continue {
                        accept_all(t.children(), visitor);
                    }
                    visitor.end_visit_sequence(t);
                }
                ParserToken::Repeated(t) => {
                    if visitor.start_visit_repeated(t) == Visiting::Continue {
                        accept_all(t.children(), visitor);
                    }
                    visitor.end_visit_repeated(t);
                }
                ParserToken::Node(t) => {
                    if visitor.start_visit_node(t) == Visiting::Continue {
                        accept_all(t.children(), visitor);
                    }
                    visitor.end_visit_node(t);
                }
            }
        }
        visitor.end_visit(self);
    }
}

fn accept_all<V: ParserTokenVisitor + ?Sized>(children: &[ParserToken], visitor: &mut V) {
    for child in children {
        child.accept(visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip_repeated: bool,
    }

    impl ParserTokenVisitor for Recorder {
        fn start_visit(&mut self, token: &ParserToken) -> Visiting {
            self.events.push(format!("start {}", token.name()));
            Visiting::Continue
        }

        fn end_visit(&mut self, token: &ParserToken) {
            self.events.push(format!("end {}", token.name()));
        }

        fn visit_long(&mut self, token: &LeafToken<i64>) {
            self.events.push(format!("long {}", token.value()));
        }

        fn visit_missing(&mut self, token: &MissingToken) {
            self.events.push(format!("missing {}", token.name()));
        }

        fn start_visit_repeated(&mut self, _token: &ContainerToken) -> Visiting {
            if self.skip_repeated {
                Visiting::Skip
            } else {
                Visiting::Continue
            }
        }
    }

    fn tree() -> ParserToken {
        ParserToken::sequence(vec![
            ParserToken::long(1, "1"),
            ParserToken::repeated(vec![ParserToken::long(2, "2")]),
            ParserToken::missing("z"),
        ])
    }

    #[test]
    fn test_visit_order() {
        let mut recorder = Recorder::default();
        tree().accept(&mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "start Sequence",
                "start Long",
                "long 1",
                "end Long",
                "start Repeated",
                "start Long",
                "long 2",
                "end Long",
                "end Repeated",
                "start Missing",
                "missing z",
                "end Missing",
                "end Sequence",
            ]
        );
    }

    #[test]
    fn test_skip_children() {
        let mut recorder = Recorder {
            skip_repeated: true,
            ..Default::default()
        };
        tree().accept(&mut recorder);
        assert!(!recorder.events.contains(&"long 2".to_string()));
        assert!(recorder.events.contains(&"end Repeated".to_string()));
    }

    #[test]
    fn test_start_visit_skip_stops_dispatch() {
        struct SkipAll(usize);
        impl ParserTokenVisitor for SkipAll {
            fn start_visit(&mut self, _token: &ParserToken) -> Visiting {
                Visiting::Skip
            }
            fn end_visit(&mut self, _token: &ParserToken) {
                self.0 += 1;
            }
        }

        let mut visitor = SkipAll(0);
        tree().accept(&mut visitor);
        assert_eq!(visitor.0, 1);
    }
}
