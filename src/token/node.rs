//! # Node Projection
//!
//! [`TokenNode`] is a borrowed, read-only view of a token inside its tree
//! that knows its parent and position. [`TokenSelector`] queries a tree with
//! a small path language:
//!
//! * `/Name` selects children named `Name`
//! * `//Name` selects descendants named `Name`
//! * `*` matches any name
//!
//! A path starts above the root, so `/Sequence` matches a root sequence and
//! `//Long` every `Long` token in the tree. Results come back in document
//! order without duplicates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

use super::ParserToken;
use crate::config::ParserContext;
use crate::error::BuildError;
use crate::parser::prelude::{end_of_text, initial_and_part, sequence, string};
use crate::parser::{DefaultReporter, ParseError, ParserRef};
use crate::predicate::CharPredicate;

/// A token together with its location in the tree rooted at `root`.
#[derive(Debug, Clone)]
pub struct TokenNode<'a> {
    root: &'a ParserToken,
    token: &'a ParserToken,
    path: Vec<usize>,
}

impl<'a> TokenNode<'a> {
    pub fn root(token: &'a ParserToken) -> Self {
        Self {
            root: token,
            token,
            path: Vec::new(),
        }
    }

    pub fn token(&self) -> &'a ParserToken {
        self.token
    }

    /// The token kind, or the name of a named node.
    pub fn name(&self) -> &'a str {
        self.token.name()
    }

    /// `text` for every token, plus `slot` for missing tokens.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        let mut attributes = BTreeMap::new();
        attributes.insert("text", self.token.text().to_string());
        if let ParserToken::Missing(missing) = self.token {
            attributes.insert("slot", missing.name().to_string());
        }
        attributes
    }

    pub fn children(&self) -> Vec<TokenNode<'a>> {
        self.token
            .children()
            .iter()
            .enumerate()
            .map(|(index, token)| {
                let mut path = self.path.clone();
                path.push(index);
                TokenNode {
                    root: self.root,
                    token,
                    path,
                }
            })
            .collect()
    }

    pub fn parent(&self) -> Option<TokenNode<'a>> {
        let (_, parent_path) = self.path.split_last()?;
        let token = parent_path
            .iter()
            .try_fold(self.root, |token, &index| token.children().get(index))?;
        Some(TokenNode {
            root: self.root,
            token,
            path: parent_path.to_vec(),
        })
    }

    /// Position among the parent's children; `None` for the root.
    pub fn index(&self) -> Option<usize> {
        self.path.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<TokenNode<'a>> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<TokenNode<'a>>) {
        for child in self.children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }
}

/// Nodes are the same when they sit at the same place in the same tree.
impl PartialEq for TokenNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.root, other.root) && self.path == other.path
    }
}

impl fmt::Display for TokenNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for (key, value) in self.attributes() {
            write!(f, " {}={:?}", key, value)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Empty selector path")]
    Empty,
    #[error("Invalid selector path {path:?}: {source}")]
    Syntax { path: String, source: ParseError },
    #[error("Selector grammar: {0}")]
    Grammar(#[from] BuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
}

/// One `/name` or `//name` step. A `None` name is `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub name: Option<String>,
}

impl Step {
    fn matches(&self, node: &TokenNode<'_>) -> bool {
        self.name.as_deref().map_or(true, |name| name == node.name())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            Axis::Child => "/",
            Axis::Descendant => "//",
        };
        write!(f, "{}{}", axis, self.name.as_deref().unwrap_or("*"))
    }
}

lazy_static! {
    static ref SELECTOR_GRAMMAR: Result<ParserRef, BuildError> = selector_grammar();
}

fn selector_grammar() -> Result<ParserRef, BuildError> {
    let underscore = CharPredicate::is('_');
    let name = string("*")?.or(initial_and_part(
        CharPredicate::letter().or(&underscore),
        CharPredicate::letter_or_digit().or(&underscore),
        1,
        usize::MAX,
    )?);
    let axis = string("//")?.or(string("/")?);
    let step = sequence()
        .required(axis)
        .required(name.or_report(DefaultReporter))
        .build()?;

    Ok(sequence()
        .required(step.repeated())
        .required(end_of_text().or_report(DefaultReporter))
        .build()?
        .or_fail_if_not_at_end(DefaultReporter))
}

/// A compiled selector path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSelector {
    steps: Vec<Step>,
}

impl TokenSelector {
    pub fn new(steps: Vec<Step>) -> Result<Self, SelectorError> {
        if steps.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { steps })
    }

    pub fn parse(path: &str) -> Result<Self, SelectorError> {
        let grammar = SELECTOR_GRAMMAR.as_ref().map_err(Clone::clone)?;
        let syntax = |source| SelectorError::Syntax {
            path: path.to_string(),
            source,
        };

        let Some((token, _)) = grammar
            .parse_text(path, &ParserContext::default())
            .map_err(syntax)?
        else {
            return Err(SelectorError::Empty);
        };

        let steps = token.children()[0]
            .children()
            .iter()
            .map(|step| {
                let axis = match step.children()[0].as_str() {
                    Some("//") => Axis::Descendant,
                    _ => Axis::Child,
                };
                let name = match step.children()[1].as_str() {
                    Some("*") | None => None,
                    Some(name) => Some(name.to_string()),
                };
                Step { axis, name }
            })
            .collect();

        Self::new(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Every node of the tree under `root` matched by the path.
    pub fn select<'a>(&self, root: &'a ParserToken) -> Vec<TokenNode<'a>> {
        let root = TokenNode::root(root);
        let mut current: Option<Vec<TokenNode<'a>>> = None;

        for step in &self.steps {
            let candidates: Vec<TokenNode<'a>> = match &current {
                // above the root
                None => match step.axis {
                    Axis::Child => vec![root.clone()],
                    Axis::Descendant => {
                        let mut all = vec![root.clone()];
                        all.extend(root.descendants());
                        all
                    }
                },
                Some(nodes) => nodes
                    .iter()
                    .flat_map(|node| match step.axis {
                        Axis::Child => node.children(),
                        Axis::Descendant => node.descendants(),
                    })
                    .collect(),
            };

            let mut matched: Vec<TokenNode<'a>> =
                candidates.into_iter().filter(|node| step.matches(node)).collect();
            matched.sort_by(|a, b| a.path.cmp(&b.path));
            matched.dedup();
            current = Some(matched);
        }

        current.unwrap_or_default()
    }

    pub fn first<'a>(&self, root: &'a ParserToken) -> Option<TokenNode<'a>> {
        self.select(root).into_iter().next()
    }
}

impl FromStr for TokenSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TokenSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
