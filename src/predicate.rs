//! # Character Predicates
//!
//! [`CharPredicate`] is an immutable `char -> bool` test with a display string.
//! Predicates are cheap to clone and freely shared between parsers and threads.
//!
//! Predicates made by the constructors in this module compare structurally,
//! so `letter() == letter()`. A predicate made with
//! [`CharPredicate::from_fn`] is only equal to its own clones.

use std::fmt;
use std::sync::Arc;

use crate::error::BuildError;

#[derive(Clone)]
pub struct CharPredicate {
    test: Arc<dyn Fn(char) -> bool + Send + Sync>,
    name: Arc<str>,
    key: Option<Arc<str>>,
}

impl CharPredicate {
    /// Creates a predicate from a function and a display name.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(f),
            name: Arc::from(name.into()),
            key: None,
        }
    }

    /// A predicate whose `key` fully describes its test.
    fn keyed<F>(key: impl Into<String>, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self {
            key: Some(Arc::from(key.into())),
            ..Self::from_fn(name, f)
        }
    }

    /// Named after its own key.
    fn builtin<F>(key: impl Into<String>, f: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        let key = key.into();
        Self::keyed(key.clone(), key, f)
    }

    fn composed_key(&self, op: &str, other: &CharPredicate) -> Option<String> {
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => Some(format!("({} {} {})", a, op, b)),
            _ => None,
        }
    }

    fn with_key<F>(key: Option<String>, name: String, f: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        match key {
            Some(key) => Self::keyed(key, name, f),
            None => Self::from_fn(name, f),
        }
    }

    pub fn is(c: char) -> Self {
        Self::builtin(format!("{:?}", c), move |x| x == c)
    }

    pub fn any_of(chars: &str) -> Self {
        let set: Vec<char> = chars.chars().collect();
        Self::builtin(format!("{:?}", chars), move |x| set.contains(&x))
    }

    /// Inclusive range. Fails when `lo > hi`.
    pub fn range(lo: char, hi: char) -> Result<Self, BuildError> {
        if lo > hi {
            return Err(BuildError::InvalidArgument(format!(
                "range lower bound {:?} is greater than upper bound {:?}",
                lo, hi
            )));
        }
        Ok(Self::builtin(format!("{:?}..{:?}", lo, hi), move |x| {
            (lo..=hi).contains(&x)
        }))
    }

    pub fn digit() -> Self {
        Self::builtin("digit", char::is_numeric)
    }

    pub fn ascii_digit() -> Self {
        Self::builtin("ascii digit", |c| c.is_ascii_digit())
    }

    pub fn letter() -> Self {
        Self::builtin("letter", char::is_alphabetic)
    }

    pub fn letter_or_digit() -> Self {
        Self::builtin("letter or digit", char::is_alphanumeric)
    }

    pub fn whitespace() -> Self {
        Self::builtin("whitespace", char::is_whitespace)
    }

    pub fn any() -> Self {
        Self::builtin("*", |_| true)
    }

    pub fn none() -> Self {
        Self::builtin("!*", |_| false)
    }

    pub fn test(&self, c: char) -> bool {
        (self.test)(c)
    }

    pub fn and(&self, other: &CharPredicate) -> Self {
        let (left, right) = (self.clone(), other.clone());
        let key = self.composed_key("&", other);
        Self::with_key(key, format!("{} & {}", self, other), move |c| {
            left.test(c) && right.test(c)
        })
    }

    pub fn or(&self, other: &CharPredicate) -> Self {
        let (left, right) = (self.clone(), other.clone());
        let key = self.composed_key("|", other);
        Self::with_key(key, format!("{} | {}", self, other), move |c| {
            left.test(c) || right.test(c)
        })
    }

    pub fn negate(&self) -> Self {
        let inner = self.clone();
        let key = self.key.as_ref().map(|key| format!("!{}", key));
        Self::with_key(key, format!("!{}", self), move |c| !inner.test(c))
    }

    /// Same test, different display name.
    pub fn set_to_string(&self, name: impl Into<String>) -> Self {
        Self {
            test: Arc::clone(&self.test),
            name: Arc::from(name.into()),
            key: self.key.clone(),
        }
    }
}

impl fmt::Display for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for CharPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CharPredicate").field(&self.name).finish()
    }
}

/// Equal display names, plus equal keys or, without keys, the same test.
impl PartialEq for CharPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && match (&self.key, &other.key) {
                (Some(a), Some(b)) => a == b,
                (None, None) => Arc::ptr_eq(&self.test, &other.test),
                _ => false,
            }
    }
}
