//! Ordered argument list shared by blocks and directives

use crate::error::{TreeError, TreeResult};
use crate::parser::lexer::quote;
use serde::Serialize;
use std::fmt;

/// The argument tokens following a block or directive name.
///
/// Order is preserved and duplicates are allowed. The `Display` form quotes
/// every element and joins them with single spaces: `"a b" "c"`. Embedded
/// quotes are escaped as `\"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Arguments {
    items: Vec<String>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> TreeResult<&str> {
        self.items
            .get(index)
            .map(String::as_str)
            .ok_or(self.out_of_range(index))
    }

    /// Replace the value at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> TreeResult<String> {
        let err = self.out_of_range(index);
        let slot = self.items.get_mut(index).ok_or(err)?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.items.push(value.into());
    }

    /// Insert before `index`; `index == len` appends
    pub fn insert(&mut self, index: usize, value: impl Into<String>) -> TreeResult<()> {
        if index > self.items.len() {
            return Err(self.out_of_range(index));
        }
        self.items.insert(index, value.into());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> TreeResult<String> {
        if index >= self.items.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First argument satisfying `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<&str>
    where
        P: FnMut(&str) -> bool,
    {
        self.items
            .iter()
            .map(String::as_str)
            .find(|arg| predicate(arg))
    }

    /// Position of the first argument satisfying `predicate`
    pub fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.items.iter().position(|arg| predicate(arg))
    }

    /// Case-insensitive exact match against any non-empty argument.
    ///
    /// Both sides are compared through Unicode lowercase mapping, with no
    /// locale tailoring.
    pub fn contains_ignore_case(&self, value: &str) -> bool {
        let needle = value.to_lowercase();
        self.items
            .iter()
            .any(|arg| !arg.is_empty() && arg.to_lowercase() == needle)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Snapshot copy of the current values
    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    fn out_of_range(&self, index: usize) -> TreeError {
        TreeError::OutOfRange {
            index,
            len: self.items.len(),
        }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote(arg))?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for Arguments {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for Arguments {
    fn from(items: Vec<String>) -> Self {
        Self { items }
    }
}

impl From<Arguments> for Vec<String> {
    fn from(args: Arguments) -> Self {
        args.items
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
