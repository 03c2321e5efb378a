//! Message payload types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single element of a list or message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    Float(f32),
    Symbol(String),
}

impl Atom {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Atom::Float(f) => Some(*f),
            Atom::Symbol(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) => Some(s),
            Atom::Float(_) => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Atom::Float(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Atom::Symbol(_))
    }
}

impl From<f32> for Atom {
    fn from(v: f32) -> Self {
        Atom::Float(v)
    }
}

impl From<i32> for Atom {
    fn from(v: i32) -> Self {
        Atom::Float(v as f32)
    }
}

impl From<&str> for Atom {
    fn from(v: &str) -> Self {
        Atom::Symbol(v.to_string())
    }
}

impl From<String> for Atom {
    fn from(v: String) -> Self {
        Atom::Symbol(v)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Float(v) => write!(f, "{}", v),
            Atom::Symbol(s) => f.write_str(s),
        }
    }
}

/// Ordered list of atoms carried by list and message events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List(Vec<Atom>);

impl List {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an atom, builder style
    pub fn with(mut self, atom: impl Into<Atom>) -> Self {
        self.0.push(atom.into());
        self
    }

    pub fn push(&mut self, atom: impl Into<Atom>) {
        self.0.push(atom.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Atom> {
        self.0.get(index)
    }

    pub fn get_float(&self, index: usize) -> Option<f32> {
        self.get(index).and_then(Atom::as_f32)
    }

    pub fn get_symbol(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(Atom::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Atom] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Atom> {
        self.0
    }
}

impl From<Vec<Atom>> for List {
    fn from(atoms: Vec<Atom>) -> Self {
        Self(atoms)
    }
}

impl FromIterator<Atom> for List {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Space separated rendering, as printed in diagnostics
impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for atom in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", atom)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_display() {
        let list = List::new().with(1.0).with(2.5).with("foo");
        assert_eq!(list.to_string(), "1 2.5 foo");
        assert_eq!(List::new().to_string(), "");
    }

    #[test]
    fn test_typed_access() {
        let list = List::new().with(3).with("bar");
        assert_eq!(list.get_float(0), Some(3.0));
        assert_eq!(list.get_symbol(0), None);
        assert_eq!(list.get_symbol(1), Some("bar"));
        assert!(list.get(2).is_none());
    }

    #[test]
    fn test_untagged_json() {
        let list: List = serde_json::from_str(r#"[1.5, "x", 2]"#).unwrap();
        assert_eq!(list, List::new().with(1.5).with("x").with(2.0));
    }
}
