use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Bidirectional lookup between strings and their dense indices.
pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered string table. Index `i` always names the same string, which is
/// what keeps the estimator's matrices and the decoder's lookups aligned.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let m = value.iter().enumerate().map(|(i, s)| (s.to_string(), i)).collect();
        Self { v: value, m }
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl Serialize for Quark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.v.serialize(serializer)
    }
}

impl Quark {
    /// Builds a table whose indices follow the byte order of the strings.
    /// Duplicates collapse to a single entry.
    pub fn sorted<I>(strings: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut v: Vec<String> = strings.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self::from(v)
    }

    /// False when the table was built from a list holding the same string twice.
    pub fn is_unique(&self) -> bool {
        self.m.len() == self.v.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.v
    }
}
