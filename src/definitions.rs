use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of names that evaluate to true inside directive expressions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions {
    names: BTreeSet<String>,
}

impl Definitions {
    /// Create an empty definition set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse CLI-style values where each entry may hold comma-separated names
    pub fn parse_list(values: &[String]) -> Self {
        values
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Check whether a name is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Return a copy with the given names added
    pub fn with(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Return a copy with the given names removed
    pub fn without<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for name in names {
            self.names.remove(name.as_ref());
        }
        self
    }

    pub fn is_subset(&self, other: &Definitions) -> bool {
        self.names.is_subset(&other.names)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Definitions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for Definitions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
