//! Fixed participant name list
//!
//! Slot order is bound to this list by position for the lifetime of a roster.

use std::collections::HashMap;
use std::ops::Index;

use crate::slot::SlotIndex;

/// Names of the default roster, in slot order
pub const DEFAULT_NAMES: [&str; 15] = [
    "Ahsan", "Nasa", "Alif", "Alifah", "Hanin", "Rijal", "Hasna", "Fathir", "Tsabita", "Yusuf",
    "Fafa", "Umar", "Aisyah", "Ridho", "Arza",
];

/// Name list configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameListError {
    /// No names given
    #[error("name list is empty")]
    Empty,

    /// Entry is empty or whitespace only
    #[error("name at position {0} is blank")]
    Blank(usize),

    /// Entry has more than one word and could never match a first name
    #[error("name '{name}' at position {position} must be a single word")]
    MultiWord { position: usize, name: String },

    /// Two entries are equal ignoring case
    #[error("names at positions {first} and {second} are both '{name}'")]
    Duplicate {
        first: usize,
        second: usize,
        name: String,
    },
}

/// Ordered, validated list of participant names
///
/// Every entry is a single non-blank word and entries are unique ignoring
/// case, so first-name matching has at most one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameList {
    names: Vec<String>,
}

impl NameList {
    /// Validate and build a name list
    ///
    /// # Errors
    /// Returns error if the list is empty, an entry is blank or multi-word,
    /// or two entries collide ignoring case.
    pub fn new<I, S>(names: I) -> Result<Self, NameListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| Into::<String>::into(n).trim().to_string())
            .collect();
        if names.is_empty() {
            return Err(NameListError::Empty);
        }

        let mut seen: HashMap<String, usize> = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(NameListError::Blank(position));
            }
            if name.split_whitespace().nth(1).is_some() {
                return Err(NameListError::MultiWord {
                    position,
                    name: name.clone(),
                });
            }
            if let Some(&first) = seen.get(&name.to_lowercase()) {
                return Err(NameListError::Duplicate {
                    first,
                    second: position,
                    name: name.clone(),
                });
            }
            seen.insert(name.to_lowercase(), position);
        }

        Ok(Self { names })
    }

    /// Number of names (the roster size N)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a validated list
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for a slot
    #[inline]
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&str> {
        self.names.get(index.get()).map(String::as_str)
    }

    /// Iterate names with their slot index
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (SlotIndex::new(i), n.as_str()))
    }

    /// Names as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl Default for NameList {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES.iter().map(|n| (*n).to_string()).collect(),
        }
    }
}

impl Index<SlotIndex> for NameList {
    type Output = str;

    fn index(&self, index: SlotIndex) -> &str {
        &self.names[index.get()]
    }
}
