use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One document in the shared salesperson collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SalespersonRecord {
    pub name: String,
}

/// The registered names at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectorySnapshot {
    pub names: BTreeSet<String>,
}

impl DirectorySnapshot {
    pub fn from_records(records: &[SalespersonRecord]) -> Self {
        Self {
            names: records
                .iter()
                .map(|r| r.name.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Seed names plus everything seen from the store. Only ever grows.
#[derive(Debug, Clone, Default)]
pub struct SalespersonDirectory {
    names: BTreeSet<String>,
}

impl SalespersonDirectory {
    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directory = Self::default();
        for name in seed {
            directory.insert(name.as_ref());
        }
        directory
    }

    /// Returns true when the name was new.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Union with a snapshot. Names missing from the snapshot are kept.
    pub fn merge(&mut self, snapshot: &DirectorySnapshot) -> usize {
        snapshot.names.iter().filter(|n| self.insert(n)).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name.trim())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
