//! Placeholder table for proper names that contain an apostrophe.
//!
//! Several rule categories treat `'s` as a possessive marker and would split
//! a name like `Onyxia's Elite Guard` in two. `decorate` swaps every known
//! name for its apostrophe-free placeholder before those rules run and
//! `restore` swaps them back once they are done.

use relog_data::ProtectedNameDef;

#[derive(Debug, Clone, Default)]
pub struct ProtectedNames {
    entries: Vec<ProtectedNameDef>,
}

impl ProtectedNames {
    pub fn new(entries: &[ProtectedNameDef]) -> Self {
        Self {
            entries: entries.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every occurrence of a decorated name with its placeholder.
    pub fn decorate(&self, line: &str) -> String {
        self.swap(line, |e| (e.decorated.as_str(), e.placeholder.as_str()))
    }

    /// Inverse of [`ProtectedNames::decorate`] for lines that did not already
    /// contain a placeholder.
    pub fn restore(&self, line: &str) -> String {
        self.swap(line, |e| (e.placeholder.as_str(), e.decorated.as_str()))
    }

    fn swap<'a>(&'a self, line: &str, pick: impl Fn(&'a ProtectedNameDef) -> (&'a str, &'a str)) -> String {
        let mut out = line.to_string();
        for entry in &self.entries {
            let (from, to) = pick(entry);
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
        out
    }
}
