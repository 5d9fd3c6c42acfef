//! URL intern table: one canonical `Url` record per distinct URL string,
//! byte-for-byte key equality, no normalization.

use registry_core::Url;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct UrlTable {
    entries: HashMap<String, Url>,
}

impl UrlTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical key for `s`, creating a fresh zero-usage
    /// entry if this is the first time it's been seen.
    pub fn intern(&mut self, s: &str) -> String {
        if !self.entries.contains_key(s) {
            self.entries.insert(s.to_string(), Url::new(s.to_string()));
        }
        s.to_string()
    }

    pub fn get(&self, key: &str) -> Option<&Url> {
        self.entries.get(key)
    }

    pub fn incref(&mut self, key: &str) {
        if let Some(u) = self.entries.get_mut(key) {
            u.incref();
        }
    }

    /// Decref `key`; if its usage count has dropped to zero, remove it
    /// from the table entirely.
    pub fn decref(&mut self, key: &str) {
        let should_remove = match self.entries.get_mut(key) {
            Some(u) => u.decref(),
            None => false,
        };
        if should_remove {
            self.entries.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_idempotent() {
        let mut t = UrlTable::new();
        let k1 = t.intern("http://a/");
        let k2 = t.intern("http://a/");
        assert_eq!(k1, k2);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn decref_to_zero_removes_entry() {
        let mut t = UrlTable::new();
        let k = t.intern("http://a/");
        t.incref(&k);
        t.incref(&k);
        t.decref(&k);
        assert!(t.get(&k).is_some());
        t.decref(&k);
        assert!(t.get(&k).is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn distinct_strings_are_distinct_keys() {
        let mut t = UrlTable::new();
        t.intern("http://a/");
        t.intern("http://a");
        assert_eq!(t.len(), 2);
    }
}
