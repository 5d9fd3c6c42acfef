//! Person registry.
//!
//! A guid that is empty or syntactically invalid always mints a fresh
//! person. A guid that is well-formed but unknown to this registry is
//! created on the spot — possessing a syntactically valid cookie value
//! *is* the identity, there is no separate authentication step.

use registry_core::{guid, Person};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PersonTable {
    entries: HashMap<String, Person>,
}

impl PersonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, guid: &str) -> Option<&Person> {
        self.entries.get(guid)
    }

    /// Find-or-create per the create-on-miss policy described above.
    /// Returns the resolved guid (which may differ from the input if a
    /// fresh one had to be minted) and whether this is a brand new
    /// person.
    pub fn get_or_create(&mut self, person_guid: &str, when: u64) -> (String, bool) {
        let resolved = if person_guid.is_empty() || !guid::is_valid(person_guid) {
            guid::generate()
        } else {
            person_guid.to_string()
        };

        let created = !self.entries.contains_key(&resolved);
        let entry = self
            .entries
            .entry(resolved.clone())
            .or_insert_with(|| Person::new(resolved.clone(), when));
        if !created {
            entry.touch(when);
        }

        (resolved, created)
    }

    pub fn get_mut(&mut self, guid: &str) -> Option<&mut Person> {
        self.entries.get_mut(guid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find_all(&self) -> impl Iterator<Item = &Person> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_guid_mints_fresh_person() {
        let mut t = PersonTable::new();
        let (g1, created1) = t.get_or_create("", 100);
        assert!(created1);
        let (g2, created2) = t.get_or_create("", 100);
        assert!(created2);
        assert_ne!(g1, g2);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn unknown_wellformed_guid_is_created_on_miss() {
        let mut t = PersonTable::new();
        let known = "550e8400-e29b-41d4-a716-446655440000";
        let (resolved, created) = t.get_or_create(known, 100);
        assert_eq!(resolved, known);
        assert!(created);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn known_guid_is_reused_and_touched() {
        let mut t = PersonTable::new();
        let known = "550e8400-e29b-41d4-a716-446655440000";
        t.get_or_create(known, 100);
        let (resolved, created) = t.get_or_create(known, 200);
        assert_eq!(resolved, known);
        assert!(!created);
        assert_eq!(t.find(known).unwrap().usages, 2);
        assert_eq!(t.find(known).unwrap().last_t, 200);
    }

    #[test]
    fn malformed_guid_is_regenerated() {
        let mut t = PersonTable::new();
        let (resolved, created) = t.get_or_create("not-a-guid", 100);
        assert_ne!(resolved, "not-a-guid");
        assert!(created);
    }
}
