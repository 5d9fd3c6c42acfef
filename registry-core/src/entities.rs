//! The registry's data model: URLs, Machines, Persons, and the
//! PersonUrl/MachineUrl edges that connect them.
//!
//! Entities are plain data here; the graph that owns and mutates them
//! lives in `registry-store`. Edges hold the key of the entity they
//! reference rather than a pointer: nothing here is destroyed while
//! still referenced, so a stale key never appears in practice.

use serde::{Deserialize, Serialize};

/// An interned URL string and its reference count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Url {
    pub value: String,
    pub usages: u32,
}

impl Url {
    pub fn new(value: String) -> Self {
        Self { value, usages: 0 }
    }

    pub fn incref(&mut self) {
        self.usages = self.usages.saturating_add(1);
    }

    /// Returns true once the refcount reaches zero, meaning this entry is
    /// eligible for removal from the intern table.
    pub fn decref(&mut self) -> bool {
        self.usages = self.usages.saturating_sub(1);
        self.usages == 0
    }
}

/// A monitoring node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub guid: String,
    pub first_t: u64,
    pub last_t: u64,
    pub usages: u32,
    pub name: String,
}

impl Machine {
    pub fn new(guid: String, when: u64) -> Self {
        Self {
            guid,
            first_t: when,
            last_t: when,
            usages: 1,
            name: String::new(),
        }
    }

    /// Record a repeat visit: bump usages, advance last_t monotonically.
    pub fn touch(&mut self, when: u64) {
        self.usages = self.usages.saturating_add(1);
        self.last_t = crate::time::merge_last_t(self.last_t, when);
    }
}

/// An anonymous visitor identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub guid: String,
    pub first_t: u64,
    pub last_t: u64,
    pub usages: u32,
}

impl Person {
    pub fn new(guid: String, when: u64) -> Self {
        Self {
            guid,
            first_t: when,
            last_t: when,
            usages: 1,
        }
    }

    pub fn touch(&mut self, when: u64) {
        self.usages = self.usages.saturating_add(1);
        self.last_t = crate::time::merge_last_t(self.last_t, when);
    }
}

/// A machine's per-URL view: "this machine was reached at this URL".
/// Keyed in the owning `Machine`'s map by URL value; independent of any
/// person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineUrl {
    pub url: String,
    pub first_t: u64,
    pub last_t: u64,
    pub usages: u32,
}

impl MachineUrl {
    pub fn new(url: String, when: u64) -> Self {
        Self {
            url,
            first_t: when,
            last_t: when,
            usages: 1,
        }
    }

    pub fn touch(&mut self, when: u64) {
        self.usages = self.usages.saturating_add(1);
        self.last_t = crate::time::merge_last_t(self.last_t, when);
    }
}

/// An edge recording "this person visited this machine at this URL".
/// Distinct machines at the same (person, url) are distinct edges, so the
/// natural key is (url, machine) within a person's own collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonUrl {
    pub url: String,
    pub machine_guid: String,
    /// Snapshot of the machine's name at last visit, refreshed on touch
    /// since the machine may have renamed itself since the last access.
    pub machine_name: String,
    pub first_t: u64,
    pub last_t: u64,
    pub usages: u32,
}

impl PersonUrl {
    pub fn new(url: String, machine_guid: String, machine_name: String, when: u64) -> Self {
        Self {
            url,
            machine_guid,
            machine_name,
            first_t: when,
            last_t: when,
            usages: 1,
        }
    }

    pub fn touch(&mut self, when: u64, machine_name: &str) {
        self.usages = self.usages.saturating_add(1);
        self.last_t = crate::time::merge_last_t(self.last_t, when);
        self.machine_name = machine_name.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_refcount_reaches_zero() {
        let mut u = Url::new("http://a/".into());
        u.incref();
        u.incref();
        assert!(!u.decref());
        assert!(u.decref());
    }

    #[test]
    fn machine_touch_advances_last_t_monotonically() {
        let mut m = Machine::new("guid".into(), 100);
        m.touch(50);
        assert_eq!(m.last_t, 100);
        m.touch(200);
        assert_eq!(m.last_t, 200);
        assert_eq!(m.usages, 3);
    }

    #[test]
    fn person_url_touch_refreshes_machine_name() {
        let mut pu = PersonUrl::new("http://a/".into(), "m1".into(), "alpha".into(), 100);
        pu.touch(200, "alpha-renamed");
        assert_eq!(pu.machine_name, "alpha-renamed");
        assert_eq!(pu.usages, 2);
        assert_eq!(pu.last_t, 200);
    }
}
