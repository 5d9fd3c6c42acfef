//! The in-memory Person/Machine/URL graph and the single coarse-grained
//! lock that serializes every mutation and read against it: operations
//! here are short and dominated by small-map lookups, so one mutex
//! covering the whole graph is simpler than reader/writer separation for
//! negligible gain.

pub mod counters;
pub mod intern;
pub mod machines;
pub mod mutator;
pub mod persistence;
pub mod persons;

pub use mutator::SwitchError;
pub use persistence::{JsonlFileSink, MutationRecord, MutationSink, NullSink};

use counters::Snapshot;
use intern::UrlTable;
use machines::MachineTable;
use persons::PersonTable;
use registry_core::{Machine, MachineUrl, Person, PersonUrl, RegistryError};
use std::collections::HashMap;
use std::sync::Mutex;

/// The graph itself, guarded by `Registry`'s mutex. Never exposed
/// outside this crate directly; all access goes through `Registry`'s
/// methods so the lock can't be forgotten.
#[derive(Default)]
pub struct RegistryInner {
    pub(crate) urls: UrlTable,
    pub(crate) machines: MachineTable,
    pub(crate) persons: PersonTable,
    /// machine_guid -> url -> MachineUrl
    pub(crate) machine_urls: HashMap<String, HashMap<String, MachineUrl>>,
    /// person_guid -> (url, machine_guid) -> PersonUrl, in (url, machine)
    /// sorted order so the URLs in an `access`/`search` response come
    /// back in a stable, test-deterministic order.
    pub(crate) person_urls: HashMap<String, std::collections::BTreeMap<(String, String), PersonUrl>>,
}

impl RegistryInner {
    fn snapshot(&self) -> Snapshot {
        let persons_urls_count: usize = self.person_urls.values().map(|m| m.len()).sum();
        let machines_urls_count: usize = self.machine_urls.values().map(|m| m.len()).sum();
        let total_accesses: u64 = self
            .persons
            .find_all()
            .map(|p| p.usages as u64)
            .sum();

        let (persons_memory, machines_memory, urls_memory, persons_urls_memory) =
            Snapshot::estimate_memory(
                self.persons.len(),
                self.machines.len(),
                self.urls.len(),
                persons_urls_count,
            );

        Snapshot {
            persons_count: self.persons.len(),
            machines_count: self.machines.len(),
            urls_count: self.urls.len(),
            persons_urls_count,
            machines_urls_count,
            total_accesses,
            persons_memory,
            machines_memory,
            urls_memory,
            persons_urls_memory,
        }
    }
}

/// The registry singleton: owns the graph and the mutation sink,
/// instantiated once at startup and shared behind an `Arc` by callers.
pub struct Registry {
    inner: Mutex<RegistryInner>,
    sink: Box<dyn MutationSink>,
}

impl Registry {
    pub fn new(sink: Box<dyn MutationSink>) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            sink,
        }
    }

    fn journal(&self, action: &str, person_guid: &str, machine_guid: &str, url: &str, when: u64) {
        self.sink.record(&MutationRecord {
            when,
            action: action.to_string(),
            person_guid: person_guid.to_string(),
            machine_guid: machine_guid.to_string(),
            url: url.to_string(),
            extra: String::new(),
        });
    }

    pub fn access(
        &self,
        person_guid: &str,
        machine_guid: &str,
        url: &str,
        name: &str,
        when: u64,
    ) -> Result<Person, RegistryError> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        let person = mutator::access(&mut inner, person_guid, machine_guid, url, name, when)?;
        drop(inner);
        self.journal("access", &person.guid, machine_guid, url, when);
        Ok(person)
    }

    pub fn delete(
        &self,
        person_guid: &str,
        machine_guid: &str,
        url: &str,
        delete_url: &str,
        when: u64,
    ) -> Result<Person, RegistryError> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");
        let person = mutator::delete(&mut inner, person_guid, machine_guid, url, delete_url, when)?;
        drop(inner);
        self.journal("delete", person_guid, machine_guid, delete_url, when);
        Ok(person)
    }

    pub fn switch(
        &self,
        old_person_guid: &str,
        new_person_guid: &str,
        machine_guid: &str,
        when: u64,
    ) -> Result<Person, SwitchError> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        let person = mutator::switch(&inner, old_person_guid, new_person_guid, machine_guid)?;
        drop(inner);
        self.journal("switch", new_person_guid, machine_guid, "", when);
        Ok(person)
    }

    /// Read-only: the URLs of `request_machine` as seen by any person,
    /// plus that machine's own per-URL view. No mutation, no journal
    /// entry.
    pub fn search(
        &self,
        person_guid: &str,
        request_machine: &str,
    ) -> Result<(Machine, Vec<MachineUrl>), RegistryError> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        let machine = mutator::find_machine_for(&inner, person_guid, request_machine)?.clone();
        let urls = inner
            .machine_urls
            .get(request_machine)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        Ok((machine, urls))
    }

    /// The URLs a person has visited, in stable (url, machine) order,
    /// for rendering an `access` response.
    pub fn person_urls(&self, person_guid: &str) -> Vec<PersonUrl> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner
            .person_urls
            .get(person_guid)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner.snapshot()
    }
}
