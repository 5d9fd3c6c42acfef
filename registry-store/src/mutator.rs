//! The four primitives that keep the Person/Machine/URL graph consistent.
//! Every mutation takes a `when` timestamp, already clamped to a sane
//! value by the caller.

use crate::RegistryInner;
use registry_core::{guid, MachineUrl, Person, PersonUrl, RegistryError};

/// `access`: lazily create machine, url and person, then upsert both the
/// machine's and the person's view of this (url) / (url, machine) pair.
pub fn access(
    inner: &mut RegistryInner,
    person_guid: &str,
    machine_guid: &str,
    url: &str,
    name: &str,
    when: u64,
) -> Result<Person, RegistryError> {
    if !guid::is_valid(machine_guid) {
        return Err(RegistryError::InvalidMachineGuid);
    }

    let (machine, machine_created) = inner.machines.get_or_create(machine_guid, when);
    if !name.is_empty() {
        machine.name = name.to_string();
    }
    let machine_name = machine.name.clone();
    if machine_created {
        tracing::debug!(machine_guid, "machine created");
    }

    let url_key = inner.urls.intern(url);

    let (person_guid, person_created) = inner.persons.get_or_create(person_guid, when);
    if person_created {
        tracing::debug!(person_guid = %person_guid, "person created");
    }

    let machine_urls = inner.machine_urls.entry(machine_guid.to_string()).or_default();
    match machine_urls.get_mut(&url_key) {
        Some(mu) => mu.touch(when),
        None => {
            inner.urls.incref(&url_key);
            machine_urls.insert(url_key.clone(), MachineUrl::new(url_key.clone(), when));
        }
    }

    let person_urls = inner.person_urls.entry(person_guid.clone()).or_default();
    let edge_key = (url_key.clone(), machine_guid.to_string());
    match person_urls.get_mut(&edge_key) {
        Some(pu) => pu.touch(when, &machine_name),
        None => {
            inner.urls.incref(&url_key);
            person_urls.insert(
                edge_key,
                PersonUrl::new(url_key.clone(), machine_guid.to_string(), machine_name, when),
            );
        }
    }

    tracing::debug!(person_guid = %person_guid, machine_guid, url, "access recorded");

    Ok(inner
        .persons
        .find(&person_guid)
        .expect("just created or touched above")
        .clone())
}

/// Remove the person's edge whose URL string equals `delete_url`,
/// regardless of which machine it's attached to. Ties (the same URL
/// reachable via more than one machine for this person) are broken by
/// the person_urls map's natural iteration order — the (url, machine)
/// key order.
///
/// The machine's own `MachineUrl` view is left untouched: only the
/// person-side edge and the URL's refcount are affected.
///
/// `machine_guid` and `url` identify the page the delete request was made
/// from (context the HTTP layer carries on every request) but play no
/// part in choosing which edge to remove — only `delete_url` does.
pub fn delete(
    inner: &mut RegistryInner,
    person_guid: &str,
    _machine_guid: &str,
    _url: &str,
    delete_url: &str,
    when: u64,
) -> Result<Person, RegistryError> {
    if inner.persons.find(person_guid).is_none() {
        return Err(RegistryError::PersonNotFound(person_guid.to_string()));
    }

    let person_urls = inner
        .person_urls
        .entry(person_guid.to_string())
        .or_default();

    let matched_key = person_urls
        .keys()
        .find(|(url, _machine)| url == delete_url)
        .cloned();

    let (url_key, matched_machine) = matched_key.ok_or(RegistryError::UrlNotFound)?;
    person_urls.remove(&(url_key.clone(), matched_machine));
    inner.urls.decref(&url_key);
    tracing::debug!(person_guid, delete_url, machine_guid = %matched_machine, "edge removed");

    let person = inner
        .persons
        .get_mut(person_guid)
        .expect("existence checked above");
    person.last_t = registry_core::merge_last_t(person.last_t, when);

    Ok(person.clone())
}

/// Read-only projection of a machine's URLs as seen by any person.
/// Scoped only by the caller holding *some* valid cookie — it does not
/// require a PersonURL edge from the caller to the target machine.
pub fn find_machine_for<'a>(
    inner: &'a RegistryInner,
    _person_guid: &str,
    request_machine: &str,
) -> Result<&'a registry_core::Machine, RegistryError> {
    inner
        .machines
        .find(request_machine)
        .ok_or_else(|| RegistryError::MachineNotFound(request_machine.to_string()))
}

/// Both persons and the machine must exist, and both old and new person
/// must already have at least one edge to that machine (proof both
/// cookies have been seen together on this node). On success the old
/// person is left untouched — identity switches client-side via a new
/// cookie, nothing is merged or deleted here.
pub fn switch(
    inner: &RegistryInner,
    old_person_guid: &str,
    new_person_guid: &str,
    machine_guid: &str,
) -> Result<Person, SwitchError> {
    let _old = inner.persons.find(old_person_guid).ok_or_else(|| {
        tracing::debug!(old_person_guid, "switch rejected: old person unknown");
        SwitchError::OldPersonUnknown
    })?;
    let new = inner.persons.find(new_person_guid).ok_or_else(|| {
        tracing::debug!(new_person_guid, "switch rejected: new person unknown");
        SwitchError::NewPersonUnknown
    })?;
    inner.machines.find(machine_guid).ok_or_else(|| {
        tracing::debug!(machine_guid, "switch rejected: machine unknown");
        SwitchError::MachineUnknown
    })?;

    let old_has_edge = inner
        .person_urls
        .get(old_person_guid)
        .map(|edges| edges.keys().any(|(_, m)| m == machine_guid))
        .unwrap_or(false);
    if !old_has_edge {
        tracing::debug!(old_person_guid, machine_guid, "switch rejected: old person has no edge to machine");
        return Err(SwitchError::OldPersonHasNoEdge);
    }

    let new_has_edge = inner
        .person_urls
        .get(new_person_guid)
        .map(|edges| edges.keys().any(|(_, m)| m == machine_guid))
        .unwrap_or(false);
    if !new_has_edge {
        tracing::debug!(new_person_guid, machine_guid, "switch rejected: new person has no edge to machine");
        return Err(SwitchError::NewPersonHasNoEdge);
    }

    tracing::info!(old_person_guid, new_person_guid, machine_guid, "identity switched");
    Ok(new.clone())
}

/// Distinguishes switch's five documented failure modes so the HTTP
/// layer can map each to its own status code.
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("old person is not known to this registry")]
    OldPersonUnknown,
    #[error("new person is not known to this registry")]
    NewPersonUnknown,
    #[error("machine is not known to this registry")]
    MachineUnknown,
    #[error("old person has no recorded visit to this machine")]
    OldPersonHasNoEdge,
    #[error("new person has no recorded visit to this machine")]
    NewPersonHasNoEdge,
}
