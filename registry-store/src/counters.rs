//! A point-in-time snapshot of entity cardinalities and approximate
//! memory usage, read while the registry lock is held so it reflects a
//! single consistent instant.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Snapshot {
    pub persons_count: usize,
    pub machines_count: usize,
    pub urls_count: usize,
    pub persons_urls_count: usize,
    pub machines_urls_count: usize,
    /// Sum of every person's `usages`: total number of accesses ever
    /// recorded, as opposed to the cardinality of distinct edges.
    pub total_accesses: u64,
    pub persons_memory: usize,
    pub machines_memory: usize,
    pub urls_memory: usize,
    pub persons_urls_memory: usize,
}

impl Snapshot {
    /// Rough per-entity size accounting: sums a per-record size estimate
    /// plus a fixed index overhead. A diagnostic number, not exact.
    pub fn estimate_memory(
        persons_count: usize,
        machines_count: usize,
        urls_count: usize,
        persons_urls_count: usize,
    ) -> (usize, usize, usize, usize) {
        const INDEX_OVERHEAD: usize = 48;
        (
            persons_count * (std::mem::size_of::<registry_core::Person>() + INDEX_OVERHEAD),
            machines_count * (std::mem::size_of::<registry_core::Machine>() + INDEX_OVERHEAD),
            urls_count * (std::mem::size_of::<registry_core::Url>() + INDEX_OVERHEAD),
            persons_urls_count
                * (std::mem::size_of::<registry_core::PersonUrl>() + INDEX_OVERHEAD),
        )
    }
}
