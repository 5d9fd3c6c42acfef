pub mod metrics;

pub use metrics::Counters;
