pub mod config;
pub mod entities;
pub mod error;
pub mod guid;
pub mod time;

pub use config::RegistryConfig;
pub use entities::{Machine, MachineUrl, Person, PersonUrl, Url};
pub use error::RegistryError;
pub use time::merge_last_t;
