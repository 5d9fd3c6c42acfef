pub mod cookie;
pub mod handlers;
pub mod json;
pub mod server;

pub use server::{build_router, AppState, SharedState};
