pub mod access;
pub mod delete;
pub mod hello;
pub mod search;
pub mod switch;
