//! Domain operations. Handlers in `routes` are thin wrappers around these.

pub mod accounts;
pub mod projects;
pub mod tasks;
