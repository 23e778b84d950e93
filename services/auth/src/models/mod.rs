//! Authentication models

pub mod role;

pub use role::{Role, UnknownRole};
