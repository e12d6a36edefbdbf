//! Shared types and query helpers for the Lookbook backend.

pub mod search;
pub mod types;
