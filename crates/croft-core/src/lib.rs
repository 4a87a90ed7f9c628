//! Core types and trait definitions for the croft herd store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing heavier than serde.

pub mod animal;
pub mod error;
pub mod record;
pub mod store;
pub mod view;

pub use error::{Error, Result};
