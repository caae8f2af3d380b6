//! Core types and trait definitions for the Folio portfolio content store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends, the JSON API and the admin controller all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod collection;
pub mod content;
pub mod entity;
pub mod error;
pub mod icon;
pub mod record;
pub mod slots;
pub mod store;

pub use collection::{Collection, CollectionKind};
pub use entity::{Entity, Listed, Singleton};
pub use error::{Classify, Error, FailureKind, Problem, Result, ValidationError};
pub use record::{Record, RecordId};
