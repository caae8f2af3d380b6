//! Offline backend for the Folio content store.
//!
//! Each collection lives in its own `<collection key>.json` file under a
//! single directory, holding a JSON array of records in insertion order.
//! Record ids are derived from the wall clock in milliseconds.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::LocalStore;
