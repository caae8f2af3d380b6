//! Remote backend for the Folio content store.
//!
//! [`HttpStore`] speaks the JSON API served by `folio-api` and maps HTTP
//! statuses back onto the store failure classes.

mod client;

pub mod error;

pub use client::{HttpConfig, HttpStore};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
