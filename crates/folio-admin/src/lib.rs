//! Admin sync controller for Folio.
//!
//! [`AdminController`] owns one mirror per collection, loads them all in
//! parallel on activation, and reflects acknowledged writes back into the
//! mirrors. It depends only on [`folio_core::store::ContentStore`], so any
//! backend can sit behind it.

mod controller;
mod error;
mod notice;

pub mod form;
pub mod mirror;
pub mod mirrors;

pub use controller::AdminController;
pub use error::SubmitError;
pub use form::{FieldValue, Form, FormField, Target};
pub use mirror::{Failure, MirrorView, Phase, RowView};
pub use mirrors::{Mirrored, MirroredSingleton, Mirrors};
pub use notice::{Notice, NoticeLevel};
