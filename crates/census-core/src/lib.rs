//! Core types and trait definitions for the census record front-end.
//!
//! No HTTP or terminal code lives here. The form controller talks to the
//! outside world only through the [`service::RecordService`] and
//! [`notify::Notifier`] traits, which `census-cli` implements.

pub mod citizen;
pub mod error;
pub mod form;
pub mod notify;
pub mod service;
pub mod validate;

pub use error::{Error, Result};
