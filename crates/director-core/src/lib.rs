//! # director-core
//!
//! Core types and utilities for working with the SlideShowPro Director API.
//!
//! This crate provides error handling, configuration parsing, the option
//! codec, the format registry, response envelope decoding and the HTTP
//! transport seam used by `director-client`.
//!
//! ## Modules
//!
//! - [`error`] - Error type shared by every Director operation
//! - [`config`] - API key and install path parsing
//! - [`types`] - Closed option enums and their wire spellings
//! - [`query`] - Query option mapping and value codec
//! - [`format`] - Image rendition formats attached to every request
//! - [`envelope`] - Response sanitization and `{stat, data, error}` unwrapping
//! - [`client`] - Request building and the HTTP transport

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod format;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
