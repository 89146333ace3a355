//! Director client and request parameter models for SlideShowPro Director.
//!
//! Provides typed request parameters and an asynchronous client for the
//! Director gallery API. Every accessor performs exactly one request.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{DirectorClient, DirectorClientBuilder};
pub use director_core::format::{FormatRegistry, FormatSpec, Rendition};
pub use director_core::query::{IdList, TagList};
pub use director_core::types::{ContentSort, GalleryOrder, Scope, SortDirection, UserSort};
pub use director_core::Error;
pub use models::{
    AlbumListParams, AlbumParams, ContentListParams, GalleryParams, UserListParams,
};

/// Convenient result alias that reuses the shared Director error type.
pub type Result<T> = director_core::Result<T>;
