//! Seekback-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across seekback:
//!
//! - **Sample IDs**: Filename-stem identifiers and their embedded timestamps
//! - **Media Types**: The extension → content type registry that decides
//!   which files count as sample media
//! - **Path Utilities**: Splitting file names into stem and extension
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use seekback_common::{MediaTypes, SampleId};
//! use seekback_common::paths::split_file_name;
//!
//! let media = MediaTypes::default();
//! let (stem, ext) = split_file_name("2024-03-01T10:00:00+09:00.mp3").unwrap();
//! assert!(media.is_media_ext(ext));
//!
//! let id = SampleId::new(stem);
//! assert!(id.start().is_some());
//! ```

pub mod error;
pub mod ids;
pub mod media;
pub mod paths;

pub use error::{Error, Result};
pub use ids::*;
pub use media::MediaTypes;
