//! Seekback - index and search a directory of timestamped recordings
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod search;
pub mod storage;
pub mod watch;
