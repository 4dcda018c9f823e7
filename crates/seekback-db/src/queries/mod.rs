//! Database query modules.
//!
//! - samples: Sample CRUD, full-text index rebuild, end backfill
//! - search: Text and time-bounded search over samples

pub mod samples;
pub mod search;
