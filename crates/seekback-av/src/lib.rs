//! # seekback-av
//!
//! Measures the playback length of sample media files.
//!
//! The repository only needs one thing from a media file: how long it plays.
//! [`DurationProbe`] is that seam; [`FfprobeDurationProbe`] implements it by
//! shelling out to `ffprobe`. Tests substitute their own implementation.
//!
//! ## Example
//!
//! ```no_run
//! use seekback_av::{DurationProbe, FfprobeDurationProbe};
//! use std::path::Path;
//!
//! let probe = FfprobeDurationProbe::new(None);
//! let duration = probe.probe_duration(Path::new("/samples/2024-03-01T10:00:00+09:00.mp3"))?;
//! println!("{}s", duration.as_secs());
//! # Ok::<(), seekback_av::Error>(())
//! ```

mod error;
pub mod probe;
pub mod tools;

pub use error::{Error, Result};
pub use probe::{DurationProbe, FfprobeDurationProbe};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
