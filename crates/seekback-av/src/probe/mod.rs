//! Duration probing.

mod ffprobe;

pub use ffprobe::{parse_duration_output, FfprobeDurationProbe};

use crate::Result;
use std::path::Path;
use std::time::Duration;

/// Measures how long a media file plays.
///
/// Implementations block; callers that must stay responsive run them on a
/// blocking thread.
pub trait DurationProbe: Send + Sync {
    /// Human-readable name identifying this probe implementation.
    fn name(&self) -> &'static str;

    /// Playback length of the file at `path`, in whole seconds.
    fn probe_duration(&self, path: &Path) -> Result<Duration>;
}
