//! FFprobe-based duration probing.

use super::DurationProbe;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Probes durations by running
/// `ffprobe -i file:<path> -show_entries format=duration -v quiet -of csv=p=0`.
#[derive(Debug, Clone)]
pub struct FfprobeDurationProbe {
    program: PathBuf,
}

impl FfprobeDurationProbe {
    /// Use `program` as the ffprobe executable, or `ffprobe` from `PATH`.
    pub fn new(program: Option<PathBuf>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("ffprobe")),
        }
    }

    /// The executable that will be run.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for FfprobeDurationProbe {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DurationProbe for FfprobeDurationProbe {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn probe_duration(&self, path: &Path) -> Result<Duration> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        // "file:" keeps ffprobe from reading ':' in timestamp names as a
        // protocol prefix.
        let mut input = std::ffi::OsString::from("file:");
        input.push(path.as_os_str());

        let output = Command::new(&self.program)
            .arg("-i")
            .arg(&input)
            .args([
                "-show_entries",
                "format=duration",
                "-v",
                "quiet",
                "-of",
                "csv=p=0",
            ])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.program.to_string_lossy())
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed(
                "ffprobe",
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = parse_duration_output(&stdout)?;
        tracing::trace!(path = %path.display(), secs = duration.as_secs(), "Probed duration");
        Ok(duration)
    }
}

/// Parse ffprobe's `csv=p=0` duration output, truncating to whole seconds.
pub fn parse_duration_output(stdout: &str) -> Result<Duration> {
    let trimmed = stdout.trim();
    let seconds: f64 = trimmed
        .parse()
        .map_err(|e| Error::parse_error("ffprobe", format!("{trimmed:?}: {e}")))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Error::parse_error(
            "ffprobe",
            format!("invalid duration {trimmed:?}"),
        ));
    }

    Ok(Duration::from_secs(seconds.trunc() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_truncates_fraction() {
        assert_eq!(
            parse_duration_output("45.987000\n").unwrap(),
            Duration::from_secs(45)
        );
        assert_eq!(parse_duration_output("0.5").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_duration_output("N/A"),
            Err(Error::ParseError { .. })
        ));
        assert!(parse_duration_output("").is_err());
        assert!(parse_duration_output("-3").is_err());
        assert!(parse_duration_output("inf").is_err());
    }

    #[test]
    fn test_missing_file() {
        let probe = FfprobeDurationProbe::default();
        let err = probe
            .probe_duration(Path::new("/definitely/not/here.mp3"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mp3");
        std::fs::write(&file, b"not audio").unwrap();

        let probe = FfprobeDurationProbe::new(Some(PathBuf::from("nonexistent_tool_12345")));
        let err = probe.probe_duration(&file).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[test]
    fn test_default_program() {
        assert_eq!(
            FfprobeDurationProbe::default().program(),
            Path::new("ffprobe")
        );
        assert_eq!(FfprobeDurationProbe::default().name(), "ffprobe");
    }
}
