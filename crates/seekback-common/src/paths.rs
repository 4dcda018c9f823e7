//! Path utilities for splitting sample file names.
//!
//! Samples live in one flat directory as `<id>.<ext>`. The ID is everything
//! before the *last* dot, so timestamp stems such as
//! `2024-03-01T10:00:00+09:00` survive intact.

/// Split a file name into `(stem, extension)` at the last `.`.
///
/// Returns `None` for names without a dot; such files never belong to a
/// sample. The extension is returned without the dot and may be empty.
///
/// # Examples
///
/// ```
/// use seekback_common::paths::split_file_name;
///
/// assert_eq!(split_file_name("a.b.mp3"), Some(("a.b", "mp3")));
/// assert_eq!(split_file_name("README"), None);
/// ```
pub fn split_file_name(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.')?;
    Some((&name[..dot], &name[dot + 1..]))
}

/// File name of the sidecar with extension `ext` for sample `id`.
///
/// # Examples
///
/// ```
/// use seekback_common::paths::sidecar_file_name;
///
/// assert_eq!(sidecar_file_name("x", "vtt"), "x.vtt");
/// ```
pub fn sidecar_file_name(id: &str, ext: &str) -> String {
    format!("{id}.{ext}")
}
