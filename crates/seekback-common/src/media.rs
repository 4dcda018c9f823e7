//! Media type registry.
//!
//! Maps recognised media extensions to their content types. A file whose
//! extension is in the registry is sample media; anything else sharing a
//! sample's stem is a sidecar or ignored. The registry is an ordinary value
//! built from configuration and handed to whoever needs it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extension → content type table. Extensions are stored lowercase, without
/// the leading dot, and matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct MediaTypes {
    types: BTreeMap<String, String>,
}

impl MediaTypes {
    /// Build a registry from `(extension, content type)` pairs.
    pub fn new<I, E, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (E, C)>,
        E: AsRef<str>,
        C: Into<String>,
    {
        let types = entries
            .into_iter()
            .map(|(ext, ct)| (normalize(ext.as_ref()), ct.into()))
            .collect();
        Self { types }
    }

    /// Whether `ext` (without dot) is a media extension.
    pub fn is_media_ext(&self, ext: &str) -> bool {
        !ext.is_empty() && self.types.contains_key(&normalize(ext))
    }

    /// Content type served for `ext`, if it is a media extension.
    pub fn content_type(&self, ext: &str) -> Option<&str> {
        self.types.get(&normalize(ext)).map(String::as_str)
    }

    /// Recognised media extensions, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Extensions a file server may expose for a sample: every media
    /// extension plus the transcript sidecar.
    pub fn allowed_extensions(&self, transcript_ext: &str) -> Vec<String> {
        let mut exts: Vec<String> = self.types.keys().cloned().collect();
        let transcript = normalize(transcript_ext);
        if !exts.contains(&transcript) {
            exts.push(transcript);
        }
        exts
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no extension is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for MediaTypes {
    fn default() -> Self {
        Self::new([("aiff", "audio/aiff"), ("mp3", "audio/mpeg")])
    }
}

impl From<BTreeMap<String, String>> for MediaTypes {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::new(map)
    }
}

impl From<MediaTypes> for BTreeMap<String, String> {
    fn from(media: MediaTypes) -> Self {
        media.types
    }
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}
