//! Directory scanning.
//!
//! A sample is the set of files in the samples directory sharing a stem, at
//! least one of which is media. The `summary` and `transcript` sidecars are
//! read from `<id>.<ext>` when present.

use super::SampleLayout;
use seekback_common::paths::{sidecar_file_name, split_file_name};
use seekback_common::{Result, SampleId};
use seekback_db::models::Sample;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Names of the regular (non-directory) entries directly under `dir`, in
/// listing order. Names that aren't valid UTF-8 are skipped.
pub(crate) fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => tracing::debug!("Skipping non UTF-8 file name: {:?}", entry.file_name()),
        }
    }
    Ok(names)
}

/// Every sample found in `dir`, sorted by ID.
pub(crate) fn scan_samples(dir: &Path, layout: &SampleLayout) -> Result<Vec<Sample>> {
    let names = list_file_names(dir)?;

    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for name in &names {
        let Some((stem, ext)) = split_file_name(name) else {
            continue;
        };
        if layout.media.is_media_ext(ext) {
            groups.entry(stem).or_default().push(name.clone());
        }
    }

    groups
        .into_iter()
        .map(|(stem, media)| {
            let mut sample = read_sidecars(dir, SampleId::new(stem), layout)?;
            sample.media = media;
            Ok(sample)
        })
        .collect()
}

/// The sample `id` as it currently appears on disk. `media` may be empty if
/// no media file with that stem exists.
pub(crate) fn scan_sample(dir: &Path, id: &SampleId, layout: &SampleLayout) -> Result<Sample> {
    let mut sample = read_sidecars(dir, id.clone(), layout)?;
    sample.media = list_file_names(dir)?
        .into_iter()
        .filter(|name| {
            split_file_name(name)
                .is_some_and(|(stem, ext)| stem == id.as_str() && layout.media.is_media_ext(ext))
        })
        .collect();
    Ok(sample)
}

/// Every file in `dir` whose stem is `id`, sidecars included.
pub(crate) fn files_for(dir: &Path, id: &SampleId) -> Result<Vec<String>> {
    Ok(list_file_names(dir)?
        .into_iter()
        .filter(|name| split_file_name(name).is_some_and(|(stem, _)| stem == id.as_str()))
        .collect())
}

fn read_sidecars(dir: &Path, id: SampleId, layout: &SampleLayout) -> Result<Sample> {
    let summary = read_sidecar(dir, &id, &layout.summary_ext)?;
    let transcript = read_sidecar(dir, &id, &layout.transcript_ext)?;
    let mut sample = Sample::new(id);
    sample.summary = summary;
    sample.transcript = transcript;
    Ok(sample)
}

/// Contents of `<id>.<ext>`, or an empty string if it doesn't exist.
fn read_sidecar(dir: &Path, id: &SampleId, ext: &str) -> Result<String> {
    let path = dir.join(sidecar_file_name(id.as_str(), ext));
    match std::fs::read(&path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
