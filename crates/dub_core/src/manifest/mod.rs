//! Clip manifest (`files.txt`) handling.
//!
//! The manifest lists generated clips in ffmpeg concat-demuxer syntax, one
//! `file '<path>'` line per clip. Producers append in whatever order clips
//! finish, so line order carries no timing information; [`Manifest::clip_refs`]
//! re-derives the order from the `MMSS` clip filenames.

mod types;

pub use types::{ManifestError, ManifestResult};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::models::ClipRef;

const ENTRY_PREFIX: &str = "file '";

/// In-memory manifest: clip paths in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<PathBuf>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a manifest file.
    pub fn read(path: &Path) -> ManifestResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        let manifest = Self::parse(&content)?;
        tracing::debug!(
            "[Manifest] Read {} entries from {}",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Parse manifest text. Blank lines are ignored.
    pub fn parse(content: &str) -> ManifestResult<Self> {
        let mut entries = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let path = parse_entry(line).ok_or_else(|| ManifestError::Malformed {
                line_number: idx + 1,
                line: line.to_string(),
            })?;
            entries.push(PathBuf::from(path));
        }
        Ok(Self { entries })
    }

    /// Write the manifest, replacing any existing file atomically.
    pub fn write(&self, path: &Path) -> ManifestResult<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ManifestError::io(path, e))?;
        tmp.write_all(self.render().as_bytes())
            .map_err(|e| ManifestError::io(path, e))?;
        tmp.persist(path)
            .map_err(|e| ManifestError::io(path, e.error))?;

        tracing::debug!(
            "[Manifest] Wrote {} entries to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }

    /// Render as concat-demuxer text.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|p| format!("{}{}'\n", ENTRY_PREFIX, escape(&p.to_string_lossy())))
            .collect()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(path.into());
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamped clip references in start order.
    ///
    /// Entries whose filename is not a `MMSS` timestamp are skipped.
    pub fn clip_refs(&self) -> Vec<ClipRef> {
        let mut clips: Vec<ClipRef> = self
            .entries
            .iter()
            .filter_map(|path| {
                let clip = ClipRef::from_clip_filename(path.clone());
                if clip.is_none() {
                    tracing::warn!(
                        "[Manifest] Skipping {}: filename is not a MMSS timestamp",
                        path.display()
                    );
                }
                clip
            })
            .collect();
        clips.sort_by_key(|c| c.start_ms);
        clips
    }

    /// Copy with entries reordered by filename timestamp.
    ///
    /// Entries without a timestamp keep their relative order at the end.
    pub fn sorted_by_timestamp(&self) -> Manifest {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|p| {
            ClipRef::from_clip_filename(p.clone())
                .map(|c| c.start_ms)
                .unwrap_or(u64::MAX)
        });
        Manifest { entries }
    }
}

/// Extract the path from `file '<path>'`.
fn parse_entry(line: &str) -> Option<String> {
    let quoted = line.strip_prefix(ENTRY_PREFIX)?.strip_suffix('\'')?;
    Some(unescape(quoted))
}

/// Close the quote, emit an escaped quote, reopen.
fn escape(path: &str) -> String {
    path.replace('\'', r"'\''")
}

fn unescape(quoted: &str) -> String {
    quoted.replace(r"'\''", "'")
}
