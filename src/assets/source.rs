//! Overlay sources
//!
//! An overlay is named by a local path or a `file://` URL and points at
//! either a directory or a zip archive. Either way it must contain an
//! `assets/` subtree to take part in the merge.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use url::Url;
use zip::ZipArchive;

use crate::constants::ASSETS_DIR;
use crate::error::{GlyphError, GlyphResult};

/// One overlay resource pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySource {
    /// The string the overlay was configured with
    pub label: String,
    /// Local directory or archive
    pub path: PathBuf,
}

impl OverlaySource {
    /// Parse a local path or `file://` URL. Other URL schemes are rejected;
    /// fetching remote packs is left to the caller.
    pub fn parse(s: &str) -> GlyphResult<Self> {
        let path = if s.contains("://") {
            let url = Url::parse(s)
                .map_err(|e| GlyphError::UnsupportedSource(format!("{}: {}", s, e)))?;
            if url.scheme() != "file" {
                return Err(GlyphError::UnsupportedSource(format!(
                    "{}: only local paths and file:// URLs are read",
                    s
                )));
            }
            url.to_file_path()
                .map_err(|_| GlyphError::UnsupportedSource(format!("{}: not a local file URL", s)))?
        } else {
            PathBuf::from(s)
        };
        Ok(Self {
            label: s.to_string(),
            path,
        })
    }

    /// Make the overlay available on disk and return its `assets` directory.
    ///
    /// Directories are used in place; archives are extracted into `scratch`.
    /// Returns `None` when the overlay has no `assets` subtree.
    pub fn materialize(&self, scratch: &Path) -> GlyphResult<Option<PathBuf>> {
        let metadata =
            fs::metadata(&self.path).map_err(|e| GlyphError::from_read(self.path.clone(), e))?;
        let root = if metadata.is_dir() {
            self.path.clone()
        } else {
            let extracted = extract_assets(&self.path, scratch)?;
            debug!("Extracted {} files from {}", extracted, self.label);
            scratch.to_path_buf()
        };

        let assets = root.join(ASSETS_DIR);
        Ok(assets.is_dir().then_some(assets))
    }
}

/// Extract the `assets/` entries of a zip archive into `into`.
/// Returns the number of files written.
pub fn extract_assets(archive: &Path, into: &Path) -> GlyphResult<usize> {
    let zip_error = |source| GlyphError::Archive {
        path: archive.to_path_buf(),
        source,
    };
    let file = File::open(archive).map_err(|e| GlyphError::from_read(archive.to_path_buf(), e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;

    fs::create_dir_all(into)?;
    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(zip_error)?;
        let Some(name) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!("Skipping archive entry outside the pack: {}", entry.name());
            continue;
        };
        if !name.starts_with(ASSETS_DIR) {
            continue;
        }

        let target = into.join(&name);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        trace!("Extracting {}", name.display());
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;
    }
    Ok(written)
}
