//! Asset tree merging
//!
//! Combines the base assets with ordered overlay packs along two tracks:
//!
//! - pixel data: every tree is file-copied onto one merged directory,
//!   later packs replacing files at the same relative path
//! - font metadata: every tree's font definition is resolved against
//!   that tree alone and its providers appended to one ordered list
//!
//! Bitmap providers are later read against the merged directory, so a
//! pack that only replaces an atlas image still changes the widths of
//! providers declared by the base.

pub mod source;
pub mod tree;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{GlyphError, GlyphResult};
use crate::font::{FontDefinition, ResolvedProvider};
pub use source::OverlaySource;

/// Label used for the base tree in provider origins
pub const BASE_LABEL: &str = "base";

/// Merged tree, under the work directory
const MERGED_DIR: &str = "merged";

/// Extracted archives, under the work directory
const PACKS_DIR: &str = "packs";

/// Result of a merge
#[derive(Debug, Clone)]
pub struct MergedAssets {
    /// Merged assets root, the image source for bitmap providers
    pub root: PathBuf,
    /// Leaf providers of every tree, base first
    pub providers: Vec<ResolvedProvider>,
    /// Overlays that had no `assets` subtree
    pub skipped: Vec<String>,
}

/// Base assets plus ordered overlays
#[derive(Debug, Clone)]
pub struct AssetMerger {
    base: PathBuf,
    overlays: Vec<OverlaySource>,
}

impl AssetMerger {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            overlays: Vec::new(),
        }
    }

    /// Append an overlay; later overlays take precedence
    pub fn overlay(mut self, source: OverlaySource) -> Self {
        self.overlays.push(source);
        self
    }

    pub fn overlays(&self) -> &[OverlaySource] {
        &self.overlays
    }

    /// Run the merge inside `work_dir`, which is cleared first and must
    /// not be shared with another run. Every tree, overlays included, must
    /// hold a `minecraft:default` definition once it has an `assets` subtree.
    pub fn merge(&self, work_dir: &Path) -> GlyphResult<MergedAssets> {
        if !self.base.is_dir() {
            return Err(GlyphError::NotFound(self.base.clone()));
        }
        let protected: Vec<&Path> = std::iter::once(self.base.as_path())
            .chain(self.overlays.iter().map(|o| o.path.as_path()))
            .collect();
        tree::prepare_work_dir(work_dir, &protected)?;

        let root = work_dir.join(MERGED_DIR);
        let copied = tree::overlay_copy(&self.base, &root)?;
        let mut providers = FontDefinition::load(&self.base, BASE_LABEL)?.providers;
        info!(
            "Base assets {}: {} files, {} providers",
            self.base.display(),
            copied,
            providers.len()
        );

        let mut skipped = Vec::new();
        for (index, overlay) in self.overlays.iter().enumerate() {
            let scratch = work_dir.join(PACKS_DIR).join(index.to_string());
            let Some(assets) = overlay.materialize(&scratch)? else {
                warn!("Overlay {} has no assets directory, skipping", overlay.label);
                skipped.push(overlay.label.clone());
                continue;
            };

            let definition = FontDefinition::load(&assets, &overlay.label)?;
            let added = definition.len();
            providers.extend(definition.providers);

            let copied = tree::overlay_copy(&assets, &root)?;
            info!(
                "Overlay {}: {} files, {} providers",
                overlay.label, copied, added
            );
        }

        Ok(MergedAssets {
            root,
            providers,
            skipped,
        })
    }
}
