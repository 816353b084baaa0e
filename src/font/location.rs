//! Namespaced resource identifiers (`namespace:path`)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{DEFAULT_NAMESPACE, FONT_DIR, TEXTURES_DIR};
use crate::error::{GlyphError, GlyphResult};

/// Resource location inside an asset tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

impl ResourceLocation {
    /// Build a location from parts, rejecting empty components
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> GlyphResult<Self> {
        let namespace = namespace.into();
        let path = path.into();
        if namespace.is_empty() {
            return Err(GlyphError::Format(format!(
                "empty namespace in resource location \"{}:{}\"",
                namespace, path
            )));
        }
        if path.is_empty() {
            return Err(GlyphError::Format(format!(
                "empty path in resource location \"{}:{}\"",
                namespace, path
            )));
        }
        Ok(Self { namespace, path })
    }

    /// Parse `namespace:path`, or a bare `path` in the default namespace.
    /// Splits on the first `:` only.
    pub fn parse(s: &str) -> GlyphResult<Self> {
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }

    /// `<root>/<namespace>/font/<path>.json`
    pub fn font_path(&self, assets_root: &Path) -> PathBuf {
        assets_root
            .join(&self.namespace)
            .join(FONT_DIR)
            .join(format!("{}.json", self.path))
    }

    /// `<root>/<namespace>/textures/<path>`
    pub fn texture_path(&self, assets_root: &Path) -> PathBuf {
        assets_root
            .join(&self.namespace)
            .join(TEXTURES_DIR)
            .join(&self.path)
    }
}

impl FromStr for ResourceLocation {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespace() {
        let explicit = ResourceLocation::parse("minecraft:default").unwrap();
        let bare = ResourceLocation::parse("default").unwrap();
        assert_eq!(explicit, bare);
        assert_eq!(bare.namespace, "minecraft");
        assert_eq!(bare.path, "default");
    }

    #[test]
    fn test_split_on_first_colon() {
        let loc = ResourceLocation::parse("pack:font/a:b").unwrap();
        assert_eq!(loc.namespace, "pack");
        assert_eq!(loc.path, "font/a:b");
    }

    #[test]
    fn test_empty_parts_rejected() {
        assert!(matches!(ResourceLocation::parse(""), Err(GlyphError::Format(_))));
        assert!(matches!(ResourceLocation::parse("minecraft:"), Err(GlyphError::Format(_))));
        assert!(matches!(ResourceLocation::parse(":default"), Err(GlyphError::Format(_))));
    }

    #[test]
    fn test_paths() {
        let root = Path::new("/assets");
        let font: ResourceLocation = "uniform".parse().unwrap();
        assert_eq!(font.font_path(root), PathBuf::from("/assets/minecraft/font/uniform.json"));
        let tex = ResourceLocation::parse("pack:font/ascii.png").unwrap();
        assert_eq!(tex.texture_path(root), PathBuf::from("/assets/pack/textures/font/ascii.png"));
        assert_eq!(tex.to_string(), "pack:font/ascii.png");
    }
}
