//! Font definitions
//!
//! Loads `<namespace>/font/<path>.json` documents and flattens their
//! `providers` arrays. `reference` providers are inlined depth-first in
//! document order, so the result only holds leaf providers.

use std::fs;
use std::path::Path;

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::location::ResourceLocation;
use crate::constants::{DEFAULT_BITMAP_HEIGHT, DEFAULT_FONT_PATH, DEFAULT_NAMESPACE};
use crate::error::{GlyphError, GlyphResult, ProviderOrigin};

/// Space provider: explicit advances keyed by a one-character string
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceProvider {
    /// `(key, advance)` pairs in document order
    pub advances: Vec<(String, f32)>,
}

/// Bitmap provider: a grid atlas with one row string per atlas row
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapProvider {
    /// Atlas image, relative to `<namespace>/textures/`
    pub file: ResourceLocation,
    /// Display height the glyph cells are scaled to
    pub height: i32,
    /// Row strings, one scalar per atlas column
    pub chars: Vec<String>,
}

/// Leaf provider of a resolved font definition
#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    Space(SpaceProvider),
    Bitmap(BitmapProvider),
    /// Any type this pipeline does not compute widths for (ttf, unihex, ...)
    Unsupported { kind: String },
}

impl Provider {
    /// The provider's `type` string
    pub fn kind(&self) -> &str {
        match self {
            Provider::Space(_) => "space",
            Provider::Bitmap(_) => "bitmap",
            Provider::Unsupported { kind } => kind,
        }
    }
}

/// Leaf provider tagged with where it was declared
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub origin: ProviderOrigin,
}

/// Ordered leaf providers of one asset tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontDefinition {
    pub providers: Vec<ResolvedProvider>,
}

/// The font every asset tree is resolved from (`minecraft:default`)
pub fn default_font() -> ResourceLocation {
    ResourceLocation {
        namespace: DEFAULT_NAMESPACE.to_string(),
        path: DEFAULT_FONT_PATH.to_string(),
    }
}

impl FontDefinition {
    /// Resolve `minecraft:default` from an assets root
    pub fn load(assets_root: &Path, source: &str) -> GlyphResult<Self> {
        Self::load_from(assets_root, &default_font(), source)
    }

    /// Resolve an arbitrary font definition from an assets root.
    /// `source` labels the asset tree in error messages.
    pub fn load_from(assets_root: &Path, start: &ResourceLocation, source: &str) -> GlyphResult<Self> {
        let mut resolver = Resolver {
            assets_root,
            source,
            chain: Vec::new(),
            providers: Vec::new(),
        };
        resolver.append(start)?;
        debug!(
            "Resolved {} from {}: {} providers",
            start,
            source,
            resolver.providers.len()
        );
        Ok(Self {
            providers: resolver.providers,
        })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// On-disk shape of a font definition document
#[derive(Deserialize)]
struct FontDocument {
    providers: Vec<Value>,
}

/// Known provider shapes, selected by `type`
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawProvider {
    Space {
        advances: Map<String, Value>,
    },
    Bitmap {
        file: String,
        #[serde(default = "default_height")]
        height: i32,
        chars: Vec<String>,
    },
    Reference {
        id: String,
    },
}

fn default_height() -> i32 {
    DEFAULT_BITMAP_HEIGHT
}

enum Entry {
    Leaf(Provider),
    Reference(ResourceLocation),
}

fn parse_entry(value: Value) -> GlyphResult<Entry> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GlyphError::Format("provider has no string \"type\"".to_string()))?;
    if !matches!(kind, "space" | "bitmap" | "reference") {
        return Ok(Entry::Leaf(Provider::Unsupported {
            kind: kind.to_string(),
        }));
    }

    let raw: RawProvider = serde_json::from_value(value)
        .map_err(|e| GlyphError::Format(format!("invalid provider: {}", e)))?;
    Ok(match raw {
        RawProvider::Space { advances } => Entry::Leaf(Provider::Space(SpaceProvider {
            advances: space_advances(advances)?,
        })),
        RawProvider::Bitmap { file, height, chars } => Entry::Leaf(Provider::Bitmap(BitmapProvider {
            file: ResourceLocation::parse(&file)?,
            height,
            chars,
        })),
        RawProvider::Reference { id } => Entry::Reference(ResourceLocation::parse(&id)?),
    })
}

fn space_advances(advances: Map<String, Value>) -> GlyphResult<Vec<(String, f32)>> {
    advances
        .into_iter()
        .map(|(key, value)| match value.as_f64() {
            Some(advance) => Ok((key, advance as f32)),
            None => Err(GlyphError::Format(format!(
                "advance for {:?} is not a number: {}",
                key, value
            ))),
        })
        .collect()
}

struct Resolver<'a> {
    assets_root: &'a Path,
    source: &'a str,
    /// Definitions currently being expanded, outermost first
    chain: Vec<ResourceLocation>,
    providers: Vec<ResolvedProvider>,
}

impl Resolver<'_> {
    fn append(&mut self, id: &ResourceLocation) -> GlyphResult<()> {
        if self.chain.contains(id) {
            let mut chain: Vec<String> = self.chain.iter().map(ToString::to_string).collect();
            chain.push(id.to_string());
            return Err(GlyphError::CyclicReference { chain });
        }

        let path = id.font_path(self.assets_root);
        trace!("Loading font definition {}", path.display());
        let text = fs::read_to_string(&path).map_err(|e| GlyphError::from_read(path.clone(), e))?;
        let json: Value = serde_json::from_str(&text).map_err(|source| GlyphError::Parse {
            path: path.clone(),
            source,
        })?;
        let document: FontDocument = serde_json::from_value(json).map_err(|e| {
            GlyphError::Format(format!("{} ({}): {}", id, path.display(), e))
        })?;

        self.chain.push(id.clone());
        for (index, value) in document.providers.into_iter().enumerate() {
            let origin = ProviderOrigin {
                source: self.source.to_string(),
                definition: id.to_string(),
                index,
            };
            match parse_entry(value).map_err(|e| e.at(&origin))? {
                Entry::Reference(target) => self.append(&target)?,
                Entry::Leaf(provider) => self.providers.push(ResolvedProvider { provider, origin }),
            }
        }
        self.chain.pop();
        Ok(())
    }
}
