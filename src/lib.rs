//! glyphwidths - glyph advance width tables from layered font assets
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  base assets + overlay packs             │
//! ├──────────────────────────────────────────┤
//! │  AssetMerger                             │
//! │    files     →  merged tree (pixels)     │
//! │    font JSON →  ordered provider list    │
//! │                          ↓               │
//! │  widths::compute (fold → GlyphTable)     │
//! │                          ↓               │
//! │  GlyphTable::encode → glyph_widths.bin   │
//! └──────────────────────────────────────────┘
//! ```

pub mod assets;
pub mod config;
pub mod constants;
pub mod error;
pub mod font;
pub mod pipeline;

pub use error::{GlyphError, GlyphResult, ProviderOrigin};
pub use font::{GlyphTable, GlyphWidths, ResourceLocation};
pub use pipeline::Pipeline;
