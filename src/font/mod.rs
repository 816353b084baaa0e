//! Font definitions and glyph width tables
//!
//! Handles:
//! - Resource location parsing (`namespace:path`)
//! - Font definition loading with reference inlining
//! - Bitmap atlas scanning
//! - Width accumulation and the binary table format
//! - Width lookups for consumers of the table

pub mod atlas;
pub mod definition;
pub mod location;
pub mod lookup;
pub mod table;
pub mod widths;

pub use atlas::{GlyphAtlas, GlyphCell};
pub use definition::{default_font, BitmapProvider, FontDefinition, Provider, ResolvedProvider, SpaceProvider};
pub use location::ResourceLocation;
pub use lookup::GlyphWidths;
pub use table::GlyphTable;
