//! Global constants for glyphwidths
//!
//! Consolidates resource naming, glyph metric defaults and artifact
//! layout constants to eliminate magic numbers throughout the codebase.

// ============================================================================
// Resource Naming
// ============================================================================

/// Namespace used when a resource location has no `namespace:` prefix
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Font definition every asset tree is resolved from
pub const DEFAULT_FONT_PATH: &str = "default";

/// Directory under a namespace holding font definitions
pub const FONT_DIR: &str = "font";

/// Directory under a namespace holding atlas images
pub const TEXTURES_DIR: &str = "textures";

/// Subtree an overlay pack must contain to take part in the merge
pub const ASSETS_DIR: &str = "assets";

// ============================================================================
// Glyph Metrics
// ============================================================================

/// Display height of a bitmap provider without an explicit `height`
pub const DEFAULT_BITMAP_HEIGHT: i32 = 8;

/// The space character, whose explicit advance beats any bitmap cell
pub const SPACE_CODEPOINT: u32 = 0x20;

/// Largest Unicode scalar value
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

// ============================================================================
// Artifact Layout
// ============================================================================

/// Magic bytes opening every glyph width table
pub const TABLE_MAGIC: [u8; 4] = *b"GLYW";

/// Current glyph width table format version
pub const TABLE_VERSION: u32 = 1;

/// Size of one (codepoint, width) record in bytes
pub const RECORD_SIZE: usize = 8;
