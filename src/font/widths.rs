//! Glyph width computation
//!
//! Folds an ordered provider list into a [`GlyphTable`]. Each step takes
//! the accumulator by value and returns the next one, so a single step can
//! be exercised on its own.

use std::path::Path;

use log::{debug, warn};

use super::atlas::GlyphAtlas;
use super::definition::{BitmapProvider, Provider, ResolvedProvider, SpaceProvider};
use super::table::GlyphTable;
use crate::error::{GlyphError, GlyphResult};

/// Fold every provider, in order, into a fresh table.
///
/// `assets_root` is the merged tree bitmap atlases are read from.
pub fn compute(providers: &[ResolvedProvider], assets_root: &Path) -> GlyphResult<GlyphTable> {
    providers
        .iter()
        .try_fold(GlyphTable::new(), |table, provider| apply(table, provider, assets_root))
}

/// One fold step: the table after `resolved` has contributed its widths
pub fn apply(table: GlyphTable, resolved: &ResolvedProvider, assets_root: &Path) -> GlyphResult<GlyphTable> {
    let result = match &resolved.provider {
        Provider::Space(space) => apply_space(table, space),
        Provider::Bitmap(bitmap) => open_atlas(bitmap, assets_root)
            .and_then(|atlas| apply_bitmap(table, bitmap, &atlas)),
        Provider::Unsupported { kind } => {
            let skipped = GlyphError::UnsupportedProvider(kind.clone()).at(&resolved.origin);
            warn!("{} (skipped)", skipped);
            return Ok(table);
        }
    };
    result.map_err(|e| e.at(&resolved.origin))
}

/// Explicit advances in document order; each key contributes its first
/// scalar, so a later key sharing that scalar wins
pub fn apply_space(mut table: GlyphTable, space: &SpaceProvider) -> GlyphResult<GlyphTable> {
    for (key, advance) in &space.advances {
        let ch = key
            .chars()
            .next()
            .ok_or_else(|| GlyphError::Format("empty key in space advances".to_string()))?;
        table.insert_space(ch as u32, *advance);
    }
    Ok(table)
}

/// Derived advances for every cell of an already opened atlas
pub fn apply_bitmap(mut table: GlyphTable, bitmap: &BitmapProvider, atlas: &GlyphAtlas) -> GlyphResult<GlyphTable> {
    let scale = display_scale(bitmap.height, atlas.glyph_height)?;
    let mut stored = 0usize;
    for cell in atlas.cells() {
        if table.insert_bitmap(cell.ch as u32, advance(cell.visible_width, scale)) {
            stored += 1;
        }
    }
    debug!(
        "Bitmap {}: {}x{} cells of {}x{}, scale {:.3}, {} widths",
        bitmap.file,
        atlas.column_count(),
        atlas.row_count(),
        atlas.glyph_width,
        atlas.glyph_height,
        scale,
        stored
    );
    Ok(table)
}

/// Scale from atlas cell height to display height
pub fn display_scale(height: i32, glyph_height: u32) -> GlyphResult<f32> {
    check_height(height)?;
    Ok(height as f32 / glyph_height as f32)
}

fn check_height(height: i32) -> GlyphResult<()> {
    if height <= 0 {
        return Err(GlyphError::Format(format!(
            "bitmap height must be positive, got {}",
            height
        )));
    }
    Ok(())
}

/// Advance of a glyph: its scaled visible width rounded half up, plus one
/// pixel of spacing
pub fn advance(visible_width: u32, scale: f32) -> f32 {
    let scaled = (visible_width as f32 * scale) as f64;
    ((0.5 + scaled).floor() + 1.0) as f32
}

fn open_atlas(bitmap: &BitmapProvider, assets_root: &Path) -> GlyphResult<GlyphAtlas> {
    check_height(bitmap.height)?;
    GlyphAtlas::open(&bitmap.file.texture_path(assets_root), &bitmap.chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderOrigin;
    use crate::font::location::ResourceLocation;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn origin(index: usize) -> ProviderOrigin {
        ProviderOrigin {
            source: "base".to_string(),
            definition: "minecraft:default".to_string(),
            index,
        }
    }

    fn space(pairs: &[(&str, f32)]) -> ResolvedProvider {
        let advances = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        ResolvedProvider {
            provider: Provider::Space(SpaceProvider { advances }),
            origin: origin(0),
        }
    }

    fn bitmap(file: &str, height: i32, chars: &[&str]) -> ResolvedProvider {
        ResolvedProvider {
            provider: Provider::Bitmap(BitmapProvider {
                file: ResourceLocation::parse(file).unwrap(),
                height,
                chars: chars.iter().map(|c| c.to_string()).collect(),
            }),
            origin: origin(1),
        }
    }

    /// 16x16 single-cell atlas with columns `0..opaque` filled
    fn write_atlas(root: &Path, name: &str, opaque: u32) {
        let mut image = RgbaImage::new(16, 16);
        for x in 0..opaque {
            for y in 0..16 {
                image.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let path = root.join("minecraft").join("textures").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        image.save(path).unwrap();
    }

    #[test]
    fn test_advance_formula() {
        // 10 visible columns at scale 0.5: floor(0.5 + 5.0) + 1
        assert_eq!(advance(10, 0.5), 6.0);
        // Empty cell
        assert_eq!(advance(0, 0.5), 1.0);
        // Half rounds up
        assert_eq!(advance(3, 0.5), 3.0);
        assert_eq!(advance(5, 1.0), 6.0);
    }

    #[test]
    fn test_bitmap_scan_scales_to_display_height() {
        let dir = TempDir::new().unwrap();
        write_atlas(dir.path(), "font/a.png", 10);

        let table = compute(&[bitmap("minecraft:font/a.png", 8, &["A"])], dir.path()).unwrap();
        assert_eq!(table.bitmap_widths().get(&0x41), Some(&6.0));
    }

    #[test]
    fn test_transparent_glyph_gets_one() {
        let dir = TempDir::new().unwrap();
        write_atlas(dir.path(), "font/a.png", 0);

        let table = compute(&[bitmap("font/a.png", 8, &["A"])], dir.path()).unwrap();
        assert_eq!(table.get(0x41), Some(1.0));
    }

    #[test]
    fn test_later_space_overrides_bitmap() {
        let dir = TempDir::new().unwrap();
        write_atlas(dir.path(), "font/a.png", 13);

        let providers = [bitmap("font/a.png", 8, &["A"]), space(&[("A", 5.0)])];
        let table = compute(&providers, dir.path()).unwrap();
        assert_eq!(table.get(0x41), Some(5.0));
        assert!(table.bitmap_widths().is_empty());
    }

    #[test]
    fn test_explicit_space_beats_bitmap_space() {
        let dir = TempDir::new().unwrap();
        write_atlas(dir.path(), "font/space.png", 16);

        let providers = [space(&[(" ", 4.0)]), bitmap("font/space.png", 8, &[" "])];
        let table = compute(&providers, dir.path()).unwrap();
        assert_eq!(table.get(0x20), Some(4.0));
        assert!(table.bitmap_widths().is_empty());
    }

    #[test]
    fn test_space_uses_first_scalar() {
        let table = apply_space(
            GlyphTable::new(),
            &SpaceProvider {
                advances: vec![("\u{1F600}x".to_string(), 9.0)],
            },
        )
        .unwrap();
        assert_eq!(table.get(0x1F600), Some(9.0));
        assert!(!table.contains('x' as u32));
    }

    #[test]
    fn test_later_key_with_same_first_scalar_wins() {
        let table = compute(&[space(&[("ab", 1.0), ("a", 2.0)])], Path::new(".")).unwrap();
        assert_eq!(table.get('a' as u32), Some(2.0));
        let table = compute(&[space(&[("a", 2.0), ("ab", 1.0)])], Path::new(".")).unwrap();
        assert_eq!(table.get('a' as u32), Some(1.0));
    }

    #[test]
    fn test_empty_space_key_rejected() {
        let err = compute(&[space(&[("", 1.0)])], Path::new(".")).unwrap_err();
        assert!(matches!(err, GlyphError::Provider { .. }));
    }

    #[test]
    fn test_unsupported_provider_skipped() {
        let providers = [
            space(&[("a", 1.0)]),
            ResolvedProvider {
                provider: Provider::Unsupported {
                    kind: "ttf".to_string(),
                },
                origin: origin(1),
            },
            space(&[("b", 2.0)]),
        ];
        let table = compute(&providers, Path::new(".")).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_atlas_fails_with_origin() {
        let dir = TempDir::new().unwrap();
        let err = compute(&[bitmap("font/none.png", 8, &["A"])], dir.path()).unwrap_err();
        match err {
            GlyphError::Provider { origin, source } => {
                assert_eq!(origin.index, 1);
                assert!(matches!(*source, GlyphError::NotFound(_)));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_height_rejected() {
        let dir = TempDir::new().unwrap();
        write_atlas(dir.path(), "font/a.png", 4);
        assert!(compute(&[bitmap("font/a.png", 0, &["A"])], dir.path()).is_err());
    }

    #[test]
    fn test_step_is_independent() {
        let table = GlyphTable::new();
        let next = apply(table.clone(), &space(&[("a", 3.0)]), Path::new(".")).unwrap();
        assert!(table.is_empty());
        assert_eq!(next.get('a' as u32), Some(3.0));
    }
}
