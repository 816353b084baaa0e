//! Glyph atlas
//!
//! A bitmap provider's image split into a uniform grid of glyph cells,
//! one cell per scalar of its `chars` rows. Only the alpha channel is
//! consulted: a cell's visible width ends at its rightmost column that
//! holds any non-transparent pixel.

use std::path::Path;

use image::io::Reader as ImageReader;
use image::RgbaImage;
use log::trace;

use crate::error::{GlyphError, GlyphResult};

/// One glyph cell of the atlas grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    /// Scalar mapped to this cell
    pub ch: char,
    /// Grid column
    pub column: u32,
    /// Grid row
    pub row: u32,
    /// Rightmost opaque column + 1, 0 for an empty cell
    pub visible_width: u32,
}

/// Glyph atlas: decoded image plus its character grid
#[derive(Debug)]
pub struct GlyphAtlas {
    image: RgbaImage,
    /// Scalars per row, row-major
    rows: Vec<Vec<char>>,
    /// Cell width in image pixels
    pub glyph_width: u32,
    /// Cell height in image pixels
    pub glyph_height: u32,
}

impl GlyphAtlas {
    /// Decode the atlas image at `path` and lay `chars` over it
    pub fn open(path: &Path, chars: &[String]) -> GlyphResult<Self> {
        let reader = ImageReader::open(path)
            .map_err(|e| GlyphError::from_read(path.to_path_buf(), e))?
            .with_guessed_format()?;
        let image = reader.decode().map_err(|source| GlyphError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        trace!(
            "Atlas {} decoded: {}x{}",
            path.display(),
            image.width(),
            image.height()
        );
        Self::from_image(image.to_rgba8(), chars)
    }

    /// Lay `chars` over an already decoded image.
    ///
    /// The column count comes from the first row; every other row must
    /// have the same number of scalars.
    pub fn from_image(image: RgbaImage, chars: &[String]) -> GlyphResult<Self> {
        let rows: Vec<Vec<char>> = chars.iter().map(|row| row.chars().collect()).collect();
        let columns = match rows.first() {
            None => return Err(GlyphError::Format("bitmap provider has no rows".to_string())),
            Some(first) if first.is_empty() => {
                return Err(GlyphError::Format("bitmap provider row 0 is empty".to_string()))
            }
            Some(first) => first.len(),
        };
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(GlyphError::Format(format!(
                "bitmap provider row {} has {} glyphs, row 0 has {}",
                index,
                row.len(),
                columns
            )));
        }

        let glyph_width = image.width() / columns as u32;
        let glyph_height = image.height() / rows.len() as u32;
        if glyph_width == 0 || glyph_height == 0 {
            return Err(GlyphError::Format(format!(
                "atlas {}x{} is too small for a {}x{} glyph grid",
                image.width(),
                image.height(),
                columns,
                rows.len()
            )));
        }

        Ok(Self {
            image,
            rows,
            glyph_width,
            glyph_height,
        })
    }

    /// Number of grid rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of grid columns
    pub fn column_count(&self) -> usize {
        self.rows[0].len()
    }

    /// Visible width of the cell at (`column`, `row`), scanning right to left
    pub fn visible_width(&self, column: u32, row: u32) -> u32 {
        let x0 = column * self.glyph_width;
        let y0 = row * self.glyph_height;
        (0..self.glyph_width)
            .rev()
            .find(|&i| {
                (0..self.glyph_height).any(|k| self.image.get_pixel(x0 + i, y0 + k)[3] != 0)
            })
            .map_or(0, |i| i + 1)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = GlyphCell> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().map(move |(x, &ch)| GlyphCell {
                ch,
                column: x as u32,
                row: y as u32,
                visible_width: self.visible_width(x as u32, y as u32),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const OPAQUE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// Fill columns `0..width` of the cell at (column, row)
    fn paint(image: &mut RgbaImage, cell: (u32, u32), size: (u32, u32), width: u32) {
        for x in 0..width {
            for y in 0..size.1 {
                image.put_pixel(cell.0 * size.0 + x, cell.1 * size.1 + y, OPAQUE);
            }
        }
    }

    fn rows(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_single_cell_visible_width() {
        let mut image = RgbaImage::new(16, 16);
        paint(&mut image, (0, 0), (16, 16), 10);
        let atlas = GlyphAtlas::from_image(image, &rows(&["A"])).unwrap();
        assert_eq!((atlas.glyph_width, atlas.glyph_height), (16, 16));
        assert_eq!(atlas.visible_width(0, 0), 10);
    }

    #[test]
    fn test_transparent_cell_is_zero() {
        let atlas = GlyphAtlas::from_image(RgbaImage::new(8, 8), &rows(&["A"])).unwrap();
        assert_eq!(atlas.visible_width(0, 0), 0);
    }

    #[test]
    fn test_single_pixel_sets_width() {
        let mut image = RgbaImage::new(8, 8);
        // Faint pixel at column 5 of the last line still counts
        image.put_pixel(5, 7, Rgba([0, 0, 0, 1]));
        let atlas = GlyphAtlas::from_image(image, &rows(&["A"])).unwrap();
        assert_eq!(atlas.visible_width(0, 0), 6);
    }

    #[test]
    fn test_cells_are_independent() {
        // 2x2 grid of 4x4 cells
        let mut image = RgbaImage::new(8, 8);
        paint(&mut image, (0, 0), (4, 4), 1);
        paint(&mut image, (1, 0), (4, 4), 4);
        paint(&mut image, (1, 1), (4, 4), 2);
        let atlas = GlyphAtlas::from_image(image, &rows(&["ab", "cd"])).unwrap();

        let cells: Vec<(char, u32)> = atlas.cells().map(|c| (c.ch, c.visible_width)).collect();
        assert_eq!(cells, [('a', 1), ('b', 4), ('c', 0), ('d', 2)]);
    }

    #[test]
    fn test_row_length_mismatch_rejected() {
        let err = GlyphAtlas::from_image(RgbaImage::new(8, 8), &rows(&["ab", "c"])).unwrap_err();
        assert!(matches!(err, GlyphError::Format(msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(GlyphAtlas::from_image(RgbaImage::new(8, 8), &[]).is_err());
        assert!(GlyphAtlas::from_image(RgbaImage::new(8, 8), &rows(&[""])).is_err());
    }

    #[test]
    fn test_grid_larger_than_image_rejected() {
        let err = GlyphAtlas::from_image(RgbaImage::new(2, 2), &rows(&["abc"])).unwrap_err();
        assert!(matches!(err, GlyphError::Format(_)));
    }

    #[test]
    fn test_open_missing_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = GlyphAtlas::open(&dir.path().join("missing.png"), &rows(&["A"])).err().unwrap();
        assert!(matches!(err, GlyphError::NotFound(_)));
    }

    #[test]
    fn test_open_png_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ascii.png");
        let mut image = RgbaImage::new(16, 8);
        paint(&mut image, (1, 0), (8, 8), 3);
        image.save(&path).unwrap();

        let atlas = GlyphAtlas::open(&path, &rows(&["xy"])).unwrap();
        assert_eq!(atlas.column_count(), 2);
        assert_eq!(atlas.row_count(), 1);
        assert_eq!(atlas.visible_width(0, 0), 0);
        assert_eq!(atlas.visible_width(1, 0), 3);
    }
}
