//! Glyph width lookups over a loaded table
//!
//! Answers text width queries and builds runs of space characters that
//! approximate a requested pixel width.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::table::GlyphTable;
use crate::error::{GlyphError, GlyphResult};

/// Loaded glyph widths
#[derive(Debug, Clone, Default)]
pub struct GlyphWidths {
    table: GlyphTable,
    /// Space codepoints with their widths, ascending by width
    spaces: Vec<(u32, f32)>,
}

impl GlyphWidths {
    pub fn from_table(table: GlyphTable) -> Self {
        let mut spaces: Vec<(u32, f32)> = table.space_widths().iter().map(|(&cp, &w)| (cp, w)).collect();
        spaces.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self { table, spaces }
    }

    pub fn from_bytes(bytes: &[u8]) -> GlyphResult<Self> {
        GlyphTable::decode(bytes).map(Self::from_table)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> GlyphResult<Self> {
        GlyphTable::read_from(reader).map(Self::from_table)
    }

    /// Load a table file written by the pipeline
    pub fn load(path: &Path) -> GlyphResult<Self> {
        let file = File::open(path).map_err(|e| GlyphError::from_read(path.to_path_buf(), e))?;
        Self::read_from(&mut BufReader::new(file))
    }

    pub fn table(&self) -> &GlyphTable {
        &self.table
    }

    pub fn has(&self, codepoint: u32) -> bool {
        self.table.contains(codepoint)
    }

    /// Width of `codepoint`; 0.0 when unknown
    pub fn width(&self, codepoint: u32) -> f32 {
        self.table.get(codepoint).unwrap_or(0.0)
    }

    /// Sum of the widths of every scalar in `text`
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.width(ch as u32)).sum()
    }

    /// Space codepoint whose width is closest to `width`
    pub fn nearest_space(&self, width: f32) -> Option<u32> {
        self.nearest_index(width).map(|i| self.spaces[i].0)
    }

    /// Space codepoints whose widths add up as close to `width` as the
    /// available spaces allow. Greedy: keeps taking the nearest space while
    /// that shrinks the remaining distance.
    pub fn space_codepoints_for_width(&self, width: f32) -> Vec<u32> {
        let mut codepoints = Vec::new();
        let mut remaining = width;
        while let Some(index) = self.nearest_index(remaining) {
            let (cp, space_width) = self.spaces[index];
            let next = remaining - space_width;
            // Only step while strictly closer; NaN compares false and stops
            if !(next.abs() < remaining.abs()) {
                break;
            }
            remaining = next;
            codepoints.push(cp);
        }
        codepoints
    }

    /// Same as [`Self::space_codepoints_for_width`], as a string
    pub fn spaces_for_width(&self, width: f32) -> String {
        self.space_codepoints_for_width(width)
            .into_iter()
            .filter_map(char::from_u32)
            .collect()
    }

    /// Binary search over space widths; ties between neighbours go to the wider one
    fn nearest_index(&self, width: f32) -> Option<usize> {
        if self.spaces.is_empty() {
            return None;
        }
        let from = match self.spaces.binary_search_by(|(_, w)| w.total_cmp(&width)) {
            Ok(exact) => return Some(exact),
            Err(insert) => insert,
        };
        if from == 0 {
            return Some(0);
        }
        if from == self.spaces.len() {
            return Some(from - 1);
        }
        let below = (self.spaces[from - 1].1 - width).abs();
        let above = (self.spaces[from].1 - width).abs();
        Some(if below < above { from - 1 } else { from })
    }
}
