//! Glyph width table
//!
//! Two codepoint → advance maps: `space` holds authoritative advances
//! from space providers, `bitmap` holds advances derived from atlas
//! scans. Writing a codepoint into one category removes it from the
//! other, so the last provider to mention a codepoint wins.
//!
//! # Binary layout
//!
//! ```text
//! magic    4 bytes  "GLYW"
//! version  u32      1
//! n_space  u32
//! n_bitmap u32
//! n_space  x (codepoint u32, width f32)   ascending codepoint
//! n_bitmap x (codepoint u32, width f32)   ascending codepoint
//! ```
//!
//! All integers and floats are little-endian.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::constants::{MAX_CODEPOINT, RECORD_SIZE, SPACE_CODEPOINT, TABLE_MAGIC, TABLE_VERSION};
use crate::error::{GlyphError, GlyphResult};

/// Header size: magic + version + two counts
const HEADER_SIZE: usize = 16;

/// Accumulated glyph widths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphTable {
    space_widths: BTreeMap<u32, f32>,
    bitmap_widths: BTreeMap<u32, f32>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an explicit advance; drops any derived width for `codepoint`
    pub fn insert_space(&mut self, codepoint: u32, width: f32) {
        self.bitmap_widths.remove(&codepoint);
        self.space_widths.insert(codepoint, width);
    }

    /// Record a derived advance; drops any explicit width for `codepoint`.
    ///
    /// An explicit advance for U+0020 is kept and the derived one ignored.
    /// Returns whether the value was stored.
    pub fn insert_bitmap(&mut self, codepoint: u32, width: f32) -> bool {
        if codepoint == SPACE_CODEPOINT && self.space_widths.contains_key(&codepoint) {
            return false;
        }
        self.space_widths.remove(&codepoint);
        self.bitmap_widths.insert(codepoint, width);
        true
    }

    /// Explicit advances
    pub fn space_widths(&self) -> &BTreeMap<u32, f32> {
        &self.space_widths
    }

    /// Derived advances
    pub fn bitmap_widths(&self) -> &BTreeMap<u32, f32> {
        &self.bitmap_widths
    }

    /// Width of `codepoint`, explicit advances first
    pub fn get(&self, codepoint: u32) -> Option<f32> {
        self.space_widths
            .get(&codepoint)
            .or_else(|| self.bitmap_widths.get(&codepoint))
            .copied()
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.get(codepoint).is_some()
    }

    /// Number of distinct codepoints
    pub fn len(&self) -> usize {
        self.space_widths.len() + self.encoded_bitmap().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Derived advances not shadowed by an explicit one
    fn encoded_bitmap(&self) -> impl Iterator<Item = (&u32, &f32)> + '_ {
        self.bitmap_widths
            .iter()
            .filter(move |(cp, _)| !self.space_widths.contains_key(*cp))
    }

    /// Serialize to the binary layout
    pub fn encode(&self) -> Vec<u8> {
        let bitmap: Vec<(&u32, &f32)> = self.encoded_bitmap().collect();
        let mut out =
            Vec::with_capacity(HEADER_SIZE + (self.space_widths.len() + bitmap.len()) * RECORD_SIZE);

        out.extend_from_slice(&TABLE_MAGIC);
        out.extend_from_slice(&TABLE_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.space_widths.len() as u32).to_le_bytes());
        out.extend_from_slice(&(bitmap.len() as u32).to_le_bytes());
        for (cp, width) in self.space_widths.iter().chain(bitmap) {
            out.extend_from_slice(&cp.to_le_bytes());
            out.extend_from_slice(&width.to_bits().to_le_bytes());
        }
        out
    }

    /// Serialize into a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> GlyphResult<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }

    /// Deserialize from the binary layout
    pub fn decode(bytes: &[u8]) -> GlyphResult<Self> {
        let mut rest = bytes;
        if take(&mut rest, 4)? != TABLE_MAGIC {
            return Err(GlyphError::Corrupt("bad magic".to_string()));
        }
        let version = read_u32(&mut rest)?;
        if version != TABLE_VERSION {
            return Err(GlyphError::Corrupt(format!("unsupported version {}", version)));
        }
        let space_count = read_u32(&mut rest)? as usize;
        let bitmap_count = read_u32(&mut rest)? as usize;
        let expected = space_count
            .checked_add(bitmap_count)
            .and_then(|n| n.checked_mul(RECORD_SIZE))
            .ok_or_else(|| GlyphError::Corrupt("record count overflow".to_string()))?;
        if rest.len() != expected {
            return Err(GlyphError::Corrupt(format!(
                "expected {} record bytes, found {}",
                expected,
                rest.len()
            )));
        }

        let space_widths = read_records(&mut rest, space_count, "space")?;
        let bitmap_widths = read_records(&mut rest, bitmap_count, "bitmap")?;
        if let Some(cp) = bitmap_widths.keys().find(|cp| space_widths.contains_key(*cp)) {
            return Err(GlyphError::Corrupt(format!(
                "U+{:04X} present in both categories",
                cp
            )));
        }
        Ok(Self {
            space_widths,
            bitmap_widths,
        })
    }

    /// Deserialize from a reader; the reader must hold exactly one table
    pub fn read_from<R: Read>(reader: &mut R) -> GlyphResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }
}

fn take<'a>(rest: &mut &'a [u8], n: usize) -> GlyphResult<&'a [u8]> {
    if rest.len() < n {
        return Err(GlyphError::Corrupt("unexpected end of data".to_string()));
    }
    let (head, tail) = rest.split_at(n);
    *rest = tail;
    Ok(head)
}

fn read_u32(rest: &mut &[u8]) -> GlyphResult<u32> {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(take(rest, 4)?);
    Ok(u32::from_le_bytes(buf))
}

fn read_records(rest: &mut &[u8], count: usize, category: &str) -> GlyphResult<BTreeMap<u32, f32>> {
    let mut widths = BTreeMap::new();
    let mut previous: Option<u32> = None;
    for _ in 0..count {
        let cp = read_u32(rest)?;
        let width = f32::from_bits(read_u32(rest)?);
        if cp > MAX_CODEPOINT {
            return Err(GlyphError::Corrupt(format!(
                "{} record holds invalid codepoint {:#x}",
                category, cp
            )));
        }
        if previous.is_some_and(|p| p >= cp) {
            return Err(GlyphError::Corrupt(format!(
                "{} records not in ascending order at U+{:04X}",
                category, cp
            )));
        }
        previous = Some(cp);
        widths.insert(cp, width);
    }
    Ok(widths)
}
