//! Error types for the glyph width pipeline
//!
//! Every fallible library operation returns [`GlyphResult`]. Errors raised
//! while a provider is being processed are wrapped in
//! [`GlyphError::Provider`] so the message locates the offending entry.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Glyph pipeline errors
#[derive(Error, Debug)]
pub enum GlyphError {
    /// Malformed resource location or font definition schema violation
    #[error("format error: {0}")]
    Format(String),

    /// Font definition is not valid JSON
    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Missing font definition, atlas image or overlay subtree
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A reference chain re-enters a definition that is still being expanded
    #[error("cyclic font reference: {}", .chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    /// Provider type this pipeline does not compute widths for
    #[error("unsupported provider type: {0}")]
    UnsupportedProvider(String),

    /// Overlay source that cannot be read locally
    #[error("unsupported overlay source: {0}")]
    UnsupportedSource(String),

    /// Atlas image could not be decoded
    #[error("image error in {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Overlay archive could not be read
    #[error("archive error in {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Work directory that must not be cleared
    #[error("refusing work directory {}: {reason}", .path.display())]
    WorkDir { path: PathBuf, reason: String },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Glyph table artifact could not be decoded
    #[error("corrupt glyph table: {0}")]
    Corrupt(String),

    /// Failure while processing one provider
    #[error("{origin}: {source}")]
    Provider {
        origin: ProviderOrigin,
        #[source]
        source: Box<GlyphError>,
    },
}

/// Result type alias for glyph pipeline operations
pub type GlyphResult<T> = Result<T, GlyphError>;

impl GlyphError {
    /// Attach a provider origin to this error
    pub fn at(self, origin: &ProviderOrigin) -> Self {
        GlyphError::Provider {
            origin: origin.clone(),
            source: Box::new(self),
        }
    }

    /// Check whether the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            GlyphError::UnsupportedProvider(_) => true,
            GlyphError::Provider { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Map a read failure to `NotFound` when the file is missing
    pub(crate) fn from_read(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            GlyphError::NotFound(path)
        } else {
            GlyphError::Io(err)
        }
    }
}

/// Where a provider came from: asset source, definition file and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrigin {
    /// Label of the asset tree ("base" or the overlay string)
    pub source: String,
    /// Font definition the provider was declared in
    pub definition: String,
    /// Index in that definition's `providers` array
    pub index: usize,
}

impl fmt::Display for ProviderOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} provider #{}",
            self.source, self.definition, self.index
        )
    }
}
