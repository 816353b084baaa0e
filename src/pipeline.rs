//! End-to-end generation: merge asset trees, fold providers, write the table

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::assets::{AssetMerger, OverlaySource};
use crate::error::{GlyphError, GlyphResult};
use crate::font::{widths, GlyphTable};

/// One generation run
#[derive(Debug, Clone)]
pub struct Pipeline {
    merger: AssetMerger,
    /// Fixed work directory; a fresh temporary one per run when unset
    work_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(base_assets: impl Into<PathBuf>) -> Self {
        Self {
            merger: AssetMerger::new(base_assets),
            work_dir: None,
        }
    }

    /// Append an overlay given as a path or `file://` URL
    pub fn overlay(mut self, source: &str) -> GlyphResult<Self> {
        self.merger = self.merger.overlay(OverlaySource::parse(source)?);
        Ok(self)
    }

    /// Use a fixed work directory. It is cleared at the start of the run.
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Merge, compute and return the table
    pub fn run(&self) -> GlyphResult<GlyphTable> {
        match &self.work_dir {
            Some(dir) => self.run_in(dir),
            None => {
                let scratch = tempfile::Builder::new().prefix("glyphwidths-").tempdir()?;
                self.run_in(scratch.path())
            }
        }
    }

    /// Run and write the encoded table to `output`.
    ///
    /// The file only appears at `output` once the whole run succeeded.
    pub fn run_to_file(&self, output: &Path) -> GlyphResult<GlyphTable> {
        let table = self.run()?;
        write_table(&table, output)?;
        info!(
            "Wrote {} ({} space, {} bitmap widths)",
            output.display(),
            table.space_widths().len(),
            table.len() - table.space_widths().len()
        );
        Ok(table)
    }

    fn run_in(&self, work_dir: &Path) -> GlyphResult<GlyphTable> {
        let merged = self.merger.merge(work_dir)?;
        info!(
            "Computing widths from {} providers ({} overlays skipped)",
            merged.providers.len(),
            merged.skipped.len()
        );
        widths::compute(&merged.providers, &merged.root)
    }
}

/// Encode `table` to a temporary file beside `output`, then move it into place
pub fn write_table(table: &GlyphTable, output: &Path) -> GlyphResult<()> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut file = NamedTempFile::new_in(&parent)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        table.write_to(&mut writer)?;
        writer.flush()?;
    }
    file.persist(output).map_err(|e| GlyphError::Io(e.error))?;
    Ok(())
}
