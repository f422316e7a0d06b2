//! Glyph sources: the extraction side of the pipeline.
//!
//! Decoding binary documents is left to an external extractor. Its output is
//! consumed either through the [`GlyphSource`] trait or as a JSON glyph dump:
//!
//! ```json
//! {
//!   "metadata": { "title": "Annual Report" },
//!   "pages": [
//!     { "glyphs": [ { "text": "A", "x": 72.0, "y": 90.0, "size": 18.0, "font_name": "Arial-Bold" } ] }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::layout::text_block::Glyph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Anything that can supply a document's glyphs, page by page.
pub trait GlyphSource {
    /// Glyph records of every page; index 0 is page 1.
    fn pages(&self) -> Result<Vec<Vec<Glyph>>>;

    /// Title stored in the document's metadata, if any.
    fn metadata_title(&self) -> Option<String>;
}

/// Document-level metadata carried by a glyph dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Embedded title
    #[serde(default)]
    pub title: Option<String>,
}

/// Glyphs of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphPage {
    /// Glyphs in extraction order
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
}

/// A document held as decoded glyph records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphDocument {
    /// Document metadata
    #[serde(default)]
    pub metadata: DocumentMetadata,
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<GlyphPage>,
}

impl GlyphDocument {
    /// Build a document from per-page glyph lists.
    pub fn new(pages: Vec<Vec<Glyph>>) -> Self {
        Self {
            metadata: DocumentMetadata::default(),
            pages: pages.into_iter().map(|glyphs| GlyphPage { glyphs }).collect(),
        }
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Open a JSON glyph dump.
    ///
    /// Unreadable or malformed files are reported as [`Error::Extraction`]
    /// so the batch runner can attribute the failure to the document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extraction_error = |reason: String| Error::Extraction {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| extraction_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| extraction_error(e.to_string()))
    }

    /// Parse a JSON glyph dump from a string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl GlyphSource for GlyphDocument {
    fn pages(&self) -> Result<Vec<Vec<Glyph>>> {
        Ok(self.pages.iter().map(|p| p.glyphs.clone()).collect())
    }

    fn metadata_title(&self) -> Option<String> {
        self.metadata.title.clone()
    }
}
