//! Glyph and line representations for outline analysis.
//!
//! A [`Glyph`] is one decoded character as the extraction collaborator reports
//! it. A [`TextSpan`] is one assembled logical line with aggregated font data.
//!
//! Vertical positions are measured from the top of the page: smaller values
//! are closer to the top. Every ordering in the crate relies on this.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single decoded character with its position and font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Decoded text (usually one character, ligatures may carry more)
    pub text: String,
    /// Left edge in page units
    #[serde(default)]
    pub x: f32,
    /// Distance from the top of the page
    pub y: f32,
    /// Font size in points
    pub size: f32,
    /// PostScript font name as reported by the decoder
    #[serde(default)]
    pub font_name: String,
}

impl Glyph {
    /// Create a glyph.
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            font_name: font_name.into(),
        }
    }

    /// Check whether the font name contains any of the emphasis markers.
    ///
    /// Markers are expected in lower case; the font name is folded before
    /// matching so `Helvetica-Bold` and `ARIALBLACK` both match.
    pub fn is_emphasized(&self, markers: &[String]) -> bool {
        let name = self.font_name.to_lowercase();
        markers.iter().any(|m| name.contains(m.as_str()))
    }
}

/// One logical line of text on one page.
///
/// Spans are immutable once built: the text is trimmed and never empty, the
/// font size is finite and positive, and pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    text: String,
    page: u32,
    font_size: f32,
    is_emphasized: bool,
    y_position: f32,
    sequence: usize,
}

impl TextSpan {
    /// Build a span, normalizing whitespace in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpan`] if the text is blank, the font size is
    /// not a positive finite number, the page is zero, or the position is
    /// not finite.
    pub fn new(
        text: &str,
        page: u32,
        font_size: f32,
        is_emphasized: bool,
        y_position: f32,
    ) -> Result<Self> {
        let text = normalize_whitespace(text);
        if text.is_empty() {
            return Err(Error::InvalidSpan("text is empty after trimming".to_string()));
        }
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(Error::InvalidSpan(format!(
                "font size must be positive, got {} for '{}'",
                font_size, text
            )));
        }
        if page == 0 {
            return Err(Error::InvalidSpan(format!("page numbers are 1-based ('{}')", text)));
        }
        if !y_position.is_finite() {
            return Err(Error::InvalidSpan(format!("y position is not finite for '{}'", text)));
        }

        Ok(Self {
            text,
            page,
            font_size,
            is_emphasized,
            y_position,
            sequence: 0,
        })
    }

    /// Attach the extraction sequence number used to break position ties.
    pub fn with_sequence(mut self, sequence: usize) -> Self {
        self.sequence = sequence;
        self
    }

    /// Trimmed, whitespace-normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Largest glyph size contributing to the line.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Whether any contributing glyph used a bold, black or italic face.
    pub fn is_emphasized(&self) -> bool {
        self.is_emphasized
    }

    /// Distance from the top of the page.
    pub fn y_position(&self) -> f32 {
        self.y_position
    }

    /// Extraction order within the document.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Number of characters (not bytes) in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Case-folded text used for title and duplicate comparison.
    pub fn folded_text(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Trim and collapse internal whitespace runs to a single space.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
