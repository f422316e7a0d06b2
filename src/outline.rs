//! Document outline model.
//!
//! The outline is a flat list of headings in reading order, serialized as
//! `{"title": ..., "outline": [{"level": "H1", "text": ..., "page": 1}]}`.

use crate::extractors::title::{TitleSelection, UNTITLED};
use crate::layout::heading_detector::HeadingLevel;
use crate::layout::text_block::TextSpan;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text, whitespace normalized
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

/// Title and outline of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<HeadingEntry>,
}

impl OutlineResult {
    /// Result for a document without any text.
    pub fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            outline: Vec::new(),
        }
    }

    /// Headings at a given level.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &HeadingEntry> {
        self.outline.iter().filter(move |h| h.level == level)
    }
}

/// Collects classified headings into an [`OutlineResult`].
///
/// Headings must be pushed in reading order. A heading whose text equals the
/// title is dropped, as is any repeat of a (text, page) pair already seen;
/// both comparisons ignore case.
#[derive(Debug)]
pub struct OutlineBuilder {
    title: TitleSelection,
    title_key: Option<String>,
    seen: HashSet<(String, u32)>,
    outline: Vec<HeadingEntry>,
}

impl OutlineBuilder {
    /// Start an outline under the selected title.
    pub fn new(title: TitleSelection) -> Self {
        let title_key = title.exclusion_key();
        Self {
            title,
            title_key,
            seen: HashSet::new(),
            outline: Vec::new(),
        }
    }

    /// Add a heading. Returns false when it was dropped.
    pub fn push(&mut self, span: &TextSpan, level: HeadingLevel) -> bool {
        let folded = span.folded_text();
        if self.title_key.as_deref() == Some(folded.trim()) {
            log::trace!("dropping title repeat {:?} on page {}", span.text(), span.page());
            return false;
        }
        if !self.seen.insert((folded, span.page())) {
            log::trace!("dropping duplicate {:?} on page {}", span.text(), span.page());
            return false;
        }
        self.outline.push(HeadingEntry {
            level,
            text: span.text().to_string(),
            page: span.page(),
        });
        true
    }

    /// Number of headings kept so far.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// True when no heading has been kept.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Finish the outline.
    pub fn build(self) -> OutlineResult {
        OutlineResult {
            title: self.title.text,
            outline: self.outline,
        }
    }
}
