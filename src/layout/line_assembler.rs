//! Glyph-to-line assembly.
//!
//! Glyphs sharing a quantized vertical position form one line. Quantizing
//! (rather than comparing raw coordinates) absorbs the sub-point jitter that
//! decoders produce for characters on the same baseline.

use crate::config::LineConfig;
use crate::layout::text_block::{Glyph, TextSpan};
use std::collections::BTreeMap;

/// Accumulates the glyphs of one line before it becomes a [`TextSpan`].
#[derive(Debug, Clone)]
struct LineAccumulator {
    text: String,
    max_size: f32,
    emphasized: bool,
    /// Position of the first visual line
    top_y: f32,
    /// Position and size of the last visual line, used when merging
    bottom_y: f32,
    bottom_size: f32,
}

impl LineAccumulator {
    fn new(y: f32) -> Self {
        Self {
            text: String::new(),
            max_size: 0.0,
            emphasized: false,
            top_y: y,
            bottom_y: y,
            bottom_size: 0.0,
        }
    }

    fn push(&mut self, glyph: &Glyph, emphasized: bool) {
        self.text.push_str(&glyph.text);
        self.max_size = self.max_size.max(glyph.size);
        self.bottom_size = self.max_size;
        self.emphasized |= emphasized;
    }

    fn can_absorb(&self, next: &LineAccumulator, tolerance: f32) -> bool {
        let gap = next.top_y - self.bottom_y;
        self.emphasized == next.emphasized
            && (self.bottom_size - next.max_size).abs() < tolerance
            && gap > 0.0
            && gap <= self.bottom_size * 2.0
    }

    fn absorb(&mut self, next: LineAccumulator) {
        self.text = format!("{} {}", self.text.trim_end(), next.text.trim_start());
        self.max_size = self.max_size.max(next.max_size);
        self.bottom_y = next.bottom_y;
        self.bottom_size = next.bottom_size;
    }
}

/// Groups glyph records into logical text lines.
#[derive(Debug, Clone, Default)]
pub struct LineAssembler {
    config: LineConfig,
    markers: Vec<String>,
}

impl LineAssembler {
    /// Create an assembler from line configuration.
    pub fn new(config: LineConfig) -> Self {
        let markers = config
            .emphasis_markers
            .iter()
            .map(|m| m.to_lowercase())
            .collect();
        Self { config, markers }
    }

    /// Assemble every page of a document.
    ///
    /// `pages[0]` is page 1. Sequence numbers run across the whole document
    /// so that spans keep their extraction order as a final tie-breaker.
    pub fn assemble(&self, pages: &[Vec<Glyph>]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        for (idx, glyphs) in pages.iter().enumerate() {
            let page = idx as u32 + 1;
            for span in self.assemble_page(page, glyphs) {
                let sequence = spans.len();
                spans.push(span.with_sequence(sequence));
            }
        }
        spans
    }

    /// Assemble one page into lines ordered top to bottom.
    ///
    /// Glyphs with a non-finite position or a non-positive size are skipped.
    /// Lines that are blank after trimming are dropped.
    pub fn assemble_page(&self, page: u32, glyphs: &[Glyph]) -> Vec<TextSpan> {
        let scale = 10f32.powi(self.config.y_precision as i32);
        let mut lines: BTreeMap<i64, LineAccumulator> = BTreeMap::new();

        for glyph in glyphs {
            if !glyph.y.is_finite() || !glyph.size.is_finite() || glyph.size <= 0.0 {
                log::trace!("skipping malformed glyph {:?} on page {}", glyph.text, page);
                continue;
            }
            let key = (glyph.y * scale).round() as i64;
            let emphasized = glyph.is_emphasized(&self.markers);
            lines
                .entry(key)
                .or_insert_with(|| LineAccumulator::new(key as f32 / scale))
                .push(glyph, emphasized);
        }

        let mut accumulated: Vec<LineAccumulator> = lines
            .into_values()
            .filter(|line| !line.text.trim().is_empty())
            .collect();

        if self.config.merge_wrapped_lines {
            accumulated = merge_wrapped(accumulated, self.config.merge_size_tolerance);
        }

        accumulated
            .into_iter()
            .filter_map(|line| {
                TextSpan::new(&line.text, page, line.max_size, line.emphasized, line.top_y).ok()
            })
            .collect()
    }
}

/// Join consecutive lines that continue one heading.
fn merge_wrapped(lines: Vec<LineAccumulator>, tolerance: f32) -> Vec<LineAccumulator> {
    let mut merged: Vec<LineAccumulator> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.last_mut() {
            Some(prev) if prev.can_absorb(&line, tolerance) => prev.absorb(line),
            _ => merged.push(line),
        }
    }
    merged
}
