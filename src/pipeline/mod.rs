//! Outline classification pipeline.
//!
//! ```text
//! Glyph pages
//!     ↓
//! [LineAssembler] (glyphs → TextSpan[])
//!     ↓
//! reading order (page, then top to bottom)
//!     ↓
//! [TitleSelector]            [FilterChain] → FontStatistics → [RelativeSizeFilter]
//!     ↓                                                              ↓
//!     └──────────────→ [OutlineBuilder] ←──────────── [LevelStrategy]
//!                            ↓
//!                      OutlineResult
//! ```
//!
//! The engine is immutable after construction and holds no per-document
//! state, so one instance can be shared across threads.

use crate::config::OutlineConfig;
use crate::document::GlyphSource;
use crate::error::Result;
use crate::extractors::noise_filter::{
    FilterChain, NoiseFilter, RelativeSizeFilter, TextNoiseFilter,
};
use crate::extractors::title::{create_title_selector, TitleSelector};
use crate::layout::font_stats::FontStatistics;
use crate::layout::heading_detector::{create_strategy, Candidate, LevelStrategy};
use crate::layout::line_assembler::LineAssembler;
use crate::layout::text_block::TextSpan;
use crate::outline::{OutlineBuilder, OutlineResult};
use crate::utils::safe_float_cmp;
use std::cmp::Ordering;

/// Compare two spans in reading order: page, then top to bottom, then
/// extraction sequence.
pub fn reading_order(a: &TextSpan, b: &TextSpan) -> Ordering {
    a.page()
        .cmp(&b.page())
        .then_with(|| safe_float_cmp(a.y_position(), b.y_position()))
        .then_with(|| a.sequence().cmp(&b.sequence()))
}

/// The outline engine: turns a document's spans into a title and outline.
pub struct OutlineEngine {
    config: OutlineConfig,
    assembler: LineAssembler,
    filters: FilterChain,
    size_filter: RelativeSizeFilter,
    strategy: Box<dyn LevelStrategy>,
    title_selector: Box<dyn TitleSelector>,
}

impl OutlineEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(OutlineConfig::default())
    }

    /// Create an engine from a validated configuration.
    ///
    /// All patterns are compiled here; classification never fails afterwards.
    pub fn with_config(config: OutlineConfig) -> Result<Self> {
        config.validate()?;

        let mut filters = FilterChain::new();
        filters.push(Box::new(TextNoiseFilter::new(&config)?));

        Ok(Self {
            assembler: LineAssembler::new(config.lines.clone()),
            size_filter: RelativeSizeFilter::new(config.min_relative_size),
            strategy: create_strategy(&config)?,
            title_selector: create_title_selector(&config)?,
            filters,
            config,
        })
    }

    /// Add a caller-supplied noise filter after the built-in ones.
    pub fn with_filter(mut self, filter: Box<dyn NoiseFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Names of the active noise filters, level strategy and title selector.
    pub fn describe(&self) -> String {
        format!(
            "filters={:?} strategy={} title={}",
            self.filters.names(),
            self.strategy.name(),
            self.title_selector.name()
        )
    }

    /// Classify a document's spans.
    ///
    /// Spans may arrive in any order; they are put into reading order first,
    /// with input order breaking ties between spans at the same position.
    pub fn classify(&self, spans: &[TextSpan], metadata_title: Option<&str>) -> OutlineResult {
        let mut ordered = spans.to_vec();
        ordered.sort_by(reading_order);

        let title = self.title_selector.select(&ordered, metadata_title);
        log::debug!("title {:?} from {:?}", title.text, title.source);

        let accepted: Vec<&TextSpan> = ordered
            .iter()
            .filter(|span| !self.filters.is_noise(span))
            .collect();
        let stats = FontStatistics::collect(accepted.iter().copied());

        let candidates: Vec<Candidate<'_>> = accepted
            .iter()
            .filter(|span| !self.size_filter.is_too_small(span, &stats))
            .map(|span| Candidate::new(span, &stats))
            .collect();
        log::debug!(
            "{} spans, {} accepted, {} candidates, avg size {:.2}, sizes {:?}",
            ordered.len(),
            accepted.len(),
            candidates.len(),
            stats.avg_font_size,
            stats.ranked_sizes
        );

        let levels = self.strategy.assign(&candidates, &stats);

        let mut builder = OutlineBuilder::new(title);
        for (candidate, level) in candidates.iter().zip(levels) {
            if let Some(level) = level {
                builder.push(candidate.span, level);
            }
        }
        log::debug!("{} headings via {}", builder.len(), self.strategy.name());

        builder.build()
    }

    /// Assemble a source's glyphs into spans.
    pub fn extract_spans(&self, source: &dyn GlyphSource) -> Result<Vec<TextSpan>> {
        let pages = source.pages()?;
        Ok(self.assembler.assemble(&pages))
    }

    /// Extract and classify a whole document.
    pub fn process(&self, source: &dyn GlyphSource) -> Result<OutlineResult> {
        let spans = self.extract_spans(source)?;
        let metadata_title = source.metadata_title();
        Ok(self.classify(&spans, metadata_title.as_deref()))
    }
}
