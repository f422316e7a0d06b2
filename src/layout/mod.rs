//! Layout analysis for outline extraction.
//!
//! - Glyph records grouped into lines by vertical position
//! - Document-wide font statistics
//! - Heading level classification strategies

pub mod font_stats;
pub mod heading_detector;
pub mod line_assembler;
pub mod text_block;

// Re-export main types
pub use font_stats::FontStatistics;
pub use heading_detector::{
    create_strategy, Candidate, HeadingLevel, HybridStrategy, LevelStrategy,
    PatternThresholdStrategy, RankStrategy,
};
pub use line_assembler::LineAssembler;
pub use text_block::{Glyph, TextSpan};
