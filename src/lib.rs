// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Outline
//!
//! Heading outline extraction from decoded document glyphs.
//!
//! ## Core Features
//!
//! - **Line Assembly**: glyph records grouped into lines by quantized vertical position
//! - **Noise Filtering**: page numbers, dates, links, running prose and garbled text rejected
//! - **Title Selection**: metadata title, then early-page heuristics, then a sentinel
//! - **Level Classification**: 3 pluggable strategies (Hybrid, Pattern/Threshold, Rank)
//! - **Batch Processing**: a directory of glyph dumps to JSON outlines, in parallel
//!
//! ## Quick Start
//!
//! ```
//! use pdf_outline::{OutlineEngine, TextSpan};
//!
//! # fn main() -> pdf_outline::Result<()> {
//! let spans = vec![
//!     TextSpan::new("Chapter 1", 1, 18.0, true, 72.0)?,
//!     TextSpan::new("This is a long sentence about the chapter.", 1, 11.0, false, 100.0)?,
//!     TextSpan::new("1.1 Overview", 1, 14.0, false, 130.0)?,
//! ];
//!
//! let engine = OutlineEngine::new()?;
//! let result = engine.classify(&spans, None);
//!
//! assert_eq!(result.title, "Chapter 1");
//! assert_eq!(result.outline.len(), 1);
//! assert_eq!(result.outline[0].text, "1.1 Overview");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Glyph sources
pub mod document;

// Line assembly, statistics and level classification
pub mod layout;

// Noise filtering and title selection
pub mod extractors;

// Outline model
pub mod outline;

// Classification pipeline
pub mod pipeline;

// Directory batch processing
pub mod batch;

// Re-exports
pub use batch::{BatchRunner, BatchSummary};
pub use config::{LevelStrategyKind, LineConfig, OutlineConfig, TitleStrategyKind};
pub use document::{GlyphDocument, GlyphSource};
pub use error::{Error, Result};
pub use layout::{Glyph, HeadingLevel, TextSpan};
pub use outline::{HeadingEntry, OutlineResult};
pub use pipeline::OutlineEngine;

/// Utility functions for safe operations
pub mod utils {
    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as greater than all other values, so they
    /// sort last and sorting never panics.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::cmp::Ordering;
    /// # use pdf_outline::utils::safe_float_cmp;
    /// assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
    /// assert_eq!(safe_float_cmp(f32::NAN, 1.0), Ordering::Greater);
    /// ```
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
