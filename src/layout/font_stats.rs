//! Document-wide font statistics.

use crate::layout::text_block::TextSpan;
use crate::utils::safe_float_cmp;

/// Size assumed for a document without any candidate lines.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Font size statistics over the lines that survived text filtering.
///
/// Computed once per document; prose and page furniture are excluded before
/// collection so they cannot drag the baseline down.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStatistics {
    /// Arithmetic mean font size
    pub avg_font_size: f32,
    /// Distinct font sizes, largest first
    pub ranked_sizes: Vec<f32>,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            avg_font_size: DEFAULT_FONT_SIZE,
            ranked_sizes: Vec::new(),
        }
    }
}

impl FontStatistics {
    /// Collect statistics from a set of spans.
    pub fn collect<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let sizes: Vec<f32> = spans.into_iter().map(TextSpan::font_size).collect();
        if sizes.is_empty() {
            return Self::default();
        }

        let avg_font_size = sizes.iter().sum::<f32>() / sizes.len() as f32;

        let mut ranked_sizes = sizes;
        ranked_sizes.sort_by(|a, b| safe_float_cmp(*b, *a));
        ranked_sizes.dedup();

        Self {
            avg_font_size,
            ranked_sizes,
        }
    }

    /// Font size relative to the document average.
    pub fn relative_size(&self, font_size: f32) -> f32 {
        font_size / self.avg_font_size
    }
}
