//! Candidate extraction: noise rejection and title selection.

pub mod noise_filter;
pub mod title;

pub use noise_filter::{FilterChain, NoiseFilter, NoiseReason, RelativeSizeFilter, TextNoiseFilter};
pub use title::{
    create_title_selector, EarlyPageTitle, ScoredTitle, TitleSelection, TitleSelector,
    TitleSource, UNTITLED,
};
