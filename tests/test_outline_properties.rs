//! Property-based tests for outline invariants.
//!
//! Spans are drawn from a pool of realistic heading and body lines so that
//! every rule of the engine gets exercised.

use pdf_outline::{OutlineEngine, OutlineResult, TextSpan};
use proptest::prelude::*;
use std::collections::HashSet;

const TEXTS: &[&str] = &[
    "Introduction",
    "INTRODUCTION",
    "Overview",
    "1.1 Scope",
    "2. Methods",
    "Chapter 3",
    "Results",
    "Appendix A",
    "Summary of Findings",
    "12",
    "Page 4",
    "The results were mixed.",
    "see the attached table",
    "Annual Report",
];

const SIZES: &[f32] = &[9.0, 11.0, 12.0, 14.0, 16.0, 18.0, 24.0];

fn arb_span() -> impl Strategy<Value = TextSpan> {
    (
        prop::sample::select(TEXTS),
        1u32..5,
        prop::sample::select(SIZES),
        any::<bool>(),
        0.0f32..800.0,
    )
        .prop_map(|(text, page, size, bold, y)| TextSpan::new(text, page, size, bold, y).unwrap())
}

fn arb_spans() -> impl Strategy<Value = Vec<TextSpan>> {
    prop::collection::vec(arb_span(), 0..40)
}

fn sorted(spans: &[TextSpan]) -> Vec<TextSpan> {
    let mut ordered = spans.to_vec();
    ordered.sort_by(pdf_outline::pipeline::reading_order);
    ordered
}

fn classify(spans: &[TextSpan]) -> OutlineResult {
    OutlineEngine::new().unwrap().classify(spans, None)
}

/// Property: identical input yields identical output, run after run
#[test]
fn proptest_deterministic() {
    let engine = OutlineEngine::new().unwrap();
    proptest!(|(spans in arb_spans())| {
        let first = engine.classify(&spans, None);
        let second = engine.classify(&spans, None);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    });
}

/// Property: the title never shows up in the outline
#[test]
fn proptest_title_excluded() {
    proptest!(|(spans in arb_spans())| {
        let result = classify(&spans);
        if result.title != "Untitled Document" {
            let title = result.title.trim().to_lowercase();
            prop_assert!(result.outline.iter().all(|h| h.text.trim().to_lowercase() != title));
        }
    });
}

/// Property: no two entries share (lower-cased text, page)
#[test]
fn proptest_no_duplicate_keys() {
    proptest!(|(spans in arb_spans())| {
        let result = classify(&spans);
        let mut seen = HashSet::new();
        for heading in &result.outline {
            prop_assert!(seen.insert((heading.text.to_lowercase(), heading.page)));
        }
    });
}

/// Property: entries follow reading order of their source lines
#[test]
fn proptest_reading_order() {
    proptest!(|(spans in arb_spans())| {
        let result = classify(&spans);
        let ordered = sorted(&spans);

        // The outline must be a subsequence of the ordered lines.
        let mut next = 0;
        for heading in &result.outline {
            let found = ordered[next..].iter().position(|s| {
                s.page() == heading.page && s.text() == heading.text
            });
            prop_assert!(found.is_some(), "{:?} out of order", heading);
            next += found.unwrap() + 1;
        }

        let pages: Vec<u32> = result.outline.iter().map(|h| h.page).collect();
        let mut sorted_pages = pages.clone();
        sorted_pages.sort();
        prop_assert_eq!(pages, sorted_pages);
    });
}

/// Property: page numbers never become headings
#[test]
fn proptest_page_furniture_dropped() {
    proptest!(|(spans in arb_spans())| {
        let result = classify(&spans);
        prop_assert!(result.outline.iter().all(|h| h.text != "12" && h.text != "Page 4"));
    });
}

/// Property: heading levels stay within the configured range
#[test]
fn proptest_levels_in_range() {
    proptest!(|(spans in arb_spans())| {
        let result = classify(&spans);
        prop_assert!(result.outline.iter().all(|h| h.level.hierarchy_level() < 3));
    });
}

#[test]
fn test_empty_input_is_untitled() {
    let result = classify(&[]);
    assert_eq!(result.title, "Untitled Document");
    assert!(result.outline.is_empty());
}
