// Host-side tests for SVG flattening, asset sources and the asynchronous
// glyph outline store.

mod common;

use common::*;
use field_core::assets::{flatten_svg, polyline_bounds};
use field_core::{
    AssetError, AssetSource, DirSource, GlyphOutline, GlyphOutlineStore, GlyphStatus,
    MemorySource,
};
use glam::Vec2;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn poll_until_settled(store: &mut GlyphOutlineStore, key: &str) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut ready = Vec::new();
    loop {
        ready.extend(store.poll().into_iter().map(|r| r.key));
        if !matches!(store.lookup(key), GlyphStatus::Pending) || Instant::now() > deadline {
            return ready;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn svg_paths_flatten_to_polylines() {
    let lines = flatten_svg(GLYPH_SVG.as_bytes()).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), 3);
    let (min, max) = polyline_bounds(&lines);
    assert!((min - Vec2::new(10.0, 10.0)).length() < 1e-3);
    assert!((max - Vec2::new(90.0, 90.0)).length() < 1e-3);
}

#[test]
fn curves_are_subdivided_and_closed() {
    let lines = flatten_svg(HEART_SVG.as_bytes()).unwrap();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        // two cubics at 12 steps each, plus the move and the closing point
        assert!(line.len() >= 25, "{}", line.len());
        let (first, last) = (line[0], line[line.len() - 1]);
        assert!((first - last).length() < 1e-3);
    }
}

#[test]
fn invalid_or_empty_svg_is_an_error() {
    assert!(matches!(flatten_svg(NOT_SVG.as_bytes()), Err(AssetError::Svg(_))));
    let empty = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#;
    assert!(matches!(flatten_svg(empty.as_bytes()), Err(AssetError::Empty)));
}

#[test]
fn outline_bounds_and_center() {
    let outline = glyph_outline();
    let (min, max) = outline.bounds();
    assert_eq!(min, Vec2::new(10.0, 10.0));
    assert_eq!(max, Vec2::new(90.0, 90.0));
    assert_eq!(outline.center(), Vec2::new(50.0, 50.0));
    assert!(GlyphOutline::from_polylines(vec![vec![]]).is_none());

    // degenerate artwork still has a usable size
    let dot = GlyphOutline::from_polylines(vec![vec![Vec2::ONE, Vec2::ONE]]).unwrap();
    assert_eq!(dot.size(), Vec2::ONE);
}

#[test]
fn completion_is_visible_only_after_poll() {
    let mut store = GlyphOutlineStore::new();
    assert!(matches!(store.lookup("rose"), GlyphStatus::Pending));

    store.completer().complete("rose", Ok(glyph_outline()));
    assert!(matches!(store.lookup("rose"), GlyphStatus::Pending));

    let ready = store.poll();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].key, "rose");
    assert!(store.lookup("rose").outline().is_some());
    assert_eq!(store.len(), 1);
    assert!(store.poll().is_empty());
}

#[test]
fn duplicate_completion_is_ignored() {
    let mut store = store_with("rose");
    store.completer().complete("rose", Ok(glyph_outline()));
    assert!(store.poll().is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn failure_is_permanent_and_silent_to_consumers() {
    let mut store = GlyphOutlineStore::new();
    store
        .completer()
        .complete("kneeling", Err(AssetError::NotFound("kneeling.svg".into())));
    assert!(store.poll().is_empty());
    assert!(matches!(store.lookup("kneeling"), GlyphStatus::Failed));
    assert!(store.lookup("kneeling").outline().is_none());
    assert!(store.is_empty());
}

#[test]
fn background_request_loads_from_memory_source() {
    let source: Arc<dyn AssetSource> =
        Arc::new(MemorySource::new().with("shape/rose.svg", GLYPH_SVG));
    let mut store = GlyphOutlineStore::new();
    store.request("rose", "shape/rose.svg", source);
    let ready = poll_until_settled(&mut store, "rose");
    assert_eq!(ready, vec!["rose".to_string()]);
    let outline = store.lookup("rose").outline().unwrap();
    assert_eq!(outline.segments().len(), 1);
}

#[test]
fn background_request_reports_missing_asset() {
    let source: Arc<dyn AssetSource> = Arc::new(MemorySource::new());
    let mut store = GlyphOutlineStore::new();
    store.request("heart-text", "shape/heart_t.svg", source);
    let ready = poll_until_settled(&mut store, "heart-text");
    assert!(ready.is_empty());
    assert!(matches!(store.lookup("heart-text"), GlyphStatus::Failed));
}

#[test]
fn failed_key_is_not_requested_again() {
    let empty: Arc<dyn AssetSource> = Arc::new(MemorySource::new());
    let mut store = GlyphOutlineStore::new();
    store.request("rose", "shape/rose.svg", empty);
    poll_until_settled(&mut store, "rose");
    assert!(matches!(store.lookup("rose"), GlyphStatus::Failed));

    let full: Arc<dyn AssetSource> =
        Arc::new(MemorySource::new().with("shape/rose.svg", GLYPH_SVG));
    store.request("rose", "shape/rose.svg", full);
    std::thread::sleep(Duration::from_millis(50));
    assert!(store.poll().is_empty());
    assert!(matches!(store.lookup("rose"), GlyphStatus::Failed));
    assert!(store.is_empty());
}

#[test]
fn late_success_does_not_clear_failure() {
    let mut store = GlyphOutlineStore::new();
    let completer = store.completer();
    completer.complete("kneeling", Err(AssetError::Empty));
    store.poll();
    completer.complete("kneeling", Ok(glyph_outline()));
    assert!(store.poll().is_empty());
    assert!(matches!(store.lookup("kneeling"), GlyphStatus::Failed));
}

#[test]
fn loaded_key_is_not_requested_again() {
    let mut store = store_with("rose");
    let missing: Arc<dyn AssetSource> = Arc::new(MemorySource::new());
    store.request("rose", "shape/rose.svg", missing);
    std::thread::sleep(Duration::from_millis(50));
    assert!(store.poll().is_empty());
    assert!(store.lookup("rose").outline().is_some());
}

#[test]
fn dir_source_reads_relative_to_root() {
    let root = std::env::temp_dir().join(format!("field-core-assets-{}", std::process::id()));
    std::fs::create_dir_all(root.join("shape")).unwrap();
    std::fs::write(root.join("shape/rose.svg"), GLYPH_SVG).unwrap();

    let source = DirSource::new(&root);
    let bytes = source.fetch("shape/rose.svg").unwrap();
    assert_eq!(bytes, GLYPH_SVG.as_bytes());
    assert!(matches!(source.fetch("shape/missing.svg"), Err(AssetError::NotFound(_))));

    std::fs::remove_dir_all(&root).unwrap();
}
