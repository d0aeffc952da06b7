// Shared fixtures for the host-side tests: a deterministic block shaper,
// tiny SVG assets and small-raster configs that keep rendering cheap.

#![allow(dead_code)]

use field_core::{
    FieldConfig, GlyphOutline, GlyphOutlineStore, MessageList, RasterConfig, TextShaper,
    TextureCompositor,
};
use glam::Vec2;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

/// Every character advances `0.6 * font_size`; non-whitespace characters
/// are drawn as solid boxes inside their cell.
pub struct BlockShaper;

pub const ADVANCE: f32 = 0.6;

impl TextShaper for BlockShaper {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * ADVANCE
    }

    fn fill_text(
        &mut self,
        target: &mut Pixmap,
        text: &str,
        center: Vec2,
        font_size: f32,
        color: Color,
    ) {
        let advance = font_size * ADVANCE;
        let left = center.x - self.measure(text, font_size) * 0.5;
        let mut paint = Paint::default();
        paint.set_color(color);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x = left + i as f32 * advance + advance * 0.1;
            let y = center.y - font_size * 0.35;
            if let Some(rect) = Rect::from_xywh(x, y, advance * 0.8, font_size * 0.7) {
                target.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }
}

/// Open triangle-ish stroke, 100 units square.
pub const GLYPH_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <path d="M 10 90 L 50 10 L 90 90" fill="none" stroke="black" stroke-width="4"/>
</svg>"#;

/// Two filled lobes, each its own contour.
pub const HEART_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="100" viewBox="0 0 120 100">
  <path d="M 60 95 C 20 70 0 45 10 25 C 20 5 50 5 60 30 Z" fill="red"/>
  <path d="M 60 30 C 70 5 100 5 110 25 C 120 45 100 70 60 95 Z" fill="red"/>
</svg>"#;

pub const NOT_SVG: &str = "this is not markup";

pub fn glyph_outline() -> GlyphOutline {
    GlyphOutline::from_polylines(vec![vec![
        Vec2::new(10.0, 90.0),
        Vec2::new(50.0, 10.0),
        Vec2::new(90.0, 90.0),
    ]])
    .unwrap()
}

/// Raster small enough that hundreds of renders stay fast in debug builds.
pub fn small_raster() -> RasterConfig {
    RasterConfig {
        width: 128,
        height: 32,
        font_max: 24.0,
        font_min: 8.0,
        font_step: 2.0,
        ..RasterConfig::default()
    }
}

pub fn small_config() -> FieldConfig {
    let mut cfg = FieldConfig::default();
    cfg.raster = small_raster();
    cfg.stars.count = 64;
    cfg
}

pub fn compositor(raster: RasterConfig) -> TextureCompositor {
    TextureCompositor::new(raster, Box::new(BlockShaper)).unwrap()
}

pub fn messages() -> MessageList {
    MessageList::new(["hello", "falling :heart: slowly", ":rose: here", "kneel :kneel:"]).unwrap()
}

/// Store with `key` already loaded.
pub fn store_with(key: &str) -> GlyphOutlineStore {
    let mut store = GlyphOutlineStore::new();
    store.completer().complete(key, Ok(glyph_outline()));
    let ready = store.poll();
    assert_eq!(ready.len(), 1);
    store
}

/// Alpha channel of column `x` summed over all rows.
pub fn column_alpha(p: &Pixmap, x: u32) -> u32 {
    (0..p.height())
        .map(|y| p.pixel(x, y).map(|c| c.alpha() as u32).unwrap_or(0))
        .sum()
}
