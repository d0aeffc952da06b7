//! Message rasterization with inline vector glyphs.
//!
//! A message such as `"stay with me :kneel: here"` is split into text and
//! glyph tokens, fitted to the raster width, laid out on one centered line,
//! and drawn three times: a warm blurred glow, a cool blurred rim, and a
//! crisp white pass on top. Glyph tokens always reserve the same square
//! footprint, so a glyph arriving later never moves the text around it.

pub mod blur;
pub mod shaper;

pub use shaper::{CosmicShaper, TextShaper};

use crate::config::RasterConfig;
use crate::error::FieldError;
use crate::glyph::{GlyphOutline, GlyphOutlineStore};
use glam::{Affine2, Vec2};
use smallvec::SmallVec;
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Marker text mapped to a glyph key.
#[derive(Clone, Debug)]
pub struct GlyphToken {
    pub marker: String,
    pub key: String,
    /// Mirror the artwork horizontally on top of the base orientation.
    pub sideways: bool,
}

impl GlyphToken {
    pub fn new(marker: &str, key: &str) -> Self {
        Self {
            marker: marker.to_string(),
            key: key.to_string(),
            sideways: false,
        }
    }

    pub fn sideways(mut self) -> Self {
        self.sideways = true;
        self
    }
}

/// The inline markers recognised by default.
pub fn default_tokens() -> Vec<GlyphToken> {
    vec![
        GlyphToken::new(":rose:", "rose"),
        GlyphToken::new(":kneel:", "kneeling").sideways(),
        GlyphToken::new(":heart:", "heart-text"),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    /// Index into the compositor's token table.
    Glyph(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartKind<'a> {
    Text(&'a str),
    Glyph { token: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPart<'a> {
    pub kind: PartKind<'a>,
    pub left: f32,
    pub width: f32,
}

impl LayoutPart<'_> {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left + self.width * 0.5
    }
}

/// One centered line of text and glyph footprints.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<'a> {
    pub font_size: f32,
    pub glyph_size: f32,
    pub center: Vec2,
    pub total_width: f32,
    pub parts: SmallVec<[LayoutPart<'a>; 8]>,
}

struct PassStyle {
    shadow: Option<(Color, f32)>, // color, blur
    fill: Color,
    stroke: Color,
    min_line_width: f32,
    line_width_ratio: f32,
}

impl PassStyle {
    fn line_width(&self, font_size: f32) -> f32 {
        self.min_line_width.max(font_size * self.line_width_ratio)
    }
}

fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    Color::from_rgba8(r, g, b, (a * 255.0).round() as u8)
}

/// Warm glow, cool rim, crisp. Order matters: the crisp pass must end on top.
fn passes() -> [PassStyle; 3] {
    [
        PassStyle {
            shadow: Some((rgba(255, 150, 205, 1.0), 30.0)),
            fill: rgba(255, 240, 250, 0.7),
            stroke: rgba(255, 245, 252, 1.0),
            min_line_width: 1.5,
            line_width_ratio: 0.06,
        },
        PassStyle {
            shadow: Some((rgba(170, 225, 255, 1.0), 34.0)),
            fill: rgba(200, 235, 255, 0.22),
            stroke: rgba(200, 235, 255, 0.4),
            min_line_width: 1.2,
            line_width_ratio: 0.05,
        },
        PassStyle {
            shadow: None,
            fill: rgba(255, 255, 255, 1.0),
            stroke: rgba(255, 255, 255, 1.0),
            min_line_width: 2.8,
            line_width_ratio: 0.095,
        },
    ]
}

pub struct TextureCompositor {
    shaper: Box<dyn TextShaper>,
    raster: RasterConfig,
    tokens: Vec<GlyphToken>,
    shadow: Pixmap,
    blur_scratch: Vec<u8>,
}

impl TextureCompositor {
    pub fn new(raster: RasterConfig, shaper: Box<dyn TextShaper>) -> Result<Self, FieldError> {
        let shadow = Pixmap::new(raster.width, raster.height).ok_or(FieldError::RasterSize {
            width: raster.width,
            height: raster.height,
        })?;
        Ok(Self {
            shaper,
            raster,
            tokens: default_tokens(),
            shadow,
            blur_scratch: Vec::new(),
        })
    }

    pub fn with_tokens(mut self, tokens: Vec<GlyphToken>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn tokens(&self) -> &[GlyphToken] {
        &self.tokens
    }

    pub fn raster(&self) -> &RasterConfig {
        &self.raster
    }

    /// Allocate a blank raster of the configured size.
    pub fn new_buffer(&self) -> Result<Pixmap, FieldError> {
        Pixmap::new(self.raster.width, self.raster.height).ok_or(FieldError::RasterSize {
            width: self.raster.width,
            height: self.raster.height,
        })
    }

    /// Split `text` on inline markers. Unknown `:word:` sequences stay text.
    pub fn tokenize<'a>(&self, text: &'a str) -> SmallVec<[Token<'a>; 8]> {
        let mut out = SmallVec::new();
        let mut rest = text;
        loop {
            let next = self
                .tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| !t.marker.is_empty())
                .filter_map(|(i, t)| rest.find(t.marker.as_str()).map(|at| (at, i)))
                .min_by_key(|&(at, i)| (at, i));
            match next {
                Some((at, i)) => {
                    if at > 0 {
                        out.push(Token::Text(&rest[..at]));
                    }
                    out.push(Token::Glyph(i));
                    rest = &rest[at + self.tokens[i].marker.len()..];
                }
                None => {
                    if !rest.is_empty() {
                        out.push(Token::Text(rest));
                    }
                    break;
                }
            }
        }
        out
    }

    fn glyph_footprint(&self, font_size: f32) -> f32 {
        font_size * (self.raster.glyph_size_ratio + self.raster.glyph_padding_ratio)
    }

    fn line_width(&mut self, tokens: &[Token<'_>], font_size: f32) -> f32 {
        let footprint = self.glyph_footprint(font_size);
        tokens
            .iter()
            .map(|t| match t {
                Token::Text(s) => self.shaper.measure(s, font_size),
                Token::Glyph(_) => footprint,
            })
            .sum()
    }

    /// Largest font size, stepping down from the maximum, whose line fits the
    /// width margin. Stops at the floor even if the line still overflows.
    pub fn fit_font_size(&mut self, tokens: &[Token<'_>], raster_width: u32) -> f32 {
        let max_width = raster_width as f32 * self.raster.width_margin;
        let step = self.raster.font_step.max(0.5);
        let mut font_size = self.raster.font_max;
        while font_size > self.raster.font_min && self.line_width(tokens, font_size) > max_width {
            font_size = (font_size - step).max(self.raster.font_min);
        }
        font_size
    }

    /// Fit and lay out `text` for a raster of `size` pixels.
    pub fn layout<'a>(&mut self, text: &'a str, size: (u32, u32)) -> Layout<'a> {
        let tokens = self.tokenize(text);
        let font_size = self.fit_font_size(&tokens, size.0);
        let footprint = self.glyph_footprint(font_size);
        let mut parts: SmallVec<[LayoutPart<'a>; 8]> = SmallVec::new();
        let mut total_width = 0.0;
        for t in &tokens {
            let (kind, width) = match *t {
                Token::Text(s) => (PartKind::Text(s), self.shaper.measure(s, font_size)),
                Token::Glyph(token) => (PartKind::Glyph { token }, footprint),
            };
            parts.push(LayoutPart {
                kind,
                left: total_width,
                width,
            });
            total_width += width;
        }
        let center = Vec2::new(size.0 as f32 * 0.5, size.1 as f32 * 0.5);
        let start = center.x - total_width * 0.5;
        for p in &mut parts {
            p.left += start;
        }
        Layout {
            font_size,
            glyph_size: font_size * self.raster.glyph_size_ratio,
            center,
            total_width,
            parts,
        }
    }

    /// Render `text` into `target`, replacing its contents. Returns the
    /// fitted font size. Glyphs that are not loaded leave their footprint
    /// blank.
    pub fn render(&mut self, text: &str, target: &mut Pixmap, glyphs: &GlyphOutlineStore) -> f32 {
        let layout = self.layout(text, (target.width(), target.height()));
        target.fill(Color::TRANSPARENT);
        if self.shadow.width() != target.width() || self.shadow.height() != target.height() {
            if let Some(p) = Pixmap::new(target.width(), target.height()) {
                self.shadow = p;
            }
        }

        for pass in passes() {
            let line_width = pass.line_width(layout.font_size);
            if let Some((shadow_color, blur)) = pass.shadow {
                let shadow = &mut self.shadow;
                shadow.fill(Color::TRANSPARENT);
                draw_layout(
                    self.shaper.as_mut(),
                    &self.tokens,
                    shadow,
                    &layout,
                    glyphs,
                    with_alpha(shadow_color, pass.fill.alpha()),
                    with_alpha(shadow_color, pass.stroke.alpha()),
                    line_width,
                );
                let (w, h) = (shadow.width() as usize, shadow.height() as usize);
                blur::gaussian_approx(shadow.data_mut(), w, h, blur * 0.5, &mut self.blur_scratch);
                target.draw_pixmap(
                    0,
                    0,
                    shadow.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
            draw_layout(
                self.shaper.as_mut(),
                &self.tokens,
                target,
                &layout,
                glyphs,
                pass.fill,
                pass.stroke,
                line_width,
            );
        }
        layout.font_size
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_layout(
    shaper: &mut dyn TextShaper,
    tokens: &[GlyphToken],
    target: &mut Pixmap,
    layout: &Layout<'_>,
    glyphs: &GlyphOutlineStore,
    fill: Color,
    stroke: Color,
    line_width: f32,
) {
    for part in &layout.parts {
        let center = Vec2::new(part.center_x(), layout.center.y);
        match part.kind {
            PartKind::Text(s) => shaper.fill_text(target, s, center, layout.font_size, fill),
            PartKind::Glyph { token } => {
                let Some(t) = tokens.get(token) else {
                    continue;
                };
                if let Some(outline) = glyphs.lookup(&t.key).outline() {
                    stamp_outline(
                        target,
                        outline,
                        center,
                        layout.glyph_size,
                        t.sideways,
                        stroke,
                        line_width,
                    );
                }
            }
        }
    }
}

#[inline]
fn with_alpha(mut c: Color, alpha: f32) -> Color {
    c.set_alpha(alpha);
    c
}

/// Outline space to raster space: uniform fit of the larger dimension,
/// vertical flip plus a half turn for the base orientation, and an optional
/// sideways mirror applied before both.
pub fn glyph_transform(outline: &GlyphOutline, center: Vec2, size: f32, sideways: bool) -> Affine2 {
    let scale = size / outline.size().max_element();
    let mut m = Affine2::from_translation(center)
        * Affine2::from_scale(Vec2::new(scale, -scale))
        * Affine2::from_angle(std::f32::consts::PI);
    if sideways {
        m = m * Affine2::from_scale(Vec2::new(-1.0, 1.0));
    }
    m * Affine2::from_translation(-outline.center())
}

fn stamp_outline(
    target: &mut Pixmap,
    outline: &GlyphOutline,
    center: Vec2,
    size: f32,
    sideways: bool,
    color: Color,
    line_width: f32,
) {
    let m = glyph_transform(outline, center, size, sideways);
    let mut pb = PathBuilder::new();
    for seg in outline.segments() {
        let mut points = seg.iter().map(|p| m.transform_point2(*p));
        let Some(first) = points.next() else {
            continue;
        };
        pb.move_to(first.x, first.y);
        for p in points {
            pb.line_to(p.x, p.y);
        }
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: line_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}
