use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache};
use glam::Vec2;
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

/// Text measuring and filling primitive used by the compositor.
///
/// `fill_text` draws `text` centered horizontally on `center.x` and
/// vertically on `center.y` (middle baseline).
pub trait TextShaper {
    fn measure(&mut self, text: &str, font_size: f32) -> f32;
    fn fill_text(
        &mut self,
        target: &mut Pixmap,
        text: &str,
        center: Vec2,
        font_size: f32,
        color: Color,
    );
}

/// `cosmic-text` backed shaper using the system serif face.
pub struct CosmicShaper {
    fonts: FontSystem,
    cache: SwashCache,
    buffer: Buffer,
    family: Family<'static>,
}

impl Default for CosmicShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicShaper {
    pub fn new() -> Self {
        Self::with_fonts(FontSystem::new())
    }

    pub fn with_fonts(mut fonts: FontSystem) -> Self {
        let buffer = Buffer::new(&mut fonts, Metrics::new(32.0, 38.4));
        Self {
            fonts,
            cache: SwashCache::new(),
            buffer,
            family: Family::Serif,
        }
    }

    fn shape(&mut self, text: &str, font_size: f32) {
        self.buffer
            .set_metrics(&mut self.fonts, Metrics::new(font_size, font_size * 1.2));
        self.buffer.set_text(
            &mut self.fonts,
            text,
            Attrs::new().family(self.family),
            Shaping::Advanced,
        );
        self.buffer.shape_until_scroll(&mut self.fonts, false);
    }

    fn line_width(&self) -> f32 {
        self.buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max)
    }
}

impl TextShaper for CosmicShaper {
    fn measure(&mut self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.shape(text, font_size);
        self.line_width()
    }

    fn fill_text(
        &mut self,
        target: &mut Pixmap,
        text: &str,
        center: Vec2,
        font_size: f32,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }
        self.shape(text, font_size);
        let width = self.line_width();
        let origin_x = (center.x - width * 0.5).round() as i32;
        let origin_y = (center.y - font_size * 0.6).round() as i32;
        let rgba = color.to_color_u8();
        let ink = cosmic_text::Color::rgba(rgba.red(), rgba.green(), rgba.blue(), rgba.alpha());
        let (tw, th) = (target.width() as i32, target.height() as i32);
        let pixels = target.pixels_mut();
        self.buffer
            .draw(&mut self.fonts, &mut self.cache, ink, |x, y, w, h, c| {
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        let px = origin_x + x + dx;
                        let py = origin_y + y + dy;
                        if px < 0 || py < 0 || px >= tw || py >= th {
                            continue;
                        }
                        let idx = (py * tw + px) as usize;
                        pixels[idx] = blend_over(pixels[idx], c.r(), c.g(), c.b(), c.a());
                    }
                }
            });
    }
}

/// Source-over blend of a straight-alpha color onto a premultiplied pixel.
#[inline]
pub(crate) fn blend_over(
    dst: PremultipliedColorU8,
    r: u8,
    g: u8,
    b: u8,
    a: u8,
) -> PremultipliedColorU8 {
    if a == 0 {
        return dst;
    }
    let sa = a as u32;
    let inv = 255 - sa;
    let mix =
        |s: u8, d: u8| -> u8 { ((s as u32 * sa + d as u32 * inv + 127) / 255).min(255) as u8 };
    let out_a = ((sa * 255 + dst.alpha() as u32 * inv + 127) / 255).min(255) as u8;
    let out_r = mix(r, dst.red()).min(out_a);
    let out_g = mix(g, dst.green()).min(out_a);
    let out_b = mix(b, dst.blue()).min(out_a);
    PremultipliedColorU8::from_rgba(out_r, out_g, out_b, out_a).unwrap_or(dst)
}
