//! Fixed-capacity pool of floating text planes.
//!
//! Slots are allocated once (at spawn) and then reused forever: when a plane
//! falls past the bottom threshold it is recycled in place with a new
//! position, message, raster and motion.

use crate::compositor::TextureCompositor;
use crate::config::{DepthConfig, TextConfig};
use crate::glyph::GlyphOutlineStore;
use crate::messages::MessageList;
use crate::placement::{DepthBands, Placement, SeparationIndex};
use crate::view::clamp01;
use glam::Vec3;
use rand::Rng;
use tiny_skia::Pixmap;

/// Stable handle to a pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u32);

impl ParticleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a particle is in its life cycle, as of the last pool call that
/// touched it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticlePhase {
    /// Placed by `spawn`, not yet advanced.
    Spawning,
    /// Moved by the most recent `advance`.
    Falling,
    /// Reset in place and not advanced since.
    Recycling,
}

/// Shared services a recycle needs. Borrowed for the duration of one call.
pub struct TextServices<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub messages: &'a MessageList,
    pub compositor: &'a mut TextureCompositor,
    pub glyphs: &'a GlyphOutlineStore,
}

/// Per-frame inputs shared by every text particle.
#[derive(Clone, Copy, Debug)]
pub struct TextFrame {
    pub top_y: f32,
    pub bottom_y: f32,
    pub spread: f32,
    pub active_count: usize,
    pub depth_offset: f32,
    pub color: Vec3,
}

pub struct TextParticle {
    pub position: Vec3,
    pub speed: f32,
    pub drift_bias: f32,
    pub drift_phase: f32,
    pub base_scale: f32,
    /// Base scale times the depth multiplier, updated each frame.
    pub scale: f32,
    pub opacity: f32,
    pub color: Vec3,
    pub visible: bool,
    phase: ParticlePhase,
    text: String,
    font_size: f32,
    raster: Pixmap,
    revision: u64,
    uploaded: u64,
    crowded: bool,
}

impl TextParticle {
    fn blank(raster: Pixmap) -> Self {
        Self {
            position: Vec3::ZERO,
            speed: 0.0,
            drift_bias: 0.0,
            drift_phase: 0.0,
            base_scale: 1.0,
            scale: 1.0,
            opacity: 0.0,
            color: Vec3::ONE,
            visible: false,
            phase: ParticlePhase::Spawning,
            text: String::new(),
            font_size: 0.0,
            raster,
            revision: 0,
            uploaded: 0,
            crowded: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn raster(&self) -> &Pixmap {
        &self.raster
    }

    pub fn phase(&self) -> ParticlePhase {
        self.phase
    }

    /// Raster changed since the renderer last uploaded it.
    pub fn needs_upload(&self) -> bool {
        self.revision != self.uploaded
    }

    /// Incremented on every re-render.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The last placement fell back after exhausting its attempts.
    pub fn was_crowded(&self) -> bool {
        self.crowded
    }

    fn rerender(&mut self, compositor: &mut TextureCompositor, glyphs: &GlyphOutlineStore) {
        self.font_size = compositor.render(&self.text, &mut self.raster, glyphs);
        self.revision += 1;
    }
}

pub struct TextParticlePool {
    cfg: TextConfig,
    bands: DepthBands,
    separation: SeparationIndex,
    particles: Vec<TextParticle>,
    capacity: usize,
    scratch: Vec<Vec3>,
    recycles: u64,
}

impl TextParticlePool {
    pub fn new(cfg: TextConfig, depth: DepthConfig) -> Self {
        let capacity = cfg.count;
        let separation = SeparationIndex::new(cfg.min_separation, cfg.placement_attempts);
        Self {
            cfg,
            bands: DepthBands::new(depth),
            separation,
            particles: Vec::with_capacity(capacity),
            capacity,
            scratch: Vec::with_capacity(capacity),
            recycles: 0,
        }
    }

    pub fn config(&self) -> &TextConfig {
        &self.cfg
    }

    pub fn bands(&self) -> &DepthBands {
        &self.bands
    }

    pub fn separation(&self) -> &SeparationIndex {
        &self.separation
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.capacity
    }

    pub fn recycles(&self) -> u64 {
        self.recycles
    }

    pub fn get(&self, id: ParticleId) -> Option<&TextParticle> {
        self.particles.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &TextParticle)> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| (ParticleId(i as u32), p))
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticleId> {
        (0..self.particles.len() as u32).map(ParticleId)
    }

    /// Fill the next free slot and give it its first placement. Returns
    /// `None` once the pool is at capacity.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        top_y: f32,
        spread: f32,
        ctx: &mut TextServices<'_, R>,
    ) -> Option<ParticleId> {
        if self.is_full() {
            return None;
        }
        let raster = match ctx.compositor.new_buffer() {
            Ok(r) => r,
            Err(e) => {
                log::error!("[text] cannot allocate raster: {}", e);
                return None;
            }
        };
        let id = ParticleId(self.particles.len() as u32);
        self.particles.push(TextParticle::blank(raster));
        self.place(id.index(), top_y, spread, ctx);
        Some(id)
    }

    /// Reset a particle in place: new position, message, raster, motion and
    /// base scale.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        id: ParticleId,
        top_y: f32,
        spread: f32,
        ctx: &mut TextServices<'_, R>,
    ) -> Option<Placement> {
        if id.index() >= self.particles.len() {
            return None;
        }
        self.recycles += 1;
        let placement = self.place(id.index(), top_y, spread, ctx);
        self.particles[id.index()].phase = ParticlePhase::Recycling;
        Some(placement)
    }

    /// Re-render a particle's current message, e.g. after a glyph loaded.
    pub fn refresh(
        &mut self,
        id: ParticleId,
        compositor: &mut TextureCompositor,
        glyphs: &GlyphOutlineStore,
    ) -> bool {
        match self.particles.get_mut(id.index()) {
            Some(p) if !p.text.is_empty() => {
                p.rerender(compositor, glyphs);
                true
            }
            _ => false,
        }
    }

    pub fn mark_uploaded(&mut self, id: ParticleId) {
        if let Some(p) = self.particles.get_mut(id.index()) {
            p.uploaded = p.revision;
        }
    }

    pub fn mark_all_uploaded(&mut self) {
        for p in &mut self.particles {
            p.uploaded = p.revision;
        }
    }

    fn place<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        top_y: f32,
        spread: f32,
        ctx: &mut TextServices<'_, R>,
    ) -> Placement {
        self.scratch.clear();
        self.scratch.extend(self.particles.iter().map(|p| p.position));

        let spread = spread.max(0.0);
        let y_jitter = self.cfg.spawn_y_jitter;
        let bands = &self.bands;
        let placement = self.separation.find_placement(
            &mut *ctx.rng,
            |rng| {
                let x = (rng.gen::<f32>() * 2.0 - 1.0) * spread;
                let y = top_y + rng.gen::<f32>() * y_jitter;
                Vec3::new(x, y, bands.pick_jittered(rng))
            },
            &self.scratch,
            Some(index),
        );

        let cfg = &self.cfg;
        let p = &mut self.particles[index];
        p.position = placement.position;
        p.crowded = placement.exhausted;

        p.text.clear();
        p.text.push_str(ctx.messages.pick(&mut *ctx.rng));
        p.rerender(ctx.compositor, ctx.glyphs);

        let rng = &mut *ctx.rng;
        p.speed = cfg.speed.sample(rng);
        p.drift_bias = cfg.drift_bias.sample(rng);
        p.drift_phase = rng.gen::<f32>() * std::f32::consts::TAU;
        p.base_scale = if rng.gen::<f32>() < cfg.foreground_probability {
            cfg.foreground_scale.sample(rng)
        } else {
            cfg.background_scale.sample(rng)
        };
        p.scale = p.base_scale;
        placement
    }

    /// Move, recycle and restyle the leading `frame.active_count` particles;
    /// hide the rest. Returns how many particles were recycled.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        time: f32,
        frame: &TextFrame,
        ctx: &mut TextServices<'_, R>,
    ) -> usize {
        let mut recycled = 0;
        let active = frame.active_count.min(self.particles.len());
        for i in active..self.particles.len() {
            self.particles[i].visible = false;
        }
        for i in 0..active {
            {
                let cfg = &self.cfg;
                let p = &mut self.particles[i];
                p.visible = true;
                p.phase = ParticlePhase::Falling;
                let sway = (time * cfg.drift_rate + p.drift_phase).sin() * cfg.drift_amplitude;
                p.position.x += (p.drift_bias + sway) * delta * cfg.drift_gain;
                p.position.x = p.position.x.clamp(-frame.spread, frame.spread);
                p.position.y -= p.speed * delta * cfg.fall_gain;
            }
            if self.particles[i].position.y < frame.bottom_y {
                let lift = self.cfg.recycle_lift.sample(&mut *ctx.rng);
                self.recycles += 1;
                self.place(i, frame.top_y + lift, frame.spread, ctx);
                self.particles[i].phase = ParticlePhase::Recycling;
                recycled += 1;
            }
            style(&self.cfg, &mut self.particles[i], frame);
        }
        recycled
    }
}

fn style(cfg: &TextConfig, p: &mut TextParticle, frame: &TextFrame) {
    let depth = (p.position.z + frame.depth_offset).abs();
    let f = clamp01(depth / cfg.depth_norm);
    p.scale = p.base_scale * lerp(cfg.near_scale, cfg.far_scale, f);
    let fade = clamp01((p.position.y - frame.bottom_y) / cfg.bottom_fade);
    p.opacity = lerp(cfg.far_opacity, cfg.near_opacity, 1.0 - f) * fade;
    p.color = frame.color;
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
