//! Frame orchestration: owns every subsystem and advances them in a fixed
//! order once per frame, then packs the result for the renderer.

use crate::assets::AssetSource;
use crate::compositor::{TextShaper, TextureCompositor};
use crate::config::FieldConfig;
use crate::controls::{ColorCycle, Parallax, ScrollDepth};
use crate::error::{AssetError, FieldError};
use crate::glyph::{GlyphCompleter, GlyphOutlineStore};
use crate::heart_pool::{HeartFrame, HeartParticlePool, HeartTemplate};
use crate::messages::MessageList;
use crate::scheduler::{FrameScheduler, FrameWork, SpawnBand};
use crate::starfield::Starfield;
use crate::text_pool::{ParticleId, TextFrame, TextParticlePool, TextServices};
use crate::view::{active_fraction, horizontal_spread, vertical_thresholds, ViewSample};
use glam::{EulerRot, Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Per-instance record for one visible text plane.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4], // rgb + opacity
    pub size: [f32; 2],  // plane width and height before scale
    pub slot: u32,       // ParticleId index, selects the raster
    pub _pad: u32,
}

/// Per-instance record for one heart part.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HeartInstanceData {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 3],
    pub opacity: f32,
    pub color: [f32; 3],
    pub shape: u32, // index into the template shapes
}

/// Transform applied to the whole text and heart group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransform {
    pub z_offset: f32,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
}

impl GroupTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.z_offset))
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub spawned: usize,
    pub refreshed: usize,
    pub text_recycled: usize,
    pub hearts_recycled: usize,
    pub text_total: usize,
    pub text_visible: usize,
    pub hearts: usize,
    pub pending_spawns: usize,
    pub pending_refreshes: usize,
    pub exhausted_placements: u64,
    pub spread: f32,
    pub active_fraction: f32,
}

/// Everything the renderer needs for one frame. Borrowed from the field
/// until the next call to `frame`.
pub struct FieldFrame<'a> {
    pub group: GroupTransform,
    pub text: &'a [TextInstance],
    /// Visible particles whose raster changed since the last acknowledged
    /// upload. Fetch the raster with `Field::text_pool().get(id)`.
    pub uploads: &'a [ParticleId],
    pub hearts: &'a [HeartInstanceData],
    pub star_rotation: Vec2,
    pub stats: FrameStats,
}

impl FieldFrame<'_> {
    pub fn text_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.text)
    }

    pub fn heart_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.hearts)
    }
}

pub struct Field {
    cfg: FieldConfig,
    rng: StdRng,
    messages: MessageList,
    compositor: TextureCompositor,
    glyphs: GlyphOutlineStore,
    text: TextParticlePool,
    hearts: HeartParticlePool,
    heart_tx: Sender<Result<HeartTemplate, AssetError>>,
    heart_rx: Receiver<Result<HeartTemplate, AssetError>>,
    stars: Starfield,
    scroll: ScrollDepth,
    parallax: Parallax,
    colors: ColorCycle,
    scheduler: FrameScheduler,
    text_out: Vec<TextInstance>,
    heart_out: Vec<HeartInstanceData>,
    uploads: Vec<ParticleId>,
    frames: u64,
}

impl Field {
    /// Build the field and spawn the initial batch of text particles around
    /// `view` so the first frame is already populated.
    pub fn new(
        cfg: FieldConfig,
        shaper: Box<dyn TextShaper>,
        messages: MessageList,
        seed: u64,
        view: &ViewSample,
    ) -> Result<Self, FieldError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut compositor = TextureCompositor::new(cfg.raster.clone(), shaper)?;
        let glyphs = GlyphOutlineStore::new();
        let mut text = TextParticlePool::new(cfg.text.clone(), cfg.depth.clone());
        let hearts = HeartParticlePool::new(cfg.hearts.clone(), cfg.depth.clone());
        let stars = Starfield::generate(cfg.stars.clone(), &mut rng);

        let band = SpawnBand {
            eye_y: view.eye.y,
            reach: cfg.view.y_range,
            spread: horizontal_spread(view.distance(), &cfg.view),
        };
        let initial = cfg.text.initial_batch.min(cfg.text.count);
        {
            let mut ctx = TextServices {
                rng: &mut rng,
                messages: &messages,
                compositor: &mut compositor,
                glyphs: &glyphs,
            };
            for _ in 0..initial {
                let top = band.top(&mut *ctx.rng);
                if text.spawn(top, band.spread, &mut ctx).is_none() {
                    break;
                }
            }
        }
        let scheduler = FrameScheduler::new(cfg.scheduler.clone(), cfg.text.count, text.len());
        log::info!(
            "[field] started with {}/{} text particles, {} stars",
            text.len(),
            cfg.text.count,
            stars.len()
        );

        let (heart_tx, heart_rx) = channel();
        Ok(Self {
            rng,
            messages,
            compositor,
            glyphs,
            text,
            hearts,
            heart_tx,
            heart_rx,
            stars,
            scroll: ScrollDepth::new(cfg.scroll.clone()),
            parallax: Parallax::new(cfg.parallax.clone()),
            colors: ColorCycle::new(cfg.colors.clone()),
            scheduler,
            text_out: Vec::with_capacity(cfg.text.count),
            heart_out: Vec::new(),
            uploads: Vec::new(),
            frames: 0,
            cfg,
        })
    }

    /// Load an inline glyph in the background. Particles pick it up through
    /// the refresh queue once it arrives.
    pub fn request_glyph(&self, key: &str, path: &str, source: Arc<dyn AssetSource>) {
        self.glyphs.request(key, path, source);
    }

    /// Sender for glyph results produced outside the built-in loader.
    pub fn glyph_completer(&self) -> GlyphCompleter {
        self.glyphs.completer()
    }

    /// Load the heart template in the background. On failure hearts are
    /// never shown.
    pub fn request_heart_template(&self, path: &str, source: Arc<dyn AssetSource>) {
        let tx = self.heart_tx.clone();
        let path = path.to_string();
        log::info!("[hearts] requesting template from {}", path);
        let spawned = std::thread::Builder::new()
            .name("heart-template".to_string())
            .spawn({
                let tx = tx.clone();
                move || {
                    let result = source
                        .fetch(&path)
                        .and_then(|bytes| HeartTemplate::from_svg(&bytes));
                    let _ = tx.send(result);
                }
            });
        if let Err(e) = spawned {
            let _ = tx.send(Err(AssetError::Io {
                path: "<loader thread>".to_string(),
                source: e,
            }));
        }
    }

    /// Deliver a heart template directly, bypassing the loader thread.
    pub fn complete_heart_template(&self, result: Result<HeartTemplate, AssetError>) {
        let _ = self.heart_tx.send(result);
    }

    pub fn on_wheel(&mut self, delta_y: f32) {
        self.scroll.on_wheel(delta_y);
    }

    /// Pointer position normalized to `[-1, 1]`.
    pub fn on_pointer(&mut self, normalized: Vec2) {
        self.parallax.on_pointer(normalized);
    }

    pub fn on_pointer_px(&mut self, px: Vec2, viewport: Vec2) {
        self.parallax.on_pointer_px(px, viewport);
    }

    /// Advance the whole field by one frame.
    pub fn frame(&mut self, delta: f32, time: f32, view: &ViewSample) -> FieldFrame<'_> {
        self.frames += 1;
        self.drain_loads();

        let distance = view.distance();
        let spread = horizontal_spread(distance, &self.cfg.view);
        let (top_y, bottom_y) = vertical_thresholds(view.eye.y, &self.cfg.view);
        let fraction = active_fraction(distance, &self.cfg.view);

        let mut ctx = TextServices {
            rng: &mut self.rng,
            messages: &self.messages,
            compositor: &mut self.compositor,
            glyphs: &self.glyphs,
        };
        let band = SpawnBand {
            eye_y: view.eye.y,
            reach: self.cfg.view.y_range,
            spread,
        };
        let work: FrameWork = self.scheduler.run(&mut self.text, &band, &mut ctx);

        let depth_offset = self.scroll.advance();
        self.parallax.advance();
        let group = GroupTransform {
            z_offset: depth_offset,
            rotation: self.parallax.rotation(),
        };

        let mix = self.colors.mix(time);
        let text_frame = TextFrame {
            top_y,
            bottom_y,
            spread,
            active_count: (self.text.len() as f32 * fraction).floor() as usize,
            depth_offset,
            color: self.colors.text_color(mix),
        };
        let text_recycled = self.text.advance(delta, time, &text_frame, &mut ctx);

        let heart_frame = HeartFrame {
            top_y,
            bottom_y,
            spread,
            depth_offset,
            mix,
        };
        let hearts_recycled = self.hearts.advance(delta, time, &heart_frame, &mut self.rng);
        let star_rotation = self.stars.advance(time);

        self.pack();

        let stats = FrameStats {
            spawned: work.spawned,
            refreshed: work.refreshed,
            text_recycled,
            hearts_recycled,
            text_total: self.text.len(),
            text_visible: self.text_out.len(),
            hearts: self.hearts.len(),
            pending_spawns: self.scheduler.pending_spawns(),
            pending_refreshes: self.scheduler.pending_refreshes(),
            exhausted_placements: self.text.separation().exhausted(),
            spread,
            active_fraction: fraction,
        };
        log::trace!("[field] frame {}: {:?}", self.frames, stats);

        FieldFrame {
            group,
            text: &self.text_out,
            uploads: &self.uploads,
            hearts: &self.heart_out,
            star_rotation,
            stats,
        }
    }

    fn drain_loads(&mut self) {
        let ready = self.glyphs.poll();
        if !ready.is_empty() {
            self.scheduler.on_glyph_ready(self.text.ids());
        }

        while let Ok(result) = self.heart_rx.try_recv() {
            match result {
                Ok(template) => self.hearts.populate(
                    Arc::new(template),
                    &mut self.rng,
                    self.cfg.view.x_range,
                    self.cfg.view.y_range,
                ),
                Err(e) => log::error!("[hearts] failed to load template: {}", e),
            }
        }
    }

    fn pack(&mut self) {
        self.text_out.clear();
        self.uploads.clear();
        let size = [self.cfg.text.plane_width, self.cfg.text.plane_height];
        for (id, p) in self.text.iter() {
            if !p.visible {
                continue;
            }
            self.text_out.push(TextInstance {
                position: p.position.to_array(),
                scale: p.scale,
                color: p.color.extend(p.opacity).to_array(),
                size,
                slot: id.index() as u32,
                _pad: 0,
            });
            if p.needs_upload() {
                self.uploads.push(id);
            }
        }

        self.heart_out.clear();
        for h in self.hearts.iter() {
            for part in &h.parts {
                self.heart_out.push(HeartInstanceData {
                    position: h.position.to_array(),
                    scale: h.scale,
                    rotation: h.rotation.to_array(),
                    opacity: part.opacity,
                    color: part.color.to_array(),
                    shape: part.shape as u32,
                });
            }
        }
    }

    /// Acknowledge that the renderer uploaded a particle's raster.
    pub fn mark_uploaded(&mut self, id: ParticleId) {
        self.text.mark_uploaded(id);
    }

    pub fn mark_all_uploaded(&mut self) {
        self.text.mark_all_uploaded();
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    pub fn text_pool(&self) -> &TextParticlePool {
        &self.text
    }

    pub fn hearts(&self) -> &HeartParticlePool {
        &self.hearts
    }

    pub fn starfield(&self) -> &Starfield {
        &self.stars
    }

    pub fn glyphs(&self) -> &GlyphOutlineStore {
        &self.glyphs
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn scroll(&self) -> &ScrollDepth {
        &self.scroll
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
