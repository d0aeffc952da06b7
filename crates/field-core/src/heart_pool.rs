//! Extruded hearts falling through the field.
//!
//! One template shape is loaded from SVG; every instance is a clone that
//! shares the template and owns only its motion and per-part color. Hearts
//! tolerate overlap, so recycling skips the separation search.

use crate::assets::{flatten_svg, polyline_bounds, Polyline};
use crate::config::{DepthConfig, HeartConfig};
use crate::constants::{
    HEART_BEVEL_SEGMENTS, HEART_BEVEL_SIZE, HEART_BEVEL_THICKNESS, HEART_CURVE_SEGMENTS,
    HEART_EXTRUDE_DEPTH,
};
use crate::error::AssetError;
use crate::placement::DepthBands;
use crate::text_pool::lerp;
use crate::view::clamp01;
use glam::{Vec2, Vec3};
use rand::Rng;
use smallvec::SmallVec;
use std::sync::Arc;

/// Extrusion parameters the renderer applies to each template contour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
    pub curve_segments: u32,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: HEART_EXTRUDE_DEPTH,
            bevel_thickness: HEART_BEVEL_THICKNESS,
            bevel_size: HEART_BEVEL_SIZE,
            bevel_segments: HEART_BEVEL_SEGMENTS,
            curve_segments: HEART_CURVE_SEGMENTS,
        }
    }
}

/// A closed contour centered on its own bounding box.
#[derive(Clone, Debug)]
pub struct HeartShape {
    pub contour: Polyline,
}

#[derive(Clone, Debug)]
pub struct HeartTemplate {
    pub shapes: Vec<HeartShape>,
    pub extrude: ExtrudeSettings,
}

impl HeartTemplate {
    pub fn from_svg(data: &[u8]) -> Result<Self, AssetError> {
        Self::from_contours(flatten_svg(data)?)
    }

    pub fn from_contours(contours: Vec<Polyline>) -> Result<Self, AssetError> {
        let shapes: Vec<HeartShape> = contours
            .into_iter()
            .filter(|c| c.len() >= 3)
            .map(|contour| {
                let (min, max) = polyline_bounds(std::slice::from_ref(&contour));
                let center: Vec2 = (min + max) * 0.5;
                HeartShape {
                    contour: contour.into_iter().map(|p| p - center).collect(),
                }
            })
            .collect();
        if shapes.is_empty() {
            return Err(AssetError::Empty);
        }
        Ok(Self {
            shapes,
            extrude: ExtrudeSettings::default(),
        })
    }
}

/// Independently colorable piece of a heart instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartPart {
    /// Index into `HeartTemplate::shapes`.
    pub shape: usize,
    pub color: Vec3,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct HeartInstance {
    pub position: Vec3,
    /// Euler angles (x, y, z); only `y` changes after creation.
    pub rotation: Vec3,
    pub scale: f32,
    pub speed: f32,
    pub drift_bias: f32,
    pub drift_phase: f32,
    pub spin_speed: f32,
    pub parts: SmallVec<[HeartPart; 2]>,
}

/// Per-frame inputs shared by every heart.
#[derive(Clone, Copy, Debug)]
pub struct HeartFrame {
    pub top_y: f32,
    pub bottom_y: f32,
    pub spread: f32,
    pub depth_offset: f32,
    pub mix: f32,
}

pub struct HeartParticlePool {
    cfg: HeartConfig,
    bands: DepthBands,
    template: Option<Arc<HeartTemplate>>,
    hearts: Vec<HeartInstance>,
    recycles: u64,
}

impl HeartParticlePool {
    pub fn new(cfg: HeartConfig, depth: DepthConfig) -> Self {
        Self {
            bands: DepthBands::new(depth),
            hearts: Vec::with_capacity(cfg.count),
            cfg,
            template: None,
            recycles: 0,
        }
    }

    pub fn template(&self) -> Option<&Arc<HeartTemplate>> {
        self.template.as_ref()
    }

    pub fn len(&self) -> usize {
        self.hearts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hearts.is_empty()
    }

    pub fn recycles(&self) -> u64 {
        self.recycles
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeartInstance> {
        self.hearts.iter()
    }

    /// Clone the template `count` times at random positions around the
    /// camera. Only the first template is used; later calls are ignored.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        template: Arc<HeartTemplate>,
        rng: &mut R,
        x_range: f32,
        y_range: f32,
    ) {
        if self.template.is_some() {
            log::warn!("[hearts] template already loaded; ignoring");
            return;
        }
        let cfg = &self.cfg;
        let x_half = x_range * cfg.spread_factor;
        for _ in 0..cfg.count {
            let position = Vec3::new(
                (rng.gen::<f32>() * 2.0 - 1.0) * x_half,
                (rng.gen::<f32>() * 2.0 - 1.0) * y_range,
                self.bands.pick_jittered(rng),
            );
            let parts = (0..template.shapes.len())
                .map(|shape| HeartPart {
                    shape,
                    color: cfg.color_a,
                    opacity: 1.0,
                })
                .collect();
            self.hearts.push(HeartInstance {
                position,
                rotation: Vec3::new(0.0, 0.0, std::f32::consts::PI),
                scale: cfg.scale.sample(rng),
                speed: cfg.speed.sample(rng),
                drift_bias: cfg.drift_bias.sample(rng),
                drift_phase: rng.gen::<f32>() * std::f32::consts::TAU,
                spin_speed: cfg.spin.sample(rng),
                parts,
            });
        }
        log::info!(
            "[hearts] populated {} hearts ({} parts each)",
            self.hearts.len(),
            template.shapes.len()
        );
        self.template = Some(template);
    }

    /// Drift, fall, spin, recycle and recolor every heart. Returns how many
    /// were recycled.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta: f32,
        time: f32,
        frame: &HeartFrame,
        rng: &mut R,
    ) -> usize {
        let cfg = &self.cfg;
        let color = cfg.color_a.lerp(cfg.color_b, frame.mix);
        let mut recycled = 0;
        for h in &mut self.hearts {
            let sway = (time * cfg.drift_rate + h.drift_phase).sin() * cfg.drift_amplitude;
            h.position.x += (h.drift_bias + sway) * delta * cfg.drift_gain;
            h.position.x = h.position.x.clamp(-frame.spread, frame.spread);
            h.position.y -= h.speed * delta * cfg.fall_gain;
            h.rotation.y += h.spin_speed * delta * cfg.spin_gain;

            if h.position.y < frame.bottom_y {
                let x_half = frame.spread * cfg.spread_factor;
                h.position.y = frame.top_y + cfg.recycle_lift.sample(rng);
                h.position.x = (rng.gen::<f32>() * 2.0 - 1.0) * x_half;
                h.position.z = self.bands.pick_jittered(rng);
                recycled += 1;
            }

            let depth = (h.position.z + frame.depth_offset).abs();
            let f = clamp01(depth / cfg.depth_norm);
            let fade = clamp01((h.position.y - frame.bottom_y) / cfg.bottom_fade);
            let opacity = lerp(cfg.far_opacity, 1.0, 1.0 - f) * fade;
            for part in &mut h.parts {
                part.color = color;
                part.opacity = opacity;
            }
        }
        self.recycles += recycled as u64;
        recycled
    }
}
