//! What the field reads from the camera each frame.

use crate::config::ViewConfig;
use glam::Vec3;

/// Camera eye and orbit target, sampled by the host once per frame. The
/// field never writes camera state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSample {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for ViewSample {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 200.0),
            target: Vec3::ZERO,
        }
    }
}

impl ViewSample {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }
}

/// Horizontal half-width of the field, widened as the camera pulls back.
#[inline]
pub fn horizontal_spread(distance: f32, cfg: &ViewConfig) -> f32 {
    let t = clamp01(distance / cfg.spread_distance_norm);
    cfg.x_range * (1.0 + t * cfg.spread_widen)
}

/// Share of the text pool drawn this frame: the closer the camera, the
/// denser the field. Clamped to `[density_min, density_max]` for any
/// distance, including zero and infinity.
#[inline]
pub fn active_fraction(distance: f32, cfg: &ViewConfig) -> f32 {
    let raw = 1.0 - distance / cfg.density_distance_norm;
    if raw.is_nan() {
        return cfg.density_min;
    }
    raw.clamp(cfg.density_min, cfg.density_max)
}

/// Recycle line above and below the camera.
#[inline]
pub fn vertical_thresholds(eye_y: f32, cfg: &ViewConfig) -> (f32, f32) {
    let reach = cfg.y_range * cfg.edge_factor;
    (eye_y + reach, eye_y - reach)
}

#[inline]
pub(crate) fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
