//! Input-driven field offsets and the shared color phase.
//!
//! Scroll and parallax each hold a `(current, target)` pair. Events move the
//! target; `advance` moves current a fixed fraction of the remaining gap per
//! frame, so it approaches the target monotonically and never overshoots.

use crate::config::{ColorConfig, ParallaxConfig, ScrollConfig};
use glam::{Vec2, Vec3};

/// Exponentially smoothed scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed {
    pub current: f32,
    pub target: f32,
    factor: f32,
}

impl Smoothed {
    /// `factor` is clamped into `[0, 1]`; values outside that range would
    /// oscillate or diverge.
    pub fn new(value: f32, factor: f32) -> Self {
        Self {
            current: value,
            target: value,
            factor: factor.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.factor;
        self.current
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

/// Wheel-driven translation of the whole field along Z.
#[derive(Clone, Debug)]
pub struct ScrollDepth {
    cfg: ScrollConfig,
    state: Smoothed,
}

impl ScrollDepth {
    pub fn new(cfg: ScrollConfig) -> Self {
        let state = Smoothed::new(0.0, cfg.smoothing);
        Self { cfg, state }
    }

    /// Apply one wheel event. Positive `delta_y` (scrolling down) pulls the
    /// field toward negative Z; one full notch moves exactly one step.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        let d = delta_y.clamp(-self.cfg.wheel_clamp, self.cfg.wheel_clamp);
        let moved = self.state.target - d * (self.cfg.step / self.cfg.wheel_clamp);
        self.state.target = moved.clamp(self.cfg.bounds.min, self.cfg.bounds.max);
    }

    pub fn advance(&mut self) -> f32 {
        self.state.advance()
    }

    pub fn offset(&self) -> f32 {
        self.state.current
    }

    pub fn target(&self) -> f32 {
        self.state.target
    }
}

/// Pointer-driven tilt of the whole field.
#[derive(Clone, Debug)]
pub struct Parallax {
    cfg: ParallaxConfig,
    x: Smoothed,
    y: Smoothed,
}

impl Parallax {
    pub fn new(cfg: ParallaxConfig) -> Self {
        let x = Smoothed::new(0.0, cfg.smoothing);
        let y = Smoothed::new(0.0, cfg.smoothing);
        Self { cfg, x, y }
    }

    /// Pointer position normalized to `[-1, 1]` on both axes.
    pub fn on_pointer(&mut self, normalized: Vec2) {
        if !normalized.is_finite() {
            return;
        }
        let n = normalized.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        self.x.target = n.x;
        self.y.target = n.y;
    }

    /// Convenience for pixel coordinates inside a `size` viewport.
    pub fn on_pointer_px(&mut self, px: Vec2, size: Vec2) {
        let size = size.max(Vec2::ONE);
        self.on_pointer(px / size * 2.0 - Vec2::ONE);
    }

    pub fn advance(&mut self) -> Vec2 {
        Vec2::new(self.x.advance(), self.y.advance())
    }

    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.current, self.y.current)
    }

    /// Euler rotation (x, y, z) applied to the field group.
    pub fn rotation(&self) -> Vec3 {
        Vec3::new(-self.y.current * self.cfg.pitch, self.x.current * self.cfg.yaw, 0.0)
    }
}

/// Global color phase shared by every particle so the field cycles in
/// lockstep. Pure function of elapsed time.
#[derive(Clone, Debug)]
pub struct ColorCycle {
    cfg: ColorConfig,
}

impl ColorCycle {
    pub fn new(cfg: ColorConfig) -> Self {
        Self { cfg }
    }

    /// Interpolation factor in `[0, 1]`.
    #[inline]
    pub fn mix(&self, time: f32) -> f32 {
        ((time * self.cfg.rate).sin() + 1.0) * 0.5
    }

    #[inline]
    pub fn text_color(&self, mix: f32) -> Vec3 {
        self.cfg.text_a.lerp(self.cfg.text_b, mix)
    }
}
