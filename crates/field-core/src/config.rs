//! Tuning parameters for the field, grouped per component.
//!
//! `FieldConfig::default()` is the desktop profile; `FieldConfig::mobile()`
//! trims population, extents and per-frame work for smaller devices. Every
//! value originates in [`crate::constants`].

use crate::constants::*;
use glam::Vec3;
use rand::Rng;

/// Closed sampling interval used for every "random in range" draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric interval `[-half, half]`.
    pub const fn symmetric(half: f32) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.gen::<f32>() * (self.max - self.min)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }
}

/// Discrete depth layering.
#[derive(Clone, Debug)]
pub struct DepthConfig {
    pub z: Span,
    pub spacing: Span,
    pub jitter: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            z: Span::new(Z_MIN, Z_MAX),
            spacing: Span::new(Z_LAYER_SPACING_MIN, Z_LAYER_SPACING_MAX),
            jitter: Z_JITTER,
        }
    }
}

/// Camera-derived spread and culling parameters.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub x_range: f32,
    pub y_range: f32,
    pub edge_factor: f32,
    pub spread_distance_norm: f32,
    pub spread_widen: f32,
    pub density_distance_norm: f32,
    pub density_min: f32,
    pub density_max: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            x_range: X_RANGE,
            y_range: Y_RANGE,
            edge_factor: EDGE_FACTOR,
            spread_distance_norm: SPREAD_DISTANCE_NORM,
            spread_widen: SPREAD_WIDEN,
            density_distance_norm: DENSITY_DISTANCE_NORM,
            density_min: DENSITY_MIN,
            density_max: DENSITY_MAX,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TextConfig {
    pub count: usize,
    pub initial_batch: usize,
    pub min_separation: f32,
    pub placement_attempts: usize,
    pub speed: Span,
    pub drift_bias: Span,
    pub drift_amplitude: f32,
    pub drift_rate: f32,
    pub drift_gain: f32,
    pub fall_gain: f32,
    pub spawn_y_jitter: f32,
    pub recycle_lift: Span,
    /// Chance that a recycled phrase becomes a large foreground phrase.
    pub foreground_probability: f32,
    pub foreground_scale: Span,
    pub background_scale: Span,
    pub depth_norm: f32,
    pub near_scale: f32,
    pub far_scale: f32,
    pub near_opacity: f32,
    pub far_opacity: f32,
    /// Height of the band above the bottom threshold over which opacity
    /// falls to zero.
    pub bottom_fade: f32,
    /// World-space quad size at base scale 1, handed to the renderer.
    pub plane_width: f32,
    pub plane_height: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            count: TEXT_COUNT,
            initial_batch: INITIAL_TEXT_BATCH,
            min_separation: MIN_TEXT_SEPARATION,
            placement_attempts: PLACEMENT_ATTEMPTS,
            speed: Span::new(TEXT_SPEED_MIN, TEXT_SPEED_MAX),
            drift_bias: Span::symmetric(TEXT_DRIFT_BIAS),
            drift_amplitude: TEXT_DRIFT_AMPLITUDE,
            drift_rate: TEXT_DRIFT_RATE,
            drift_gain: TEXT_DRIFT_GAIN,
            fall_gain: TEXT_FALL_GAIN,
            spawn_y_jitter: SPAWN_Y_JITTER,
            recycle_lift: Span::new(RECYCLE_LIFT_MIN, RECYCLE_LIFT_MAX),
            foreground_probability: FOREGROUND_PROBABILITY,
            foreground_scale: Span::new(FOREGROUND_SCALE_MIN, FOREGROUND_SCALE_MAX),
            background_scale: Span::new(BACKGROUND_SCALE_MIN, BACKGROUND_SCALE_MAX),
            depth_norm: TEXT_DEPTH_NORM,
            near_scale: NEAR_SCALE,
            far_scale: FAR_SCALE,
            near_opacity: NEAR_OPACITY,
            far_opacity: FAR_OPACITY,
            bottom_fade: BOTTOM_FADE_DISTANCE,
            plane_width: PLANE_WIDTH,
            plane_height: PLANE_HEIGHT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeartConfig {
    pub count: usize,
    pub speed: Span,
    pub drift_bias: Span,
    pub drift_amplitude: f32,
    pub drift_rate: f32,
    pub drift_gain: f32,
    pub fall_gain: f32,
    pub spin: Span,
    pub spin_gain: f32,
    pub scale: Span,
    pub spread_factor: f32,
    pub recycle_lift: Span,
    pub depth_norm: f32,
    pub far_opacity: f32,
    pub bottom_fade: f32,
    pub color_a: Vec3,
    pub color_b: Vec3,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            count: HEART_COUNT,
            speed: Span::new(HEART_SPEED_MIN, HEART_SPEED_MAX),
            drift_bias: Span::symmetric(HEART_DRIFT_BIAS),
            drift_amplitude: HEART_DRIFT_AMPLITUDE,
            drift_rate: HEART_DRIFT_RATE,
            drift_gain: HEART_DRIFT_GAIN,
            fall_gain: HEART_FALL_GAIN,
            spin: Span::new(HEART_SPIN_MIN, HEART_SPIN_MAX),
            spin_gain: HEART_SPIN_GAIN,
            scale: Span::new(HEART_SCALE_MIN, HEART_SCALE_MAX),
            spread_factor: HEART_SPREAD_FACTOR,
            recycle_lift: Span::new(RECYCLE_LIFT_MIN, RECYCLE_LIFT_MAX),
            depth_norm: HEART_DEPTH_NORM,
            far_opacity: HEART_FAR_OPACITY,
            bottom_fade: BOTTOM_FADE_DISTANCE,
            color_a: Vec3::from(HEART_COLOR),
            color_b: Vec3::from(HEART_COLOR),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StarfieldConfig {
    pub count: usize,
    pub xy_extent: f32,
    pub z: Span,
    pub size: f32,
    pub opacity: f32,
    pub color: Vec3,
    pub sway_rate: [f32; 2],  // (x, y) angular rates
    pub sway_angle: [f32; 2], // (x, y) peak angles in radians
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            xy_extent: STAR_XY_EXTENT,
            z: Span::new(STAR_Z_MIN, STAR_Z_MAX),
            size: STAR_SIZE,
            opacity: STAR_OPACITY,
            color: Vec3::from(STAR_COLOR),
            sway_rate: [STAR_SWAY_RATE_X, STAR_SWAY_RATE_Y],
            sway_angle: [STAR_SWAY_ANGLE_X, STAR_SWAY_ANGLE_Y],
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScrollConfig {
    pub step: f32,
    pub bounds: Span,
    pub wheel_clamp: f32,
    pub smoothing: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step: SCROLL_Z_STEP,
            bounds: Span::new(SCROLL_Z_MIN, SCROLL_Z_MAX),
            wheel_clamp: WHEEL_DELTA_CLAMP,
            smoothing: SCROLL_SMOOTHING,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParallaxConfig {
    pub smoothing: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            smoothing: PARALLAX_SMOOTHING,
            yaw: PARALLAX_YAW,
            pitch: PARALLAX_PITCH,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColorConfig {
    pub rate: f32,
    pub text_a: Vec3,
    pub text_b: Vec3,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            rate: COLOR_CYCLE_RATE,
            text_a: Vec3::from(TEXT_COLOR_A),
            text_b: Vec3::from(TEXT_COLOR_B),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub spawn_per_frame: usize,
    pub refresh_per_frame: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            spawn_per_frame: TEXT_SPAWN_PER_FRAME,
            refresh_per_frame: GLYPH_REFRESH_PER_FRAME,
        }
    }
}

/// Raster geometry and font fitting for text textures.
#[derive(Clone, Debug)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    pub font_max: f32,
    pub font_min: f32,
    pub font_step: f32,
    pub width_margin: f32,
    pub glyph_size_ratio: f32,
    pub glyph_padding_ratio: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: RASTER_WIDTH,
            height: RASTER_HEIGHT,
            font_max: FONT_SIZE_MAX,
            font_min: FONT_SIZE_MIN,
            font_step: FONT_SIZE_STEP,
            width_margin: RASTER_WIDTH_MARGIN,
            glyph_size_ratio: GLYPH_SIZE_RATIO,
            glyph_padding_ratio: GLYPH_PADDING_RATIO,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FieldConfig {
    pub view: ViewConfig,
    pub depth: DepthConfig,
    pub text: TextConfig,
    pub hearts: HeartConfig,
    pub stars: StarfieldConfig,
    pub scroll: ScrollConfig,
    pub parallax: ParallaxConfig,
    pub colors: ColorConfig,
    pub scheduler: SchedulerConfig,
    pub raster: RasterConfig,
}

impl FieldConfig {
    /// Smaller population and lighter per-frame budget for handheld devices.
    pub fn mobile() -> Self {
        let mut cfg = Self::default();
        cfg.view.x_range = MOBILE_X_RANGE;
        cfg.view.y_range = MOBILE_Y_RANGE;
        cfg.text.count = MOBILE_TEXT_COUNT;
        cfg.text.plane_width = MOBILE_PLANE_WIDTH;
        cfg.text.plane_height = MOBILE_PLANE_HEIGHT;
        cfg.hearts.count = MOBILE_HEART_COUNT;
        cfg.stars.count = MOBILE_STAR_COUNT;
        cfg.scheduler.spawn_per_frame = MOBILE_TEXT_SPAWN_PER_FRAME;
        cfg.scheduler.refresh_per_frame = MOBILE_GLYPH_REFRESH_PER_FRAME;
        cfg.raster.font_max = MOBILE_FONT_SIZE_MAX;
        cfg
    }
}
