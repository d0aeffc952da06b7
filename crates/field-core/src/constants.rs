// Shared tuning constants for the falling text field.
//
// `FieldConfig::default()` is assembled from these (desktop profile); the
// `MOBILE_*` values feed `FieldConfig::mobile()`.

// Population
pub const TEXT_COUNT: usize = 280;
pub const MOBILE_TEXT_COUNT: usize = 220;
pub const HEART_COUNT: usize = 48;
pub const MOBILE_HEART_COUNT: usize = 36;
pub const INITIAL_TEXT_BATCH: usize = 60; // spawned synchronously before the first frame

// Field extents (world units)
pub const X_RANGE: f32 = 1080.0;
pub const MOBILE_X_RANGE: f32 = 900.0;
pub const Y_RANGE: f32 = 170.0;
pub const MOBILE_Y_RANGE: f32 = 155.0;
pub const EDGE_FACTOR: f32 = 1.6; // top/bottom thresholds as multiples of Y_RANGE

// Depth bands
pub const Z_MIN: f32 = -360.0;
pub const Z_MAX: f32 = 360.0;
pub const Z_LAYER_SPACING_MIN: f32 = 36.0;
pub const Z_LAYER_SPACING_MAX: f32 = 55.0;
pub const Z_JITTER: f32 = 1.2;

// Separation
pub const MIN_TEXT_SEPARATION: f32 = 58.0;
pub const PLACEMENT_ATTEMPTS: usize = 12;

// Spread widening as the camera pulls back
pub const SPREAD_DISTANCE_NORM: f32 = 1200.0;
pub const SPREAD_WIDEN: f32 = 0.9;

// Active fraction
pub const DENSITY_DISTANCE_NORM: f32 = 5000.0;
pub const DENSITY_MIN: f32 = 0.2;
pub const DENSITY_MAX: f32 = 1.0;

// Text motion
pub const TEXT_SPEED_MIN: f32 = 3.5;
pub const TEXT_SPEED_MAX: f32 = 9.0;
pub const TEXT_DRIFT_BIAS: f32 = 0.4; // symmetric bias range
pub const TEXT_DRIFT_AMPLITUDE: f32 = 0.4;
pub const TEXT_DRIFT_RATE: f32 = 0.6;
pub const TEXT_DRIFT_GAIN: f32 = 6.0;
pub const TEXT_FALL_GAIN: f32 = 10.0;
pub const SPAWN_Y_JITTER: f32 = 40.0;
pub const RECYCLE_LIFT_MIN: f32 = 120.0;
pub const RECYCLE_LIFT_MAX: f32 = 320.0;

// Text scale hierarchy
pub const FOREGROUND_PROBABILITY: f32 = 0.1;
pub const FOREGROUND_SCALE_MIN: f32 = 2.6;
pub const FOREGROUND_SCALE_MAX: f32 = 3.8;
pub const BACKGROUND_SCALE_MIN: f32 = 0.85;
pub const BACKGROUND_SCALE_MAX: f32 = 1.6;

// Depth styling
pub const TEXT_DEPTH_NORM: f32 = 20000.0;
pub const NEAR_SCALE: f32 = 1.2;
pub const FAR_SCALE: f32 = 0.55;
pub const FAR_OPACITY: f32 = 0.5;
pub const NEAR_OPACITY: f32 = 1.0;
pub const BOTTOM_FADE_DISTANCE: f32 = 120.0;

// Hearts
pub const HEART_SPEED_MIN: f32 = 3.5;
pub const HEART_SPEED_MAX: f32 = 7.0;
pub const HEART_DRIFT_BIAS: f32 = 0.2;
pub const HEART_DRIFT_AMPLITUDE: f32 = 0.25;
pub const HEART_DRIFT_RATE: f32 = 0.5;
pub const HEART_DRIFT_GAIN: f32 = 4.0;
pub const HEART_FALL_GAIN: f32 = 9.0;
pub const HEART_SPIN_MIN: f32 = 0.1;
pub const HEART_SPIN_MAX: f32 = 0.35;
pub const HEART_SPIN_GAIN: f32 = 0.8;
pub const HEART_SCALE_MIN: f32 = 0.7;
pub const HEART_SCALE_MAX: f32 = 1.4;
pub const HEART_SPREAD_FACTOR: f32 = 0.9; // hearts stay inside 90% of the spread
pub const HEART_DEPTH_NORM: f32 = 12000.0;
pub const HEART_FAR_OPACITY: f32 = 0.6;

// Heart extrusion (consumed by the renderer)
pub const HEART_EXTRUDE_DEPTH: f32 = 3.2;
pub const HEART_BEVEL_THICKNESS: f32 = 2.2;
pub const HEART_BEVEL_SIZE: f32 = 2.0;
pub const HEART_BEVEL_SEGMENTS: u32 = 12;
pub const HEART_CURVE_SEGMENTS: u32 = 48;

// Starfield
pub const STAR_COUNT: usize = 2800;
pub const MOBILE_STAR_COUNT: usize = 2000;
pub const STAR_XY_EXTENT: f32 = 2400.0;
pub const STAR_Z_MIN: f32 = -24000.0;
pub const STAR_Z_MAX: f32 = 2000.0;
pub const STAR_SIZE: f32 = 1.2;
pub const STAR_OPACITY: f32 = 0.85;
pub const STAR_SWAY_RATE_Y: f32 = 0.05;
pub const STAR_SWAY_RATE_X: f32 = 0.04;
pub const STAR_SWAY_ANGLE_Y: f32 = 0.08;
pub const STAR_SWAY_ANGLE_X: f32 = 0.05;

// Scroll through depth
pub const SCROLL_Z_STEP: f32 = 80.0;
pub const SCROLL_Z_MIN: f32 = -600.0;
pub const SCROLL_Z_MAX: f32 = 600.0;
pub const WHEEL_DELTA_CLAMP: f32 = 240.0; // one wheel notch on most platforms
pub const SCROLL_SMOOTHING: f32 = 0.08;

// Pointer parallax
pub const PARALLAX_SMOOTHING: f32 = 0.04;
pub const PARALLAX_YAW: f32 = 0.08;
pub const PARALLAX_PITCH: f32 = 0.06;

// Color cycle
pub const COLOR_CYCLE_RATE: f32 = 0.6;
pub const TEXT_COLOR_A: [f32; 3] = [1.0, 0.624, 0.820]; // bright pink
pub const TEXT_COLOR_B: [f32; 3] = [0.624, 0.847, 1.0]; // bright blue
pub const HEART_COLOR: [f32; 3] = [1.0, 0.231, 0.310]; // warm red
pub const STAR_COLOR: [f32; 3] = [0.902, 0.949, 1.0];

// Frame scheduling
pub const TEXT_SPAWN_PER_FRAME: usize = 24;
pub const MOBILE_TEXT_SPAWN_PER_FRAME: usize = 18;
pub const GLYPH_REFRESH_PER_FRAME: usize = 18;
pub const MOBILE_GLYPH_REFRESH_PER_FRAME: usize = 14;

// Text raster
pub const RASTER_WIDTH: u32 = 1024;
pub const RASTER_HEIGHT: u32 = 256;
pub const FONT_SIZE_MAX: f32 = 118.0;
pub const MOBILE_FONT_SIZE_MAX: f32 = 104.0;
pub const FONT_SIZE_MIN: f32 = 32.0;
pub const FONT_SIZE_STEP: f32 = 2.0;
pub const RASTER_WIDTH_MARGIN: f32 = 0.9; // fraction of the raster width text may occupy
pub const GLYPH_SIZE_RATIO: f32 = 0.95;
pub const GLYPH_PADDING_RATIO: f32 = 0.18;
pub const PLANE_WIDTH: f32 = 210.0;
pub const PLANE_HEIGHT: f32 = 60.0;
pub const MOBILE_PLANE_WIDTH: f32 = 195.0;
pub const MOBILE_PLANE_HEIGHT: f32 = 56.0;

// Glyph flattening
pub const CURVE_FLATTEN_STEPS: usize = 12; // line segments per quadratic/cubic segment
