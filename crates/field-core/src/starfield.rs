//! Static background point cloud with a slow whole-cloud sway.

use crate::config::StarfieldConfig;
use glam::{Vec2, Vec3};
use rand::Rng;

pub struct Starfield {
    cfg: StarfieldConfig,
    positions: Vec<Vec3>,
    rotation: Vec2,
}

impl Starfield {
    pub fn generate<R: Rng + ?Sized>(cfg: StarfieldConfig, rng: &mut R) -> Self {
        let e = cfg.xy_extent;
        let positions: Vec<Vec3> = (0..cfg.count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() * 2.0 - 1.0) * e,
                    (rng.gen::<f32>() * 2.0 - 1.0) * e,
                    cfg.z.sample(rng),
                )
            })
            .collect();
        log::debug!("[stars] generated {} points", positions.len());
        Self {
            cfg,
            positions,
            rotation: Vec2::ZERO,
        }
    }

    /// Recompute the sway angles for `time`. Rotation is a pure function of
    /// time; the points themselves never move.
    pub fn advance(&mut self, time: f32) -> Vec2 {
        let [rate_x, rate_y] = self.cfg.sway_rate;
        let [angle_x, angle_y] = self.cfg.sway_angle;
        self.rotation = Vec2::new((time * rate_x).cos() * angle_x, (time * rate_y).sin() * angle_y);
        self.rotation
    }

    /// Euler rotation about (x, y).
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Point positions as raw bytes for a vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
