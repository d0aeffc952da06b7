//! Amortizes pool population and texture refreshes across frames.
//!
//! Spawning a text particle rasterizes a message, so creating the whole pool
//! in one frame would stall. The scheduler keeps a countdown of particles
//! still owed to the pool and a work list of textures to redraw, and pays off
//! at most a fixed amount of each per frame.

use crate::config::SchedulerConfig;
use crate::text_pool::{ParticleId, TextParticlePool, TextServices};
use rand::Rng;

/// Spawn window for a new particle: `top` jittered down by up to `2 * reach`
/// so freshly spawned particles fill the visible band rather than queueing at
/// its upper edge.
#[derive(Clone, Copy, Debug)]
pub struct SpawnBand {
    pub eye_y: f32,
    pub reach: f32,
    pub spread: f32,
}

impl SpawnBand {
    #[inline]
    pub fn top<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.eye_y + self.reach - rng.gen::<f32>() * self.reach * 2.0
    }
}

/// What one call to [`FrameScheduler::run`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameWork {
    pub spawned: usize,
    pub refreshed: usize,
}

pub struct FrameScheduler {
    cfg: SchedulerConfig,
    pending_spawns: usize,
    refresh: Vec<ParticleId>,
}

impl FrameScheduler {
    /// `total` is the pool capacity; `already_spawned` is subtracted so an
    /// eager initial batch is not spawned twice.
    pub fn new(cfg: SchedulerConfig, total: usize, already_spawned: usize) -> Self {
        Self {
            cfg,
            pending_spawns: total.saturating_sub(already_spawned),
            refresh: Vec::new(),
        }
    }

    /// Replace the refresh work list with every current particle. Called once
    /// per glyph that becomes available; a second glyph arriving while a
    /// refresh is in flight restarts it over all particles.
    pub fn on_glyph_ready<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ParticleId>,
    {
        self.refresh.clear();
        self.refresh.extend(ids);
        log::debug!("[scheduler] queued {} texture refreshes", self.refresh.len());
    }

    pub fn pending_spawns(&self) -> usize {
        self.pending_spawns
    }

    pub fn pending_refreshes(&self) -> usize {
        self.refresh.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_spawns == 0 && self.refresh.is_empty()
    }

    /// Spawn up to `spawn_per_frame` particles, then redraw up to
    /// `refresh_per_frame` queued textures (most recently queued first).
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        pool: &mut TextParticlePool,
        band: &SpawnBand,
        ctx: &mut TextServices<'_, R>,
    ) -> FrameWork {
        let mut work = FrameWork::default();

        let spawns = self.cfg.spawn_per_frame.min(self.pending_spawns);
        for _ in 0..spawns {
            let top = band.top(&mut *ctx.rng);
            if pool.spawn(top, band.spread, ctx).is_some() {
                work.spawned += 1;
            }
        }
        self.pending_spawns -= spawns;
        if spawns > 0 && self.pending_spawns == 0 {
            log::info!("[scheduler] text pool fully populated ({})", pool.len());
        }

        let refreshes = self.cfg.refresh_per_frame.min(self.refresh.len());
        for _ in 0..refreshes {
            if let Some(id) = self.refresh.pop() {
                if pool.refresh(id, ctx.compositor, ctx.glyphs) {
                    work.refreshed += 1;
                }
            }
        }
        work
    }
}
