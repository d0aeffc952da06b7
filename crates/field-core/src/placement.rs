//! Depth banding and separation-constrained placement.

use crate::config::DepthConfig;
use glam::Vec3;
use rand::Rng;

/// Picks depths from discrete, randomly spaced layers so particles cluster
/// into visible sheets instead of a uniform cloud.
#[derive(Clone, Debug)]
pub struct DepthBands {
    cfg: DepthConfig,
}

impl DepthBands {
    pub fn new(cfg: DepthConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DepthConfig {
        &self.cfg
    }

    /// Start depth of a random band, for a freshly drawn band spacing.
    pub fn pick_depth<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let spacing = self.cfg.spacing.sample(rng).max(f32::EPSILON);
        let count = (self.cfg.z.width() / spacing).floor().max(1.0);
        let index = (rng.gen::<f32>() * count).floor().min(count - 1.0);
        self.cfg.z.min + index * spacing
    }

    /// Band depth plus the configured jitter, kept inside `[z.min, z.max]`.
    pub fn pick_jittered<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let jitter = self.cfg.jitter;
        let z = self.pick_depth(rng) + (rng.gen::<f32>() * 2.0 - 1.0) * jitter;
        z.clamp(self.cfg.z.min, self.cfg.z.max)
    }
}

/// Outcome of a placement search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Every attempt collided; `position` is the last candidate, accepted as is.
    pub exhausted: bool,
    pub attempts: usize,
}

/// Rejection sampler enforcing a minimum distance between active particles.
///
/// Linear in the number of active particles per candidate, which is fine for
/// a few hundred particles.
#[derive(Clone, Debug)]
pub struct SeparationIndex {
    min_separation: f32,
    max_attempts: usize,
    placements: u64,
    exhausted: u64,
}

impl SeparationIndex {
    pub fn new(min_separation: f32, max_attempts: usize) -> Self {
        Self {
            min_separation,
            max_attempts: max_attempts.max(1),
            placements: 0,
            exhausted: 0,
        }
    }

    pub fn min_separation(&self) -> f32 {
        self.min_separation
    }

    /// Whether `candidate` keeps the minimum distance to every entry of
    /// `active` except index `skip`.
    pub fn is_clear(&self, candidate: Vec3, active: &[Vec3], skip: Option<usize>) -> bool {
        let min_sq = self.min_separation * self.min_separation;
        active
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .all(|(_, p)| candidate.distance_squared(*p) >= min_sq)
    }

    /// Draw candidates until one is clear of `active` or the attempt budget
    /// runs out, in which case the last candidate is accepted anyway.
    pub fn find_placement<R, F>(
        &mut self,
        rng: &mut R,
        mut candidate: F,
        active: &[Vec3],
        skip: Option<usize>,
    ) -> Placement
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Vec3,
    {
        self.placements += 1;
        let mut position = candidate(rng);
        for attempt in 1..=self.max_attempts {
            if self.is_clear(position, active, skip) {
                return Placement {
                    position,
                    exhausted: false,
                    attempts: attempt,
                };
            }
            if attempt < self.max_attempts {
                position = candidate(rng);
            }
        }
        self.exhausted += 1;
        log::trace!(
            "[placement] exhausted {} attempts; accepting crowded candidate",
            self.max_attempts
        );
        Placement {
            position,
            exhausted: true,
            attempts: self.max_attempts,
        }
    }

    /// Total placement searches run.
    pub fn placements(&self) -> u64 {
        self.placements
    }

    /// Searches that fell back to a crowded candidate.
    pub fn exhausted(&self) -> u64 {
        self.exhausted
    }
}
