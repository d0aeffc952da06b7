use instant::Instant;

/// Wall-clock source for `(delta, elapsed)` pairs, in seconds.
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the previous tick and since construction.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        (dt.as_secs_f32(), (now - self.start).as_secs_f32())
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Seconds spent since the last tick, for pacing the next one.
    pub fn since_tick(&self) -> f32 {
        self.last.elapsed().as_secs_f32()
    }
}
