use std::time::{Duration, Instant};

/// Longest step the simulation is ever asked to take, in seconds.
pub const MAX_DT: f32 = 0.1;
pub const PHYSICS_SUBSTEPS: u32 = 4;

/// Clamp a measured frame time to `[0, MAX_DT]` so a stall (window drag,
/// breakpoint) does not tunnel the player through walls.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, MAX_DT)
}

/// Wall-clock frame timer driving the variable-step simulation.
pub struct FrameClock {
    last: Instant,
    time: f32,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            time: 0.0,
            frames: 0,
        }
    }

    /// Seconds since the previous call (capped), advancing the clock.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self.advance(now.duration_since(self.last));
        self.last = now;
        dt
    }

    /// Advance by an explicit duration; used by `tick` and by fixed-step
    /// callers such as tests.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        let dt = clamp_dt(elapsed.as_secs_f32());
        self.time += dt;
        self.frames += 1;
        dt
    }

    /// Simulated seconds so far (sum of the clamped steps).
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
