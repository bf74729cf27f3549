//! Minimal animation description.

use core::fmt;
use core::time::Duration;

/// Callback receiving the animation progress in `0.0..=1.0`.
pub type TickFn = Box<dyn Fn(f32) + Send + Sync>;

/// A duration and the callback that applies each step.
pub struct Animation {
    duration: Duration,
    tick: TickFn,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl Animation {
    /// Creates an animation running for `duration`.
    #[must_use]
    pub fn new(duration: Duration, tick: impl Fn(f32) + Send + Sync + 'static) -> Self {
        Self {
            duration,
            tick: Box::new(tick),
        }
    }

    /// Total running time.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Applies the state at `progress`, clamped to `0.0..=1.0`.
    pub fn tick(&self, progress: f32) {
        (self.tick)(progress.clamp(0.0, 1.0));
    }
}
