//! Finite-difference pointer velocity estimation.

#[cfg(test)]
#[path = "velocity_test.rs"]
mod velocity_test;

use frames::Point;

/// A pointer position stamped with a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub at: Point,
    pub ts_ms: f64,
}

/// Rolling velocity estimate from the two most recent accepted samples.
///
/// Velocity is in canvas units per second. Until two samples have been
/// accepted it is zero.
#[derive(Debug, Clone, Default)]
pub struct VelocitySampler {
    last: Option<Sample>,
    velocity: Point,
}

impl VelocitySampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all samples and zero the estimate.
    pub fn reset(&mut self) {
        self.last = None;
        self.velocity = Point::default();
    }

    /// Feed a sample. Returns `false` if it was discarded.
    ///
    /// Samples whose timestamp does not advance past the previous one are
    /// dropped whole: neither the estimate nor the baseline changes.
    pub fn push(&mut self, at: Point, ts_ms: f64) -> bool {
        let Some(prev) = self.last else {
            self.last = Some(Sample { at, ts_ms });
            return true;
        };
        let dt_ms = ts_ms - prev.ts_ms;
        if dt_ms <= 0.0 || !dt_ms.is_finite() {
            return false;
        }
        self.velocity = (at - prev.at) * (1000.0 / dt_ms);
        self.last = Some(Sample { at, ts_ms });
        true
    }

    #[must_use]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    #[must_use]
    pub fn last_sample(&self) -> Option<Sample> {
        self.last
    }
}
