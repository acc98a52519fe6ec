//! Progress-to-growth animation.
//!
//! [`GrowthController`] turns an external progress scalar into an eased
//! growth value in [0,1]. It is an explicit state machine advanced by the
//! host's frame clock through [`GrowthController::tick`]; there are no
//! hidden timers.
//!
//! # Invariants
//!
//! 1. `growth()` is always in [0,1].
//! 2. A retarget starts from the current growth, never from zero.
//! 3. While animating toward a fixed target the emitted values are
//!    monotonic and the final emitted value equals the target exactly.
//! 4. Once settled, `tick` returns `None` until the next retarget.

use crate::config::Config;

/// Ease-out cubic on [0,1]. Monotonic, fixed endpoints.
#[inline]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Maps a raw progress value into a growth target.
///
/// NaN and negative values map to 0; values at or above the ceiling
/// (including +∞) map to 1.
pub fn growth_target(progress: f64, ceiling: f64) -> f32 {
    if progress.is_nan() {
        return 0.0;
    }
    (progress / ceiling).clamp(0.0, 1.0) as f32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrowthPhase {
    /// No target has been set yet.
    Idle,
    /// Moving from `from` to `target`. `started_at` is latched by the first
    /// tick after the transition begins.
    Animating {
        from: f32,
        target: f32,
        started_at: Option<f64>,
    },
    /// Growth equals the last target.
    Settled,
}

#[derive(Clone, Debug)]
pub struct GrowthController {
    ceiling: f64,
    duration: f64,
    growth: f32,
    target: f32,
    phase: GrowthPhase,
}

impl GrowthController {
    pub fn new(cfg: &Config) -> Self {
        Self {
            ceiling: cfg.progress_ceiling,
            duration: cfg.animation_duration,
            growth: 0.0,
            target: 0.0,
            phase: GrowthPhase::Idle,
        }
    }

    /// Current growth in [0,1].
    pub fn growth(&self) -> f32 {
        self.growth
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn phase(&self) -> GrowthPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, GrowthPhase::Animating { .. })
    }

    /// Sets a new progress value, superseding any transition in flight.
    pub fn set_progress(&mut self, value: f64) {
        let target = growth_target(value, self.ceiling);
        if !(value >= 0.0 && value <= self.ceiling) {
            tracing::warn!(progress = value, target, "progress clamped into range");
        }

        let unchanged = match self.phase {
            GrowthPhase::Animating { target: t, .. } => t == target,
            GrowthPhase::Settled => self.growth == target,
            GrowthPhase::Idle => false,
        };
        if unchanged {
            return;
        }

        self.target = target;
        if self.growth == target {
            self.phase = GrowthPhase::Settled;
            return;
        }

        tracing::debug!(from = self.growth, target, "growth retarget");
        self.phase = GrowthPhase::Animating {
            from: self.growth,
            target,
            started_at: None,
        };
    }

    /// Jumps straight to the current target.
    pub fn snap_to_target(&mut self) {
        self.growth = self.target;
        self.phase = GrowthPhase::Settled;
    }

    /// Advances the animation to time `now` (seconds on the host clock).
    ///
    /// Returns the new growth while a transition is in flight, and `None`
    /// when there is nothing to animate.
    pub fn tick(&mut self, now: f64) -> Option<f32> {
        let GrowthPhase::Animating {
            from,
            target,
            started_at,
        } = self.phase
        else {
            return None;
        };

        let start = started_at.unwrap_or(now);
        let t = if self.duration > 0.0 {
            ((now - start) / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if t >= 1.0 {
            self.growth = target;
            self.phase = GrowthPhase::Settled;
            tracing::trace!(growth = target, "growth settled");
        } else {
            let eased = ease_out(t) as f32;
            // Rounding in the lerp must not step past either endpoint.
            self.growth = (from + (target - from) * eased).clamp(from.min(target), from.max(target));
            self.phase = GrowthPhase::Animating {
                from,
                target,
                started_at: Some(start),
            };
        }
        Some(self.growth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> GrowthController {
        GrowthController::new(&Config::default())
    }

    fn run_to_settle(c: &mut GrowthController, start: f64, dt: f64) -> Vec<f32> {
        let mut out = Vec::new();
        let mut now = start;
        while let Some(g) = c.tick(now) {
            out.push(g);
            now += dt;
            assert!(out.len() < 10_000, "never settled");
        }
        out
    }

    #[test]
    fn ease_out_is_monotonic_with_fixed_endpoints() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out(i as f64 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn growth_target_clamps_out_of_range_and_non_finite() {
        assert_eq!(growth_target(-5.0, 1000.0), 0.0);
        assert_eq!(growth_target(500.0, 1000.0), 0.5);
        assert_eq!(growth_target(5000.0, 1000.0), 1.0);
        assert_eq!(growth_target(f64::NAN, 1000.0), 0.0);
        assert_eq!(growth_target(f64::INFINITY, 1000.0), 1.0);
        assert_eq!(growth_target(f64::NEG_INFINITY, 1000.0), 0.0);
    }

    #[test]
    fn starts_idle_and_emits_nothing() {
        let mut c = controller();
        assert_eq!(c.phase(), GrowthPhase::Idle);
        assert_eq!(c.tick(0.0), None);
        assert_eq!(c.growth(), 0.0);
    }

    #[test]
    fn rising_target_is_non_decreasing_and_converges() {
        let mut c = controller();
        c.set_progress(750.0);
        let values = run_to_settle(&mut c, 10.0, 1.0 / 60.0);

        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 0.75);
        assert_eq!(c.phase(), GrowthPhase::Settled);
        assert_eq!(c.tick(100.0), None);
    }

    #[test]
    fn falling_target_is_non_increasing_and_converges() {
        let mut c = controller();
        c.set_progress(1000.0);
        c.snap_to_target();
        c.set_progress(200.0);
        let values = run_to_settle(&mut c, 0.0, 0.05);

        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(*values.last().unwrap(), 0.2);
    }

    #[test]
    fn first_tick_latches_start_time() {
        let mut c = controller();
        c.set_progress(1000.0);
        assert_eq!(c.tick(42.0), Some(0.0));
        match c.phase() {
            GrowthPhase::Animating { started_at, .. } => assert_eq!(started_at, Some(42.0)),
            other => panic!("unexpected phase {other:?}"),
        }
        assert_eq!(c.tick(43.0), Some(1.0));
    }

    #[test]
    fn retarget_mid_flight_continues_from_current_value() {
        let mut c = controller();
        c.set_progress(1000.0);
        c.tick(0.0);
        let mid = c.tick(0.3).unwrap();
        assert!(mid > 0.0 && mid < 1.0);

        c.set_progress(100.0);
        match c.phase() {
            GrowthPhase::Animating { from, target, .. } => {
                assert_eq!(from, mid);
                assert_eq!(target, 0.1);
            }
            other => panic!("unexpected phase {other:?}"),
        }
        // The first tick after retargeting emits the value we left off at.
        assert_eq!(c.tick(0.31), Some(mid));
    }

    #[test]
    fn same_target_does_not_restart_transition() {
        let mut c = controller();
        c.set_progress(500.0);
        c.tick(0.0);
        let before = c.tick(0.5).unwrap();
        c.set_progress(500.0);
        let after = c.tick(0.6).unwrap();
        assert!(after >= before);
        assert!(matches!(
            c.phase(),
            GrowthPhase::Animating {
                started_at: Some(s),
                ..
            } if s == 0.0
        ));
    }

    #[test]
    fn setting_current_value_settles_without_ticks() {
        let mut c = controller();
        c.set_progress(0.0);
        assert_eq!(c.phase(), GrowthPhase::Settled);
        assert_eq!(c.tick(1.0), None);
    }

    #[test]
    fn out_of_range_progress_never_escapes_unit_interval() {
        let mut c = controller();
        c.set_progress(1e12);
        for v in run_to_settle(&mut c, 0.0, 0.1) {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(c.growth(), 1.0);

        c.set_progress(f64::NAN);
        run_to_settle(&mut c, 5.0, 0.1);
        assert_eq!(c.growth(), 0.0);
    }

    #[test]
    fn zero_duration_settles_on_first_tick() {
        let cfg = Config {
            animation_duration: 0.0,
            ..Config::default()
        };
        let mut c = GrowthController::new(&cfg);
        c.set_progress(600.0);
        assert_eq!(c.tick(0.0), Some(0.6));
        assert_eq!(c.tick(0.0), None);
    }
}
