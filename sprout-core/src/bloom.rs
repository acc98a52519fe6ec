//! Leaf bloom tweening.
//!
//! Leaves come out of [`crate::reveal`] at their final radius. A
//! [`BloomTracker`] sits between reveal and composition in a live plant and
//! eases each leaf's displayed radius toward that value, so new leaves
//! swell in from nothing and resized leaves glide to their new size.

use std::collections::HashMap;

use crate::{growth::ease_out, reveal::Reveal};

#[derive(Clone, Copy, Debug)]
struct Bloom {
    from: f32,
    to: f32,
    started_at: f64,
    shown: f32,
    frame: u64,
}

#[derive(Debug, Default)]
pub struct BloomTracker {
    duration: f64,
    blooms: HashMap<String, Bloom>,
    frame: u64,
}

impl BloomTracker {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            blooms: HashMap::new(),
            frame: 0,
        }
    }

    fn eased(&self, bloom: &Bloom, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return bloom.to;
        }
        let t = ((now - bloom.started_at) / self.duration).clamp(0.0, 1.0);
        if t >= 1.0 {
            // Exact, so a finished tween compares equal to its target.
            return bloom.to;
        }
        bloom.from + (bloom.to - bloom.from) * ease_out(t) as f32
    }

    /// Rewrites every leaf radius in `reveal` with its displayed value at
    /// `now`. Leaves missing from `reveal` are forgotten, so they bloom
    /// from zero if they come back.
    ///
    /// Returns `true` while any leaf is still tweening.
    pub fn apply(&mut self, now: f64, reveal: &mut Reveal) -> bool {
        self.frame = self.frame.wrapping_add(1);
        let frame = self.frame;
        let mut in_flight = false;

        for leaf in reveal
            .leaves_behind
            .iter_mut()
            .chain(reveal.leaves_front.iter_mut())
        {
            let mut bloom = match self.blooms.get(&leaf.key) {
                Some(b) => *b,
                None => Bloom {
                    from: 0.0,
                    to: leaf.radius,
                    started_at: now,
                    shown: 0.0,
                    frame,
                },
            };

            if bloom.to != leaf.radius {
                bloom.from = bloom.shown;
                bloom.to = leaf.radius;
                bloom.started_at = now;
            }
            bloom.shown = self.eased(&bloom, now);
            bloom.frame = frame;
            in_flight |= bloom.shown != bloom.to;

            leaf.radius = bloom.shown;
            self.blooms.insert(leaf.key.clone(), bloom);
        }

        self.blooms.retain(|_, b| b.frame == frame);
        in_flight
    }

    pub fn tracked(&self) -> usize {
        self.blooms.len()
    }

    pub fn clear(&mut self) {
        self.blooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        reveal::Leaf,
        types::Layer,
    };
    use glam::Vec2;

    fn reveal_with_radius(radius: f32) -> Reveal {
        Reveal {
            growth: 1.0,
            segments: Vec::new(),
            leaves_behind: vec![Leaf {
                key: "0-0-central".into(),
                branch: 1,
                ring: 0,
                center: Vec2::ZERO,
                radius,
                color: Color::rgb(0, 128, 0),
                layer: Layer::Behind,
            }],
            leaves_front: Vec::new(),
        }
    }

    #[test]
    fn new_leaf_swells_from_zero() {
        let mut tracker = BloomTracker::new(0.5);

        let mut r = reveal_with_radius(10.0);
        assert!(tracker.apply(0.0, &mut r));
        assert_eq!(r.leaves_behind[0].radius, 0.0);

        let mut r = reveal_with_radius(10.0);
        assert!(tracker.apply(0.25, &mut r));
        let mid = r.leaves_behind[0].radius;
        assert!(mid > 5.0 && mid < 10.0, "ease-out passes halfway early: {mid}");

        let mut r = reveal_with_radius(10.0);
        assert!(!tracker.apply(0.5, &mut r));
        assert_eq!(r.leaves_behind[0].radius, 10.0);
    }

    #[test]
    fn retarget_continues_from_displayed_radius() {
        let mut tracker = BloomTracker::new(1.0);
        tracker.apply(0.0, &mut reveal_with_radius(10.0));
        let mut r = reveal_with_radius(10.0);
        tracker.apply(0.5, &mut r);
        let shown = r.leaves_behind[0].radius;

        let mut r = reveal_with_radius(4.0);
        tracker.apply(0.5, &mut r);
        assert_eq!(r.leaves_behind[0].radius, shown);

        let mut r = reveal_with_radius(4.0);
        tracker.apply(1.5, &mut r);
        assert_eq!(r.leaves_behind[0].radius, 4.0);
    }

    #[test]
    fn vanished_leaves_are_forgotten() {
        let mut tracker = BloomTracker::new(0.5);
        tracker.apply(0.0, &mut reveal_with_radius(10.0));
        assert_eq!(tracker.tracked(), 1);

        tracker.apply(1.0, &mut Reveal::default());
        assert_eq!(tracker.tracked(), 0);

        let mut r = reveal_with_radius(10.0);
        tracker.apply(2.0, &mut r);
        assert_eq!(r.leaves_behind[0].radius, 0.0);
    }

    #[test]
    fn zero_duration_shows_final_radius_immediately() {
        let mut tracker = BloomTracker::new(0.0);
        let mut r = reveal_with_radius(7.0);
        assert!(!tracker.apply(0.0, &mut r));
        assert_eq!(r.leaves_behind[0].radius, 7.0);
    }
}
