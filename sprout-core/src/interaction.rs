//! Leaf taps and the particle bursts they spawn.
//!
//! Taps are queued by the host's input layer and consumed on the next frame
//! by [`InteractionEngine::tick`]. Each burst carries an explicit expiry
//! timestamp; there are no self-removal timers. Nothing here touches tree
//! or leaf geometry: bursts are a pure overlay.

use std::{collections::VecDeque, f32::consts::TAU};

use glam::Vec2;

use crate::{
    color::Color,
    config::BurstConfig,
    growth::ease_out,
    reveal::{Leaf, Reveal},
};

/// Undrained acknowledgements kept before the oldest are dropped.
pub const MAX_PENDING_FEEDBACK: usize = 256;

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
    Tap { point: Vec2 },
}

/// Acknowledgement the host should play back (haptic pulse, flash).
#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
    Haptic { leaf_key: String, at: Vec2 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectParticle {
    pub origin: Vec2,
    /// Unit vector.
    pub direction: Vec2,
    pub color: Color,
}

/// One particle evaluated at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSample {
    pub position: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectBurst {
    pub id: u64,
    pub leaf_key: String,
    pub origin: Vec2,
    pub created_at: f64,
    pub expires_at: f64,
    pub particles: Vec<EffectParticle>,
}

impl EffectBurst {
    fn new(id: u64, leaf: &Leaf, now: f64, cfg: &BurstConfig) -> Self {
        let n = cfg.particle_count.max(1);
        let particles = (0..n)
            .map(|i| EffectParticle {
                origin: leaf.center,
                direction: Vec2::from_angle(TAU * i as f32 / n as f32),
                color: leaf.color,
            })
            .collect();

        Self {
            id,
            leaf_key: leaf.key.clone(),
            origin: leaf.center,
            created_at: now,
            expires_at: now + cfg.duration,
            particles,
        }
    }

    #[inline]
    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }

    /// Seconds of lifetime left at `now`.
    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }

    /// Elapsed fraction of the lifetime, in [0,1].
    pub fn progress(&self, now: f64) -> f32 {
        let lifetime = self.expires_at - self.created_at;
        if lifetime <= 0.0 {
            return 1.0;
        }
        ((now - self.created_at) / lifetime).clamp(0.0, 1.0) as f32
    }

    /// Position, scale, and opacity of every particle at `now`.
    pub fn sample<'a>(
        &'a self,
        now: f64,
        cfg: &BurstConfig,
    ) -> impl Iterator<Item = ParticleSample> + 'a {
        let p = self.progress(now);
        let travel = cfg.travel * ease_out(p as f64) as f32;
        let scale = 1.0 + (cfg.end_scale - 1.0) * p;
        let opacity = 1.0 - p;

        self.particles.iter().map(move |particle| ParticleSample {
            position: particle.origin + particle.direction * travel,
            scale,
            opacity,
            color: particle.color,
        })
    }
}

/// Owns the tap queue and the list of active bursts.
#[derive(Debug)]
pub struct InteractionEngine {
    cfg: BurstConfig,
    queue: VecDeque<InteractionEvent>,
    bursts: Vec<EffectBurst>,
    feedback: VecDeque<Feedback>,
    next_id: u64,
}

impl InteractionEngine {
    pub fn new(cfg: BurstConfig) -> Self {
        Self {
            cfg,
            queue: VecDeque::new(),
            bursts: Vec::new(),
            feedback: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &BurstConfig {
        &self.cfg
    }

    pub fn enqueue_tap(&mut self, point: Vec2) {
        self.queue.push_back(InteractionEvent::Tap { point });
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn bursts(&self) -> &[EffectBurst] {
        &self.bursts
    }

    /// Bursts are alive or taps are waiting for the next frame.
    pub fn is_active(&self) -> bool {
        !self.bursts.is_empty() || !self.queue.is_empty()
    }

    /// Takes the acknowledgements produced since the last call, oldest
    /// first. At most [`MAX_PENDING_FEEDBACK`] are retained between calls.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback).into()
    }

    /// Topmost leaf under `point`, searching in reverse draw order.
    pub fn hit_test<'r>(&self, reveal: &'r Reveal, point: Vec2) -> Option<&'r Leaf> {
        reveal.leaves().rev().find(|leaf| {
            let r = leaf.radius.max(self.cfg.min_tap_radius);
            leaf.center.distance_squared(point) <= r * r
        })
    }

    /// Spawns a burst on `leaf` at time `now` and returns its id.
    pub fn tap_leaf(&mut self, leaf: &Leaf, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.bursts.push(EffectBurst::new(id, leaf, now, &self.cfg));
        if self.feedback.len() == MAX_PENDING_FEEDBACK {
            self.feedback.pop_front();
            tracing::debug!("feedback not drained, dropping oldest");
        }
        self.feedback.push_back(Feedback::Haptic {
            leaf_key: leaf.key.clone(),
            at: leaf.center,
        });
        tracing::debug!(burst = id, leaf = %leaf.key, now, "leaf burst spawned");
        id
    }

    /// Consumes queued taps against the leaves visible this frame, then drops
    /// expired bursts. Returns whether the active list changed.
    pub fn tick(&mut self, now: f64, reveal: &Reveal) -> bool {
        let mut changed = false;

        while let Some(event) = self.queue.pop_front() {
            match event {
                InteractionEvent::Tap { point } => match self.hit_test(reveal, point) {
                    Some(leaf) => {
                        self.tap_leaf(leaf, now);
                        changed = true;
                    }
                    None => {
                        tracing::debug!(x = point.x, y = point.y, "tap missed every leaf");
                    }
                },
            }
        }

        let before = self.bursts.len();
        self.bursts.retain(|b| !b.is_expired(now));
        let expired = before - self.bursts.len();
        if expired > 0 {
            tracing::debug!(expired, active = self.bursts.len(), "bursts expired");
            changed = true;
        }
        changed
    }

    /// Drops every burst and pending tap.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.bursts.clear();
        self.feedback.clear();
    }
}
