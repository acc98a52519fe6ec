//! Final draw order for one frame.
//!
//! Behind leaves, then branch strokes, then front leaves, then burst
//! particles. Only the first ring sits in front of the strokes, which is
//! enough occlusion without sorting by depth.

use glam::Vec2;

use crate::{
    color::Color,
    config::Config,
    interaction::EffectBurst,
    reveal::{Leaf, Reveal},
};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Leaf {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Stroke {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Particle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
}

pub struct Compositor<'a> {
    cfg: &'a Config,
}

impl<'a> Compositor<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Trunk is thickest; width shrinks by one step per level.
    pub fn stroke_width(&self, depth: u32) -> f32 {
        let levels = self.cfg.max_depth.saturating_sub(depth) + 1;
        (levels as f32 * self.cfg.stroke_width_step).max(self.cfg.min_stroke_width)
    }

    pub fn compose(&self, reveal: &Reveal, bursts: &[EffectBurst], now: f64) -> Vec<DrawCommand> {
        let particle_count: usize = bursts.iter().map(|b| b.particles.len()).sum();
        let mut out =
            Vec::with_capacity(reveal.segments.len() + reveal.leaf_count() + particle_count);

        out.extend(reveal.leaves_behind.iter().map(leaf_command));
        out.extend(reveal.segments.iter().map(|s| DrawCommand::Stroke {
            from: s.start,
            to: s.end,
            width: self.stroke_width(s.depth),
            color: self.cfg.branch_color,
        }));
        out.extend(reveal.leaves_front.iter().map(leaf_command));
        self.push_particles(&mut out, bursts, now);
        out
    }

    fn push_particles(&self, out: &mut Vec<DrawCommand>, bursts: &[EffectBurst], now: f64) {
        let cfg = &self.cfg.burst;
        for burst in bursts {
            out.extend(burst.sample(now, cfg).map(|s| DrawCommand::Particle {
                center: s.position,
                radius: cfg.particle_radius * s.scale,
                color: s.color.with_opacity(s.opacity),
            }));
        }
    }
}

fn leaf_command(leaf: &Leaf) -> DrawCommand {
    DrawCommand::Leaf {
        center: leaf.center,
        radius: leaf.radius,
        color: leaf.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Theme,
        interaction::InteractionEngine,
        reveal::RevealEngine,
        tree::Tree,
        types::Seed,
    };

    #[test]
    fn stroke_width_is_inverse_to_depth() {
        let cfg = Config::default();
        let c = Compositor::new(&cfg);
        assert_eq!(c.stroke_width(0), 12.0);
        assert_eq!(c.stroke_width(5), 2.0);
        assert!((0..5).all(|d| c.stroke_width(d) > c.stroke_width(d + 1)));
        assert_eq!(c.stroke_width(9), cfg.min_stroke_width);
    }

    #[test]
    fn layers_are_ordered_behind_strokes_front_effects() {
        let cfg = Config::default();
        let theme = Theme::default();
        let tree = Tree::for_canvas(Seed(12345), 300.0, 400.0, &cfg).unwrap();
        let reveal = RevealEngine::new(&cfg, &theme, Seed(12345)).reveal(&tree, 1.0);

        let mut fx = InteractionEngine::new(cfg.burst);
        fx.tap_leaf(&reveal.leaves_front[0], 0.0);

        let cmds = Compositor::new(&cfg).compose(&reveal, fx.bursts(), 0.1);
        let rank = |c: &DrawCommand| match c {
            DrawCommand::Leaf { .. } => 0,
            DrawCommand::Stroke { .. } => 1,
            DrawCommand::Particle { .. } => 2,
        };

        let behind = reveal.leaves_behind.len();
        let strokes = reveal.segments.len();
        let front = reveal.leaves_front.len();
        assert_eq!(
            cmds.len(),
            behind + strokes + front + cfg.burst.particle_count
        );
        assert!(cmds[..behind].iter().all(|c| rank(c) == 0));
        assert!(cmds[behind..behind + strokes].iter().all(|c| rank(c) == 1));
        assert!(
            cmds[behind + strokes..behind + strokes + front]
                .iter()
                .all(|c| rank(c) == 0)
        );
        assert!(
            cmds[behind + strokes + front..]
                .iter()
                .all(|c| rank(c) == 2)
        );
    }

    #[test]
    fn particles_fade_with_burst_progress() {
        let cfg = Config::default();
        let leaf = Leaf {
            key: "0-0-ring1-leaf0".into(),
            branch: 1,
            ring: 1,
            center: Vec2::ZERO,
            radius: 5.0,
            color: Color::rgb(10, 200, 10),
            layer: crate::types::Layer::Front,
        };
        let mut fx = InteractionEngine::new(cfg.burst);
        fx.tap_leaf(&leaf, 0.0);

        let c = Compositor::new(&cfg);
        let early = c.compose(&Reveal::default(), fx.bursts(), 0.0);
        let late = c.compose(&Reveal::default(), fx.bursts(), cfg.burst.duration * 0.9);

        let alpha = |cmds: &[DrawCommand]| match cmds[0] {
            DrawCommand::Particle { color, .. } => color.a,
            _ => panic!("expected particle"),
        };
        assert_eq!(alpha(early.as_slice()), 255);
        assert!(alpha(late.as_slice()) < 64);
    }

    #[test]
    fn empty_reveal_composes_nothing() {
        let cfg = Config::default();
        assert!(Compositor::new(&cfg).compose(&Reveal::default(), &[], 0.0).is_empty());
    }
}
