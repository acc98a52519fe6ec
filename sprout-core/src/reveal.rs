//! Growth-driven visibility of branches and leaves.
//!
//! [`RevealEngine::reveal`] walks the tree for one growth value and returns
//! the partially drawn segments plus the leaves of every fully grown
//! terminal, split by draw layer. It is a pure function of its inputs:
//! calling it twice with the same growth returns identical output.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::{
    color::Color,
    config::{Config, Theme},
    hash::{attribute_hash, pick_color},
    tree::{Branch, ROOT_PATH, Tree},
    types::{BranchId, Layer, Seed},
};

/// Tolerance for deciding a branch is fully drawn. Chained thresholds are
/// sums of `f32` spans, so exact comparison would drop the deepest level at
/// full growth.
pub const REVEAL_EPSILON: f32 = 1e-3;

/// A branch drawn from its start to `end`, which lies `fraction` of the way
/// to the branch's full end point.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub branch: BranchId,
    pub depth: u32,
    pub start: Vec2,
    pub end: Vec2,
    pub fraction: f32,
}

impl Segment {
    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    /// Stable identifier, e.g. `0-1-0-ring2-leaf3` or `0-1-0-central`.
    pub key: String,
    pub branch: BranchId,
    /// Ring number; 0 for the central leaf.
    pub ring: u32,
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    pub layer: Layer,
}

impl Leaf {
    pub fn is_central(&self) -> bool {
        self.ring == 0
    }
}

/// Everything visible at one growth value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reveal {
    pub growth: f32,
    pub segments: Vec<Segment>,
    pub leaves_behind: Vec<Leaf>,
    pub leaves_front: Vec<Leaf>,
}

impl Reveal {
    pub fn leaf_count(&self) -> usize {
        self.leaves_behind.len() + self.leaves_front.len()
    }

    /// All leaves in draw order (behind layer first).
    pub fn leaves(&self) -> impl DoubleEndedIterator<Item = &Leaf> {
        self.leaves_behind.iter().chain(self.leaves_front.iter())
    }

    pub fn find_leaf(&self, key: &str) -> Option<&Leaf> {
        self.leaves().find(|l| l.key == key)
    }

    pub fn complete_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.is_complete()).count()
    }
}

pub struct RevealEngine<'a> {
    cfg: &'a Config,
    theme: &'a Theme,
    seed: Seed,
}

impl<'a> RevealEngine<'a> {
    pub fn new(cfg: &'a Config, theme: &'a Theme, seed: Seed) -> Self {
        Self { cfg, theme, seed }
    }

    /// Local reveal fraction of `branch` at `growth`, in [0,1].
    pub fn fraction(branch: &Branch, growth: f32) -> f32 {
        ((growth - branch.reveal_threshold) / branch.reveal_span).clamp(0.0, 1.0)
    }

    /// Leaf density of a terminal branch at `growth`, in [0,1].
    pub fn density(&self, branch: &Branch, growth: f32) -> f32 {
        let extra = (growth - branch.completion()).clamp(0.0, self.cfg.extra_growth_scale);
        extra / self.cfg.extra_growth_scale
    }

    pub fn reveal(&self, tree: &Tree, growth: f32) -> Reveal {
        let growth = if growth.is_nan() {
            0.0
        } else {
            growth.clamp(0.0, 1.0)
        };
        let mut out = Reveal {
            growth,
            ..Reveal::default()
        };
        if !tree.is_empty() {
            self.visit(tree, 0, growth, &mut out);
        }
        out
    }

    fn visit(&self, tree: &Tree, id: BranchId, growth: f32, out: &mut Reveal) {
        let branch = &tree.nodes[id];
        let f = Self::fraction(branch, growth);
        if f <= 0.0 {
            // Children start no earlier than this branch completes.
            return;
        }

        out.segments.push(Segment {
            branch: id,
            depth: branch.depth,
            start: branch.start,
            end: branch.start.lerp(branch.end, f),
            fraction: f,
        });

        if growth < branch.completion() - REVEAL_EPSILON {
            return;
        }

        if branch.is_terminal() {
            if branch.path != ROOT_PATH {
                self.place_leaves(id, branch, growth, out);
            }
        } else {
            for &child in &branch.children {
                self.visit(tree, child, growth, out);
            }
        }
    }

    fn place_leaves(&self, id: BranchId, branch: &Branch, growth: f32, out: &mut Reveal) {
        let seed = self.seed;
        let theme = self.theme;
        let palette = theme.leaf_colors();
        let tip = branch.end;

        let central_key = format!("{}-central", branch.path);
        out.leaves_behind.push(Leaf {
            color: pick_color(seed, &central_key, palette),
            key: central_key,
            branch: id,
            ring: 0,
            center: tip,
            radius: theme.base_leaf_radius,
            layer: Layer::Behind,
        });

        let density = self.density(branch, growth);
        let per_ring = theme.leaves_per_ring(density);
        let ring_count = theme.ring_count(branch.depth);
        let (scale_lo, scale_hi) = self.cfg.leaf_scale;

        for ring in 1..=ring_count {
            let ring_radius = ring as f32 * theme.ring_spacing;
            let layer = if ring == 1 {
                Layer::Front
            } else {
                Layer::Behind
            };

            let mut ring_leaves: Vec<(f32, Leaf)> = (0..per_ring)
                .map(|i| {
                    let key = format!("{}-ring{ring}-leaf{i}", branch.path);
                    let jitter = (attribute_hash(seed, &format!("{key}-angle")) - 0.5)
                        * self.cfg.leaf_angle_jitter;
                    let angle = TAU * i as f32 / per_ring as f32 + jitter;
                    let scale = scale_lo
                        + attribute_hash(seed, &format!("{key}-scale")) * (scale_hi - scale_lo);
                    let order = attribute_hash(seed, &format!("{key}-order"));

                    let leaf = Leaf {
                        color: pick_color(seed, &key, palette),
                        key,
                        branch: id,
                        ring,
                        center: tip + Vec2::from_angle(angle) * ring_radius,
                        radius: theme.base_leaf_radius * scale * density,
                        layer,
                    };
                    (order, leaf)
                })
                .collect();
            ring_leaves.sort_by(|a, b| a.0.total_cmp(&b.0));

            let dest = match layer {
                Layer::Front => &mut out.leaves_front,
                Layer::Behind => &mut out.leaves_behind,
            };
            dest.extend(ring_leaves.into_iter().map(|(_, leaf)| leaf));
        }
    }
}
