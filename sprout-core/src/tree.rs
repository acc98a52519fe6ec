use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::{
    config::Config,
    error::{Result, SproutError},
    sequence::SeededSequence,
    types::{BranchId, Seed},
};

/// Path of the root branch; descendants append `-{child index}`.
pub const ROOT_PATH: &str = "0";

/// Children spawned by every non-terminal branch.
pub const BRANCHING_FACTOR: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub start: Vec2,
    pub end: Vec2,
    pub depth: u32,
    /// Growth value at which this branch starts to appear.
    pub reveal_threshold: f32,
    /// Growth needed to go from invisible to fully drawn.
    pub reveal_span: f32,
    pub path: String,
    pub parent: Option<BranchId>,
    pub children: Vec<BranchId>,
}

impl Branch {
    pub fn new_root(start: Vec2, end: Vec2, reveal_span: f32) -> Self {
        Self {
            start,
            end,
            depth: 0,
            reveal_threshold: 0.0,
            reveal_span,
            path: ROOT_PATH.to_owned(),
            parent: None,
            children: Vec::with_capacity(BRANCHING_FACTOR),
        }
    }

    pub fn new_child(parent_id: BranchId, parent: &Branch, index: usize, end: Vec2) -> Self {
        Self {
            start: parent.end,
            end,
            depth: parent.depth + 1,
            reveal_threshold: parent.completion(),
            reveal_span: parent.reveal_span,
            path: format!("{}-{index}", parent.path),
            parent: Some(parent_id),
            children: Vec::with_capacity(BRANCHING_FACTOR),
        }
    }

    /// Growth value at which this branch is fully drawn.
    #[inline]
    pub fn completion(&self) -> f32 {
        self.reveal_threshold + self.reveal_span
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Immutable branch hierarchy stored as an arena.
///
/// `nodes[0]` is the root; every other node is reachable through
/// `children` indices. Nodes are stored in pre-order.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Branch>,
}

impl Tree {
    /// Builds the tree for a canvas: rooted at the bottom center, growing
    /// straight up, trunk a fixed fraction of the height.
    ///
    /// `cfg` is validated first, which also bounds the tree depth.
    pub fn for_canvas(seed: Seed, width: f32, height: f32, cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SproutError::InvalidCanvas { width, height });
        }
        let origin = Vec2::new(width / 2.0, height);
        let trunk_length = height * cfg.trunk_fraction;
        Ok(StructureBuilder::new(cfg).build(seed, origin, -FRAC_PI_2, trunk_length, cfg.max_depth))
    }

    pub fn root(&self) -> &Branch {
        &self.nodes[0]
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn terminals(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_terminal())
    }

    pub fn find_path(&self, path: &str) -> Option<BranchId> {
        self.nodes.iter().position(|b| b.path == path)
    }

    /// Deepest branch depth present in the tree.
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|b| b.depth).max().unwrap_or(0)
    }
}

/// Recursively grows a binary branch hierarchy from a seeded sequence.
pub struct StructureBuilder<'a> {
    cfg: &'a Config,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    /// Builds the full tree.
    ///
    /// The sequence is consumed in pre-order: for each child, angle then
    /// length are drawn and that child's whole subtree is built before the
    /// next sibling draws anything. Changing this order changes every tree.
    pub fn build(
        &self,
        seed: Seed,
        origin: Vec2,
        initial_angle: f32,
        trunk_length: f32,
        max_depth: u32,
    ) -> Tree {
        let mut seq = SeededSequence::new(seed);
        let expected = (1usize << (max_depth.min(20) + 1)) - 1;
        let mut tree = Tree {
            nodes: Vec::with_capacity(expected),
        };

        let end = origin + Vec2::from_angle(initial_angle) * trunk_length;
        tree.nodes
            .push(Branch::new_root(origin, end, self.cfg.reveal_span));
        self.grow(&mut tree, 0, initial_angle, trunk_length, max_depth, &mut seq);

        tracing::debug!(
            %seed,
            max_depth,
            branches = tree.nodes.len(),
            "built branch structure"
        );
        tree
    }

    fn grow(
        &self,
        tree: &mut Tree,
        id: BranchId,
        angle: f32,
        length: f32,
        max_depth: u32,
        seq: &mut SeededSequence,
    ) {
        if tree.nodes[id].depth >= max_depth {
            return;
        }

        let (min_deg, max_deg) = self.cfg.branch_angle_deg;
        let (min_ratio, max_ratio) = self.cfg.length_ratio;

        for index in 0..BRANCHING_FACTOR {
            let deviation = seq.next_in(min_deg, max_deg).to_radians();
            let child_angle = if index == 0 {
                angle - deviation
            } else {
                angle + deviation
            };
            let child_length = length * seq.next_in(min_ratio, max_ratio);

            let parent = &tree.nodes[id];
            let end = parent.end + Vec2::from_angle(child_angle) * child_length;
            let child = Branch::new_child(id, parent, index, end);

            let child_id = tree.nodes.len();
            tree.nodes.push(child);
            tree.nodes[id].children.push(child_id);

            self.grow(tree, child_id, child_angle, child_length, max_depth, seq);
        }
    }
}
