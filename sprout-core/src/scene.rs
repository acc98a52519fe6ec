//! Entry points: the stateless [`render_tree`] and the frame-driven
//! [`GrowingPlant`].
//!
//! A live plant runs one strict pass per frame:
//! 1. [`GrowthController::tick`] advances growth.
//! 2. [`RevealEngine::reveal`] derives segments and leaves for that growth.
//! 3. [`BloomTracker::apply`] eases displayed leaf radii.
//! 4. [`InteractionEngine::tick`] resolves queued taps against the leaves
//!    on screen and expires old bursts.
//! 5. [`Compositor::compose`] emits the draw list.

use glam::Vec2;

use crate::{
    bloom::BloomTracker,
    compose::{Compositor, DrawCommand},
    config::{Config, Theme, ThemeOptions},
    error::Result,
    growth::{GrowthController, growth_target},
    interaction::{EffectBurst, Feedback, InteractionEngine},
    reveal::{Reveal, RevealEngine},
    tree::Tree,
    types::Seed,
};

pub const DEFAULT_WIDTH: f32 = 300.0;
pub const DEFAULT_HEIGHT: f32 = 400.0;

/// Draw list for one frame plus the canvas it was laid out for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawableScene {
    pub width: f32,
    pub height: f32,
    pub growth: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawableScene {
    pub fn leaf_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Leaf { .. }))
    }

    pub fn stroke_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Stroke { .. }))
    }

    pub fn particle_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Particle { .. }))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

/// Renders the plant for `progress` with default tuning.
///
/// Growth is taken at its settled value; there is no animation and no
/// interaction overlay.
pub fn render_tree(
    seed: Seed,
    progress: f64,
    width: f32,
    height: f32,
    theme: Option<&ThemeOptions>,
) -> Result<DrawableScene> {
    render_tree_with(seed, progress, width, height, theme, &Config::default())
}

/// [`render_tree`] with explicit tuning.
pub fn render_tree_with(
    seed: Seed,
    progress: f64,
    width: f32,
    height: f32,
    theme: Option<&ThemeOptions>,
    cfg: &Config,
) -> Result<DrawableScene> {
    cfg.validate()?;
    let theme = Theme::resolve(theme)?;
    let tree = Tree::for_canvas(seed, width, height, cfg)?;

    let growth = growth_target(progress, cfg.progress_ceiling);
    let reveal = RevealEngine::new(cfg, &theme, seed).reveal(&tree, growth);
    Ok(DrawableScene {
        width,
        height,
        growth,
        commands: Compositor::new(cfg).compose(&reveal, &[], 0.0),
    })
}

/// A plant instance driven by the host's frame clock.
///
/// The tree is rebuilt only when seed or canvas change; rebuilding drops
/// every active burst.
#[derive(Debug)]
pub struct GrowingPlant {
    cfg: Config,
    theme: Theme,
    seed: Seed,
    width: f32,
    height: f32,
    tree: Tree,
    growth: GrowthController,
    interaction: InteractionEngine,
    bloom: BloomTracker,
    blooming: bool,
    dirty: bool,
    reveal: Reveal,
    scene: DrawableScene,
}

impl GrowingPlant {
    pub fn new(
        seed: Seed,
        width: f32,
        height: f32,
        theme: Option<&ThemeOptions>,
        cfg: Config,
    ) -> Result<Self> {
        cfg.validate()?;
        let theme = Theme::resolve(theme)?;
        let tree = Tree::for_canvas(seed, width, height, &cfg)?;

        Ok(Self {
            growth: GrowthController::new(&cfg),
            interaction: InteractionEngine::new(cfg.burst),
            bloom: BloomTracker::new(cfg.leaf_bloom_duration),
            blooming: false,
            dirty: true,
            reveal: Reveal::default(),
            scene: DrawableScene {
                width,
                height,
                ..DrawableScene::default()
            },
            cfg,
            theme,
            seed,
            width,
            height,
            tree,
        })
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn growth(&self) -> &GrowthController {
        &self.growth
    }

    /// Segments and leaves as displayed on the last composed frame.
    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    pub fn scene(&self) -> &DrawableScene {
        &self.scene
    }

    pub fn bursts(&self) -> &[EffectBurst] {
        self.interaction.bursts()
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.growth.set_progress(progress);
    }

    /// Queues a tap in canvas coordinates; it is resolved on the next tick.
    pub fn enqueue_tap(&mut self, point: Vec2) {
        self.interaction.enqueue_tap(point);
    }

    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        self.interaction.drain_feedback()
    }

    /// Whether the host should keep delivering frames.
    pub fn needs_frame(&self) -> bool {
        self.dirty || self.blooming || self.growth.is_animating() || self.interaction.is_active()
    }

    /// Runs one frame at `now` (seconds on the host clock). Returns `true`
    /// when a new scene was composed.
    pub fn tick(&mut self, now: f64) -> bool {
        let grew = self.growth.tick(now).is_some();
        if !(grew || self.needs_frame()) {
            return false;
        }

        let mut reveal = RevealEngine::new(&self.cfg, &self.theme, self.seed)
            .reveal(&self.tree, self.growth.growth());
        self.blooming = self.bloom.apply(now, &mut reveal);
        self.interaction.tick(now, &reveal);

        self.scene = DrawableScene {
            width: self.width,
            height: self.height,
            growth: reveal.growth,
            commands: Compositor::new(&self.cfg).compose(&reveal, self.interaction.bursts(), now),
        };
        self.reveal = reveal;
        self.dirty = false;
        true
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.rebuild(self.seed, width, height)
    }

    pub fn reseed(&mut self, seed: Seed) -> Result<()> {
        if seed == self.seed {
            return Ok(());
        }
        self.rebuild(seed, self.width, self.height)
    }

    fn rebuild(&mut self, seed: Seed, width: f32, height: f32) -> Result<()> {
        self.tree = Tree::for_canvas(seed, width, height, &self.cfg)?;
        self.seed = seed;
        self.width = width;
        self.height = height;
        self.interaction.clear();
        self.bloom.clear();
        self.dirty = true;
        tracing::debug!(%seed, width, height, "plant rebuilt");
        Ok(())
    }
}
