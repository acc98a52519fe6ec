use std::f32::consts::PI;

use serde::Deserialize;

use crate::{
    color::Color,
    error::{Result, SproutError},
};

/// Tunable constants for structure, growth, reveal, and effects.
///
/// One value is built up front and passed by reference into every
/// component; nothing reads these from global state.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Progress value that maps to full growth.
    pub progress_ceiling: f64,
    pub max_depth: u32,
    /// Growth fraction each branch needs to go from invisible to fully drawn.
    pub reveal_span: f32,
    /// Growth beyond a terminal's completion needed to reach full leaf density.
    pub extra_growth_scale: f32,
    /// Seconds for a growth transition.
    pub animation_duration: f64,

    /// Child deviation range in degrees.
    pub branch_angle_deg: (f32, f32),
    /// Child length ratio range.
    pub length_ratio: (f32, f32),
    /// Trunk length as a fraction of canvas height.
    pub trunk_fraction: f32,

    /// Total width of the per-leaf angular jitter, in radians.
    pub leaf_angle_jitter: f32,
    pub leaf_scale: (f32, f32),
    pub leaf_bloom_duration: f64,

    pub min_stroke_width: f32,
    pub stroke_width_step: f32,
    pub branch_color: Color,

    pub burst: BurstConfig,
}

/// Parameters of the particle burst spawned by a leaf tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstConfig {
    pub particle_count: usize,
    /// Seconds a burst stays in the active list.
    pub duration: f64,
    /// Distance each particle travels outward by the end of the burst.
    pub travel: f32,
    /// Particle scale at expiry, relative to its initial scale of 1.
    pub end_scale: f32,
    pub particle_radius: f32,
    /// Smallest hit radius for a leaf, so freshly bloomed leaves stay tappable.
    pub min_tap_radius: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 8,
            duration: 0.6,
            travel: 28.0,
            end_scale: 0.2,
            particle_radius: 3.0,
            min_tap_radius: 6.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_ceiling: 1000.0,
            max_depth: 5,
            reveal_span: 0.12,
            extra_growth_scale: 0.2,
            animation_duration: 1.0,
            branch_angle_deg: (15.0, 45.0),
            length_ratio: (0.70, 0.90),
            trunk_fraction: 1.0 / 3.0,
            leaf_angle_jitter: PI / 8.0,
            leaf_scale: (0.8, 1.2),
            leaf_bloom_duration: 0.5,
            min_stroke_width: 2.0,
            stroke_width_step: 2.0,
            branch_color: Color::rgb(0x8b, 0x45, 0x13),
            burst: BurstConfig::default(),
        }
    }
}

impl Config {
    /// Growth value at which every branch of a `max_depth` tree is drawn
    /// and every terminal has reached full leaf density.
    pub fn full_growth_point(&self) -> f32 {
        self.max_depth.saturating_add(1) as f32 * self.reveal_span + self.extra_growth_scale
    }

    /// Rejects settings that would break reveal staging or the full-growth
    /// guarantee at `growth == 1`.
    pub fn validate(&self) -> Result<()> {
        if !(self.progress_ceiling.is_finite() && self.progress_ceiling > 0.0) {
            return Err(SproutError::invalid_config(
                "progress_ceiling must be positive",
            ));
        }
        if !(self.reveal_span.is_finite() && self.reveal_span > 0.0) {
            return Err(SproutError::invalid_config("reveal_span must be positive"));
        }
        if !(self.extra_growth_scale.is_finite() && self.extra_growth_scale > 0.0) {
            return Err(SproutError::invalid_config(
                "extra_growth_scale must be positive",
            ));
        }
        if self.full_growth_point() > 1.0 + f32::EPSILON {
            return Err(SproutError::invalid_config(format!(
                "tree of depth {} needs growth {:.3} to fill out",
                self.max_depth,
                self.full_growth_point()
            )));
        }
        if !(self.animation_duration.is_finite() && self.animation_duration >= 0.0) {
            return Err(SproutError::invalid_config(
                "animation_duration must be non-negative",
            ));
        }
        if !(self.burst.duration.is_finite() && self.burst.duration > 0.0) {
            return Err(SproutError::invalid_config(
                "burst duration must be positive",
            ));
        }
        Ok(())
    }
}

pub const DEFAULT_LEAF_COLORS: [Color; 3] = [
    Color::rgb(0x4c, 0xaf, 0x50),
    Color::rgb(0x8b, 0xc3, 0x4a),
    Color::rgb(0xcd, 0xdc, 0x39),
];
pub const DEFAULT_BASE_LEAF_RADIUS: f32 = 10.0;
pub const DEFAULT_MAX_LEAVES_PER_RING: u32 = 10;
pub const DEFAULT_MIN_LEAVES_PER_RING: u32 = 4;
pub const DEFAULT_RING_SPACING: f32 = 8.0;
pub const DEFAULT_RING_COUNT_FACTOR: u32 = 1;

/// Largest accepted `maxLeavesPerRing` / `minLeavesPerRing`.
pub const MAX_LEAVES_PER_RING: u32 = 64;
/// Largest accepted `ringCountFactor`.
pub const MAX_RING_COUNT_FACTOR: u32 = 8;

/// Host-supplied theme overrides, as they arrive from the outer application.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOptions {
    #[serde(default)]
    pub leaf_colors: Vec<Color>,
    pub base_leaf_radius: Option<f32>,
    pub max_leaves_per_ring: Option<u32>,
    pub min_leaves_per_ring: Option<u32>,
    pub ring_spacing: Option<f32>,
    pub ring_count_factor: Option<u32>,
}

impl ThemeOptions {
    pub fn with_colors(leaf_colors: impl Into<Vec<Color>>) -> Self {
        Self {
            leaf_colors: leaf_colors.into(),
            ..Self::default()
        }
    }
}

/// Fully resolved leaf theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    leaf_colors: Vec<Color>,
    pub base_leaf_radius: f32,
    pub max_leaves_per_ring: u32,
    pub min_leaves_per_ring: u32,
    pub ring_spacing: f32,
    pub ring_count_factor: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            leaf_colors: DEFAULT_LEAF_COLORS.to_vec(),
            base_leaf_radius: DEFAULT_BASE_LEAF_RADIUS,
            max_leaves_per_ring: DEFAULT_MAX_LEAVES_PER_RING,
            min_leaves_per_ring: DEFAULT_MIN_LEAVES_PER_RING,
            ring_spacing: DEFAULT_RING_SPACING,
            ring_count_factor: DEFAULT_RING_COUNT_FACTOR,
        }
    }
}

impl Theme {
    /// Resolves optional overrides into a complete theme.
    ///
    /// `None` yields the default theme. A supplied theme must carry at
    /// least one leaf color; every other field falls back to its default
    /// when missing, non-finite or non-positive. Leaf and ring counts also
    /// fall back when above [`MAX_LEAVES_PER_RING`] or
    /// [`MAX_RING_COUNT_FACTOR`].
    pub fn resolve(options: Option<&ThemeOptions>) -> Result<Self> {
        let Some(opts) = options else {
            return Ok(Self::default());
        };
        if opts.leaf_colors.is_empty() {
            return Err(SproutError::EmptyPalette);
        }

        let positive_f32 = |name: &str, value: Option<f32>, default: f32| match value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            Some(v) => {
                tracing::warn!(field = name, value = v, default, "theme value ignored");
                default
            }
            None => default,
        };
        let bounded_u32 = |name: &str, value: Option<u32>, default: u32, max: u32| match value {
            Some(v) if (1..=max).contains(&v) => v,
            Some(v) => {
                tracing::warn!(field = name, value = v, default, max, "theme value ignored");
                default
            }
            None => default,
        };

        let max_leaves_per_ring = bounded_u32(
            "maxLeavesPerRing",
            opts.max_leaves_per_ring,
            DEFAULT_MAX_LEAVES_PER_RING,
            MAX_LEAVES_PER_RING,
        );
        let mut min_leaves_per_ring = bounded_u32(
            "minLeavesPerRing",
            opts.min_leaves_per_ring,
            DEFAULT_MIN_LEAVES_PER_RING,
            MAX_LEAVES_PER_RING,
        );
        if min_leaves_per_ring > max_leaves_per_ring {
            tracing::warn!(
                min = min_leaves_per_ring,
                max = max_leaves_per_ring,
                "minLeavesPerRing above maxLeavesPerRing, lowering"
            );
            min_leaves_per_ring = max_leaves_per_ring;
        }

        Ok(Self {
            leaf_colors: opts.leaf_colors.clone(),
            base_leaf_radius: positive_f32(
                "baseLeafRadius",
                opts.base_leaf_radius,
                DEFAULT_BASE_LEAF_RADIUS,
            ),
            max_leaves_per_ring,
            min_leaves_per_ring,
            ring_spacing: positive_f32("ringSpacing", opts.ring_spacing, DEFAULT_RING_SPACING),
            ring_count_factor: bounded_u32(
                "ringCountFactor",
                opts.ring_count_factor,
                DEFAULT_RING_COUNT_FACTOR,
                MAX_RING_COUNT_FACTOR,
            ),
        })
    }

    /// Non-empty by construction.
    pub fn leaf_colors(&self) -> &[Color] {
        &self.leaf_colors
    }

    /// Leaves per ring at the given density in [0,1].
    ///
    /// Never exceeds [`MAX_LEAVES_PER_RING`], even for a hand-built theme.
    pub fn leaves_per_ring(&self, density: f32) -> u32 {
        let max = self.max_leaves_per_ring.min(MAX_LEAVES_PER_RING);
        let min = self.min_leaves_per_ring.min(max);
        let span = (max - min) as f32;
        min + (density.clamp(0.0, 1.0) * span).floor() as u32
    }

    /// Number of leaf rings around a terminal at `depth`.
    pub fn ring_count(&self, depth: u32) -> u32 {
        depth.saturating_mul(self.ring_count_factor.min(MAX_RING_COUNT_FACTOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_fills_out_before_full_growth() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.full_growth_point() <= 1.0);
    }

    #[test]
    fn validate_rejects_span_that_cannot_fill_out() {
        let cfg = Config {
            reveal_span: 0.2,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SproutError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_ceiling() {
        let cfg = Config {
            progress_ceiling: 0.0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_huge_depth_without_overflow() {
        let cfg = Config {
            max_depth: u32::MAX,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SproutError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn resolve_none_uses_default_palette() {
        let theme = Theme::resolve(None).unwrap();
        assert_eq!(theme.leaf_colors(), &DEFAULT_LEAF_COLORS);
        assert_eq!(theme.base_leaf_radius, DEFAULT_BASE_LEAF_RADIUS);
    }

    #[test]
    fn resolve_rejects_empty_palette() {
        let opts = ThemeOptions::default();
        assert_eq!(Theme::resolve(Some(&opts)), Err(SproutError::EmptyPalette));
    }

    #[test]
    fn resolve_falls_back_per_field() {
        let opts = ThemeOptions {
            leaf_colors: vec![Color::rgb(1, 2, 3)],
            base_leaf_radius: Some(f32::NAN),
            ring_spacing: Some(12.0),
            ring_count_factor: Some(0),
            ..ThemeOptions::default()
        };
        let theme = Theme::resolve(Some(&opts)).unwrap();
        assert_eq!(theme.leaf_colors(), &[Color::rgb(1, 2, 3)]);
        assert_eq!(theme.base_leaf_radius, DEFAULT_BASE_LEAF_RADIUS);
        assert_eq!(theme.ring_spacing, 12.0);
        assert_eq!(theme.ring_count_factor, DEFAULT_RING_COUNT_FACTOR);
        assert_eq!(theme.max_leaves_per_ring, DEFAULT_MAX_LEAVES_PER_RING);
    }

    #[test]
    fn resolve_lowers_min_above_max() {
        let opts = ThemeOptions {
            min_leaves_per_ring: Some(12),
            max_leaves_per_ring: Some(6),
            ..ThemeOptions::with_colors([Color::rgb(0, 0, 0)])
        };
        let theme = Theme::resolve(Some(&opts)).unwrap();
        assert_eq!(theme.min_leaves_per_ring, 6);
        assert_eq!(theme.leaves_per_ring(0.0), 6);
        assert_eq!(theme.leaves_per_ring(1.0), 6);
    }

    #[test]
    fn resolve_ignores_counts_above_limits() {
        let opts = ThemeOptions {
            ring_count_factor: Some(1_000_000_000),
            max_leaves_per_ring: Some(u32::MAX),
            min_leaves_per_ring: Some(MAX_LEAVES_PER_RING + 1),
            ..ThemeOptions::with_colors([Color::rgb(0, 0, 0)])
        };
        let theme = Theme::resolve(Some(&opts)).unwrap();
        assert_eq!(theme.ring_count_factor, DEFAULT_RING_COUNT_FACTOR);
        assert_eq!(theme.max_leaves_per_ring, DEFAULT_MAX_LEAVES_PER_RING);
        assert_eq!(theme.min_leaves_per_ring, DEFAULT_MIN_LEAVES_PER_RING);

        let at_limit = ThemeOptions {
            ring_count_factor: Some(MAX_RING_COUNT_FACTOR),
            max_leaves_per_ring: Some(MAX_LEAVES_PER_RING),
            ..ThemeOptions::with_colors([Color::rgb(0, 0, 0)])
        };
        let theme = Theme::resolve(Some(&at_limit)).unwrap();
        assert_eq!(theme.ring_count_factor, MAX_RING_COUNT_FACTOR);
        assert_eq!(theme.max_leaves_per_ring, MAX_LEAVES_PER_RING);
    }

    #[test]
    fn hand_built_theme_counts_stay_bounded() {
        let mut theme = Theme::default();
        theme.min_leaves_per_ring = 12;
        theme.max_leaves_per_ring = 6;
        assert_eq!(theme.leaves_per_ring(0.0), 6);
        assert_eq!(theme.leaves_per_ring(1.0), 6);

        theme.min_leaves_per_ring = 1;
        theme.max_leaves_per_ring = u32::MAX;
        assert_eq!(theme.leaves_per_ring(1.0), MAX_LEAVES_PER_RING);

        theme.ring_count_factor = u32::MAX;
        assert_eq!(theme.ring_count(5), 5 * MAX_RING_COUNT_FACTOR);
        assert_eq!(theme.ring_count(u32::MAX), u32::MAX);
    }

    #[test]
    fn leaves_per_ring_interpolates_with_floor() {
        let theme = Theme::default();
        assert_eq!(theme.leaves_per_ring(0.0), 4);
        assert_eq!(theme.leaves_per_ring(0.5), 7);
        assert_eq!(theme.leaves_per_ring(0.99), 9);
        assert_eq!(theme.leaves_per_ring(1.0), 10);
        assert_eq!(theme.leaves_per_ring(3.0), 10);
    }

    #[test]
    fn theme_options_deserialize_from_camel_case_json() {
        let opts: ThemeOptions = serde_json::from_str(
            r##"{"leafColors": ["#4CAF50", "#ff0000"], "ringSpacing": 6.5, "maxLeavesPerRing": 12}"##,
        )
        .unwrap();
        assert_eq!(opts.leaf_colors.len(), 2);
        assert_eq!(opts.leaf_colors[1], Color::rgb(255, 0, 0));
        assert_eq!(opts.ring_spacing, Some(6.5));
        assert_eq!(opts.max_leaves_per_ring, Some(12));
        assert_eq!(opts.base_leaf_radius, None);
    }

    #[test]
    fn theme_options_reject_bad_color_in_json() {
        let res: std::result::Result<ThemeOptions, _> =
            serde_json::from_str(r#"{"leafColors": ["green"]}"#);
        assert!(res.is_err());
    }
}
