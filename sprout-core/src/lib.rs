//! Deterministic growing-plant generator.
//!
//! Main components:
//! - [`sequence`] - seeded Park–Miller sequence used to shape the tree.
//! - [`hash`] - order-independent per-leaf attribute hashing.
//! - [`tree`] - branch arena and the recursive structure builder.
//! - [`growth`] - progress-to-growth animation state machine.
//! - [`reveal`] - visible segments and leaf placement for a growth value.
//! - [`interaction`] - leaf taps and particle bursts.
//! - [`bloom`] - eased leaf radii for live plants.
//! - [`compose`] - final draw order.
//! - [`scene`] - [`render_tree`] and the frame-driven [`GrowingPlant`].
//! - [`config`] - tuning constants and theme resolution.
//! - [`color`], [`error`], [`types`] - shared value types.

pub mod bloom;
pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod growth;
pub mod hash;
pub mod interaction;
pub mod reveal;
pub mod scene;
pub mod sequence;
pub mod tree;
pub mod types;

pub use color::Color;
pub use compose::DrawCommand;
pub use config::{Config, Theme, ThemeOptions};
pub use error::{Result, SproutError};
pub use scene::{DrawableScene, GrowingPlant, render_tree, render_tree_with};
pub use types::Seed;
