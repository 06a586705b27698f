//! Syntax lowering and minification of generated registration code.
//!
//! | Transform | What it does |
//! |---|---|
//! | [`Esbuild`] | pipes the source through the `esbuild` binary |
//! | [`Passthrough`] | returns the source unchanged |
//!
//! The payload compiler only sees the [`Transform`] trait. A transform
//! failure means the generator produced broken code, so callers treat it as
//! fatal rather than skipping the unit.

pub mod backend;
pub mod esbuild;

pub use backend::{Passthrough, Transform, TransformError};
pub use esbuild::Esbuild;
