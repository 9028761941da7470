//! Core abstractions shared by every output family
//!
//! Errors, relationship identity and direction glyphs, identifier naming,
//! emitter configuration, and the three seams of the two-pass pipeline:
//! [`Emitter`], [`LayoutRenderer`] and [`GeometryExtractor`].

pub mod chumsky_utils;
mod config;
mod emitter;
mod error;
mod geometry;
pub mod logging;
pub mod naming;
mod renderer;
mod types;

pub use config::*;
pub use emitter::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use renderer::*;
pub use types::*;
