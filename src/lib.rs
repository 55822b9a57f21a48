//! Signal-flow wire visualization for grid-based chip boards.
//!
//! Resolves wires to pixel polylines, maps signal values to color and glow,
//! times pause-mode blips from evaluation depth, and rebuilds viewer boards
//! from bake metadata. Drawing goes through [`render::DrawSurface`].

pub mod board;
pub mod connection_point;
pub mod geometry;
pub mod models;
pub mod render;
pub mod sampler;
pub mod style;
pub mod timing;
pub mod visual;
