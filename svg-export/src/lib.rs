#![warn(clippy::all, rust_2018_idioms)]

//! Minimal SVG rendering of scatter plots arranged as subplots.

mod plotting;
pub mod svg;

pub use plotting::{element_opts, Axis, Figure, ScatterPlot, Ticks, YSide};
