//! Graph rendering module for producing DOT format output.
//!
//! This module transforms an `ObjectGraph` into DOT text, one node statement
//! per node grouped by kind, and can hand that text to the external `dot`
//! program to produce a raster image.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT format utilities and the statement builder
//! - [`style`]: fixed style table per node kind and edge relation
//! - [`render`]: model to DOT text
//! - [`raster`]: external layout renderer invocation

mod dot;
mod raster;
mod render;
mod style;

pub use dot::{DotBuilder, escape_id, escape_label};
pub use raster::{DEFAULT_DOT_BINARY, DEFAULT_FORMAT, Rasterizer};
pub use render::{RenderOptions, node_id, node_label, render_graph};
pub use style::{edge_attrs, node_attrs};
