#![forbid(unsafe_code)]

//! Render trees for mdlabel.
//!
//! - [`tree`]: the generational arena and identity-free snapshots
//! - [`builder`]: the [`TreeBuilder`] seam and [`BuildContext`]
//! - [`accessor`]: lazy pre-order selection over live nodes
//! - [`style`]: in-place application of style-only properties

pub mod accessor;
pub mod builder;
pub mod style;
pub mod tree;

pub use accessor::{Select, select_ids, select_nodes};
pub use builder::{BuildContext, BuildError, Built, TreeBuilder};
pub use style::{apply_rule, apply_style, check_rule};
pub use tree::{NodeSnapshot, RenderTree};
