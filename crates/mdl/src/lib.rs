#![forbid(unsafe_code)]

//! mdlabel: a markdown document rendered as a tree of styled render nodes.
//!
//! This crate re-exports the workspace crates and offers a [`prelude`].
//!
//! # Example
//!
//! ```
//! use mdl::prelude::*;
//!
//! let mut label = MarkdownLabel::new();
//! label.set_text("# Title\n\nBody").unwrap();
//! label.tick().unwrap();
//! assert_eq!(label.tree().len(), 4);
//!
//! let before = label.identity_set();
//! label.set_property("color", "red").unwrap();
//! assert_eq!(label.identity_set(), before);
//! ```

pub use mdl_core;
pub use mdl_markup;
#[cfg(feature = "runtime")]
pub use mdl_runtime;
pub use mdl_tree;

pub use mdl_core::{
    Classification, ConfigError, PackedRgba, PropertyError, PropertyValue, classify, registry,
};
pub use mdl_markup::{BuilderConfig, Document, DocumentBuilder, MarkdownParser, MarkupParser};
#[cfg(feature = "runtime")]
pub use mdl_runtime::{Batch, BatchReport, LabelConfig, MarkdownLabel, RebuildError, TickWaker};
pub use mdl_tree::{BuildContext, BuildError, RenderTree, TreeBuilder};

/// The common imports.
pub mod prelude {
    pub use mdl_core::{
        Classification, NodeFilter, NodeId, NodeKind, PackedRgba, PropertyError, PropertyValue,
        RenderNode,
    };
    pub use mdl_markup::{Document, DocumentBuilder, MarkdownParser, MarkupParser};
    #[cfg(feature = "runtime")]
    pub use mdl_runtime::{
        Batch, BatchReport, LabelConfig, MarkdownLabel, RequestOutcome, SchedulerState,
        TickWaker,
    };
    pub use mdl_tree::{RenderTree, TreeBuilder, select_nodes};
}
