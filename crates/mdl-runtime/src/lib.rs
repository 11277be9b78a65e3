#![forbid(unsafe_code)]

//! Runtime for mdlabel.
//!
//! [`MarkdownLabel`] keeps a render tree in sync with its properties:
//! style-only changes are applied in place, structure changes arm one
//! deferred rebuild that the host runs on its next tick.
//!
//! # Example
//!
//! ```
//! use mdl_runtime::{Batch, MarkdownLabel};
//!
//! let mut label = MarkdownLabel::new();
//! label.apply(Batch::new().set("text", "# Title\n\nBody").set("base_font_size", 14.0))?;
//! assert!(label.is_rebuild_pending());
//! label.tick()?;
//! assert_eq!(label.tree().len(), 4);
//!
//! let before = label.identity_set();
//! label.set_property("color", "red")?;
//! assert_eq!(label.identity_set(), before);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod config;
pub mod scheduler;
pub mod widget;

pub use batch::{Batch, BatchReport};
pub use config::LabelConfig;
pub use scheduler::{RebuildScheduler, RequestOutcome, SchedulerState};
pub use widget::{LabelStats, MarkdownLabel, RebuildError, TickWaker};
