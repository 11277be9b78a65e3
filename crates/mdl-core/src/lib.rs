#![forbid(unsafe_code)]

//! Core data for mdlabel: property values, the static property registry, and
//! render-node primitives.
//!
//! This crate provides:
//! - [`registry`] with the bit-exact style-only / structure classification
//! - [`PropertyValue`] and [`ValueKind`] for validated, normalized values
//! - [`RenderNode`], [`NodeId`], and [`NodeFilter`] describing render trees
//! - the [`error`] taxonomy shared by the higher crates

pub mod color;
pub mod error;
pub mod node;
pub mod registry;
pub mod value;

pub use color::{ColorParseError, PackedRgba};
pub use error::{ApplicationError, ConfigError, PropertyError, UnknownPropertyError};
pub use node::{
    FallbackFont, NodeFilter, NodeId, NodeKind, NodeKinds, NodeRole, NodeStyle, RenderNode,
};
pub use registry::{Classification, PropertyMap, PropertyRegistry, StyleRule, classify, registry};
pub use value::{PropertyValue, ValueKind};
