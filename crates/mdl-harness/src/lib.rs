#![forbid(unsafe_code)]

//! Test fixtures for mdlabel.
//!
//! - [`RecordingBuilder`] wraps a builder and logs every invocation with the
//!   structure values it saw, so tests can count rebuilds and check that a
//!   rebuild observed final values only.
//! - [`FailingBuilder`] fails on demand; [`ReentrantBuilder`] requests a
//!   further rebuild from inside a build.
//! - [`strategies`] produces valid values for any registered property.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use mdl_core::node::NodeId;
use mdl_core::registry::{Classification, PropertyMap, registry};
use mdl_core::value::PropertyValue;
use mdl_markup::builder::DocumentBuilder;
use mdl_markup::parser::MarkdownParser;
use mdl_runtime::{LabelConfig, MarkdownLabel};
use mdl_tree::builder::{BuildContext, BuildError, TreeBuilder};

pub mod strategies;

// ============================================================================
// Recording
// ============================================================================

/// One builder invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRecord {
    pub generation: u32,
    /// Every structure property's value at build time.
    pub structure: BTreeMap<&'static str, PropertyValue>,
}

impl BuildRecord {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.structure.get(name)
    }
}

/// Shared view of the records a [`RecordingBuilder`] produced.
#[derive(Debug, Clone, Default)]
pub struct BuildLog(Rc<RefCell<Vec<BuildRecord>>>);

impl BuildLog {
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn records(&self) -> Vec<BuildRecord> {
        self.0.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<BuildRecord> {
        self.0.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, record: BuildRecord) {
        self.0.borrow_mut().push(record);
    }
}

/// Builder wrapper that records each invocation before delegating.
#[derive(Debug)]
pub struct RecordingBuilder<B = DocumentBuilder> {
    inner: B,
    log: BuildLog,
}

impl<B> RecordingBuilder<B> {
    pub fn new(inner: B) -> (Self, BuildLog) {
        let log = BuildLog::default();
        (
            Self {
                inner,
                log: log.clone(),
            },
            log,
        )
    }
}

impl<C: ?Sized, B: TreeBuilder<C>> TreeBuilder<C> for RecordingBuilder<B> {
    fn build(
        &mut self,
        content: &C,
        props: &PropertyMap,
        ctx: &mut BuildContext,
    ) -> Result<NodeId, BuildError> {
        let structure = registry()
            .structure_names()
            .filter_map(|name| props.get(name).map(|v| (name, v.clone())))
            .collect();
        self.log.push(BuildRecord {
            generation: ctx.generation(),
            structure,
        });
        tracing::trace!(generation = ctx.generation(), "recorded build");
        self.inner.build(content, props, ctx)
    }
}

// ============================================================================
// Fault injection
// ============================================================================

/// Switch shared between a test and a [`FailingBuilder`].
#[derive(Debug, Clone, Default)]
pub struct FailSwitch(Rc<Cell<bool>>);

impl FailSwitch {
    pub fn set(&self, fail: bool) {
        self.0.set(fail);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Fails every build while its switch is set.
#[derive(Debug)]
pub struct FailingBuilder<B = DocumentBuilder> {
    inner: B,
    switch: FailSwitch,
}

impl<B> FailingBuilder<B> {
    pub fn new(inner: B) -> (Self, FailSwitch) {
        let switch = FailSwitch::default();
        (
            Self {
                inner,
                switch: switch.clone(),
            },
            switch,
        )
    }
}

impl<C: ?Sized, B: TreeBuilder<C>> TreeBuilder<C> for FailingBuilder<B> {
    fn build(
        &mut self,
        content: &C,
        props: &PropertyMap,
        ctx: &mut BuildContext,
    ) -> Result<NodeId, BuildError> {
        if self.switch.is_set() {
            return Err(BuildError::Builder("injected failure".to_owned()));
        }
        self.inner.build(content, props, ctx)
    }
}

/// Requests another rebuild from inside its first `times` builds.
#[derive(Debug)]
pub struct ReentrantBuilder<B = DocumentBuilder> {
    inner: B,
    remaining: usize,
}

impl<B> ReentrantBuilder<B> {
    pub fn new(inner: B, times: usize) -> Self {
        Self {
            inner,
            remaining: times,
        }
    }
}

impl<C: ?Sized, B: TreeBuilder<C>> TreeBuilder<C> for ReentrantBuilder<B> {
    fn build(
        &mut self,
        content: &C,
        props: &PropertyMap,
        ctx: &mut BuildContext,
    ) -> Result<NodeId, BuildError> {
        if self.remaining > 0 {
            self.remaining -= 1;
            ctx.request_rebuild();
        }
        self.inner.build(content, props, ctx)
    }
}

// ============================================================================
// Labels
// ============================================================================

pub type RecordedLabel = MarkdownLabel<MarkdownParser, RecordingBuilder>;

/// A default label whose builds are recorded.
#[must_use]
pub fn recorded_label() -> (RecordedLabel, BuildLog) {
    let (builder, log) = RecordingBuilder::new(DocumentBuilder::default());
    let label = MarkdownLabel::from_parts(MarkdownParser::new(), builder, LabelConfig::default());
    (label, log)
}

/// A recorded label already built from `text`; the log starts empty.
#[must_use]
pub fn built_label(text: &str) -> (RecordedLabel, BuildLog) {
    let (mut label, log) = recorded_label();
    if label.set_text(text).is_ok() && label.force_rebuild_now().is_ok() {
        log.clear();
    }
    (label, log)
}

/// Names of every property with `class`.
#[must_use]
pub fn names_of(class: Classification) -> Vec<&'static str> {
    registry()
        .descriptors()
        .filter(|d| d.classification() == class)
        .map(|d| d.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_builder_counts_and_captures_structure() {
        let (mut label, log) = recorded_label();
        label.set_text("a").unwrap();
        label.set_property("render_mode", "texture").unwrap();
        label.tick().unwrap();
        assert_eq!(log.count(), 1);
        let record = log.last().unwrap();
        assert_eq!(record.generation, 1);
        assert_eq!(record.get("text"), Some(&PropertyValue::from("a")));
        assert_eq!(record.get("render_mode"), Some(&PropertyValue::from("texture")));
        assert!(record.get("color").is_none());
    }

    #[test]
    fn built_label_starts_with_empty_log() {
        let (label, log) = built_label("# x");
        assert_eq!(log.count(), 0);
        assert_eq!(label.tree().len(), 2);
    }

    #[test]
    fn classification_partitions_names() {
        let style = names_of(Classification::StyleOnly);
        let structure = names_of(Classification::Structure);
        assert_eq!(style.len() + structure.len(), registry().len());
        assert!(style.iter().all(|n| !structure.contains(n)));
    }
}
