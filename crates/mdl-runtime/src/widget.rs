#![forbid(unsafe_code)]

//! The markdown label widget.
//!
//! [`MarkdownLabel`] owns the property map, the current render tree, and the
//! rebuild scheduler. The property map is the source of truth; the tree is a
//! cached projection of it.
//!
//! # Mutation Flow
//!
//! 1. [`apply_batch`](MarkdownLabel::apply_batch) resolves every name first.
//!    An unknown name rejects the whole batch before anything changes.
//! 2. Entries are then validated and stored in order. Style-only entries are
//!    pushed onto the live tree immediately.
//! 3. If any structure entry was stored, one rebuild is requested.
//! 4. The host calls [`tick`](MarkdownLabel::tick) after being woken. The
//!    rebuild reparses `text`, builds a tree under a fresh generation, and
//!    replays every stored style-only value onto it.
//!
//! # Invariants
//!
//! 1. No node identity survives or is reused across a rebuild.
//! 2. Style-only changes never alter the identity set.
//! 3. A rebuild always reflects the latest stored value of every property.
//! 4. After a rebuild completes, every stored style value is reflected on
//!    every node it targets.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `PropertyError::Unknown` | Name not registered | Batch rejected, nothing changed |
//! | `PropertyError::Application` | Invalid value | Earlier entries stay applied; a rebuild is still requested for stored structure entries |
//! | [`RebuildError`] | Builder or replay failed | Tree left empty, scheduler idle, no retry |

use std::collections::BTreeSet;
use std::fmt;

use mdl_core::error::{ConfigError, PropertyError, UnknownPropertyError};
use mdl_core::node::NodeId;
use mdl_core::registry::{Classification, PropertyDescriptor, PropertyMap, registry};
use mdl_core::value::PropertyValue;
use mdl_markup::builder::DocumentBuilder;
use mdl_markup::parser::{MarkdownParser, MarkupParser, ParsedContent};
use mdl_tree::builder::{BuildContext, BuildError, Built, TreeBuilder};
use mdl_tree::style::apply_rule;
use mdl_tree::tree::RenderTree;
use web_time::Instant;

use crate::batch::{Batch, BatchReport};
use crate::config::LabelConfig;
use crate::scheduler::{RebuildScheduler, RequestOutcome, SchedulerState};

/// The host's "run on next tick" primitive.
///
/// The label wakes the host once each time a rebuild becomes due. The host
/// answers by calling [`MarkdownLabel::tick`] on its next turn.
pub trait TickWaker {
    fn wake(&self);
}

impl<F: Fn()> TickWaker for F {
    fn wake(&self) {
        self();
    }
}

/// A rebuild that did not produce a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildError {
    /// Generation the failed rebuild would have produced.
    pub generation: u32,
    pub source: BuildError,
}

impl fmt::Display for RebuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rebuild of generation {} failed: {}", self.generation, self.source)
    }
}

impl std::error::Error for RebuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Counters for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    /// Completed rebuilds.
    pub rebuilds: u64,
    /// Failed rebuilds.
    pub failed_rebuilds: u64,
    /// Rebuild requests folded into one already pending.
    pub coalesced_requests: u64,
    /// Style-only assignments applied in place.
    pub style_updates: u64,
}

/// A markdown document rendered as a render-node tree.
pub struct MarkdownLabel<P = MarkdownParser, B = DocumentBuilder>
where
    P: MarkupParser,
{
    parser: P,
    builder: B,
    config: LabelConfig,
    props: PropertyMap,
    tree: RenderTree,
    content: Option<P::Output>,
    scheduler: RebuildScheduler,
    waker: Option<Box<dyn TickWaker>>,
    generation: u32,
    stats: LabelStats,
}

impl MarkdownLabel {
    /// A label with the CommonMark parser, the default builder, and default
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(MarkdownParser::new(), DocumentBuilder::default(), LabelConfig::default())
    }

    /// A label with the default parser and a builder configured from `config`.
    pub fn with_config(config: LabelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let builder = DocumentBuilder::new(config.builder.clone());
        Ok(Self::from_parts(MarkdownParser::new(), builder, config))
    }
}

impl Default for MarkdownLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, B> MarkdownLabel<P, B>
where
    P: MarkupParser,
    B: TreeBuilder<P::Output>,
{
    /// Assemble a label from a parser and builder.
    ///
    /// Every property starts at its registry default. The tree stays empty
    /// until the first rebuild.
    pub fn from_parts(parser: P, builder: B, config: LabelConfig) -> Self {
        let mut label = Self {
            parser,
            builder,
            props: registry().defaults(),
            tree: RenderTree::empty(),
            content: None,
            scheduler: RebuildScheduler::new(),
            waker: None,
            generation: 0,
            stats: LabelStats::default(),
            config,
        };
        if label.config.arm_on_create {
            label.scheduler.request();
        }
        label
    }

    /// Install the host's tick primitive. Wakes it at once if a rebuild is
    /// already due.
    pub fn set_waker(&mut self, waker: impl TickWaker + 'static) {
        let waker: Box<dyn TickWaker> = Box::new(waker);
        if self.scheduler.state() == SchedulerState::Armed {
            waker.wake();
        }
        self.waker = Some(waker);
    }

    #[must_use]
    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Classify a property name.
    pub fn classify(&self, name: &str) -> Result<Classification, UnknownPropertyError> {
        registry().classify(name)
    }

    /// The stored value of `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.props.get(name)
    }

    #[must_use]
    pub fn properties(&self) -> &PropertyMap {
        &self.props
    }

    /// The stored markup text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.props.str("text").unwrap_or_default()
    }

    /// The current render tree. Empty before the first rebuild.
    #[must_use]
    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    #[must_use]
    pub fn identity_set(&self) -> BTreeSet<NodeId> {
        self.tree.identity_set()
    }

    /// Link targets present in the current tree.
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        self.tree.links()
    }

    /// Plain text of the last parsed document; empty before the first rebuild.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.content
            .as_ref()
            .map(ParsedContent::plain_text)
            .unwrap_or_default()
    }

    /// The last parsed document.
    #[must_use]
    pub fn content(&self) -> Option<&P::Output> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn is_rebuild_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    #[must_use]
    pub fn stats(&self) -> LabelStats {
        self.stats
    }

    /// Set one property. Same as a one-entry [`apply_batch`](Self::apply_batch).
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<BatchReport, PropertyError> {
        self.apply_batch([(name, value.into())])
    }

    /// Replace the markup text.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<BatchReport, PropertyError> {
        self.set_property("text", text.into())
    }

    /// Apply `entries` as one transaction.
    ///
    /// Names are resolved before any mutation. Values are then validated and
    /// stored in order; style-only values reach the live tree before this
    /// returns. Structure values arm at most one rebuild. An invalid value
    /// stops the batch without undoing earlier entries.
    pub fn apply_batch<I, K, V>(&mut self, entries: I) -> Result<BatchReport, PropertyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PropertyValue>,
    {
        let resolved = entries
            .into_iter()
            .map(|(name, value)| Ok((registry().descriptor(name.as_ref())?, value.into())))
            .collect::<Result<Vec<(&'static PropertyDescriptor, PropertyValue)>, UnknownPropertyError>>()?;

        let mut report = BatchReport::default();
        let outcome = self.store_all(resolved, &mut report);
        if report.structure_changed > 0 {
            report.rebuild = Some(self.request_rebuild());
        }
        outcome?;

        tracing::debug!(
            style = report.style_applied,
            structure = report.structure_changed,
            nodes_updated = report.nodes_updated,
            rebuild = ?report.rebuild,
            "batch applied"
        );
        Ok(report)
    }

    /// Apply a [`Batch`].
    pub fn apply(&mut self, batch: Batch) -> Result<BatchReport, PropertyError> {
        self.apply_batch(batch)
    }

    fn store_all(
        &mut self,
        resolved: Vec<(&'static PropertyDescriptor, PropertyValue)>,
        report: &mut BatchReport,
    ) -> Result<(), PropertyError> {
        for (descriptor, value) in resolved {
            let value = descriptor.normalize(value)?;
            match descriptor.style_rule() {
                Some(rule) => {
                    let updated = apply_rule(&mut self.tree, descriptor.name, rule, &value)?;
                    self.props.insert(descriptor.name, value);
                    report.style_applied += 1;
                    report.nodes_updated += updated;
                    self.stats.style_updates += 1;
                }
                None => {
                    self.props.insert(descriptor.name, value);
                    report.structure_changed += 1;
                }
            }
        }
        Ok(())
    }

    /// Arm a rebuild for the next tick.
    pub fn request_rebuild(&mut self) -> RequestOutcome {
        let outcome = self.scheduler.request();
        match outcome {
            RequestOutcome::Scheduled => {
                if let Some(waker) = &self.waker {
                    waker.wake();
                }
            }
            RequestOutcome::Coalesced => {
                self.stats.coalesced_requests += 1;
                tracing::trace!(state = %self.scheduler.state(), "rebuild request coalesced");
            }
            RequestOutcome::Deferred => {
                tracing::trace!("rebuild requested during rebuild");
            }
        }
        outcome
    }

    /// Run the pending rebuild, if one is armed.
    ///
    /// Returns whether a rebuild ran.
    pub fn tick(&mut self) -> Result<bool, RebuildError> {
        if self.scheduler.state() != SchedulerState::Armed {
            return Ok(false);
        }
        self.rebuild().map(|()| true)
    }

    /// Rebuild synchronously whether or not a rebuild is armed. A pending
    /// request is consumed.
    pub fn force_rebuild_now(&mut self) -> Result<(), RebuildError> {
        self.rebuild()
    }

    fn rebuild(&mut self) -> Result<(), RebuildError> {
        let Some(generation) = self.generation.checked_add(1) else {
            self.scheduler.fail();
            self.stats.failed_rebuilds += 1;
            return Err(RebuildError {
                generation: self.generation,
                source: BuildError::Builder("node generations exhausted".to_owned()),
            });
        };
        self.generation = generation;

        let _span = tracing::debug_span!("rebuild", generation).entered();
        let started = Instant::now();
        self.scheduler.begin();
        self.tree = RenderTree::empty();

        match self.build(generation) {
            Ok(built) => {
                self.tree = built.tree;
                if built.rebuild_requested {
                    self.request_rebuild();
                }
                if self.scheduler.finish()
                    && let Some(waker) = &self.waker
                {
                    waker.wake();
                }
                self.stats.rebuilds += 1;

                let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                tracing::debug!(nodes = self.tree.len(), elapsed_us, "rebuild complete");
                if let Some(limit) = self.config.slow_rebuild_warn_us
                    && elapsed_us > limit
                {
                    tracing::warn!(elapsed_us, limit, "slow rebuild");
                }
                Ok(())
            }
            Err(source) => {
                self.scheduler.fail();
                self.stats.failed_rebuilds += 1;
                tracing::warn!(error = %source, "rebuild failed");
                Err(RebuildError { generation, source })
            }
        }
    }

    /// Parse, build, and replay style onto a tree of `generation`.
    fn build(&mut self, generation: u32) -> Result<Built, BuildError> {
        let content = self.parser.parse(self.props.str("text").unwrap_or_default());
        let mut ctx = BuildContext::new(generation);
        let result = self.builder.build(&content, &self.props, &mut ctx);
        self.content = Some(content);
        let root = result?;

        let mut built = ctx.finish()?;
        if built.tree.root() != Some(root) {
            return Err(BuildError::Builder(format!(
                "builder returned {root}, which is not the tree root"
            )));
        }
        for descriptor in registry().descriptors() {
            let Some(rule) = descriptor.style_rule() else {
                continue;
            };
            if let Some(value) = self.props.get(descriptor.name) {
                apply_rule(&mut built.tree, descriptor.name, rule, value)?;
            }
        }
        Ok(built)
    }
}

impl<P, B> fmt::Debug for MarkdownLabel<P, B>
where
    P: MarkupParser,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownLabel")
            .field("generation", &self.generation)
            .field("nodes", &self.tree.len())
            .field("scheduler", &self.scheduler.state())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
