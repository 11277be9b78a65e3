#![forbid(unsafe_code)]

//! The static property registry and classifier.
//!
//! Every property the label exposes appears exactly once in
//! [`PROPERTY_TABLE`]. Each entry says whether a change can be pushed onto
//! the existing render nodes ([`Classification::StyleOnly`]) or forces the
//! tree to be rebuilt from the parsed document ([`Classification::Structure`]).
//! For style-only entries the [`StyleRule`] names the target node subset and
//! the single attribute write performed on each target.
//!
//! # Invariants
//!
//! 1. Classification is a total static function of the name. It never looks at
//!    the current value or at node state.
//! 2. Names are unique; [`validate_table`] reports duplicates.
//! 3. The registry is built once per process and never mutated.
//!
//! # Example
//!
//! ```
//! use mdl_core::registry::{Classification, registry};
//!
//! assert_eq!(registry().classify("color"), Ok(Classification::StyleOnly));
//! assert_eq!(registry().classify("text"), Ok(Classification::Structure));
//! assert!(registry().classify("colour").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use ahash::AHashMap;

use crate::color::PackedRgba;
use crate::error::{ApplicationError, PropertyError, UnknownPropertyError};
use crate::node::{
    FontHinting, HAlign, NodeFilter, RenderNode, ShortenFrom, TextDirection, UnicodeErrors,
    VAlign,
};
use crate::value::{PropertyValue, ValueKind};

/// Whether a property change is applied in place or needs a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    StyleOnly,
    Structure,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StyleOnly => "style-only",
            Self::Structure => "structure",
        })
    }
}

/// One attribute write onto a node. The value is already normalized.
pub type ApplyFn = fn(&mut RenderNode, &PropertyValue) -> Result<(), String>;

/// How a style-only property reaches existing nodes.
#[derive(Clone, Copy)]
pub struct StyleRule {
    pub target: NodeFilter,
    pub apply: ApplyFn,
}

impl fmt::Debug for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRule")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    StyleOnly(StyleRule),
    Structure,
}

/// Registry entry for one property.
#[derive(Debug)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: ValueKind,
    pub behavior: Behavior,
    default: fn() -> PropertyValue,
}

impl PropertyDescriptor {
    const fn style(
        name: &'static str,
        kind: ValueKind,
        target: NodeFilter,
        apply: ApplyFn,
        default: fn() -> PropertyValue,
    ) -> Self {
        Self {
            name,
            kind,
            behavior: Behavior::StyleOnly(StyleRule { target, apply }),
            default,
        }
    }

    const fn structure(name: &'static str, kind: ValueKind, default: fn() -> PropertyValue) -> Self {
        Self {
            name,
            kind,
            behavior: Behavior::Structure,
            default,
        }
    }

    #[must_use]
    pub const fn classification(&self) -> Classification {
        match self.behavior {
            Behavior::StyleOnly(_) => Classification::StyleOnly,
            Behavior::Structure => Classification::Structure,
        }
    }

    #[must_use]
    pub const fn style_rule(&self) -> Option<StyleRule> {
        match self.behavior {
            Behavior::StyleOnly(rule) => Some(rule),
            Behavior::Structure => None,
        }
    }

    #[must_use]
    pub fn default_value(&self) -> PropertyValue {
        (self.default)()
    }

    /// Check `value` against this property's kind and return its stored form.
    pub fn normalize(&self, value: PropertyValue) -> Result<PropertyValue, ApplicationError> {
        self.kind
            .normalize(value)
            .map_err(|reason| ApplicationError::new(self.name, reason))
    }
}

// ---------------------------------------------------------------------------
// Apply helpers
// ---------------------------------------------------------------------------

fn float(v: &PropertyValue) -> Result<f64, String> {
    v.as_f64().ok_or_else(|| format!("expected number, got {}", v.type_name()))
}

fn flag(v: &PropertyValue) -> Result<bool, String> {
    v.as_bool().ok_or_else(|| format!("expected bool, got {}", v.type_name()))
}

fn string(v: &PropertyValue) -> Result<String, String> {
    v.as_str()
        .map(str::to_owned)
        .ok_or_else(|| format!("expected string, got {}", v.type_name()))
}

fn opt_string(v: &PropertyValue) -> Result<Option<String>, String> {
    v.as_opt_str()
        .map(|s| s.map(str::to_owned))
        .ok_or_else(|| format!("expected string or None, got {}", v.type_name()))
}

fn color(v: &PropertyValue) -> Result<PackedRgba, String> {
    v.as_color()
        .ok_or_else(|| format!("expected color, got {}", v.type_name()))
}

fn padding(v: &PropertyValue) -> Result<[f64; 4], String> {
    v.as_padding()
        .ok_or_else(|| format!("expected four padding values, got {}", v.type_name()))
}

fn keyword<T>(v: &PropertyValue, parse: fn(&str) -> Option<T>) -> Result<T, String> {
    let s = v
        .as_str()
        .ok_or_else(|| format!("expected keyword, got {}", v.type_name()))?;
    parse(s).ok_or_else(|| format!("unknown keyword {s:?}"))
}

fn opt_keyword<T>(v: &PropertyValue, parse: fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    match v {
        PropertyValue::None => Ok(None),
        other => keyword(other, parse).map(Some),
    }
}

// ---------------------------------------------------------------------------
// The table
// ---------------------------------------------------------------------------

pub const RENDER_MODES: &[&str] = &["widgets", "texture", "auto"];
pub const LINK_STYLES: &[&str] = &["unstyled", "styled"];

use NodeFilter as F;
use PropertyDescriptor as P;
use PropertyValue as V;
use ValueKind as K;

/// Every property of the label, in declaration order.
pub static PROPERTY_TABLE: &[PropertyDescriptor] = &[
    // Style-only.
    P::style(
        "base_font_size",
        K::PositiveFloat,
        F::LEAVES,
        |n, v| {
            n.style.font_size = float(v)? * n.scale;
            Ok(())
        },
        || V::Float(15.0),
    ),
    P::style(
        "font_name",
        K::Str,
        F::NON_CODE_LEAVES,
        |n, v| {
            n.style.font_name = string(v)?;
            Ok(())
        },
        || V::Str("Roboto".into()),
    ),
    P::style(
        "code_font_name",
        K::Str,
        F::CODE_LEAVES,
        |n, v| {
            n.style.font_name = string(v)?;
            Ok(())
        },
        || V::Str("RobotoMono-Regular".into()),
    ),
    P::style(
        "line_height",
        K::PositiveFloat,
        F::LEAVES,
        |n, v| {
            n.style.line_height = float(v)?;
            Ok(())
        },
        || V::Float(1.0),
    ),
    P::style(
        "color",
        K::Color,
        F::NON_CODE_LEAVES,
        |n, v| {
            n.style.color = color(v)?;
            Ok(())
        },
        || V::Color(PackedRgba::WHITE),
    ),
    P::style(
        "disabled",
        K::Bool,
        F::ALL,
        |n, v| {
            n.style.disabled = flag(v)?;
            Ok(())
        },
        || V::Bool(false),
    ),
    P::style(
        "disabled_color",
        K::Color,
        F::NON_CODE_LEAVES,
        |n, v| {
            n.style.disabled_color = color(v)?;
            Ok(())
        },
        || V::Color(PackedRgba::WHITE.with_alpha(77)),
    ),
    P::style(
        "outline_color",
        K::Color,
        F::LEAVES,
        |n, v| {
            n.style.outline_color = color(v)?;
            Ok(())
        },
        || V::Color(PackedRgba::BLACK),
    ),
    P::style(
        "outline_width",
        K::OptNonNegativeFloat,
        F::LEAVES,
        |n, v| {
            n.style.outline_width = match v {
                V::None => None,
                other => Some(float(other)?),
            };
            Ok(())
        },
        || V::None,
    ),
    P::style(
        "disabled_outline_color",
        K::Color,
        F::LEAVES,
        |n, v| {
            n.style.disabled_outline_color = color(v)?;
            Ok(())
        },
        || V::Color(PackedRgba::BLACK),
    ),
    P::style(
        "halign",
        K::Keyword(HAlign::KEYWORDS),
        F::NON_CODE_LEAVES,
        |n, v| {
            n.style.halign = keyword(v, HAlign::from_keyword)?;
            Ok(())
        },
        || V::Str("auto".into()),
    ),
    P::style(
        "valign",
        K::Keyword(VAlign::KEYWORDS),
        F::LEAVES,
        |n, v| {
            n.style.valign = keyword(v, VAlign::from_keyword)?;
            Ok(())
        },
        || V::Str("bottom".into()),
    ),
    P::style(
        "base_direction",
        K::OptKeyword(TextDirection::KEYWORDS),
        F::LEAVES,
        |n, v| {
            n.style.base_direction = opt_keyword(v, TextDirection::from_keyword)?;
            Ok(())
        },
        || V::None,
    ),
    P::style(
        "padding",
        K::Padding,
        F::ROOT,
        |n, v| {
            n.style.padding = padding(v)?;
            Ok(())
        },
        || V::Floats(vec![0.0; 4]),
    ),
    P::style(
        "text_padding",
        K::Padding,
        F::LEAVES,
        |n, v| {
            n.style.text_padding = padding(v)?;
            Ok(())
        },
        || V::Floats(vec![0.0; 4]),
    ),
    P::style(
        "mipmap",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.mipmap = flag(v)?;
            Ok(())
        },
        || V::Bool(false),
    ),
    P::style(
        "text_language",
        K::OptStr,
        F::LEAVES,
        |n, v| {
            n.style.text_language = opt_string(v)?;
            Ok(())
        },
        || V::None,
    ),
    P::style(
        "limit_render_to_text_bbox",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.limit_render_to_text_bbox = flag(v)?;
            Ok(())
        },
        || V::Bool(false),
    ),
    P::style(
        "font_family",
        K::OptStr,
        F::NON_CODE_LEAVES,
        |n, v| {
            n.style.font_family = opt_string(v)?;
            Ok(())
        },
        || V::None,
    ),
    P::style(
        "font_context",
        K::OptStr,
        F::LEAVES,
        |n, v| {
            n.style.font_context = opt_string(v)?;
            Ok(())
        },
        || V::None,
    ),
    P::style(
        "font_features",
        K::Str,
        F::LEAVES,
        |n, v| {
            n.style.font_features = string(v)?;
            Ok(())
        },
        || V::Str(String::new()),
    ),
    P::style(
        "font_hinting",
        K::OptKeyword(FontHinting::KEYWORDS),
        F::LEAVES,
        |n, v| {
            n.style.font_hinting = opt_keyword(v, FontHinting::from_keyword)?;
            Ok(())
        },
        || V::Str("normal".into()),
    ),
    P::style(
        "font_kerning",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.font_kerning = flag(v)?;
            Ok(())
        },
        || V::Bool(true),
    ),
    P::style(
        "font_blended",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.font_blended = flag(v)?;
            Ok(())
        },
        || V::Bool(true),
    ),
    P::style(
        "unicode_errors",
        K::Keyword(UnicodeErrors::KEYWORDS),
        F::LEAVES,
        |n, v| {
            n.style.unicode_errors = keyword(v, UnicodeErrors::from_keyword)?;
            Ok(())
        },
        || V::Str("replace".into()),
    ),
    P::style(
        "strip",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.strip = flag(v)?;
            Ok(())
        },
        || V::Bool(false),
    ),
    P::style(
        "shorten",
        K::Bool,
        F::LEAVES,
        |n, v| {
            n.style.shorten = flag(v)?;
            Ok(())
        },
        || V::Bool(false),
    ),
    P::style(
        "max_lines",
        K::NonNegativeInt,
        F::LEAVES,
        |n, v| {
            let lines = v
                .as_i64()
                .ok_or_else(|| format!("expected int, got {}", v.type_name()))?;
            n.style.max_lines = u32::try_from(lines).map_err(|e| e.to_string())?;
            Ok(())
        },
        || V::Int(0),
    ),
    P::style(
        "shorten_from",
        K::Keyword(ShortenFrom::KEYWORDS),
        F::LEAVES,
        |n, v| {
            n.style.shorten_from = keyword(v, ShortenFrom::from_keyword)?;
            Ok(())
        },
        || V::Str("center".into()),
    ),
    P::style(
        "split_str",
        K::Str,
        F::LEAVES,
        |n, v| {
            n.style.split_str = string(v)?;
            Ok(())
        },
        || V::Str(String::new()),
    ),
    P::style(
        "ellipsis_options",
        K::StrMap,
        F::LEAVES,
        |n, v| {
            n.style.ellipsis_options = v
                .as_map()
                .cloned()
                .ok_or_else(|| format!("expected map, got {}", v.type_name()))?;
            Ok(())
        },
        || V::Map(BTreeMap::new()),
    ),
    P::style(
        "text_size",
        K::Size,
        F::LEAVES,
        |n, v| {
            n.style.text_size = v
                .as_size()
                .ok_or_else(|| format!("expected size, got {}", v.type_name()))?;
            Ok(())
        },
        || V::Size(None, None),
    ),
    // Structure.
    P::structure("text", K::Str, || V::Str(String::new())),
    P::structure("render_mode", K::Keyword(RENDER_MODES), || {
        V::Str("widgets".into())
    }),
    P::structure("link_style", K::Keyword(LINK_STYLES), || {
        V::Str("unstyled".into())
    }),
    P::structure("strict_label_mode", K::Bool, || V::Bool(false)),
    P::structure("link_color", K::Color, || V::Color(PackedRgba::rgb(0, 128, 255))),
    P::structure("code_bg_color", K::Color, || V::Color(PackedRgba::rgb(38, 38, 38))),
    P::structure("fallback_enabled", K::Bool, || V::Bool(false)),
    P::structure("fallback_fonts", K::StrList, || V::Strings(Vec::new())),
    P::structure("fallback_font_scales", K::OptPositiveFloats, || V::None),
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static REGISTRY: LazyLock<PropertyRegistry> =
    LazyLock::new(|| PropertyRegistry::from_table(PROPERTY_TABLE));

/// The process-wide property registry.
#[must_use]
pub fn registry() -> &'static PropertyRegistry {
    &REGISTRY
}

/// Classify a property name against the process-wide registry.
pub fn classify(name: &str) -> Result<Classification, UnknownPropertyError> {
    registry().classify(name)
}

/// Name-indexed view over a descriptor table.
#[derive(Debug)]
pub struct PropertyRegistry {
    table: &'static [PropertyDescriptor],
    by_name: AHashMap<&'static str, &'static PropertyDescriptor>,
}

impl PropertyRegistry {
    /// Index `table`. Later duplicates shadow earlier ones; use
    /// [`validate_table`] to detect them.
    #[must_use]
    pub fn from_table(table: &'static [PropertyDescriptor]) -> Self {
        let by_name = table.iter().map(|d| (d.name, d)).collect();
        Self { table, by_name }
    }

    pub fn descriptor(&self, name: &str) -> Result<&'static PropertyDescriptor, UnknownPropertyError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| UnknownPropertyError::new(name))
    }

    pub fn classify(&self, name: &str) -> Result<Classification, UnknownPropertyError> {
        self.descriptor(name).map(PropertyDescriptor::classification)
    }

    /// The style rule for `name`, or `None` for structure properties.
    pub fn style_rule(&self, name: &str) -> Result<Option<StyleRule>, UnknownPropertyError> {
        self.descriptor(name).map(PropertyDescriptor::style_rule)
    }

    /// Validate and normalize a value for `name`.
    pub fn normalize(
        &self,
        name: &str,
        value: PropertyValue,
    ) -> Result<(&'static PropertyDescriptor, PropertyValue), PropertyError> {
        let descriptor = self.descriptor(name)?;
        let value = descriptor.normalize(value)?;
        Ok((descriptor, value))
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static PropertyDescriptor> {
        self.table.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.table.iter().map(|d| d.name)
    }

    pub fn style_only_names(&self) -> impl Iterator<Item = &'static str> {
        self.names_with(Classification::StyleOnly)
    }

    pub fn structure_names(&self) -> impl Iterator<Item = &'static str> {
        self.names_with(Classification::Structure)
    }

    fn names_with(&self, class: Classification) -> impl Iterator<Item = &'static str> {
        self.table
            .iter()
            .filter(move |d| d.classification() == class)
            .map(|d| d.name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// A property map holding every default value.
    #[must_use]
    pub fn defaults(&self) -> PropertyMap {
        let mut map = PropertyMap::default();
        for d in self.table {
            map.insert(d.name, d.default_value());
        }
        map
    }
}

/// Report names that appear more than once in `table`.
pub fn validate_table(table: &[PropertyDescriptor]) -> Result<(), Vec<&'static str>> {
    let mut seen = AHashMap::with_capacity(table.len());
    let mut duplicates = Vec::new();
    for d in table {
        if seen.insert(d.name, ()).is_some() && !duplicates.contains(&d.name) {
            duplicates.push(d.name);
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(duplicates)
    }
}

// ---------------------------------------------------------------------------
// PropertyMap
// ---------------------------------------------------------------------------

/// Current value of every property, keyed by registered name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    values: AHashMap<&'static str, PropertyValue>,
}

impl PropertyMap {
    pub fn insert(&mut self, name: &'static str, value: PropertyValue) -> Option<PropertyValue> {
        self.values.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    #[must_use]
    pub fn color(&self, name: &str) -> Option<PackedRgba> {
        self.get(name).and_then(PropertyValue::as_color)
    }

    #[must_use]
    pub fn strings(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(PropertyValue::as_strings)
    }

    #[must_use]
    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(PropertyValue::as_floats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeId, NodeKind, NodeRole};

    #[test]
    fn table_has_no_duplicates() {
        assert_eq!(validate_table(PROPERTY_TABLE), Ok(()));
        assert_eq!(registry().len(), PROPERTY_TABLE.len());
    }

    #[test]
    fn validate_table_reports_duplicates_once() {
        static DUPES: &[PropertyDescriptor] = &[
            P::structure("a", K::Bool, || V::Bool(false)),
            P::structure("a", K::Bool, || V::Bool(false)),
            P::structure("a", K::Bool, || V::Bool(false)),
            P::structure("b", K::Bool, || V::Bool(false)),
        ];
        assert_eq!(validate_table(DUPES), Err(vec!["a"]));
    }

    #[test]
    fn structure_set_matches_contract() {
        let mut names: Vec<_> = registry().structure_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "code_bg_color",
                "fallback_enabled",
                "fallback_font_scales",
                "fallback_fonts",
                "link_color",
                "link_style",
                "render_mode",
                "strict_label_mode",
                "text",
            ]
        );
    }

    #[test]
    fn style_and_structure_partition_the_table() {
        let style = registry().style_only_names().count();
        let structure = registry().structure_names().count();
        assert_eq!(style + structure, registry().len());
        assert_eq!(style, 32);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = classify("font_colour").unwrap_err();
        assert_eq!(err.name, "font_colour");
    }

    #[test]
    fn every_default_passes_its_own_kind() {
        for d in registry().descriptors() {
            let normalized = d.normalize(d.default_value());
            assert_eq!(normalized, Ok(d.default_value()), "default of {}", d.name);
        }
    }

    #[test]
    fn every_style_rule_applies_its_default() {
        for d in registry().descriptors() {
            let Some(rule) = d.style_rule() else { continue };
            let mut node = RenderNode::new(NodeId::new(1, 0), NodeKind::TextLeaf, NodeRole::Inline);
            assert_eq!((rule.apply)(&mut node, &d.default_value()), Ok(()), "{}", d.name);
        }
    }

    #[test]
    fn code_font_and_font_name_target_disjoint_leaves() {
        let font = registry().style_rule("font_name").unwrap().unwrap();
        let code = registry().style_rule("code_font_name").unwrap().unwrap();
        assert_eq!(font.target, NodeFilter::NON_CODE_LEAVES);
        assert_eq!(code.target, NodeFilter::CODE_LEAVES);
    }

    #[test]
    fn base_font_size_respects_node_scale() {
        let rule = registry().style_rule("base_font_size").unwrap().unwrap();
        let mut heading = RenderNode::new(NodeId::new(1, 0), NodeKind::TextLeaf, NodeRole::Heading(1));
        heading.scale = 2.0;
        (rule.apply)(&mut heading, &V::Float(14.0)).unwrap();
        assert_eq!(heading.style.font_size, 28.0);
    }

    #[test]
    fn padding_and_text_padding_write_separate_fields() {
        let mut leaf = RenderNode::new(NodeId::new(1, 0), NodeKind::TextLeaf, NodeRole::Inline);
        let outer = registry().style_rule("padding").unwrap().unwrap();
        let inner = registry().style_rule("text_padding").unwrap().unwrap();
        (outer.apply)(&mut leaf, &V::Floats(vec![1.0; 4])).unwrap();
        (inner.apply)(&mut leaf, &V::Floats(vec![2.0; 4])).unwrap();
        assert_eq!(leaf.style.padding, [1.0; 4]);
        assert_eq!(leaf.style.text_padding, [2.0; 4]);
    }

    #[test]
    fn max_lines_accepts_the_largest_normalized_count() {
        let (d, value) = registry().normalize("max_lines", V::Int(ValueKind::MAX_INT)).unwrap();
        let rule = d.style_rule().unwrap();
        let mut node = RenderNode::new(NodeId::new(1, 0), NodeKind::TextLeaf, NodeRole::Inline);
        (rule.apply)(&mut node, &value).unwrap();
        assert_eq!(node.style.max_lines, u32::MAX);
        assert!(registry().normalize("max_lines", V::Int(ValueKind::MAX_INT + 1)).is_err());
    }

    #[test]
    fn apply_rejects_wrong_shape() {
        let rule = registry().style_rule("color").unwrap().unwrap();
        let mut node = RenderNode::new(NodeId::new(1, 0), NodeKind::TextLeaf, NodeRole::Inline);
        assert!((rule.apply)(&mut node, &V::Bool(true)).is_err());
    }

    #[test]
    fn normalize_reports_property_name() {
        let err = registry().normalize("line_height", V::Float(-1.0)).unwrap_err();
        match err {
            PropertyError::Application(e) => assert_eq!(e.property, "line_height"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults_cover_every_name() {
        let defaults = registry().defaults();
        assert_eq!(defaults.len(), registry().len());
        assert_eq!(defaults.str("render_mode"), Some("widgets"));
        assert_eq!(defaults.bool("fallback_enabled"), Some(false));
    }
}
