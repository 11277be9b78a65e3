#![forbid(unsafe_code)]

//! Proptest strategies over registered properties.
//!
//! Every generated value is accepted by its property's normalizer and by the
//! attribute write of its style rule.

use std::collections::BTreeMap;

use mdl_core::color::PackedRgba;
use mdl_core::registry::{PropertyDescriptor, registry};
use mdl_core::value::{PropertyValue, ValueKind};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;

fn finite(range: std::ops::Range<f64>) -> impl Strategy<Value = f64> {
    range.prop_filter("finite", |v| v.is_finite())
}

fn short_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _-]{0,12}"
}

fn color() -> impl Strategy<Value = PackedRgba> {
    any::<(u8, u8, u8, u8)>().prop_map(|(r, g, b, a)| PackedRgba::rgba(r, g, b, a))
}

fn keyword(allowed: &'static [&'static str]) -> BoxedStrategy<PropertyValue> {
    prop::sample::select(allowed)
        .prop_map(PropertyValue::from)
        .boxed()
}

/// A valid value of `kind`.
#[must_use]
pub fn valid_value(kind: ValueKind) -> BoxedStrategy<PropertyValue> {
    use PropertyValue as V;

    match kind {
        ValueKind::Bool => any::<bool>().prop_map(V::Bool).boxed(),
        ValueKind::Str => short_string().prop_map(V::Str).boxed(),
        ValueKind::OptStr => prop::option::of(short_string()).prop_map(V::from).boxed(),
        ValueKind::Color => color().prop_map(V::Color).boxed(),
        ValueKind::PositiveFloat => finite(0.5..96.0).prop_map(V::Float).boxed(),
        ValueKind::OptNonNegativeFloat => prop::option::of(finite(0.0..8.0))
            .prop_map(V::from)
            .boxed(),
        ValueKind::NonNegativeInt => prop_oneof![
            0i64..1_000,
            0..=ValueKind::MAX_INT,
            Just(ValueKind::MAX_INT),
        ]
        .prop_map(V::Int)
        .boxed(),
        ValueKind::Keyword(allowed) => keyword(allowed),
        ValueKind::OptKeyword(allowed) => prop_oneof![Just(V::None), keyword(allowed)].boxed(),
        ValueKind::Padding => prop::collection::vec(finite(0.0..32.0), 4)
            .prop_map(V::Floats)
            .boxed(),
        ValueKind::Size => (
            prop::option::of(finite(0.0..500.0)),
            prop::option::of(finite(0.0..500.0)),
        )
            .prop_map(|(w, h)| V::Size(w, h))
            .boxed(),
        ValueKind::StrList => prop::collection::vec(short_string(), 0..4)
            .prop_map(V::Strings)
            .boxed(),
        ValueKind::OptPositiveFloats => prop::option::of(prop::collection::vec(
            finite(0.25..4.0),
            0..4,
        ))
        .prop_map(|v| v.map_or(V::None, V::Floats))
        .boxed(),
        ValueKind::StrMap => prop::collection::btree_map("[a-z]{1,6}", short_string(), 0..3)
            .prop_map(|m: BTreeMap<String, String>| V::Map(m))
            .boxed(),
    }
}

/// Any registered property.
pub fn descriptor() -> impl Strategy<Value = &'static PropertyDescriptor> {
    prop::sample::select(registry().descriptors().collect::<Vec<_>>())
}

/// A registered style-only property together with a valid value for it.
pub fn style_assignment() -> impl Strategy<Value = (&'static str, PropertyValue)> {
    let names: Vec<&'static str> = registry().style_only_names().collect();
    prop::sample::select(names).prop_flat_map(|name| {
        let kind = registry()
            .descriptor(name)
            .map_or(ValueKind::Bool, |d| d.kind);
        valid_value(kind).prop_map(move |v| (name, v))
    })
}

/// A structure property together with a valid value for it.
///
/// `text` draws from small markdown fragments so rebuilds produce
/// non-trivial trees.
pub fn structure_assignment() -> impl Strategy<Value = (&'static str, PropertyValue)> {
    let names: Vec<&'static str> = registry().structure_names().collect();
    prop::sample::select(names).prop_flat_map(|name| match name {
        "text" => markdown().prop_map(move |t| (name, PropertyValue::Str(t))).boxed(),
        _ => {
            let kind = registry()
                .descriptor(name)
                .map_or(ValueKind::Bool, |d| d.kind);
            valid_value(kind).prop_map(move |v| (name, v)).boxed()
        }
    })
}

const FRAGMENTS: &[&str] = &[
    "# Title\n\n",
    "## Sub\n\n",
    "plain words\n\n",
    "*em* and **strong**\n\n",
    "- one\n- two\n\n",
    "1. first\n2. second\n\n",
    "> quoted\n\n",
    "```\ncode\n```\n\n",
    "see [docs](https://example.com)\n\n",
    "`inline`\n\n",
    "---\n\n",
];

/// Markdown assembled from well-formed block fragments.
pub fn markdown() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..6).prop_map(|parts| parts.concat())
}
