#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mdl_core::registry::registry;
use mdl_core::value::PropertyValue;
use mdl_runtime::MarkdownLabel;

#[derive(Debug, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Floats(Vec<f64>),
    Strings(Vec<String>),
}

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        match v {
            Value::None => Self::None,
            Value::Bool(b) => Self::Bool(b),
            Value::Int(i) => Self::Int(i),
            Value::Float(f) => Self::Float(f),
            Value::Str(s) => Self::Str(s),
            Value::Floats(v) => Self::Floats(v),
            Value::Strings(v) => Self::Strings(v),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Step {
    property: u8,
    value: Value,
    tick: bool,
}

fuzz_target!(|input: (String, Vec<Step>)| {
    let (text, steps) = input;
    let names: Vec<&str> = registry().names().collect();
    let mut label = MarkdownLabel::new();
    let _ = label.set_text(text);
    let _ = label.force_rebuild_now();

    for step in steps {
        let name = names[usize::from(step.property) % names.len()];
        let before = label.identity_set();
        let pending = label.is_rebuild_pending();
        let style_only = registry().style_rule(name).ok().flatten().is_some();
        let _ = label.set_property(name, PropertyValue::from(step.value));
        if style_only {
            assert_eq!(label.identity_set(), before);
            assert_eq!(label.is_rebuild_pending(), pending);
        }
        if step.tick {
            // Every stored value passed normalization, so replay cannot fail.
            assert!(label.tick().is_ok());
            assert!(!label.is_rebuild_pending());
        }
    }
});
