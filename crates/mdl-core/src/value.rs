#![forbid(unsafe_code)]

//! Dynamically typed property values and their per-property value kinds.
//!
//! Every property accepts a [`PropertyValue`]. The registry pairs each name
//! with a [`ValueKind`] that normalizes loose input (an integer where a float
//! is expected, a color name where a color is expected, one padding value
//! where four are stored) into the single canonical shape the apply rules
//! and the tree builder read.

use std::collections::BTreeMap;
use std::fmt;

use crate::color::PackedRgba;

/// A property value as stored in the widget's property map.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Color(PackedRgba),
    Floats(Vec<f64>),
    Strings(Vec<String>),
    Map(BTreeMap<String, String>),
    /// Optional width and height constraint.
    Size(Option<f64>, Option<f64>),
}

impl PropertyValue {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Color(_) => "color",
            Self::Floats(_) => "float list",
            Self::Strings(_) => "string list",
            Self::Map(_) => "map",
            Self::Size(..) => "size",
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// `None` maps to `Some(None)`; a string maps to `Some(Some(..))`.
    #[must_use]
    pub fn as_opt_str(&self) -> Option<Option<&str>> {
        match self {
            Self::None => Some(None),
            Self::Str(s) => Some(Some(s)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<PackedRgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::Floats(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Strings(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_size(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self {
            Self::Size(w, h) => Some((*w, *h)),
            _ => None,
        }
    }

    /// Four padding values `[left, top, right, bottom]`.
    #[must_use]
    pub fn as_padding(&self) -> Option<[f64; 4]> {
        match self {
            Self::Floats(v) if v.len() == 4 => Some([v[0], v[1], v[2], v[3]]),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::Floats(v) => write!(f, "{v:?}"),
            Self::Strings(v) => write!(f, "{v:?}"),
            Self::Map(m) => write!(f, "{m:?}"),
            Self::Size(w, h) => write!(f, "({w:?}, {h:?})"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for PropertyValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<PackedRgba> for PropertyValue {
    fn from(v: PackedRgba) -> Self {
        Self::Color(v)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Floats(v)
    }
}

impl From<[f64; 4]> for PropertyValue {
    fn from(v: [f64; 4]) -> Self {
        Self::Floats(v.to_vec())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(v: Vec<String>) -> Self {
        Self::Strings(v)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(v: Vec<&str>) -> Self {
        Self::Strings(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<BTreeMap<String, String>> for PropertyValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

/// The accepted shape of one property's value.
///
/// [`ValueKind::normalize`] is the single validation point: it either returns
/// the canonical stored form or a human-readable reason for rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Str,
    OptStr,
    Color,
    /// Finite float strictly greater than zero.
    PositiveFloat,
    /// `None` or a finite float `>= 0`.
    OptNonNegativeFloat,
    /// Integer from 0 to [`ValueKind::MAX_INT`].
    NonNegativeInt,
    /// One of the listed keywords.
    Keyword(&'static [&'static str]),
    /// `None` or one of the listed keywords.
    OptKeyword(&'static [&'static str]),
    /// One, two, or four non-negative floats, stored as four.
    Padding,
    /// Optional width and height, each `>= 0`.
    Size,
    StrList,
    /// `None` or a list of finite floats `> 0`.
    OptPositiveFloats,
    StrMap,
}

impl ValueKind {
    /// Largest [`ValueKind::NonNegativeInt`]; counts are stored as `u32` on nodes.
    pub const MAX_INT: i64 = u32::MAX as i64;

    /// Validate `value` and convert it to its canonical stored form.
    pub fn normalize(self, value: PropertyValue) -> Result<PropertyValue, String> {
        use PropertyValue as V;

        let mismatch = |expected: &str, got: &PropertyValue| {
            format!("expected {expected}, got {}", got.type_name())
        };

        match self {
            Self::Bool => match value {
                V::Bool(_) => Ok(value),
                V::Int(0) => Ok(V::Bool(false)),
                V::Int(1) => Ok(V::Bool(true)),
                other => Err(mismatch("bool", &other)),
            },
            Self::Str => match value {
                V::Str(_) => Ok(value),
                other => Err(mismatch("string", &other)),
            },
            Self::OptStr => match value {
                V::None | V::Str(_) => Ok(value),
                other => Err(mismatch("string or None", &other)),
            },
            Self::Color => match value {
                V::Color(_) => Ok(value),
                V::Str(s) => PackedRgba::parse(&s).map(V::Color).map_err(|e| e.to_string()),
                V::Floats(ref v) if v.len() == 3 || v.len() == 4 => {
                    let alpha = v.get(3).copied().unwrap_or(1.0);
                    Ok(V::Color(PackedRgba::from_floats(v[0], v[1], v[2], alpha)))
                }
                other => Err(mismatch("color", &other)),
            },
            Self::PositiveFloat => {
                let v = value.as_f64().ok_or_else(|| mismatch("number", &value))?;
                if v.is_finite() && v > 0.0 {
                    Ok(V::Float(v))
                } else {
                    Err(format!("{v} is not a positive number"))
                }
            }
            Self::OptNonNegativeFloat => match value {
                V::None => Ok(V::None),
                other => {
                    let v = other.as_f64().ok_or_else(|| mismatch("number or None", &other))?;
                    non_negative(v).map(V::Float)
                }
            },
            Self::NonNegativeInt => match value {
                V::Int(v) if (0..=Self::MAX_INT).contains(&v) => Ok(V::Int(v)),
                V::Int(v) if v < 0 => Err(format!("{v} is negative")),
                V::Int(v) => Err(format!("{v} exceeds {}", Self::MAX_INT)),
                other => Err(mismatch("int", &other)),
            },
            Self::Keyword(allowed) => match value {
                V::Str(ref s) if allowed.contains(&s.as_str()) => Ok(value),
                V::Str(s) => Err(format!("{s:?} is not one of {allowed:?}")),
                other => Err(mismatch("keyword", &other)),
            },
            Self::OptKeyword(allowed) => match value {
                V::None => Ok(V::None),
                V::Str(ref s) if allowed.contains(&s.as_str()) => Ok(value),
                V::Str(s) => Err(format!("{s:?} is not one of {allowed:?}")),
                other => Err(mismatch("keyword or None", &other)),
            },
            Self::Padding => {
                let values = match value {
                    V::Float(_) | V::Int(_) => vec![value.as_f64().unwrap_or_default(); 4],
                    V::Floats(v) => match v.len() {
                        1 => vec![v[0]; 4],
                        2 => vec![v[0], v[1], v[0], v[1]],
                        4 => v,
                        n => return Err(format!("padding takes 1, 2, or 4 values, got {n}")),
                    },
                    other => return Err(mismatch("padding", &other)),
                };
                for v in &values {
                    non_negative(*v)?;
                }
                Ok(V::Floats(values))
            }
            Self::Size => match value {
                V::Size(w, h) => {
                    if let Some(w) = w {
                        non_negative(w)?;
                    }
                    if let Some(h) = h {
                        non_negative(h)?;
                    }
                    Ok(V::Size(w, h))
                }
                V::None => Ok(V::Size(None, None)),
                other => Err(mismatch("size", &other)),
            },
            Self::StrList => match value {
                V::Strings(_) => Ok(value),
                V::Str(s) => Ok(V::Strings(vec![s])),
                other => Err(mismatch("string list", &other)),
            },
            Self::OptPositiveFloats => match value {
                V::None => Ok(V::None),
                V::Floats(ref v) => {
                    if let Some(bad) = v.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
                        Err(format!("scale {bad} is not a positive number"))
                    } else {
                        Ok(value)
                    }
                }
                other => Err(mismatch("float list or None", &other)),
            },
            Self::StrMap => match value {
                V::Map(_) => Ok(value),
                other => Err(mismatch("map", &other)),
            },
        }
    }
}

fn non_negative(v: f64) -> Result<f64, String> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(format!("{v} is not a non-negative number"))
    }
}
