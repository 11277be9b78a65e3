#![forbid(unsafe_code)]

//! Render-node data: identity, kind, presentation attributes.
//!
//! A [`RenderNode`] is one element of the tree the label projects its
//! document onto. Nodes are created by a tree builder in one batch and are
//! destroyed together on the next rebuild.
//!
//! # Invariants
//!
//! 1. A [`NodeId`] is assigned once, when the node is created, and is never
//!    changed while the node lives.
//! 2. Two trees built by the same widget never share a `NodeId`: every
//!    rebuild uses a fresh generation.
//! 3. Style application only writes into [`NodeStyle`]; kind, text, parent,
//!    and children are fixed by the builder.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;

use crate::color::PackedRgba;

/// Stable identity of a render node: `(generation, index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    generation: u32,
    index: u32,
}

impl NodeId {
    #[must_use]
    pub const fn new(generation: u32, index: u32) -> Self {
        Self { generation, index }
    }

    /// The rebuild generation this node belongs to.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Arena slot within its generation.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Prose text: headings, paragraph runs, list markers.
    TextLeaf,
    /// Code spans and code blocks. Color and font are pinned.
    CodeLeaf,
    Container,
}

impl NodeKind {
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::Container)
    }

    #[must_use]
    pub const fn as_set(self) -> NodeKinds {
        match self {
            Self::TextLeaf => NodeKinds::TEXT_LEAF,
            Self::CodeLeaf => NodeKinds::CODE_LEAF,
            Self::Container => NodeKinds::CONTAINER,
        }
    }
}

bitflags! {
    /// A set of node kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeKinds: u8 {
        const TEXT_LEAF = 1 << 0;
        const CODE_LEAF = 1 << 1;
        const CONTAINER = 1 << 2;
        const LEAVES = Self::TEXT_LEAF.bits() | Self::CODE_LEAF.bits();
    }
}

/// Which nodes a style rule targets, as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeFilter {
    kinds: NodeKinds,
    root_only: bool,
}

impl NodeFilter {
    pub const ALL: Self = Self::kinds(NodeKinds::all());
    pub const LEAVES: Self = Self::kinds(NodeKinds::LEAVES);
    pub const NON_CODE_LEAVES: Self = Self::kinds(NodeKinds::TEXT_LEAF);
    pub const CODE_LEAVES: Self = Self::kinds(NodeKinds::CODE_LEAF);
    pub const CONTAINERS: Self = Self::kinds(NodeKinds::CONTAINER);
    pub const ROOT: Self = Self {
        kinds: NodeKinds::all(),
        root_only: true,
    };

    #[must_use]
    pub const fn kinds(kinds: NodeKinds) -> Self {
        Self {
            kinds,
            root_only: false,
        }
    }

    #[must_use]
    pub fn matches(&self, node: &RenderNode) -> bool {
        if self.root_only && node.parent.is_some() {
            return false;
        }
        self.kinds.contains(node.kind.as_set())
    }
}

/// What document construct a node renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Document,
    Heading(u8),
    Paragraph,
    Inline,
    Link,
    CodeSpan,
    CodeBlock,
    Quote,
    List,
    ListItem,
    ListMarker,
    Rule,
    /// The single rasterized leaf of texture render mode.
    Texture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    #[default]
    Auto,
    Left,
    Center,
    Right,
    Justify,
}

impl HAlign {
    pub const KEYWORDS: &'static [&'static str] = &["auto", "left", "center", "right", "justify"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "auto" => Self::Auto,
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            "justify" => Self::Justify,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VAlign {
    #[default]
    Bottom,
    Middle,
    Top,
}

impl VAlign {
    pub const KEYWORDS: &'static [&'static str] = &["top", "middle", "center", "bottom"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "top" => Self::Top,
            "middle" | "center" => Self::Middle,
            "bottom" => Self::Bottom,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
    Ltr,
    Rtl,
    WeakLtr,
    WeakRtl,
}

impl TextDirection {
    pub const KEYWORDS: &'static [&'static str] = &["ltr", "rtl", "weak_ltr", "weak_rtl"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "ltr" => Self::Ltr,
            "rtl" => Self::Rtl,
            "weak_ltr" => Self::WeakLtr,
            "weak_rtl" => Self::WeakRtl,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontHinting {
    Normal,
    Light,
    Mono,
}

impl FontHinting {
    pub const KEYWORDS: &'static [&'static str] = &["normal", "light", "mono"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "normal" => Self::Normal,
            "light" => Self::Light,
            "mono" => Self::Mono,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnicodeErrors {
    Strict,
    #[default]
    Replace,
    Ignore,
}

impl UnicodeErrors {
    pub const KEYWORDS: &'static [&'static str] = &["strict", "replace", "ignore"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "strict" => Self::Strict,
            "replace" => Self::Replace,
            "ignore" => Self::Ignore,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShortenFrom {
    Left,
    #[default]
    Center,
    Right,
}

impl ShortenFrom {
    pub const KEYWORDS: &'static [&'static str] = &["left", "center", "right"];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => return None,
        })
    }
}

/// Mutable presentation attributes, one field per style-only property target.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub font_size: f64,
    pub font_name: String,
    pub line_height: f64,
    pub color: PackedRgba,
    pub disabled: bool,
    pub disabled_color: PackedRgba,
    pub outline_color: PackedRgba,
    pub outline_width: Option<f64>,
    pub disabled_outline_color: PackedRgba,
    pub halign: HAlign,
    pub valign: VAlign,
    pub base_direction: Option<TextDirection>,
    /// Container padding, `[left, top, right, bottom]`.
    pub padding: [f64; 4],
    /// Padding around a leaf's own text, same order as `padding`.
    pub text_padding: [f64; 4],
    pub mipmap: bool,
    pub text_language: Option<String>,
    pub limit_render_to_text_bbox: bool,
    pub font_family: Option<String>,
    pub font_context: Option<String>,
    pub font_features: String,
    pub font_hinting: Option<FontHinting>,
    pub font_kerning: bool,
    pub font_blended: bool,
    pub unicode_errors: UnicodeErrors,
    pub strip: bool,
    pub shorten: bool,
    pub max_lines: u32,
    pub shorten_from: ShortenFrom,
    pub split_str: String,
    pub ellipsis_options: BTreeMap<String, String>,
    pub text_size: (Option<f64>, Option<f64>),
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            font_name: "Roboto".to_owned(),
            line_height: 1.0,
            color: PackedRgba::WHITE,
            disabled: false,
            disabled_color: PackedRgba::WHITE.with_alpha(77),
            outline_color: PackedRgba::BLACK,
            outline_width: None,
            disabled_outline_color: PackedRgba::BLACK,
            halign: HAlign::Auto,
            valign: VAlign::Bottom,
            base_direction: None,
            padding: [0.0; 4],
            text_padding: [0.0; 4],
            mipmap: false,
            text_language: None,
            limit_render_to_text_bbox: false,
            font_family: None,
            font_context: None,
            font_features: String::new(),
            font_hinting: Some(FontHinting::Normal),
            font_kerning: true,
            font_blended: true,
            unicode_errors: UnicodeErrors::Replace,
            strip: false,
            shorten: false,
            max_lines: 0,
            shorten_from: ShortenFrom::Center,
            split_str: String::new(),
            ellipsis_options: BTreeMap::new(),
            text_size: (None, None),
        }
    }
}

/// A fallback font resolved at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackFont {
    pub name: String,
    pub scale: f64,
}

/// One element of a render tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub role: NodeRole,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Text content for leaves; empty for containers.
    pub text: String,
    /// Multiplier applied to the base font size (heading levels).
    pub scale: f64,
    pub style: NodeStyle,
    /// Link target for link leaves.
    pub link: Option<String>,
    pub link_color: Option<PackedRgba>,
    pub background: Option<PackedRgba>,
    pub strong: bool,
    pub emphasis: bool,
    pub strict: bool,
    pub rasterized: bool,
    pub fallback_fonts: Vec<FallbackFont>,
}

impl RenderNode {
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind, role: NodeRole) -> Self {
        Self {
            id,
            kind,
            role,
            parent: None,
            children: Vec::new(),
            text: String::new(),
            scale: 1.0,
            style: NodeStyle::default(),
            link: None,
            link_color: None,
            background: None,
            strong: false,
            emphasis: false,
            strict: false,
            rasterized: false,
            fallback_fonts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
