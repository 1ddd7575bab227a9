//! Structured preview document: tagged nodes with typed styling and typed
//! inline-edit addresses. Backends (`html`, `crate::layout`) turn it into
//! markup or pixels; tests assert on it directly.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::editor::fields::EditTarget;
use crate::models::template::TemplateType;

// ────────────────────────────────────────────────────────────────────────────
// Colour
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parses `#RGB` or `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut it = digits.chars().map(|c| {
                    let v = c.to_digit(16).unwrap_or(0) as u8;
                    v * 17
                });
                Some(Color::rgb(it.next()?, it.next()?, it.next()?))
            }
            6 => Some(Color::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Linear blend towards `other`; `t` = 0 keeps `self`, 1 yields `other`.
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::rgb(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Display {
    /// Children stacked vertically; adjacent inline children share line boxes.
    #[default]
    Block,
    /// Flows inside the parent's line box.
    Inline,
    /// Children side by side in equal slots, the last one right-aligned.
    Row,
    /// Children are single-line chips that wrap onto new rows.
    Wrap,
    /// Children side by side with widths from `Style::columns`.
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Weight {
    Light,
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub side: Side,
    /// Thickness in css px.
    pub width: f32,
    pub color: Color,
}

/// Typed presentation attributes. Lengths are rem unless noted.
///
/// `font_size`, `weight`, `italic`, `uppercase`, `color` and `align` inherit
/// to descendants; everything else applies to the element's own box.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub display: Display,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<f32>,
    pub gap: f32,
    pub font_size: Option<f32>,
    pub weight: Option<Weight>,
    pub italic: bool,
    pub uppercase: bool,
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub align: Option<Align>,
    pub border: Option<Border>,
    pub padding: f32,
    pub margin_bottom: f32,
    /// Corner radius in css px.
    pub radius: f32,
    /// Honour line breaks inside text.
    pub pre_line: bool,
}

impl Style {
    pub fn new() -> Self {
        Style::default()
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn inline() -> Self {
        Style::new().display(Display::Inline)
    }

    pub fn columns(mut self, fractions: &[f32], gap: f32) -> Self {
        self.display = Display::Columns;
        self.columns = fractions.to_vec();
        self.gap = gap;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn size(mut self, rem: f32) -> Self {
        self.font_size = Some(rem);
        self
    }

    pub fn weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn bold(self) -> Self {
        self.weight(Weight::Bold)
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn border(mut self, side: Side, width: f32, color: Color) -> Self {
        self.border = Some(Border { side, width, color });
        self
    }

    pub fn padding(mut self, rem: f32) -> Self {
        self.padding = rem;
        self
    }

    pub fn margin_bottom(mut self, rem: f32) -> Self {
        self.margin_bottom = rem;
        self
    }

    pub fn radius(mut self, px: f32) -> Self {
        self.radius = px;
        self
    }

    pub fn pre_line(mut self) -> Self {
        self.pre_line = true;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    Header,
    Section,
    Aside,
    H1,
    H2,
    H3,
    H4,
    P,
    Span,
    Ul,
    Li,
}

/// Resume sections a layout may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Projects,
    Certifications,
    Contact,
}

/// Semantic marker on an element, independent of its visual heading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "section", rename_all = "camelCase")]
pub enum Mark {
    Header,
    Section(SectionKind),
    Heading(SectionKind),
}

/// A user-editable text node, addressable by the inline-edit binder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Editable {
    pub target: EditTarget,
    pub text: String,
    /// True when `text` is neutral placeholder copy for an empty field.
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    Element(Element),
    Text { text: String },
    Editable(Editable),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    pub style: Style,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Element {
            tag,
            mark: None,
            style: Style::default(),
            children: Vec::new(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn mark(mut self, mark: Mark) -> Self {
        self.mark = Some(mark);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Depth-first pre-order search over descendant elements, self included.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(el) => el.find(pred),
            _ => None,
        })
    }

    pub fn editables(&self) -> Vec<&Editable> {
        let mut out = Vec::new();
        self.collect_editables(&mut out);
        out
    }

    fn collect_editables<'a>(&'a self, out: &mut Vec<&'a Editable>) {
        for child in &self.children {
            match child {
                Node::Element(el) => el.collect_editables(out),
                Node::Editable(ed) => out.push(ed),
                Node::Text { .. } => {}
            }
        }
    }

    fn set_editable_text(&mut self, target: &EditTarget, text: &str) -> usize {
        let mut updated = 0;
        for child in &mut self.children {
            match child {
                Node::Element(el) => updated += el.set_editable_text(target, text),
                Node::Editable(ed) if ed.target == *target => {
                    ed.text = text.to_string();
                    ed.placeholder = false;
                    updated += 1;
                }
                _ => {}
            }
        }
        updated
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Text { text } => out.push_str(text),
            Node::Editable(ed) => out.push_str(&ed.text),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<Editable> for Node {
    fn from(ed: Editable) -> Self {
        Node::Editable(ed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// A fully rendered preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub template_type: TemplateType,
    pub accent: Color,
    /// Admin template background image URL, when one is applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub root: Element,
}

impl Document {
    pub fn header(&self) -> Option<&Element> {
        self.root.find(&|el| el.mark == Some(Mark::Header))
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Element> {
        self.root.find(&|el| el.mark == Some(Mark::Section(kind)))
    }

    pub fn heading(&self, kind: SectionKind) -> Option<&Element> {
        self.root.find(&|el| el.mark == Some(Mark::Heading(kind)))
    }

    /// Every heading element, whatever section it introduces.
    pub fn headings(&self) -> Vec<(SectionKind, String)> {
        let mut out = Vec::new();
        collect_headings(&self.root, &mut out);
        out
    }

    pub fn editables(&self) -> Vec<&Editable> {
        self.root.editables()
    }

    pub fn find_editable(&self, target: &EditTarget) -> Option<&Editable> {
        self.editables().into_iter().find(|ed| ed.target == *target)
    }

    /// Rewrites the text of every editable bound to `target` in place, without
    /// reconstructing the tree. Returns how many nodes changed.
    pub fn set_editable_text(&mut self, target: &EditTarget, text: &str) -> usize {
        self.root.set_editable_text(target, text)
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }
}

fn collect_headings(el: &Element, out: &mut Vec<(SectionKind, String)>) {
    if let Some(Mark::Heading(kind)) = el.mark {
        out.push((kind, el.text_content()));
    }
    for child in &el.children {
        if let Node::Element(child) = child {
            collect_headings(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::fields::{EditTarget, PersonalField};

    #[test]
    fn test_color_from_hex_forms() {
        assert_eq!(Color::from_hex("#2563EB"), Some(Color::rgb(0x25, 0x63, 0xEB)));
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#ÄÄÄÄÄÄ"), None);
    }

    #[test]
    fn test_color_display_and_mix() {
        assert_eq!(Color::rgb(0x1A, 0x23, 0x7E).to_string(), "#1A237E");
        assert_eq!(Color::BLACK.mix(Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(Color::BLACK.mix(Color::WHITE, 0.0), Color::BLACK);
    }

    #[test]
    fn test_set_editable_text_patches_in_place() {
        let target = EditTarget::personal(PersonalField::Name);
        let mut doc = Document {
            template_type: TemplateType::Modern,
            accent: Color::BLACK,
            background_image: None,
            root: Element::new(Tag::Div).child(
                Element::new(Tag::H1).child(Editable {
                    target: target.clone(),
                    text: "Your Name".to_string(),
                    placeholder: true,
                }),
            ),
        };
        assert_eq!(doc.set_editable_text(&target, "Ada"), 1);
        let ed = doc.find_editable(&target).unwrap();
        assert_eq!(ed.text, "Ada");
        assert!(!ed.placeholder);
        assert_eq!(doc.set_editable_text(&EditTarget::summary(), "x"), 0);
    }
}
