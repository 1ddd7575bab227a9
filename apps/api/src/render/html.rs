//! Markup backend for the preview document.

use std::fmt::Write;

use crate::render::document::{
    Align, Display, Document, Editable, Element, Node, Side, Style, Tag, Weight,
};

/// Serializes `doc` to an HTML fragment with inline styles. Editable nodes
/// become `contenteditable` spans carrying their address as data attributes.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    let mut root_style = css(&doc.root.style);
    root_style.push_str(&format!("--accent:{};", doc.accent));
    if let Some(url) = &doc.background_image {
        root_style.push_str(&format!(
            "background-image:url('{}');background-size:cover;",
            escape(url)
        ));
    }
    let _ = write!(
        out,
        "<div class=\"resume resume-{}\" style=\"{}\">",
        doc.template_type,
        escape(&root_style)
    );
    for child in &doc.root.children {
        write_node(&mut out, child);
    }
    out.push_str("</div>");
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(out, el),
        Node::Text { text } => out.push_str(&escape(text)),
        Node::Editable(ed) => write_editable(out, ed),
    }
}

fn write_element(out: &mut String, el: &Element) {
    let tag = tag_name(el.tag);
    let style = css(&el.style);
    if style.is_empty() {
        let _ = write!(out, "<{tag}>");
    } else {
        let _ = write!(out, "<{tag} style=\"{}\">", escape(&style));
    }
    for child in &el.children {
        write_node(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

fn write_editable(out: &mut String, ed: &Editable) {
    let _ = write!(
        out,
        "<span contenteditable=\"true\" data-section=\"{}\"",
        ed.target.section.key()
    );
    if let Some(field) = &ed.target.field {
        let _ = write!(out, " data-field=\"{}\"", escape(field));
    }
    if let Some(index) = ed.target.index {
        let _ = write!(out, " data-index=\"{index}\"");
    }
    if ed.placeholder {
        out.push_str(" data-placeholder=\"true\"");
    }
    let _ = write!(out, ">{}</span>", escape(&ed.text));
}

fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::Div => "div",
        Tag::Header => "header",
        Tag::Section => "section",
        Tag::Aside => "aside",
        Tag::H1 => "h1",
        Tag::H2 => "h2",
        Tag::H3 => "h3",
        Tag::H4 => "h4",
        Tag::P => "p",
        Tag::Span => "span",
        Tag::Ul => "ul",
        Tag::Li => "li",
    }
}

fn css(style: &Style) -> String {
    let mut s = String::new();
    match style.display {
        Display::Block => {}
        Display::Inline => s.push_str("display:inline;"),
        Display::Row => s.push_str("display:flex;justify-content:space-between;"),
        Display::Wrap => {
            let _ = write!(s, "display:flex;flex-wrap:wrap;gap:{}rem;", style.gap);
        }
        Display::Columns => {
            let cols: Vec<String> = style.columns.iter().map(|f| format!("{f}fr")).collect();
            let _ = write!(
                s,
                "display:grid;grid-template-columns:{};gap:{}rem;",
                cols.join(" "),
                style.gap
            );
        }
    }
    if let Some(size) = style.font_size {
        let _ = write!(s, "font-size:{size}rem;");
    }
    match style.weight {
        Some(Weight::Light) => s.push_str("font-weight:300;"),
        Some(Weight::Normal) => s.push_str("font-weight:400;"),
        Some(Weight::Bold) => s.push_str("font-weight:700;"),
        None => {}
    }
    if style.italic {
        s.push_str("font-style:italic;");
    }
    if style.uppercase {
        s.push_str("text-transform:uppercase;");
    }
    if let Some(color) = style.color {
        let _ = write!(s, "color:{color};");
    }
    if let Some(bg) = style.background {
        let _ = write!(s, "background:{bg};");
    }
    match style.align {
        Some(Align::Left) => s.push_str("text-align:left;"),
        Some(Align::Center) => s.push_str("text-align:center;"),
        Some(Align::Right) => s.push_str("text-align:right;"),
        None => {}
    }
    if let Some(border) = style.border {
        let side = match border.side {
            Side::Top => "border-top",
            Side::Bottom => "border-bottom",
            Side::Left => "border-left",
            Side::All => "border",
        };
        let _ = write!(s, "{side}:{}px solid {};", border.width, border.color);
    }
    if style.padding > 0.0 {
        let _ = write!(s, "padding:{}rem;", style.padding);
    }
    if style.margin_bottom > 0.0 {
        let _ = write!(s, "margin-bottom:{}rem;", style.margin_bottom);
    }
    if style.radius > 0.0 {
        let _ = write!(s, "border-radius:{}px;", style.radius);
    }
    if style.pre_line {
        s.push_str("white-space:pre-line;");
    }
    s
}

/// Escapes text for both element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
