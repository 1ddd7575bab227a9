//! Box-and-line flow of a preview document.
//!
//! Units are css px at 96 dpi. The canvas is 794 px wide (A4 at 96 dpi) with
//! 20 mm padding and is at least one A4 page tall. Text is broken into lines
//! with a greedy word wrap, the same algorithm the metric tables were built for.

use serde::Serialize;

use crate::layout::TextMeasure;
use crate::render::document::{
    Align, Color, Display, Document, Element, Node, Side, Style, Weight,
};

pub const REM_PX: f32 = 16.0;
pub const PAGE_WIDTH_PX: f32 = 794.0;
/// A4 height at the same scale as `PAGE_WIDTH_PX`.
pub const PAGE_HEIGHT_PX: f32 = PAGE_WIDTH_PX * 842.0 / 595.0;
/// 20 mm at 96 dpi.
pub const PAGE_PADDING_PX: f32 = 75.6;
const LINE_HEIGHT: f32 = 1.4;
const ASCENT: f32 = 0.8;
const ROW_GAP_PX: f32 = 8.0;

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectOp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Rect(RectOp),
    Text(TextRun),
}

/// A flowed document, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub ops: Vec<DrawOp>,
}

impl Layout {
    /// A4 pages the canvas spans when scaled to page width.
    pub fn page_count(&self) -> usize {
        ((self.height / PAGE_HEIGHT_PX) - 1e-3).ceil().max(1.0) as usize
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::Rect(_) => None,
        })
    }
}

/// Flows `doc` onto the page canvas.
pub fn layout_document(doc: &Document, measure: &dyn TextMeasure) -> Layout {
    let mut flow = Flow {
        measure,
        ops: Vec::new(),
    };
    let base = TextStyle {
        size: REM_PX,
        bold: false,
        italic: false,
        uppercase: false,
        pre_line: false,
        color: Color::BLACK,
        align: Align::Left,
    };
    let content = flow.element(
        &doc.root,
        PAGE_PADDING_PX,
        PAGE_PADDING_PX,
        PAGE_WIDTH_PX - 2.0 * PAGE_PADDING_PX,
        base,
    );
    Layout {
        width: PAGE_WIDTH_PX,
        height: (content + 2.0 * PAGE_PADDING_PX).max(PAGE_HEIGHT_PX),
        background: Color::WHITE,
        ops: flow.ops,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inherited text style and tokens
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct TextStyle {
    size: f32,
    bold: bool,
    italic: bool,
    uppercase: bool,
    pre_line: bool,
    color: Color,
    align: Align,
}

impl TextStyle {
    fn inherit(&self, style: &Style) -> TextStyle {
        TextStyle {
            size: style.font_size.map(|rem| rem * REM_PX).unwrap_or(self.size),
            bold: match style.weight {
                Some(Weight::Bold) => true,
                Some(Weight::Normal | Weight::Light) => false,
                None => self.bold,
            },
            italic: self.italic || style.italic,
            uppercase: self.uppercase || style.uppercase,
            pre_line: self.pre_line || style.pre_line,
            color: style.color.unwrap_or(self.color),
            align: style.align.unwrap_or(self.align),
        }
    }

    fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String, TextStyle),
    Space(TextStyle),
    Break(TextStyle),
}

fn tokenize(text: &str, style: TextStyle, out: &mut Vec<Token>) {
    let mut word = String::new();
    for c in text.chars() {
        if c == '\n' && style.pre_line {
            flush_word(&mut word, style, out);
            out.push(Token::Break(style));
        } else if c.is_whitespace() {
            flush_word(&mut word, style, out);
            if !matches!(out.last(), Some(Token::Space(_))) {
                out.push(Token::Space(style));
            }
        } else {
            word.push(c);
        }
    }
    flush_word(&mut word, style, out);
}

fn flush_word(word: &mut String, style: TextStyle, out: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }
    let text = if style.uppercase {
        word.to_uppercase()
    } else {
        word.clone()
    };
    out.push(Token::Word(text, style));
    word.clear();
}

/// Tokens of `node` and everything inside it, as inline content.
fn inline_tokens(node: &Node, style: TextStyle, out: &mut Vec<Token>) {
    match node {
        Node::Text { text } => tokenize(text, style, out),
        Node::Editable(ed) => tokenize(&ed.text, style, out),
        Node::Element(el) => {
            let style = style.inherit(&el.style);
            for child in &el.children {
                inline_tokens(child, style, out);
            }
        }
    }
}

fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text { .. } | Node::Editable(_) => true,
        Node::Element(el) => el.style.display == Display::Inline,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

struct Line {
    runs: Vec<TextRun>,
    width: f32,
    height: f32,
}

struct Flow<'a> {
    measure: &'a dyn TextMeasure,
    ops: Vec<DrawOp>,
}

impl<'a> Flow<'a> {
    fn word_width(&self, word: &str, style: &TextStyle) -> f32 {
        self.measure.measure(word, style.size, style.bold)
    }

    /// Width of `tokens` set on one line.
    fn single_line_width(&self, tokens: &[Token]) -> f32 {
        let mut width = 0.0;
        let mut pending = 0.0;
        for token in tokens {
            match token {
                Token::Word(w, st) => {
                    if width > 0.0 {
                        width += pending;
                    }
                    width += self.word_width(w, st);
                    pending = 0.0;
                }
                Token::Space(st) => pending = self.word_width(" ", st),
                Token::Break(_) => {}
            }
        }
        width
    }

    /// Lays out one element box at (`x`, `y`). Returns its outer height,
    /// bottom margin included.
    fn element(&mut self, el: &Element, x: f32, y: f32, width: f32, parent: TextStyle) -> f32 {
        let style = parent.inherit(&el.style);
        let bg_slot = el.style.background.map(|_| {
            self.ops.push(DrawOp::Rect(RectOp {
                x,
                y,
                width,
                height: 0.0,
                color: Color::WHITE,
                radius: 0.0,
            }));
            self.ops.len() - 1
        });

        let pad = el.style.padding * REM_PX;
        let (left, top, bottom) = match el.style.border {
            Some(b) => match b.side {
                Side::Left => (b.width, 0.0, 0.0),
                Side::Top => (0.0, b.width, 0.0),
                Side::Bottom => (0.0, 0.0, b.width),
                Side::All => (b.width, b.width, b.width),
            },
            None => (0.0, 0.0, 0.0),
        };
        let right = if matches!(el.style.border, Some(b) if b.side == Side::All) {
            left
        } else {
            0.0
        };
        let inner_x = x + left + pad;
        let inner_y = y + top + pad;
        let inner_w = (width - left - right - 2.0 * pad).max(0.0);

        let content = match el.style.display {
            Display::Block | Display::Inline => self.children(&el.children, inner_x, inner_y, inner_w, style),
            Display::Row => self.row(&el.children, inner_x, inner_y, inner_w, style),
            Display::Wrap => self.wrap(&el.children, inner_x, inner_y, inner_w, style, el.style.gap),
            Display::Columns => self.columns(el, inner_x, inner_y, inner_w, style),
        };
        let height = content + top + bottom + 2.0 * pad;

        if let (Some(slot), Some(color)) = (bg_slot, el.style.background) {
            self.ops[slot] = DrawOp::Rect(RectOp {
                x,
                y,
                width,
                height,
                color,
                radius: el.style.radius,
            });
        }
        if let Some(b) = el.style.border {
            self.border(b.side, b.width, b.color, x, y, width, height);
        }
        height + el.style.margin_bottom * REM_PX
    }

    #[allow(clippy::too_many_arguments)]
    fn border(&mut self, side: Side, w: f32, color: Color, x: f32, y: f32, width: f32, height: f32) {
        let rect = |x, y, width, height| {
            DrawOp::Rect(RectOp {
                x,
                y,
                width,
                height,
                color,
                radius: 0.0,
            })
        };
        match side {
            Side::Top => self.ops.push(rect(x, y, width, w)),
            Side::Bottom => self.ops.push(rect(x, y + height - w, width, w)),
            Side::Left => self.ops.push(rect(x, y, w, height)),
            Side::All => {
                self.ops.push(rect(x, y, width, w));
                self.ops.push(rect(x, y + height - w, width, w));
                self.ops.push(rect(x, y, w, height));
                self.ops.push(rect(x + width - w, y, w, height));
            }
        }
    }

    /// Block formatting context: block children stack, runs of inline
    /// children share line boxes.
    fn children(&mut self, nodes: &[Node], x: f32, y: f32, width: f32, style: TextStyle) -> f32 {
        let mut cursor = y;
        let mut tokens = Vec::new();
        for node in nodes {
            if is_inline(node) {
                inline_tokens(node, style, &mut tokens);
                continue;
            }
            if !tokens.is_empty() {
                cursor += self.lines(&tokens, x, cursor, width, style.align);
                tokens.clear();
            }
            if let Node::Element(el) = node {
                cursor += self.element(el, x, cursor, width, style);
            }
        }
        if !tokens.is_empty() {
            cursor += self.lines(&tokens, x, cursor, width, style.align);
        }
        cursor - y
    }

    /// Leading children flush left, the last child flush right on one line.
    fn row(&mut self, nodes: &[Node], x: f32, y: f32, width: f32, style: TextStyle) -> f32 {
        let Some((last, rest)) = nodes.split_last() else {
            return 0.0;
        };
        if rest.is_empty() {
            return self.children(nodes, x, y, width, style);
        }
        let mut right = Vec::new();
        inline_tokens(last, style, &mut right);
        let right_w = self.single_line_width(&right);
        let left_w = (width - right_w - ROW_GAP_PX).max(width * 0.4);
        let left_h = self.children(rest, x, y, left_w, style);
        let right_h = self.lines(&right, x + width - right_w, y, right_w + 0.5, Align::Left);
        left_h.max(right_h)
    }

    /// Each child on one line as a chip; chips wrap onto new rows.
    fn wrap(&mut self, nodes: &[Node], x: f32, y: f32, width: f32, style: TextStyle, gap_rem: f32) -> f32 {
        let gap = gap_rem * REM_PX;
        let mut cursor_x = x;
        let mut cursor_y = y;
        let mut row_h: f32 = 0.0;
        for node in nodes {
            let (chip_style, chip) = match node {
                Node::Element(el) => (style.inherit(&el.style), Some(&el.style)),
                _ => (style, None),
            };
            let mut tokens = Vec::new();
            inline_tokens(node, style, &mut tokens);
            if tokens.is_empty() {
                continue;
            }
            let pad = chip.map(|s| s.padding * REM_PX).unwrap_or(0.0);
            let text_w = self.single_line_width(&tokens);
            let chip_w = text_w + 2.0 * pad;
            let chip_h = chip_style.line_height() + 2.0 * pad;
            if cursor_x > x && cursor_x + chip_w > x + width {
                cursor_x = x;
                cursor_y += row_h + gap;
                row_h = 0.0;
            }
            if let Some(s) = chip {
                if let Some(bg) = s.background {
                    self.ops.push(DrawOp::Rect(RectOp {
                        x: cursor_x,
                        y: cursor_y,
                        width: chip_w,
                        height: chip_h,
                        color: bg,
                        radius: s.radius,
                    }));
                }
                if let Some(b) = s.border {
                    self.border(b.side, b.width, b.color, cursor_x, cursor_y, chip_w, chip_h);
                }
            }
            self.lines(&tokens, cursor_x + pad, cursor_y + pad, text_w + 0.5, Align::Left);
            cursor_x += chip_w + gap;
            row_h = row_h.max(chip_h);
        }
        cursor_y + row_h - y
    }

    /// Children side by side at widths proportional to the column fractions.
    fn columns(&mut self, el: &Element, x: f32, y: f32, width: f32, style: TextStyle) -> f32 {
        let n = el.children.len();
        if n == 0 {
            return 0.0;
        }
        let gap = el.style.gap * REM_PX;
        let fractions: Vec<f32> = (0..n)
            .map(|i| el.style.columns.get(i).copied().unwrap_or(1.0))
            .collect();
        let total: f32 = fractions.iter().sum();
        let avail = (width - gap * (n as f32 - 1.0)).max(0.0);

        let mut cursor_x = x;
        let mut height: f32 = 0.0;
        for (child, fraction) in el.children.iter().zip(fractions) {
            let col_w = if total > 0.0 { avail * fraction / total } else { 0.0 };
            let h = match child {
                Node::Element(child) => self.element(child, cursor_x, y, col_w, style),
                other => self.children(std::slice::from_ref(other), cursor_x, y, col_w, style),
            };
            height = height.max(h);
            cursor_x += col_w + gap;
        }
        height
    }

    /// Greedy word wrap of `tokens` into `width`; emits one text run per
    /// same-styled stretch of a line. Returns the height used.
    fn lines(&mut self, tokens: &[Token], x: f32, y: f32, width: f32, align: Align) -> f32 {
        let mut lines: Vec<Line> = Vec::new();
        let mut line = Line {
            runs: Vec::new(),
            width: 0.0,
            height: 0.0,
        };
        let mut pending_space: Option<f32> = None;

        for token in tokens {
            match token {
                Token::Break(st) => {
                    line.height = line.height.max(st.line_height());
                    lines.push(std::mem::replace(
                        &mut line,
                        Line {
                            runs: Vec::new(),
                            width: 0.0,
                            height: 0.0,
                        },
                    ));
                    pending_space = None;
                }
                Token::Space(st) => {
                    if !line.runs.is_empty() {
                        pending_space = Some(self.word_width(" ", st));
                    }
                }
                Token::Word(word, st) => {
                    let word_w = self.word_width(word, st);
                    let mut space = pending_space.take().unwrap_or(0.0);
                    if !line.runs.is_empty() && line.width + space + word_w > width {
                        lines.push(std::mem::replace(
                            &mut line,
                            Line {
                                runs: Vec::new(),
                                width: 0.0,
                                height: 0.0,
                            },
                        ));
                        space = 0.0;
                    }
                    let start = line.width + space;
                    let same_style = line.runs.last().map_or(false, |run| {
                        run.size == st.size
                            && run.bold == st.bold
                            && run.italic == st.italic
                            && run.color == st.color
                    });
                    match line.runs.last_mut() {
                        Some(run) if same_style => {
                            if space > 0.0 {
                                run.text.push(' ');
                            }
                            run.text.push_str(word);
                        }
                        _ => line.runs.push(TextRun {
                            x: start,
                            baseline: 0.0,
                            text: word.clone(),
                            size: st.size,
                            color: st.color,
                            bold: st.bold,
                            italic: st.italic,
                        }),
                    }
                    line.width = start + word_w;
                    line.height = line.height.max(st.line_height());
                }
            }
        }
        if !line.runs.is_empty() {
            lines.push(line);
        }

        let mut cursor = y;
        for line in lines {
            let offset = match align {
                Align::Left => 0.0,
                Align::Center => ((width - line.width) / 2.0).max(0.0),
                Align::Right => (width - line.width).max(0.0),
            };
            for mut run in line.runs {
                run.x += x + offset;
                run.baseline = cursor + (line.height - run.size) / 2.0 + run.size * ASCENT;
                self.ops.push(DrawOp::Text(run));
            }
            cursor += line.height;
        }
        cursor - y
    }
}
