// A thin Rust wrapper to handle SVG tags and render them to markup.

use std::{collections::BTreeMap, fmt::Write};

// ----------------------------------------------------------------------------
//
//
// Rust representation and rendering of SVG tags.
//
//
// ----------------------------------------------------------------------------

/// Attributes and style properties. Sorted, so rendering is deterministic.
pub type Params = BTreeMap<String, String>;

pub trait RenderTag: std::fmt::Debug {
    fn render(&self, buf: &mut String);
}

impl<T> RenderTag for Tag<T>
where
    T: Identifier + std::fmt::Debug,
{
    fn render(&self, buf: &mut String) {
        let _ = write!(buf, "<{}", self.kind.identifier());
        for (k, v) in self.parameters.iter() {
            let _ = write!(buf, " {k}=\"{}\"", escape(v));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{k}:{}", escape(v)))
                .collect();
            let _ = write!(buf, " style=\"{}\"", style.join(";"));
        }
        if !self.closing {
            buf.push_str(" />");
            return;
        }
        buf.push('>');
        for c in self.children.iter() {
            c.render(buf);
        }
        let _ = write!(buf, "</{}>", self.kind.identifier());
    }
}

/// Raw text content of a tag.
#[derive(Debug)]
struct Content(String);

impl RenderTag for Content {
    fn render(&self, buf: &mut String) {
        buf.push_str(&escape(&self.0));
    }
}

pub fn render(svg_tag: &Tag<Svg>) -> String {
    let mut raw_svg = String::new();
    svg_tag.render(&mut raw_svg);
    raw_svg
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for chr in raw.chars() {
        match chr {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(chr),
        }
    }
    escaped
}

#[derive(Debug)]
pub struct Tag<T>
where
    T: std::fmt::Debug,
{
    parameters: Params,
    style: Params,
    children: Vec<Box<dyn RenderTag>>,
    /// Tags with children are rendered with a closing tag, all others are
    /// self-closing.
    closing: bool,
    kind: T,
}

impl<T> Tag<T>
where
    T: std::fmt::Debug,
{
    fn with_kind(
        kind: T,
        parameters: &[(&str, String)],
        style: Option<Params>,
        closing: bool,
    ) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_owned()))
                .collect(),
            style: style.unwrap_or_default(),
            children: Vec::new(),
            closing,
            kind,
        }
    }

    pub fn add_child(&mut self, child: impl RenderTag + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn add_children(&mut self, children: Vec<Box<dyn RenderTag>>) {
        self.children.extend(children);
    }
}

// ----------------------------------------------------------------------------
//
//
// Creation of `new` tags.
//
//
// ----------------------------------------------------------------------------

impl Tag<Svg> {
    pub fn new(width: u64, height: u64, style: Option<Params>) -> Self {
        Self::with_kind(
            Svg,
            &[
                ("width", format!("{width}")),
                ("height", format!("{height}")),
                ("viewBox", format!("0 0 {width} {height}")),
                ("xmlns", "http://www.w3.org/2000/svg".to_string()),
            ],
            style,
            true,
        )
    }
}

impl Tag<Group> {
    pub fn new(style: Option<Params>) -> Self {
        Self::with_kind(Group, &[], style, true)
    }
}

impl Tag<Circle> {
    pub fn new(cx: f64, cy: f64, r: f64, style: Option<Params>) -> Self {
        Self::with_kind(
            Circle,
            &[
                ("cx", format!("{cx:.2}")),
                ("cy", format!("{cy:.2}")),
                ("r", format!("{r}")),
            ],
            style,
            false,
        )
    }
}

impl Tag<Rect> {
    pub fn new(x: f64, y: f64, width: f64, height: f64, style: Option<Params>) -> Self {
        Self::with_kind(
            Rect,
            &[
                ("x", format!("{x:.2}")),
                ("y", format!("{y:.2}")),
                ("width", format!("{width:.2}")),
                ("height", format!("{height:.2}")),
            ],
            style,
            false,
        )
    }
}

impl Tag<Text> {
    pub fn new(x: f64, y: f64, angle: f64, text: &str, style: Option<Params>) -> Self {
        let mut res = Self::with_kind(
            Text,
            &[(
                "transform",
                format!("translate({x:.2},{y:.2}) rotate({angle})"),
            )],
            style,
            true,
        );
        res.add_child(Content(text.to_string()));
        res
    }
}

impl Tag<Line> {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, style: Option<Params>) -> Self {
        Self::with_kind(
            Line,
            &[
                ("x1", format!("{x1:.2}")),
                ("x2", format!("{x2:.2}")),
                ("y1", format!("{y1:.2}")),
                ("y2", format!("{y2:.2}")),
            ],
            style,
            false,
        )
    }
}

// ----------------------------------------------------------------------------
//
//
// SVG tag kinds and their str representation (`identifier`)
//
//
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Svg;
#[derive(Debug)]
pub struct Group;
#[derive(Debug)]
pub struct Circle;
#[derive(Debug)]
pub struct Rect;
#[derive(Debug)]
pub struct Text;
#[derive(Debug)]
pub struct Line;

pub trait Identifier {
    fn identifier(&self) -> &'static str;
}

impl Identifier for Svg {
    fn identifier(&self) -> &'static str {
        "svg"
    }
}

impl Identifier for Group {
    fn identifier(&self) -> &'static str {
        "g"
    }
}

impl Identifier for Circle {
    fn identifier(&self) -> &'static str {
        "circle"
    }
}

impl Identifier for Rect {
    fn identifier(&self) -> &'static str {
        "rect"
    }
}

impl Identifier for Text {
    fn identifier(&self) -> &'static str {
        "text"
    }
}

impl Identifier for Line {
    fn identifier(&self) -> &'static str {
        "line"
    }
}

pub fn opts(items: &[(&str, &str)]) -> Option<Params> {
    Some(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}
