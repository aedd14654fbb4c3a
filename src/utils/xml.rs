//! Minimal XML element tree for path lookups on E-utilities responses.
//!
//! Supports the small path language the PubMed parsers need:
//! `Name` (child), `A/B` (child of child), `.//Name` (any descendant) and
//! combinations such as `.//PubDate/Year`.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::sources::SourceError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            nodes: Vec::new(),
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    stack.push(Element::new(name));
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    attach(&mut stack, &mut root, Element::new(name))?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SourceError::Parse("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape()?;
                        parent.nodes.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        parent.nodes.push(Node::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(SourceError::Parse(format!(
                "unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }

        root.ok_or_else(|| SourceError::Parse("document has no root element".to_string()))
    }

    /// Local tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// All text below this element, concatenated and trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    fn descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in self.children() {
            out.push(child);
            child.descendants(out);
        }
    }

    /// Every element matching `path`, in document order.
    pub fn find_all(&self, path: &str) -> Vec<&Element> {
        let mut current: Vec<&Element> = vec![self];

        for (axis, name) in parse_path(path) {
            let mut next = Vec::new();
            for element in current {
                match axis {
                    Axis::Child => next.extend(element.children().filter(|c| c.name == name)),
                    Axis::Descendant => {
                        let mut all = Vec::new();
                        element.descendants(&mut all);
                        next.extend(all.into_iter().filter(|c| c.name == name));
                    }
                }
            }
            current = next;
        }

        current
    }

    /// First element matching `path`
    pub fn find(&self, path: &str) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }

    /// Text of the first element matching `path`, or `None` when there is no
    /// match or the match has no text.
    pub fn find_text(&self, path: &str) -> Option<String> {
        self.find(path)
            .map(Element::text)
            .filter(|text| !text.is_empty())
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), SourceError> {
    match stack.last_mut() {
        Some(parent) => parent.nodes.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(SourceError::Parse(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn parse_path(path: &str) -> Vec<(Axis, &str)> {
    let path = path.strip_prefix('.').unwrap_or(path);
    let mut steps = Vec::new();
    let mut axis = Axis::Child;

    for segment in path.split('/') {
        if segment.is_empty() {
            // "//" marks the next step as a descendant search
            if !steps.is_empty() || path.starts_with("//") {
                axis = Axis::Descendant;
            }
            continue;
        }
        steps.push((axis, segment));
        axis = Axis::Child;
    }

    steps
}
