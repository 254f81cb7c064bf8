//! In-memory XML element tree
//!
//! PrairieView metadata lives entirely in element names and attributes, so
//! the tree keeps only those and drops text content. Children are stored in
//! document order and every query preserves it.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use crate::error::{MetadataError, MetadataResult};

/// XML tree construction errors
#[derive(Debug, Error)]
pub enum TreeError {
    /// Parser-level syntax error
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    /// Closing tag without a matching open element
    #[error("unexpected closing tag </{0}>")]
    Unbalanced(String),

    /// Input ended while an element was still open
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// More than one top-level element
    #[error("multiple root elements")]
    MultipleRoots,

    /// No element at all
    #[error("document has no root element")]
    Empty,
}

/// One XML element with its attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Parse a complete document and return its root element
    pub fn parse(xml: &str) -> Result<Element, TreeError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        TreeError::Unbalanced(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(TreeError::Unclosed(open.name.clone()));
        }
        root.ok_or(TreeError::Empty)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, TreeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True if the attribute exists and equals `value`
    pub fn attr_is(&self, key: &str, value: &str) -> bool {
        self.attr(key) == Some(value)
    }

    /// Attribute value, or `MissingNode` naming `field@key`
    pub fn required_attr(&self, key: &str, field: &str) -> MetadataResult<&str> {
        self.attr(key)
            .ok_or_else(|| MetadataError::missing(format!("{}@{}", field, key)))
    }

    /// Direct children in document order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants (not self) with the given name, pre-order
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), TreeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(TreeError::MultipleRoots);
    }
    *root = Some(element);
    Ok(())
}

/// Exactly one match, or a named error
///
/// Zero matches is `MissingNode`; more than one is `AmbiguousNode`.
pub fn exactly_one<'a, I>(matches: I, field: &str) -> MetadataResult<&'a Element>
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut iter = matches.into_iter();
    let first = iter.next().ok_or_else(|| MetadataError::missing(field))?;
    let extra = iter.count();
    if extra > 0 {
        return Err(MetadataError::AmbiguousNode {
            field: field.to_string(),
            count: extra + 1,
        });
    }
    Ok(first)
}

/// Parse an attribute value as f64
pub fn parse_f64(value: &str, field: &str) -> MetadataResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MetadataError::invalid(field, value))
}
