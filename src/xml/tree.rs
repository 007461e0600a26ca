use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::XmlError;

/// Minimal read-only element tree, enough to walk an hours file top down.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Parses a whole document and returns its root element.
    pub fn parse(xml: &str) -> Result<Element, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut open = Vec::<Element>::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|source| XmlError::Syntax {
                position: reader.buffer_position() as u64,
                source,
            })?;

            match event {
                Event::Start(start) => open.push(Element::from_start(&start)?),
                Event::Empty(start) => attach(&mut open, &mut root, Element::from_start(&start)?)?,
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unexpected end tag".into()))?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| XmlError::Malformed(e.to_string()))?;
                    push_text(&mut open, &text)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data);
                    push_text(&mut open, &text)?;
                }
                Event::Eof => break,
                // Declaration, processing instructions, comments and doctype carry no data.
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            return Err(XmlError::Malformed(format!(
                "element <{}> is never closed",
                element.name
            )));
        }

        root.ok_or_else(|| XmlError::Malformed("document has no root element".into()))
    }

    fn from_start(start: &BytesStart) -> Result<Element, XmlError> {
        let name = utf8(start.name().as_ref())?;
        let mut attributes = vec![];
        for attribute in start.attributes() {
            let attribute = attribute?;
            let value = attribute
                .unescape_value()
                .map_err(|e| XmlError::Malformed(e.to_string()))?;
            attributes.push((utf8(attribute.key.as_ref())?, value.into_owned()));
        }

        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements, whatever their name.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text directly inside the element, mixed content is concatenated.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(XmlError::Malformed("more than one root element".into()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(element) => element.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(XmlError::Malformed(
                "text outside of the root element".into(),
            ));
        }
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<String, XmlError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| XmlError::Malformed(e.to_string()))
}
