use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::{collections::HashMap, io::BufRead};
use tracing::trace;

use super::{error, types::QName};

/// An owned XML element together with the namespace declarations in scope
/// where it appeared, so attribute values holding qualified names can still be
/// resolved after the reader has moved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub prefix: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub namespaces: HashMap<Option<String>, String>,
    pub children: Vec<Element>,
}

pub(crate) fn split_namespaced_name(prefixed_name: &str) -> (Option<&str>, &str) {
    match prefixed_name.split_once(':') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, prefixed_name),
    }
}

impl Element {
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.name == name
    }

    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns the value of an unqualified attribute. Empty values count as
    /// absent.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    pub fn required_attribute(&self, name: &'static str) -> Result<&str, error::Error> {
        self.attribute(name)
            .ok_or_else(|| error::Error::MissingAttribute {
                element: self.qualified_name(),
                attribute: name,
            })
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, name))
    }

    /// Splits a `prefix:local` attribute value into a qualified name using the
    /// declarations in scope on this element.
    pub fn split_qname(&self, value: &str) -> Result<QName, error::Error> {
        let (prefix, name) = split_namespaced_name(value.trim());

        let namespace = match prefix {
            Some(prefix) => Some(
                self.namespaces
                    .get(&Some(prefix.to_owned()))
                    .cloned()
                    .ok_or_else(|| error::Error::UndeclaredPrefix {
                        prefix: prefix.to_owned(),
                        element: self.qualified_name(),
                    })?,
            ),

            None => self.namespaces.get(&None).cloned(),
        };

        Ok(QName {
            namespace,
            name: name.to_owned(),
        })
    }
}

fn start_element<B: BufRead>(
    reader: &Reader<B>,
    start: &BytesStart<'_>,
    namespace: Option<&[u8]>,
    parent: Option<&Element>,
) -> Result<Element, error::Error> {
    let (prefix, local_name) = split_namespaced_name(reader.decode(start.name())?);

    let mut element = Element {
        prefix: prefix.map(ToOwned::to_owned),
        name: local_name.to_owned(),
        namespace: namespace
            .map(|namespace| reader.decode(namespace))
            .transpose()?
            .map(ToOwned::to_owned),
        namespaces: parent
            .map(|parent| parent.namespaces.clone())
            .unwrap_or_default(),
        ..Default::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?;
        let value = attribute.unescaped_value()?;
        let value = reader.decode(value.as_ref())?.to_owned();

        match split_namespaced_name(key) {
            (None, "xmlns") => {
                element.namespaces.insert(None, value);
            }

            (Some("xmlns"), prefix) => {
                element.namespaces.insert(Some(prefix.to_owned()), value);
            }

            _ => element.attributes.push((key.to_owned(), value)),
        }
    }

    trace!(element = %element.qualified_name(), namespace = ?element.namespace, "read element");
    Ok(element)
}

fn finish_element(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Reads a whole document into an element tree. Comments and processing
/// instructions are dropped.
pub fn read_document<B: BufRead>(mut reader: Reader<B>) -> Result<Element, error::Error> {
    reader.trim_text(true);

    let mut stack = Vec::new();
    let mut root = None;
    let mut buffer = Vec::new();
    let mut namespace_buffer = Vec::new();

    loop {
        let (namespace, event) =
            reader.read_namespaced_event(&mut buffer, &mut namespace_buffer)?;

        match event {
            Event::Start(start) => {
                let element = start_element(&reader, &start, namespace, stack.last())?;
                stack.push(element);
            }

            Event::Empty(start) => {
                let element = start_element(&reader, &start, namespace, stack.last())?;
                finish_element(&mut stack, &mut root, element);
            }

            Event::End(..) => {
                if let Some(element) = stack.pop() {
                    finish_element(&mut stack, &mut root, element);
                }
            }

            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    let unescaped = text.unescaped()?;
                    let text = reader.decode(unescaped.as_ref())?;
                    element
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(text);
                }
            }

            Event::Eof => break,

            _ => (),
        }

        buffer.clear();
    }

    root.ok_or(error::Error::EmptyDocument)
}

pub fn read_str(xml: &str) -> Result<Element, error::Error> {
    read_document(Reader::from_str(xml))
}
