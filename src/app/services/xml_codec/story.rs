//! Declarative XML stories and their recursive writer
//!
//! A [`Story`] is an ordered list of [`Descriptor`]s, one per child tag. A
//! descriptor carries a scalar, a sequence of scalars, a nested story or a
//! sequence of nested stories. Absent values are skipped unless the
//! descriptor is forced, in which case an empty element is written.

use crate::app::models::validation::format_datetime;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Scalar that renders as XML text
pub trait XmlValue {
    fn to_xml_text(&self) -> String;
}

impl XmlValue for str {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }
}

impl XmlValue for String {
    fn to_xml_text(&self) -> String {
        self.clone()
    }
}

impl XmlValue for bool {
    fn to_xml_text(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

impl XmlValue for NaiveDateTime {
    fn to_xml_text(&self) -> String {
        format_datetime(self)
    }
}

macro_rules! display_xml_value {
    ($($t:ty),*) => {
        $(impl XmlValue for $t {
            fn to_xml_text(&self) -> String {
                self.to_string()
            }
        })*
    };
}

display_xml_value!(u8, u16, u32, i64, f64);

impl<T: XmlValue + ?Sized> XmlValue for &T {
    fn to_xml_text(&self) -> String {
        (**self).to_xml_text()
    }
}

/// Content of one descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Scalar(String),
    Sequence(Vec<String>),
    Nested(Story),
    NestedSequence(Vec<Story>),
}

/// One child element (or run of same-tag siblings) of a story
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub tag: &'static str,
    pub content: Content,
    pub attributes: Vec<(&'static str, String)>,
    pub force: bool,
}

impl Descriptor {
    pub fn new(tag: &'static str, content: Content) -> Self {
        Self {
            tag,
            content,
            attributes: Vec::new(),
            force: false,
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    /// Number of elements this descriptor writes
    pub fn multiplicity(&self) -> usize {
        match &self.content {
            Content::Empty => usize::from(self.force),
            Content::Scalar(_) => 1,
            Content::Sequence(items) => items.len(),
            Content::Nested(story) => usize::from(self.force || !story.is_empty()),
            Content::NestedSequence(stories) => stories.len(),
        }
    }
}

/// Ordered child descriptors of one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Story {
    descriptors: Vec<Descriptor>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, descriptor: Descriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Scalar leaf, omitted when `None` or blank
    pub fn leaf<V: XmlValue>(self, tag: &'static str, value: Option<V>) -> Self {
        self.push(Descriptor::new(tag, scalar_content(value)))
    }

    /// Scalar leaf written even when empty
    pub fn forced_leaf<V: XmlValue>(self, tag: &'static str, value: Option<V>) -> Self {
        self.push(Descriptor::new(tag, scalar_content(value)).forced())
    }

    /// One sibling leaf per value
    pub fn leaves<V: XmlValue>(
        self,
        tag: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let items = values
            .into_iter()
            .map(|v| v.to_xml_text())
            .filter(|text| !text.trim().is_empty())
            .collect();
        self.push(Descriptor::new(tag, Content::Sequence(items)))
    }

    /// Nested element, omitted when its story is empty
    pub fn node(self, tag: &'static str, story: Story) -> Self {
        self.push(Descriptor::new(tag, Content::Nested(story)))
    }

    /// Nested element written when `Some`
    pub fn node_opt(self, tag: &'static str, story: Option<Story>) -> Self {
        match story {
            Some(story) => self.node(tag, story),
            None => self,
        }
    }

    /// One nested sibling per story
    pub fn nodes(self, tag: &'static str, stories: Vec<Story>) -> Self {
        self.push(Descriptor::new(tag, Content::NestedSequence(stories)))
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.iter().all(|d| d.multiplicity() == 0)
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Descriptor of a direct child tag
    pub fn get(&self, tag: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.tag == tag)
    }
}

/// Append the elements described by `story` to the writer, recursively
pub fn write_story<W: Write>(writer: &mut Writer<W>, story: &Story) -> Result<()> {
    for descriptor in &story.descriptors {
        match &descriptor.content {
            Content::Empty => {
                if descriptor.force {
                    write_event(writer, Event::Empty(start_tag(descriptor)))?;
                }
            }
            Content::Scalar(text) => write_scalar(writer, descriptor, text)?,
            Content::Sequence(items) => {
                for text in items {
                    write_scalar(writer, descriptor, text)?;
                }
            }
            Content::Nested(nested) => {
                if nested.is_empty() {
                    if descriptor.force {
                        write_event(writer, Event::Empty(start_tag(descriptor)))?;
                    }
                } else {
                    write_nested(writer, descriptor, nested)?;
                }
            }
            Content::NestedSequence(stories) => {
                for nested in stories {
                    write_nested(writer, descriptor, nested)?;
                }
            }
        }
    }
    Ok(())
}

fn start_tag(descriptor: &Descriptor) -> BytesStart<'static> {
    let mut start = BytesStart::new(descriptor.tag);
    for (name, value) in &descriptor.attributes {
        start.push_attribute((*name, value.as_str()));
    }
    start
}

/// Blank text reads back as an absent leaf, so it is written as one
fn scalar_content<V: XmlValue>(value: Option<V>) -> Content {
    match value.map(|value| value.to_xml_text()) {
        Some(text) if !text.trim().is_empty() => Content::Scalar(text),
        _ => Content::Empty,
    }
}

fn write_scalar<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &Descriptor,
    text: &str,
) -> Result<()> {
    if text.is_empty() {
        return write_event(writer, Event::Empty(start_tag(descriptor)));
    }
    write_event(writer, Event::Start(start_tag(descriptor)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(descriptor.tag)))
}

fn write_nested<W: Write>(
    writer: &mut Writer<W>,
    descriptor: &Descriptor,
    story: &Story,
) -> Result<()> {
    write_event(writer, Event::Start(start_tag(descriptor)))?;
    write_story(writer, story)?;
    write_event(writer, Event::End(BytesEnd::new(descriptor.tag)))
}

pub(crate) fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::xml_writing(e.to_string()))
}
