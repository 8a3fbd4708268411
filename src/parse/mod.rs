//! reading and parsing the xml document of a store database
//!
//! Parsing happens in two passes: the quick-xml event stream is first collected into a
//! small element tree, which is then decoded into the in-memory database.

pub mod error;
mod event_summary;

pub use error::ParseError;
use event_summary::EventSummary;

use crate::array::{self, Numeric};
use crate::engine::{EntityKind, Header, VarDomain};
use crate::store::model::{Block, Model, Set, Step};
use crate::store::Encoding;
use crate::utils;

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// read in and parse an entire store document for a given path
pub(crate) fn read_model(path: &Path) -> Result<Model, crate::store::StoreError> {
    let file = std::fs::File::open(path)?;
    let buf_reader = std::io::BufReader::new(file);
    let reader = Reader::from_reader(buf_reader);

    Ok(parse_xml_document(reader)?)
}

pub(crate) fn parse_xml_document<R: BufRead>(mut reader: Reader<R>) -> Result<Model, ParseError> {
    reader.trim_text(true);
    reader.expand_empty_elements(true);

    let root = read_element_tree(&mut reader)?;
    Ok(decode_model(&root)?)
}

/// An xml element with everything nested inside it
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, error::Document> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(error::MalformedAttribute::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(error::MalformedXml::from)?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

fn read_element_tree<R: BufRead>(reader: &mut Reader<R>) -> Result<Element, error::Document> {
    let mut buffer = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader
            .read_event_into(&mut buffer)
            .map_err(error::MalformedXml::from)?;

        match &event {
            Event::Start(start) => {
                if root.is_some() {
                    let unexpected =
                        error::UnexpectedElement::new("end of document", EventSummary::new(&event));
                    return Err(error::Document::from(unexpected));
                }
                stack.push(Element::from_start(start)?);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(error::MalformedXml::from)?;
                match stack.last_mut() {
                    Some(parent) => parent.text.push_str(&text),
                    None => {
                        let unexpected =
                            error::UnexpectedElement::new("ExodusFile", EventSummary::new(&event));
                        return Err(error::Document::from(unexpected));
                    }
                }
            }
            Event::End(end) => {
                let element = match stack.pop() {
                    Some(element) => element,
                    None => {
                        let unexpected =
                            error::UnexpectedElement::new("ExodusFile", EventSummary::end(end));
                        return Err(error::Document::from(unexpected));
                    }
                };

                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            // declarations, comments and processing instructions carry nothing
            _ => {}
        }

        buffer.clear();
    }

    if let Some(open) = stack.last() {
        let unexpected = error::UnexpectedElement::new(
            format!("</{}>", open.name),
            EventSummary::eof(),
        );
        return Err(error::Document::from(unexpected));
    }

    root.ok_or_else(|| {
        error::Document::from(error::UnexpectedElement::new(
            "ExodusFile",
            EventSummary::eof(),
        ))
    })
}

fn get_attribute_value<'a>(
    element: &'a Element,
    attribute_key: &str,
) -> Result<&'a str, error::MissingAttribute> {
    element.attribute(attribute_key).ok_or_else(|| {
        error::MissingAttribute::new(element.name.clone(), attribute_key.into())
    })
}

/// parse an attribute with `FromStr`, `expected` describes the accepted values
fn parse_attribute<T: FromStr>(
    element: &Element,
    attribute_key: &str,
    expected: &str,
) -> Result<T, error::Contents> {
    let value = get_attribute_value(element, attribute_key)?;
    value.trim().parse().map_err(|_| {
        error::Contents::from(error::UnexpectedAttributeValue::new(
            element.name.clone(),
            attribute_key.into(),
            expected.into(),
            value.into(),
        ))
    })
}

fn check_attribute_value(
    element: &Element,
    attribute_key: &str,
    expected_attribute_value: &str,
) -> Result<(), error::Contents> {
    let value = get_attribute_value(element, attribute_key)?;
    if value != expected_attribute_value {
        let unexpected_value = error::UnexpectedAttributeValue::new(
            element.name.clone(),
            attribute_key.into(),
            expected_attribute_value.into(),
            value.into(),
        );
        return Err(error::Contents::from(unexpected_value));
    }
    Ok(())
}

fn expect_name(element: &Element, expected_name: &str) -> Result<(), error::UnexpectedElement> {
    if element.name != expected_name {
        return Err(error::UnexpectedElement::new(
            expected_name,
            EventSummary::element(&element.name),
        ));
    }
    Ok(())
}

/// decode the values of a single `DataArray` element
fn parse_dataarray<T: Numeric>(element: &Element) -> Result<Vec<T>, error::Contents> {
    expect_name(element, "DataArray")?;
    check_attribute_value(element, "type", T::TYPE_NAME)?;

    let name = get_attribute_value(element, "Name")?;
    let format = get_attribute_value(element, "format")?;
    let encoding = Encoding::from_format(format).ok_or_else(|| {
        error::UnexpectedAttributeValue::new(
            element.name.clone(),
            "format".into(),
            "ascii or binary".into(),
            format.into(),
        )
    })?;

    let values: Vec<T> = array::decode(&element.text, encoding, name)?;

    let declared: usize = parse_attribute(element, "NumberOfTuples", "a tuple count")?;
    if declared != values.len() {
        return Err(error::Contents::from(error::ArrayPayload::TupleCount {
            array_name: name.into(),
            declared,
            actual: values.len(),
        }));
    }

    Ok(values)
}

/// the single child `DataArray` named `array_name`, an absent array is empty
fn child_dataarray<T: Numeric>(
    element: &Element,
    array_name: &str,
) -> Result<Vec<T>, error::Contents> {
    match element
        .children
        .iter()
        .find(|child| child.attribute("Name") == Some(array_name))
    {
        Some(child) => parse_dataarray(child),
        None => Ok(Vec::new()),
    }
}

/// the `value` attributes of every child, in document order
fn name_list(element: &Element) -> Result<Vec<String>, error::Contents> {
    element
        .children
        .iter()
        .map(|child| Ok(get_attribute_value(child, "value")?.to_string()))
        .collect()
}

fn decode_model(root: &Element) -> Result<Model, error::Contents> {
    expect_name(root, "ExodusFile")?;

    let mut model = Model {
        version: parse_attribute(root, "version", "a version number")?,
        word_size: parse_attribute(root, "word_size", "a word size in bytes")?,
        ..Model::default()
    };

    for child in &root.children {
        match child.name.as_str() {
            "Header" => model.set_header(decode_header(child)?),
            "Info" => model.info = name_list(child)?,
            "Coordinates" => {
                for (axis, name) in ["x", "y", "z"].iter().enumerate() {
                    let values = child_dataarray(child, name)?;
                    if values.is_empty() {
                        continue;
                    }
                    let declared = model.coords.get(axis).map(Vec::len).unwrap_or(0);
                    if declared != values.len() {
                        return Err(error::Contents::from(error::ArrayPayload::TupleCount {
                            array_name: (*name).into(),
                            declared,
                            actual: values.len(),
                        }));
                    }
                    model.coords[axis] = values;
                }
            }
            "CoordinateNames" => {
                for (slot, name) in model.coord_names.iter_mut().zip(name_list(child)?) {
                    *slot = name;
                }
            }
            "ElementMap" => model.elem_map = Some(child_dataarray(child, "map")?),
            "ElementBlock" => model.blocks.push(decode_block(child)?),
            "NodeSet" => model.node_sets.push(decode_set(child, false)?),
            "SideSet" => model.side_sets.push(decode_set(child, true)?),
            "Names" => {
                let tag = get_attribute_value(child, "kind")?;
                let kind = EntityKind::from_tag(tag).ok_or_else(|| {
                    error::UnexpectedAttributeValue::new(
                        child.name.clone(),
                        "kind".into(),
                        "element_block, node_set or side_set".into(),
                        tag.into(),
                    )
                })?;
                model.names.insert(kind, name_list(child)?);
            }
            "Variables" => {
                let tag = get_attribute_value(child, "domain")?;
                let domain = VarDomain::from_tag(tag).ok_or_else(|| {
                    error::UnexpectedAttributeValue::new(
                        child.name.clone(),
                        "domain".into(),
                        "nodal, element_block or global".into(),
                        tag.into(),
                    )
                })?;
                model.variables.insert(domain, name_list(child)?);
            }
            "TimeStep" => {
                let time = parse_attribute(child, "time", "a floating point time")?;
                model.times.push(time);
                model.steps.push(decode_step(child)?);
            }
            _ => {
                let unexpected = error::UnexpectedElement::new(
                    "a database section",
                    EventSummary::element(&child.name),
                );
                return Err(error::Contents::from(unexpected));
            }
        }
    }

    Ok(model)
}

fn decode_header(element: &Element) -> Result<Header, error::Contents> {
    let count = |key: &str| parse_attribute::<i32>(element, key, "an integer count");

    Ok(Header {
        title: get_attribute_value(element, "title")?.to_string(),
        num_dim: count("num_dim")?,
        num_nodes: count("num_nodes")?,
        num_elems: count("num_elems")?,
        num_elem_blks: count("num_elem_blks")?,
        num_node_sets: count("num_node_sets")?,
        num_side_sets: count("num_side_sets")?,
    })
}

fn decode_block(element: &Element) -> Result<Block, error::Contents> {
    let num_elems: usize = parse_attribute(element, "num_elems", "an element count")?;
    let nodes_per_elem: usize = parse_attribute(element, "nodes_per_elem", "a node count")?;
    let declared = num_elems.checked_mul(nodes_per_elem).ok_or_else(|| {
        error::Contents::from(error::UnexpectedAttributeValue::new(
            element.name.clone(),
            "nodes_per_elem".into(),
            "a node count whose connectivity size fits in memory".into(),
            nodes_per_elem.to_string().as_str().into(),
        ))
    })?;
    let connect: Vec<i32> = child_dataarray(element, "connect")?;

    if connect.len() != declared {
        return Err(error::Contents::from(error::ArrayPayload::TupleCount {
            array_name: "connect".into(),
            declared,
            actual: connect.len(),
        }));
    }

    Ok(Block {
        id: parse_attribute(element, "id", "an integer id")?,
        elem_type: utils::truncate_name(get_attribute_value(element, "elem_type")?).to_string(),
        num_elems,
        nodes_per_elem,
        num_attrs: parse_attribute(element, "num_attrs", "an attribute count")?,
        connect,
    })
}

fn decode_set(element: &Element, has_sides: bool) -> Result<Set, error::Contents> {
    let entries: Vec<i32> = child_dataarray(element, "entries")?;
    let sides: Vec<i32> = if has_sides {
        child_dataarray(element, "sides")?
    } else {
        Vec::new()
    };

    if has_sides && sides.len() != entries.len() {
        return Err(error::Contents::from(error::ArrayPayload::TupleCount {
            array_name: "sides".into(),
            declared: entries.len(),
            actual: sides.len(),
        }));
    }

    Ok(Set {
        id: parse_attribute(element, "id", "an integer id")?,
        num_dist_factors: parse_attribute(element, "num_dist_factors", "a factor count")?,
        entries,
        sides,
    })
}

fn decode_step(element: &Element) -> Result<Step, error::Contents> {
    let mut step = Step::default();

    for array in &element.children {
        let values: Vec<f64> = parse_dataarray(array)?;
        let name = get_attribute_value(array, "Name")?;

        match VarDomain::from_tag(name) {
            Some(VarDomain::Nodal) => {
                let var = parse_attribute(array, "var", "a variable index")?;
                step.nodal.insert(var, values);
            }
            Some(VarDomain::ElementBlock) => {
                let var = parse_attribute(array, "var", "a variable index")?;
                let block = parse_attribute(array, "block", "a block id")?;
                step.elemental.insert((var, block), values);
            }
            Some(VarDomain::Global) => step.global = values,
            None => {
                let unexpected_value = error::UnexpectedAttributeValue::new(
                    array.name.clone(),
                    "Name".into(),
                    "nodal, element_block or global".into(),
                    name.into(),
                );
                return Err(error::Contents::from(unexpected_value));
            }
        }
    }

    Ok(step)
}
