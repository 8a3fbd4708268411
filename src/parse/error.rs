use crate::prelude::*;

use super::event_summary::EventSummary;

use quick_xml::name::QName;

#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("Error parsing exodus xml document: {0}")]
    Document(Document),
    #[error("Error parsing exodus database contents: {0}")]
    Contents(Contents),
}

/// failures while turning the xml events into an element tree
#[derive(Debug, thiserror::Error, From)]
pub enum Document {
    #[error("{0}")]
    MalformedXml(MalformedXml),
    #[error("{0}")]
    MalformedAttribute(MalformedAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
}

/// failures while decoding the element tree into a database
#[derive(Debug, thiserror::Error, From)]
pub enum Contents {
    #[error("{0}")]
    MissingAttribute(MissingAttribute),
    #[error("{0}")]
    UnexpectedElement(UnexpectedElement),
    #[error("{0}")]
    UnexpectedAttributeValue(UnexpectedAttributeValue),
    #[error("{0}")]
    ArrayPayload(ArrayPayload),
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml element: {xml_err}")]
pub struct MalformedXml {
    xml_err: quick_xml::Error,
}

#[derive(From, Display, Debug)]
#[display(fmt = "failed to parse an xml attribute: {att_err}")]
pub struct MalformedAttribute {
    att_err: quick_xml::events::attributes::AttrError,
}

#[derive(Display, Debug)]
#[display(fmt = "unexpected element. Expected `{expected_name}`, got {actual_element}")]
pub struct UnexpectedElement {
    expected_name: String,
    actual_element: EventSummary,
}

impl UnexpectedElement {
    pub(crate) fn new<T: Into<String>>(expected_name: T, actual_element: EventSummary) -> Self {
        Self {
            expected_name: expected_name.into(),
            actual_element,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "unexpected attribute value for {attribute_name} in {element_name} element: expected {expected_value}, got {actual_value}"
)]
pub struct UnexpectedAttributeValue {
    pub(crate) element_name: String,
    pub(crate) attribute_name: String,
    pub(crate) expected_value: String,
    pub(crate) actual_value: ParsedNameOrBytes,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "missing attribute `{attribute_name}` in {element_name} element")]
pub struct MissingAttribute {
    element_name: String,
    attribute_name: String,
}

#[derive(From, Display, Debug)]
pub enum ParsedNameOrBytes {
    #[display(fmt = "{_0}")]
    Utf8(String),
    #[display(fmt = "{_0:?} (cannot convert to UTF8 string)")]
    Bytes(Vec<u8>),
}

impl ParsedNameOrBytes {
    fn new(bytes: &[u8]) -> Self {
        let vec = Vec::from(bytes);
        match String::from_utf8(vec) {
            Ok(string) => Self::Utf8(string),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

impl<'a> From<QName<'a>> for ParsedNameOrBytes {
    fn from(x: QName) -> Self {
        Self::new(x.as_ref())
    }
}

impl<'a> From<&'a str> for ParsedNameOrBytes {
    fn from(x: &str) -> Self {
        Self::Utf8(x.into())
    }
}

/// the body of a `DataArray` element could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum ArrayPayload {
    #[error("Failed to parse `{number}` in inline ascii array `{array_name}`")]
    AsciiNumber { array_name: String, number: String },
    #[error("Failed to decode base64 array `{array_name}`: {source}")]
    Base64 {
        array_name: String,
        source: base64::DecodeError,
    },
    #[error("binary array `{array_name}` declares {declared} payload bytes but carries {actual}")]
    ByteCount {
        array_name: String,
        declared: u64,
        actual: usize,
    },
    #[error("array `{array_name}` declares {declared} tuples but carries {actual}")]
    TupleCount {
        array_name: String,
        declared: usize,
        actual: usize,
    },
}
