//! source, filter and sink pipeline
//!
//! An [Editor] reads a whole document, parses it ([Parser]), passes the [Body] through each [Filter] in order and
//! hands the result to a [Sink] which renders the output bytes. Output is only written once every stage succeeded,
//! so on error nothing reaches the writer.
//!
//! [AttributeGet] is both a filter (reduce the document to the one attribute at an address) and a sink (render
//! that attribute's raw value).
use crate::address::EmptyAddressError;
use crate::resolve::{find_attribute, get_attribute};
use crate::value::{raw_value, MalformedAttributeError};
use hcl_edit::structure::{Attribute, Body};
use hcl_edit::{Decorate, Decorated, Ident};
use std::io::{Read, Write};

#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("failed to parse {filename}")]
    Parse {
        filename: String,
        source: hcl_edit::parser::Error,
    },
    #[error(transparent)]
    EmptyAddress(#[from] EmptyAddressError),
    #[error(transparent)]
    MalformedAttribute(#[from] MalformedAttributeError),
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("failed to render json")]
    Json(#[from] serde_json::Error),
    #[error("failed to render yaml")]
    Yaml(#[from] serde_yaml::Error),
}

pub trait Filter {
    fn filter(&self, body: &Body) -> Result<Body, EditError>;
}

pub trait Sink {
    fn sink(&self, body: &Body) -> Result<Vec<u8>, EditError>;
}

/// Parses the input as HCL
///
/// The filename is only used for error messages.
#[derive(Debug, Clone)]
pub struct Parser {
    filename: String,
}

impl Parser {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    pub fn parse(&self, input: &str) -> Result<Body, EditError> {
        hcl_edit::parser::parse_body(input).map_err(|source| EditError::Parse {
            filename: self.filename.clone(),
            source,
        })
    }
}

#[derive(derive_new::new)]
pub struct Editor {
    source: Parser,
    filters: Vec<Box<dyn Filter>>,
    sink: Box<dyn Sink>,
}

impl Editor {
    pub fn apply(&self, mut reader: impl Read, mut writer: impl Write) -> Result<(), EditError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;

        let mut body = self.source.parse(&input)?;
        for filter in &self.filters {
            body = filter.filter(&body)?;
        }

        let output = self.sink.sink(&body)?;
        writer.write_all(&output)?;
        writer.flush()?;

        Ok(())
    }
}

/// Writes the body back as HCL
#[derive(Debug, Default)]
pub struct HclSink;

impl Sink for HclSink {
    fn sink(&self, body: &Body) -> Result<Vec<u8>, EditError> {
        Ok(body.to_string().into_bytes())
    }
}

/// How [AttributeGet] renders a found value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    /// the raw value followed by a newline
    #[default]
    Raw,
    Json,
    Yaml,
}

#[derive(serde::Serialize, Debug)]
struct ExtractedValue<'a> {
    address: &'a str,
    value: String,
}

#[derive(Debug, Clone)]
pub struct AttributeGet {
    address: String,
    format: ValueFormat,
}

impl AttributeGet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            format: ValueFormat::default(),
        }
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }
}

impl Filter for AttributeGet {
    /// Keeps only the matched attribute, keyed by the full address
    fn filter(&self, body: &Body) -> Result<Body, EditError> {
        let (attribute, _) = find_attribute(body, &self.address)?;

        let mut filtered = Body::new();
        if let Some(attribute) = attribute {
            let mut key = Decorated::new(Ident::new_unchecked(self.address.as_str()));
            key.decor_mut().set_suffix(" ");
            filtered.push(Attribute::new(key, attribute.value.clone()));
        } else {
            tracing::debug!(address = %self.address, "attribute not found");
        }

        Ok(filtered)
    }
}

impl Sink for AttributeGet {
    fn sink(&self, body: &Body) -> Result<Vec<u8>, EditError> {
        let Some(attribute) = get_attribute(body, &self.address) else {
            return Ok(vec![]);
        };

        let value = raw_value(attribute)?;
        let extracted = ExtractedValue {
            address: &self.address,
            value,
        };

        let output = match self.format {
            ValueFormat::Raw => extracted.value + "\n",
            ValueFormat::Json => serde_json::to_string_pretty(&extracted)? + "\n",
            ValueFormat::Yaml => serde_yaml::to_string(&extracted)?,
        };

        Ok(output.into_bytes())
    }
}

/// Reads HCL from `reader` and writes the value of the attribute at `address` to `writer`
///
/// Writes nothing when the attribute does not exist or an error occurs.
pub fn get_attribute_value(
    reader: impl Read,
    writer: impl Write,
    filename: &str,
    address: &str,
    format: ValueFormat,
) -> Result<(), EditError> {
    let get = AttributeGet::new(address).with_format(format);
    let editor = Editor::new(
        Parser::new(filename),
        vec![Box::new(get.clone())],
        Box::new(get),
    );

    editor.apply(reader, writer)
}
