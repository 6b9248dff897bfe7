//! `PartAdd`: creates a part in the DMS inventory
//!
//! Sent over the hand-built STAR envelope, with a manifest entry for
//! `PartAdd` in the empty namespace.

use otsoap::xml::{find_descendant, local_name};
use xmltree::{Element, XMLNode};

use crate::error::{OpenTrackError, Result};
use crate::request::{DealerInfo, Record, push_fields};

const PART_ADD: &str = "PartAdd";
const PART_ADD_RESPONSE: &str = "PartAddResponse";

/// Part to create, with its fields in DMS naming (`PartNumber`, `Description`, ...)
#[derive(Debug, Clone, Default)]
pub struct PartAdd {
    pub dealer: DealerInfo,
    pub fields: Vec<(String, String)>,
}

impl PartAdd {
    pub fn new(dealer: DealerInfo) -> Self {
        Self {
            dealer,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// `<PartAdd><Dealer/><Part>fields</Part></PartAdd>`
    pub fn to_element(&self) -> Element {
        let mut root = Element::new(PART_ADD);
        root.children.push(XMLNode::Element(self.dealer.to_element()));

        let mut part = Element::new("Part");
        push_fields(&mut part, &self.fields);
        root.children.push(XMLNode::Element(part));
        root
    }
}

/// Reply to [`PartAdd`]
#[derive(Debug, Clone, PartialEq)]
pub struct PartAddResponse {
    pub record: Record,
}

impl PartAddResponse {
    /// Reads the `PartAddResponse` element, either `elem` itself or below it
    pub fn from_element(elem: &Element) -> Result<Self> {
        let response = if local_name(elem) == PART_ADD_RESPONSE {
            elem
        } else {
            find_descendant(elem, PART_ADD_RESPONSE).ok_or_else(|| {
                OpenTrackError::unexpected_response(format!(
                    "expected {PART_ADD_RESPONSE}, found {}",
                    local_name(elem)
                ))
            })?
        };

        Ok(Self {
            record: Record::from_element(response),
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.record.field(name)
    }
}
