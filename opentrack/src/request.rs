//! Request descriptors submitted through the STAR pipeline

use std::collections::HashMap;

use otsoap::xml::{child_elements, inner_text, local_name, text_element};
use xmltree::{Element, XMLNode};

use crate::error::Result;

/// A request that can travel as a STAR content part
///
/// The pipeline only relies on this capability: it wraps the element
/// returned by [`to_element`](StarRequest::to_element), checks the reply
/// for DMS error markers and hands the first response element to
/// [`parse_response`](StarRequest::parse_response).
pub trait StarRequest {
    type Response;

    fn to_element(&self) -> Result<Element>;

    fn parse_response(&self, response: &Element) -> Result<Self::Response>;
}

/// Dealer addressing shared by every DMS request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DealerInfo {
    pub enterprise_code: String,
    pub company_number: String,
    pub server_name: String,
}

impl DealerInfo {
    pub fn new(
        enterprise_code: impl Into<String>,
        company_number: impl Into<String>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            enterprise_code: enterprise_code.into(),
            company_number: company_number.into(),
            server_name: server_name.into(),
        }
    }

    /// `<Dealer><EnterpriseCode/><CompanyNumber/><ServerName/></Dealer>`
    pub fn to_element(&self) -> Element {
        let mut dealer = Element::new("Dealer");
        for (name, value) in [
            ("EnterpriseCode", &self.enterprise_code),
            ("CompanyNumber", &self.company_number),
            ("ServerName", &self.server_name),
        ] {
            dealer
                .children
                .push(XMLNode::Element(text_element(name, value)));
        }
        dealer
    }
}

/// Generic view of one record returned by the DMS
///
/// Leaf children become `fields`, children that have children of their own
/// become nested records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub fields: Vec<(String, String)>,
    pub children: Vec<Record>,
}

impl Record {
    pub fn from_element(elem: &Element) -> Self {
        let mut record = Record {
            name: local_name(elem).to_string(),
            attributes: elem.attributes.clone(),
            ..Default::default()
        };

        for child in child_elements(elem) {
            if child_elements(child).next().is_some() {
                record.children.push(Record::from_element(child));
            } else {
                record
                    .fields
                    .push((local_name(child).to_string(), inner_text(child)));
            }
        }
        record
    }

    /// Text of the first field called `name`
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First nested record called `name`
    pub fn child(&self, name: &str) -> Option<&Record> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Records found directly under `response`
///
/// With `item` set, only children with that local name are kept.
pub fn records(response: &Element, item: Option<&str>) -> Vec<Record> {
    child_elements(response)
        .filter(|child| item.is_none_or(|name| local_name(child) == name))
        .map(Record::from_element)
        .collect()
}

/// Appends `<name>value</name>` for each pair
pub(crate) fn push_fields(parent: &mut Element, fields: &[(String, String)]) {
    for (name, value) in fields {
        parent
            .children
            .push(XMLNode::Element(text_element(name, value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealer_element() {
        let dealer = DealerInfo::new("QG", "ZE7", "ot.dms.dealertrack.com").to_element();

        let names: Vec<&str> = child_elements(&dealer).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EnterpriseCode", "CompanyNumber", "ServerName"]);
        assert_eq!(
            dealer.get_child("CompanyNumber").unwrap().get_text().as_deref(),
            Some("ZE7")
        );
    }

    #[test]
    fn test_record_from_element() {
        let elem = Element::parse(
            r#"<Customer id="1"><CustomerNumber>1042</CustomerNumber><Address><City>Boise</City></Address><Email/></Customer>"#
                .as_bytes(),
        )
        .unwrap();

        let record = Record::from_element(&elem);
        assert_eq!(record.name, "Customer");
        assert_eq!(record.attribute("id"), Some("1"));
        assert_eq!(record.field("CustomerNumber"), Some("1042"));
        assert_eq!(record.field("Email"), Some(""));
        assert_eq!(
            record.child("Address").and_then(|a| a.field("City")),
            Some("Boise")
        );
    }

    #[test]
    fn test_records_filter_by_item() {
        let elem = Element::parse(
            "<Response><Customer/><Customer/><Summary/></Response>".as_bytes(),
        )
        .unwrap();

        assert_eq!(records(&elem, Some("Customer")).len(), 2);
        assert_eq!(records(&elem, None).len(), 3);
    }
}
