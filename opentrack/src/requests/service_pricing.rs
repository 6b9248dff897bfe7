//! `ServicePricingLookup` on `ServiceAPI.asmx`
//!
//! Plain SOAP body in the `opentrack.dealertrack.com` namespace, sent with a
//! security header and no payload manifest.

use otsoap::xml::find_child;
use otsoap::{BodyContent, FromBody, SoapParseError};
use xmltree::{Element, XMLNode};

use crate::request::{DealerInfo, Record, push_fields};

/// Namespace of the ServiceAPI operations
pub const SERVICE_API_NAMESPACE: &str = "opentrack.dealertrack.com";

/// Pricing lookup for a labor operation or a repair order line
#[derive(Debug, Clone, Default)]
pub struct ServicePricingLookupRequest {
    pub dealer: DealerInfo,
    pub fields: Vec<(String, String)>,
}

impl ServicePricingLookupRequest {
    pub fn new(dealer: DealerInfo) -> Self {
        Self {
            dealer,
            fields: Vec::new(),
        }
    }

    /// Adds a request field, e.g. `("LaborOpCode", "LOF")`
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

impl BodyContent for ServicePricingLookupRequest {
    fn body_elements(&self) -> Vec<Element> {
        let mut lookup = Element::new("ServicePricingLookup");
        lookup
            .attributes
            .insert("xmlns".to_string(), SERVICE_API_NAMESPACE.to_string());
        lookup
            .children
            .push(XMLNode::Element(self.dealer.to_element()));

        let mut request = Element::new("Request");
        push_fields(&mut request, &self.fields);
        lookup.children.push(XMLNode::Element(request));

        vec![lookup]
    }
}

/// Pricing returned by the DMS
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePricingLookupResult {
    pub record: Record,
}

impl ServicePricingLookupResult {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.record.field(name)
    }
}

/// `<ServicePricingLookupResponse>` body
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePricingLookupResponse {
    pub result: ServicePricingLookupResult,
}

impl FromBody for ServicePricingLookupResponse {
    fn from_body(body: &Element) -> Result<Self, SoapParseError> {
        let response = find_child(body, "ServicePricingLookupResponse")
            .ok_or(SoapParseError::MissingElement("ServicePricingLookupResponse"))?;
        let result = find_child(response, "ServicePricingLookupResult")
            .ok_or(SoapParseError::MissingElement("ServicePricingLookupResult"))?;

        Ok(Self {
            result: ServicePricingLookupResult {
                record: Record::from_element(result),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_element() {
        let request = ServicePricingLookupRequest::new(DealerInfo::new("QG", "ZE7", "srv"))
            .field("LaborOpCode", "LOF");

        let body = request.body_elements();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].name, "ServicePricingLookup");
        assert_eq!(
            body[0].attributes.get("xmlns").map(String::as_str),
            Some(SERVICE_API_NAMESPACE)
        );
        assert!(body[0].get_child("Dealer").is_some());
        assert!(body[0].get_child("Request").unwrap().get_child("LaborOpCode").is_some());
    }

    #[test]
    fn test_response_body() {
        let body = Element::parse(
            r#"<soap:Body xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <ServicePricingLookupResponse xmlns="opentrack.dealertrack.com">
    <ServicePricingLookupResult><LaborPrice>89.95</LaborPrice></ServicePricingLookupResult>
  </ServicePricingLookupResponse>
</soap:Body>"#
                .as_bytes(),
        )
        .unwrap();

        let response = ServicePricingLookupResponse::from_body(&body).unwrap();
        assert_eq!(response.result.field("LaborPrice"), Some("89.95"));
    }

    #[test]
    fn test_missing_result() {
        let body = Element::parse(
            "<Body><ServicePricingLookupResponse/></Body>".as_bytes(),
        )
        .unwrap();

        assert!(matches!(
            ServicePricingLookupResponse::from_body(&body),
            Err(SoapParseError::MissingElement("ServicePricingLookupResult"))
        ));
    }
}
