//! Parsing of received SOAP envelopes

use std::io::{BufReader, Read};

use tracing::debug;
use xmltree::Element;

use crate::envelope::{Envelope, FromBody, Header};
use crate::fault::{SoapFault, find_fault};
use crate::manifest::PayloadManifest;
use crate::xml::find_child;

/// SOAP parsing error
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("Missing {0} element in SOAP body")]
    MissingElement(&'static str),

    #[error("Content part '{0}' carries no element")]
    EmptyContent(String),
}

/// A received envelope, split but not yet interpreted
#[derive(Debug, Clone)]
pub struct SoapDocument {
    pub header: Option<Element>,
    pub body: Element,
}

/// Parses a SOAP envelope from any reader
pub fn parse_soap_document<R: Read>(reader: R) -> Result<SoapDocument, SoapParseError> {
    let root = Element::parse(BufReader::new(reader))?;

    if root.name != "Envelope" {
        debug!(root = %root.name, "Response is not a SOAP envelope");
        return Err(SoapParseError::MissingEnvelope);
    }

    let header = find_child(&root, "Header").cloned();
    let body = find_child(&root, "Body")
        .cloned()
        .ok_or(SoapParseError::MissingBody)?;

    Ok(SoapDocument { header, body })
}

/// Parses a complete envelope and maps its body to `B`
pub fn parse_envelope<B: FromBody>(xml: &[u8]) -> Result<Envelope<B>, SoapParseError> {
    parse_soap_document(xml)?.to_envelope()
}

impl SoapDocument {
    /// SOAP Fault carried by the body, if any
    pub fn fault(&self) -> Option<SoapFault> {
        find_fault(&self.body)
    }

    /// Interprets the document as an envelope with body `B`.
    ///
    /// Only the payload manifest is read back from the header; inbound
    /// security blocks are ignored.
    pub fn to_envelope<B: FromBody>(&self) -> Result<Envelope<B>, SoapParseError> {
        let payload_manifest = self
            .header
            .as_ref()
            .and_then(|h| find_child(h, "PayloadManifest"))
            .map(PayloadManifest::from_element);

        let header = Header {
            security: None,
            payload_manifest,
        };

        Ok(Envelope::new(header, B::from_body(&self.body)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ProcessMessageResponse;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header>
    <PayloadManifest xmlns="http://www.starstandards.org/webservices/2005/10/transport">
      <manifest contentID="resp-1" namespaceURI="" element="ServiceTechsTable" relatedID="1" version="1.0"/>
    </PayloadManifest>
  </soap:Header>
  <soap:Body>
    <ProcessMessageResponse xmlns="http://www.starstandards.org/webservices/2005/10/transport">
      <payload>
        <content id="resp-1"><ServiceTechsTable/></content>
      </payload>
    </ProcessMessageResponse>
  </soap:Body>
</soap:Envelope>"#;

    #[test]
    fn test_parse_star_response() {
        let envelope: Envelope<ProcessMessageResponse> =
            parse_envelope(RESPONSE.as_bytes()).unwrap();

        let manifest = envelope.header.payload_manifest.unwrap();
        assert_eq!(manifest.manifests[0].content_id, "resp-1");
        assert_eq!(manifest.manifests[0].element, "ServiceTechsTable");
        assert_eq!(envelope.body.payload.content[0].id, "resp-1");
    }

    #[test]
    fn test_parse_without_header() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><Pong/></s:Body></s:Envelope>"#;

        let doc = parse_soap_document(xml.as_bytes()).unwrap();
        assert!(doc.header.is_none());
        assert!(doc.fault().is_none());

        let envelope: Envelope<Element> = doc.to_envelope().unwrap();
        assert!(envelope.header.payload_manifest.is_none());
    }

    #[test]
    fn test_not_an_envelope() {
        let err = parse_soap_document("<html/>".as_bytes()).unwrap_err();
        assert!(matches!(err, SoapParseError::MissingEnvelope));
    }

    #[test]
    fn test_missing_body() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Header/></s:Envelope>"#;
        let err = parse_soap_document(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SoapParseError::MissingBody));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_soap_document("<s:Envelope><s:Body>".as_bytes()).unwrap_err();
        assert!(matches!(err, SoapParseError::XmlError(_)));
    }
}
