//! Envelope model: header blocks plus a body generic over its content

use xmltree::{Element, XMLNode};

use crate::manifest::PayloadManifest;
use crate::ns;
use crate::parser::SoapParseError;
use crate::security::SecurityHeader;
use crate::xml::{child_elements, find_child, local_name};

/// Complete SOAP envelope
#[derive(Debug, Clone)]
pub struct Envelope<B> {
    pub header: Header,
    pub body: B,
}

/// SOAP header. Both blocks are optional: bodies that carry inline typed
/// fields travel without a manifest.
#[derive(Debug, Clone, Default)]
pub struct Header {
    pub security: Option<SecurityHeader>,
    pub payload_manifest: Option<PayloadManifest>,
}

/// Anything that can be written as the children of `<soap:Body>`
pub trait BodyContent {
    fn body_elements(&self) -> Vec<Element>;
}

/// Anything that can be read back from a received `<soap:Body>` element
pub trait FromBody: Sized {
    fn from_body(body: &Element) -> Result<Self, SoapParseError>;
}

impl<B> Envelope<B> {
    pub fn new(header: Header, body: B) -> Self {
        Self { header, body }
    }
}

impl Header {
    pub fn is_empty(&self) -> bool {
        self.security.is_none() && self.payload_manifest.is_none()
    }

    pub(crate) fn header_elements(&self) -> Vec<Element> {
        let mut elements = Vec::new();
        if let Some(security) = &self.security {
            elements.push(security.to_element());
        }
        if let Some(manifest) = &self.payload_manifest {
            elements.push(manifest.to_element());
        }
        elements
    }
}

/// One addressed XML payload
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub id: String,
    pub element: Element,
}

impl Content {
    pub fn new(id: impl Into<String>, element: Element) -> Self {
        Self {
            id: id.into(),
            element,
        }
    }
}

/// `<tran:payload>`: the list of content parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub content: Vec<Content>,
}

impl Payload {
    pub fn single(content: Content) -> Self {
        Self {
            content: vec![content],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Element carried by the first content part
    pub fn first_element(&self) -> Option<&Element> {
        self.content.first().map(|c| &c.element)
    }

    /// Takes ownership of the first content part's element
    pub fn into_first_element(self) -> Option<Element> {
        self.content.into_iter().next().map(|c| c.element)
    }

    fn to_element(&self) -> Element {
        let mut payload = Element::new("tran:payload");
        for content in &self.content {
            let mut elem = Element::new("tran:content");
            elem.attributes.insert("id".to_string(), content.id.clone());
            elem.children.push(XMLNode::Element(content.element.clone()));
            payload.children.push(XMLNode::Element(elem));
        }
        payload
    }

    fn from_element(payload: &Element) -> Result<Self, SoapParseError> {
        let mut content = Vec::new();
        for elem in child_elements(payload).filter(|e| local_name(e) == "content") {
            let id = elem.attributes.get("id").cloned().unwrap_or_default();
            let inner = child_elements(elem)
                .next()
                .cloned()
                .ok_or_else(|| SoapParseError::EmptyContent(id.clone()))?;
            content.push(Content::new(id, inner));
        }
        Ok(Self { content })
    }
}

/// `<tran:ProcessMessage>` request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessMessage {
    pub payload: Payload,
}

impl ProcessMessage {
    pub fn new(payload: Payload) -> Self {
        Self { payload }
    }
}

impl BodyContent for ProcessMessage {
    fn body_elements(&self) -> Vec<Element> {
        let mut process = Element::new("tran:ProcessMessage");
        process
            .attributes
            .insert("xmlns:tran".to_string(), ns::STAR_TRANSPORT.to_string());
        process
            .children
            .push(XMLNode::Element(self.payload.to_element()));
        vec![process]
    }
}

/// `<tran:ProcessMessageResponse>` reply body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessMessageResponse {
    pub payload: Payload,
}

impl FromBody for ProcessMessageResponse {
    fn from_body(body: &Element) -> Result<Self, SoapParseError> {
        // Some stacks echo `ProcessMessage` instead of `ProcessMessageResponse`
        let response = child_elements(body)
            .find(|e| local_name(e).starts_with("ProcessMessage"))
            .ok_or(SoapParseError::MissingElement("ProcessMessageResponse"))?;

        let payload = match find_child(response, "payload") {
            Some(payload) => Payload::from_element(payload)?,
            None => Payload::default(),
        };

        Ok(Self { payload })
    }
}

impl BodyContent for Element {
    fn body_elements(&self) -> Vec<Element> {
        vec![self.clone()]
    }
}

impl FromBody for Element {
    fn from_body(body: &Element) -> Result<Self, SoapParseError> {
        Ok(body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_process_message_response_reads_contents() {
        let body = parse(
            r#"<soap:Body xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <ProcessMessageResponse xmlns="http://www.starstandards.org/webservices/2005/10/transport">
    <payload>
      <content id="r-1"><ServiceTechsTable><Tech/></ServiceTechsTable></content>
      <content id="r-2"><Other/></content>
    </payload>
  </ProcessMessageResponse>
</soap:Body>"#,
        );

        let response = ProcessMessageResponse::from_body(&body).unwrap();
        assert_eq!(response.payload.content.len(), 2);
        assert_eq!(response.payload.content[0].id, "r-1");
        assert_eq!(
            response.payload.first_element().unwrap().name,
            "ServiceTechsTable"
        );
    }

    #[test]
    fn test_empty_payload_is_not_an_error() {
        let body = parse(
            r#"<Body><ProcessMessageResponse><payload/></ProcessMessageResponse></Body>"#,
        );

        let response = ProcessMessageResponse::from_body(&body).unwrap();
        assert!(response.payload.is_empty());
        assert!(response.payload.into_first_element().is_none());
    }

    #[test]
    fn test_content_without_element_is_rejected() {
        let body = parse(
            r#"<Body><ProcessMessageResponse><payload><content id="x"/></payload></ProcessMessageResponse></Body>"#,
        );

        let err = ProcessMessageResponse::from_body(&body).unwrap_err();
        assert!(matches!(err, SoapParseError::EmptyContent(id) if id == "x"));
    }

    #[test]
    fn test_missing_process_message() {
        let body = parse("<Body><Unexpected/></Body>");

        assert!(ProcessMessageResponse::from_body(&body).is_err());
    }

    #[test]
    fn test_header_without_blocks() {
        assert!(Header::default().is_empty());
        assert!(Header::default().header_elements().is_empty());
    }
}
