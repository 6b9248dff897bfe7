//! Detection of `Error` markers inside response payloads
//!
//! Response shapes bury the marker at different depths, so the scan is a plain
//! depth-first walk over every element below the response root. Only local
//! names are compared: an `Error` element in any namespace counts.

use tracing::debug;
use xmltree::Element;

use crate::envelope::Payload;
use crate::xml::{find_descendant, inner_text};

const UNKNOWN_CODE: &str = "Unknown";

/// Error reported by the DMS inside an otherwise valid response
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("OpenTrack error {code}: {message}")]
pub struct ErrorRecord {
    /// Text of the first `Code` element below `Error`, or `"Unknown"`
    pub code: String,

    /// Text of the first `Message` element below `Error`, or the whole text of `Error`
    pub message: String,

    /// The response element that carried the marker
    pub xml: Element,
}

/// Scans `response` for the first `Error` element in document order.
///
/// The response root itself is not a candidate, only its descendants.
pub fn scan_for_error(response: &Element) -> Option<ErrorRecord> {
    let error = find_descendant(response, "Error")?;

    let code = find_descendant(error, "Code")
        .map(inner_text)
        .unwrap_or_else(|| UNKNOWN_CODE.to_string());
    let message = find_descendant(error, "Message")
        .map(inner_text)
        .unwrap_or_else(|| inner_text(error));

    debug!(response = %response.name, code = %code, "Error marker found in response");

    Some(ErrorRecord {
        code,
        message,
        xml: response.clone(),
    })
}

impl Payload {
    /// Scans the first content part; an empty payload has nothing to report
    pub fn scan_for_error(&self) -> Option<ErrorRecord> {
        self.first_element().and_then(scan_for_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Content;
    use xmltree::XMLNode;

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_code_and_message() {
        let response =
            parse("<Root><Error><Code>1001</Code><Message>Dealer not found</Message></Error></Root>");

        let error = scan_for_error(&response).unwrap();
        assert_eq!(error.code, "1001");
        assert_eq!(error.message, "Dealer not found");
        assert_eq!(error.xml.name, "Root");
    }

    #[test]
    fn test_bare_error_text() {
        let response = parse("<Root><Error>Generic failure text</Error></Root>");

        let error = scan_for_error(&response).unwrap();
        assert_eq!(error.code, "Unknown");
        assert_eq!(error.message, "Generic failure text");
    }

    #[test]
    fn test_deeply_nested_error() {
        let response = parse(
            r#"<a:Result xmlns:a="urn:a"><Items><Item><Status>
                 <b:Error xmlns:b="urn:b"><Detail><Code>E7</Code></Detail><Message>Locked</Message></b:Error>
               </Status></Item></Items></a:Result>"#,
        );

        let error = scan_for_error(&response).unwrap();
        assert_eq!(error.code, "E7");
        assert_eq!(error.message, "Locked");
    }

    #[test]
    fn test_prefixed_error_in_built_tree() {
        let mut error = Element::new("b:Error");
        error.children.push(XMLNode::Text("boom".to_string()));
        let mut response = Element::new("Root");
        response.children.push(XMLNode::Element(error));

        let record = scan_for_error(&response).unwrap();
        assert_eq!(record.code, "Unknown");
        assert_eq!(record.message, "boom");
    }

    #[test]
    fn test_first_error_in_document_order_wins() {
        let response = parse(
            "<Root><A><Error><Code>1</Code></Error></A><Error><Code>2</Code></Error></Root>",
        );

        assert_eq!(scan_for_error(&response).unwrap().code, "1");
    }

    #[test]
    fn test_code_without_message_uses_error_text() {
        let response = parse("<Root><Error><Code>42</Code></Error></Root>");

        let error = scan_for_error(&response).unwrap();
        assert_eq!(error.code, "42");
        assert_eq!(error.message, "42");
    }

    #[test]
    fn test_clean_response() {
        let response = parse(r#"<Customers><Customer id="1"/></Customers>"#);
        assert!(scan_for_error(&response).is_none());
    }

    #[test]
    fn test_error_named_data_is_still_a_marker() {
        let response = parse("<Vehicles><Vehicle><Error>none</Error></Vehicle></Vehicles>");
        assert!(scan_for_error(&response).is_some());
    }

    #[test]
    fn test_root_is_not_a_candidate() {
        let response = parse("<Error><Text>root only</Text></Error>");
        assert!(scan_for_error(&response).is_none());
    }

    #[test]
    fn test_empty_payload_has_nothing_to_scan() {
        assert!(Payload::default().scan_for_error().is_none());

        let payload = Payload::single(Content::new(
            "x",
            parse("<Root><Error>boom</Error></Root>"),
        ));
        assert_eq!(payload.scan_for_error().unwrap().message, "boom");
    }
}
