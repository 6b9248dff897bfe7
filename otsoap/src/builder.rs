//! Serialization of envelopes to SOAP 1.1 text

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::envelope::{BodyContent, Envelope};
use crate::ns;

fn write_element(elem: &Element, declaration: bool) -> Result<String, xmltree::Error> {
    let mut buf = Vec::new();
    // No indentation: content parts are transmitted verbatim
    let config = EmitterConfig::new()
        .write_document_declaration(declaration)
        .perform_indent(false);
    elem.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Serializes a lone element (no XML declaration)
pub fn element_to_string(elem: &Element) -> Result<String, xmltree::Error> {
    write_element(elem, false)
}

/// Serializes `envelope` as a complete SOAP 1.1 message.
///
/// The `soap:Header` element is omitted when the header carries no block.
pub fn write_envelope<B: BodyContent>(envelope: &Envelope<B>) -> Result<String, xmltree::Error> {
    let mut root = Element::new("soap:Envelope");
    root.attributes
        .insert("xmlns:soap".to_string(), ns::SOAP.to_string());

    if !envelope.header.is_empty() {
        let mut header = Element::new("soap:Header");
        for block in envelope.header.header_elements() {
            header.children.push(XMLNode::Element(block));
        }
        root.children.push(XMLNode::Element(header));
    }

    let mut body = Element::new("soap:Body");
    for elem in envelope.body.body_elements() {
        body.children.push(XMLNode::Element(elem));
    }
    root.children.push(XMLNode::Element(body));

    write_element(&root, true)
}
