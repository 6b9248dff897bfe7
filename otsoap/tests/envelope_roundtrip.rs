use chrono::Utc;
use otsoap::{
    Content, Envelope, Header, Payload, PayloadManifest, ProcessMessage, ProcessMessageResponse,
    build_security_header, parse_soap_document, write_envelope,
};
use xmltree::Element;

#[test]
fn request_envelope_preserves_manifest_correlation() -> anyhow::Result<()> {
    let request = Element::parse(
        r#"<CustomerLookup xmlns="urn:opentrack:customers"><CustomerNumber>1042</CustomerNumber></CustomerLookup>"#
            .as_bytes(),
    )?;
    let payload = Payload::single(Content::new("req-1", request));
    let header = Header {
        security: Some(build_security_header("user", "secret", Utc::now())),
        payload_manifest: Some(PayloadManifest::for_payload(&payload)),
    };
    let xml = write_envelope(&Envelope::new(header, ProcessMessage::new(payload)))?;

    // Read our own request back as if it were a reply
    let doc = parse_soap_document(xml.as_bytes())?;
    let envelope: Envelope<ProcessMessageResponse> = doc.to_envelope()?;

    let manifest = envelope
        .header
        .payload_manifest
        .expect("manifest survives serialization");
    let content = &envelope.body.payload.content[0];
    let entry = manifest.entry(&content.id).expect("manifest entry for content");

    assert_eq!(content.id, "req-1");
    assert_eq!(content.element.name, "CustomerLookup");
    assert_eq!(entry.element, content.element.name);
    assert_eq!(
        Some(entry.namespace_uri.as_str()),
        content.element.namespace.as_deref()
    );
    assert_eq!(entry.namespace_uri, "urn:opentrack:customers");

    Ok(())
}

#[test]
fn security_header_survives_serialization() -> anyhow::Result<()> {
    let security = build_security_header("dealer", "pa55word", Utc::now());
    let header = Header {
        security: Some(security.clone()),
        payload_manifest: None,
    };
    let xml = write_envelope(&Envelope::new(header, Element::new("Ping")))?;

    let doc = parse_soap_document(xml.as_bytes())?;
    let header = doc.header.expect("header present");
    let block = header
        .get_child("Security")
        .expect("security block present");
    let timestamp = block.get_child("Timestamp").expect("timestamp present");

    assert_eq!(
        timestamp.attributes.get("Created"),
        Some(&security.timestamp.created_string())
    );
    assert_eq!(
        timestamp.attributes.get("Expires"),
        Some(&security.timestamp.expires_string())
    );

    let token = block.get_child("UsernameToken").expect("token present");
    let username = token.get_child("Username").expect("username present");
    assert_eq!(username.get_text().as_deref(), Some("dealer"));

    Ok(())
}
