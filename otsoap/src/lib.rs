//! # otsoap - STAR transport envelopes
//!
//! This crate implements the protocol layer used to talk to the OpenTrack DMS
//! web services: building and parsing the SOAP 1.1 envelope used by the STAR
//! `ProcessMessage` transport, with its WS-Security header and payload manifest.
//!
//! ## Features
//!
//! - Generic envelope model ([`Envelope`]) over any body shape
//! - WS-Security `UsernameToken` + timestamp construction ([`build_security_header`])
//! - Payload manifest correlation ([`build_manifest`], [`PayloadManifest::for_payload`])
//! - Deep search for `Error` markers in response payloads ([`scan_for_error`])
//! - SOAP Fault extraction ([`find_fault`])
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use otsoap::{Content, Envelope, Header, Payload, PayloadManifest, ProcessMessage};
//! use otsoap::{build_security_header, write_envelope};
//! use xmltree::Element;
//!
//! let content = Content::new("content-0", Element::new("ServiceTechsTableRequest"));
//! let payload = Payload::single(content);
//!
//! let header = Header {
//!     security: Some(build_security_header("user", "secret", Utc::now())),
//!     payload_manifest: Some(PayloadManifest::for_payload(&payload)),
//! };
//! let envelope = Envelope::new(header, ProcessMessage::new(payload));
//!
//! let xml = write_envelope(&envelope).unwrap();
//! assert!(xml.contains("ServiceTechsTableRequest"));
//! ```

mod builder;
mod envelope;
mod fault;
mod manifest;
mod parser;
mod scanner;
mod security;
pub mod xml;

pub use builder::{element_to_string, write_envelope};
pub use envelope::{
    BodyContent, Content, Envelope, FromBody, Header, Payload, ProcessMessage,
    ProcessMessageResponse,
};
pub use fault::{SoapFault, find_fault};
pub use manifest::{Manifest, PayloadManifest, build_manifest};
pub use parser::{SoapDocument, SoapParseError, parse_envelope, parse_soap_document};
pub use scanner::{ErrorRecord, scan_for_error};
pub use security::{Password, SecurityHeader, Timestamp, UsernameToken, build_security_header};

/// Namespace URIs used on the wire
pub mod ns {
    /// SOAP 1.1 envelope
    pub const SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";

    /// STAR transport (`ProcessMessage`, `PayloadManifest`, ...)
    pub const STAR_TRANSPORT: &str = "http://www.starstandards.org/webservices/2005/10/transport";

    /// WS-Security extension
    pub const WSSE: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

    /// WS-Security utility (ids)
    pub const WSU: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

    /// Password type for cleartext `UsernameToken` passwords
    pub const PASSWORD_TEXT: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText";
}

/// SOAP actions understood by the DMS endpoints
pub mod actions {
    /// STAR standard `ProcessMessage` operation (quotes are part of the value)
    pub const STAR_PROCESS_MESSAGE: &str =
        "\"http://www.starstandards.org/webservices/2005/10/transport/operations/ProcessMessage\"";

    /// ServiceAPI pricing lookup
    pub const SERVICE_PRICING_LOOKUP: &str = "opentrack.dealertrack.com/ServicePricingLookup";
}
