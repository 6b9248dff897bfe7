//! SOAP 1.1 Faults returned by the DMS endpoints

use std::fmt;

use xmltree::Element;

use crate::xml::{find_child, inner_text};

/// SOAP Fault extracted from a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// `faultcode` (ex: "soap:Client", "soap:Server")
    pub fault_code: String,

    /// `faultstring`
    pub fault_string: String,

    /// Text of the optional `detail` element
    pub detail: Option<String>,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.fault_code, self.fault_string)?;
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.trim().is_empty()) {
            write!(f, " ({})", detail.trim())?;
        }
        Ok(())
    }
}

/// Looks for a `Fault` element directly under the SOAP body
pub fn find_fault(body: &Element) -> Option<SoapFault> {
    let fault = find_child(body, "Fault")?;

    let text_of = |name: &str| {
        find_child(fault, name)
            .map(|e| inner_text(e).trim().to_string())
            .unwrap_or_default()
    };

    Some(SoapFault {
        fault_code: text_of("faultcode"),
        fault_string: text_of("faultstring"),
        detail: find_child(fault, "detail").map(inner_text),
    })
}
