//! Hand-built SOAP over HTTP
//!
//! Used where the request envelope has to carry an explicit WS-Security
//! header, and by the default STAR transport.

use std::sync::Arc;
use std::time::Duration;

use otsoap::{BodyContent, Envelope, FromBody, SoapDocument, parse_soap_document, write_envelope};
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::error::{OpenTrackError, Result};
use crate::transport::TransferMode;

/// Observer receiving a raw SOAP message
pub type MessageHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Blocking SOAP client bound to one timeout and transfer mode
pub struct ManualSoapClient {
    agent: Agent,
    transfer_mode: TransferMode,
    on_send: Option<MessageHook>,
    on_receive: Option<MessageHook>,
}

impl ManualSoapClient {
    pub fn new(timeout: Duration, transfer_mode: TransferMode) -> Self {
        // Les statuts 4xx/5xx ne sont pas des erreurs ureq : on veut lire le
        // corps des SOAP Faults
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            transfer_mode,
            on_send: None,
            on_receive: None,
        }
    }

    pub fn with_hooks(
        mut self,
        on_send: Option<MessageHook>,
        on_receive: Option<MessageHook>,
    ) -> Self {
        self.on_send = on_send;
        self.on_receive = on_receive;
        self
    }

    /// Posts `envelope` to `url` and maps the reply body to `Resp`.
    ///
    /// DMS error markers inside the reply are left to the caller.
    pub fn execute_request<Resp, Req>(
        &self,
        url: &str,
        action: &str,
        envelope: &Envelope<Req>,
    ) -> Result<Envelope<Resp>>
    where
        Resp: FromBody,
        Req: BodyContent,
    {
        let message = write_envelope(envelope)?;

        if let Some(hook) = &self.on_send {
            hook(&message);
        }
        debug!(url, action, bytes = message.len(), "Sending SOAP request");

        let mut response = self
            .agent
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .send(message)?;

        let status = response.status().as_u16();
        let success = (200..300).contains(&status);
        debug!(url, action, status, "SOAP response received");

        let body = response.body_mut().with_config().limit(u64::MAX);
        let document = if !success
            || self.on_receive.is_some()
            || self.transfer_mode == TransferMode::Buffered
        {
            let raw = body.read_to_string()?;
            trace!(url, response = %raw, "Raw SOAP response");

            if let Some(hook) = &self.on_receive {
                hook(&raw);
            }

            let parsed = parse_soap_document(raw.as_bytes());
            if !success {
                return Err(status_error(status, parsed.ok().as_ref(), raw));
            }
            let document = parsed?;
            if let Some(fault) = document.fault() {
                warn!(url, action, status, %fault, "SOAP fault");
                return Err(OpenTrackError::SoapFault { status, fault, raw });
            }
            document
        } else {
            let document = parse_soap_document(body.reader())?;
            if let Some(fault) = document.fault() {
                warn!(url, action, status, %fault, "SOAP fault");
                let raw = otsoap::element_to_string(&document.body).unwrap_or_default();
                return Err(OpenTrackError::SoapFault { status, fault, raw });
            }
            document
        };

        Ok(document.to_envelope()?)
    }
}

fn status_error(status: u16, document: Option<&SoapDocument>, raw: String) -> OpenTrackError {
    match document.and_then(SoapDocument::fault) {
        Some(fault) => {
            warn!(status, %fault, "SOAP fault");
            OpenTrackError::SoapFault { status, fault, raw }
        }
        None => {
            warn!(status, "HTTP error status without SOAP fault");
            OpenTrackError::HttpStatus { status, raw }
        }
    }
}
