//! STAR `ProcessMessage` transport
//!
//! The pipeline opens one [`StarTransport`] per call through a
//! [`TransportProvider`] and drops it before returning. The default provider
//! posts a hand-built envelope to `WebService.asmx`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use otsoap::{
    Envelope, Header, Payload, PayloadManifest, ProcessMessage, ProcessMessageResponse, actions,
    build_security_header,
};
use tracing::debug;

use crate::error::{OpenTrackError, Result};
use crate::soap_client::{ManualSoapClient, MessageHook};

/// How replies are read from the socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Read the whole reply, then parse it
    #[default]
    Buffered,
    /// Parse while reading
    Streamed,
}

impl FromStr for TransferMode {
    type Err = OpenTrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buffered" => Ok(Self::Buffered),
            "streamed" => Ok(Self::Streamed),
            other => Err(OpenTrackError::invalid_argument(format!(
                "unknown transfer mode '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered => f.write_str("buffered"),
            Self::Streamed => f.write_str("streamed"),
        }
    }
}

/// Reply of a `ProcessMessage` call
#[derive(Debug, Clone, Default)]
pub struct StarExchange {
    pub manifest: PayloadManifest,
    pub payload: Payload,
}

/// Everything a transport needs to reach the STAR endpoint
#[derive(Clone)]
pub struct ConnectionSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub transfer_mode: TransferMode,
    pub on_send: Option<MessageHook>,
    pub on_receive: Option<MessageHook>,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("transfer_mode", &self.transfer_mode)
            .field("on_send", &self.on_send.is_some())
            .field("on_receive", &self.on_receive.is_some())
            .finish()
    }
}

/// One `ProcessMessage` round trip
pub trait StarTransport {
    fn process_message(
        &mut self,
        manifest: &PayloadManifest,
        payload: &Payload,
    ) -> Result<StarExchange>;
}

/// Opens a fresh transport for every submitted request
pub trait TransportProvider: Send + Sync {
    fn open(&self, settings: &ConnectionSettings) -> Result<Box<dyn StarTransport>>;
}

/// Default provider: SOAP over HTTP with ureq
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransportProvider;

impl TransportProvider for HttpTransportProvider {
    fn open(&self, settings: &ConnectionSettings) -> Result<Box<dyn StarTransport>> {
        Ok(Box::new(HttpStarTransport::new(settings)))
    }
}

/// STAR transport writing the WS-Security header itself
pub struct HttpStarTransport {
    client: ManualSoapClient,
    url: String,
    username: String,
    password: String,
}

impl HttpStarTransport {
    pub fn new(settings: &ConnectionSettings) -> Self {
        let client = ManualSoapClient::new(settings.timeout, settings.transfer_mode)
            .with_hooks(settings.on_send.clone(), settings.on_receive.clone());

        Self {
            client,
            url: settings.url.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        }
    }
}

impl StarTransport for HttpStarTransport {
    fn process_message(
        &mut self,
        manifest: &PayloadManifest,
        payload: &Payload,
    ) -> Result<StarExchange> {
        let header = Header {
            security: Some(build_security_header(
                &self.username,
                &self.password,
                Utc::now(),
            )),
            payload_manifest: Some(manifest.clone()),
        };
        let envelope = Envelope::new(header, ProcessMessage::new(payload.clone()));

        let response: Envelope<ProcessMessageResponse> =
            self.client
                .execute_request(&self.url, actions::STAR_PROCESS_MESSAGE, &envelope)?;

        let exchange = StarExchange {
            manifest: response.header.payload_manifest.unwrap_or_default(),
            payload: response.body.payload,
        };
        debug!(
            url = %self.url,
            parts = exchange.payload.content.len(),
            "ProcessMessage completed"
        );
        Ok(exchange)
    }
}
