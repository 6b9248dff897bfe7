//! OpenTrack session and the STAR submission pipeline

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use otsoap::xml::local_name;
use otsoap::{
    Content, Envelope, Header, Payload, PayloadManifest, ProcessMessage, ProcessMessageResponse,
    actions, build_manifest, build_security_header, scan_for_error,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{OpenTrackError, Result};
use crate::request::{DealerInfo, Record, StarRequest};
use crate::requests::{
    CustomerLookupRequest, PartAdd, PartAddResponse, ServicePricingLookupRequest,
    ServicePricingLookupResponse, ServicePricingLookupResult, TableKind, TableRequest,
    VehicleLookupRequest,
};
use crate::soap_client::{ManualSoapClient, MessageHook};
use crate::transport::{ConnectionSettings, HttpTransportProvider, TransferMode, TransportProvider};

/// Default send timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const WEB_SERVICE: &str = "WebService.asmx";
const SERVICE_API: &str = "ServiceAPI.asmx";
const PARTS_API: &str = "PartsAPI.asmx";

/// Session with one OpenTrack deployment
///
/// Settings are meant to be set once, before the session is shared between
/// threads: calls only read them.
///
/// ```no_run
/// use opentrack::{DealerInfo, OpenTrackApi};
///
/// let api = OpenTrackApi::new("https://ot.dms.dealertrack.com", "user", "secret")?;
/// let dealer = DealerInfo::new("QG", "ZE7", "ot.dms.dealertrack.com");
/// for tech in api.get_technicians(&dealer)? {
///     println!("{:?}", tech.field("TechnicianNumber"));
/// }
/// # Ok::<(), opentrack::OpenTrackError>(())
/// ```
#[derive(Clone)]
pub struct OpenTrackApi {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    transfer_mode: TransferMode,
    on_send: Option<MessageHook>,
    on_receive: Option<MessageHook>,
    on_manual_soap_send: Option<MessageHook>,
    on_manual_soap_receive: Option<MessageHook>,
    transport: Arc<dyn TransportProvider>,
}

impl fmt::Debug for OpenTrackApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTrackApi")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .field("transfer_mode", &self.transfer_mode)
            .finish_non_exhaustive()
    }
}

fn require(value: &str, what: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(OpenTrackError::invalid_argument(format!(
            "Invalid {what} provided."
        )));
    }
    Ok(value.to_string())
}

/// Request element of `request`, rejecting descriptors that cannot be sent
fn request_element<R: StarRequest>(request: &R) -> Result<xmltree::Element> {
    let element = request.to_element().map_err(|e| match e {
        OpenTrackError::InvalidArgument(_) | OpenTrackError::InvalidRequest(_) => e,
        other => OpenTrackError::InvalidRequest(other.to_string()),
    })?;
    if local_name(&element).is_empty() {
        return Err(OpenTrackError::InvalidRequest(
            "request element has no name".to_string(),
        ));
    }
    Ok(element)
}

impl OpenTrackApi {
    /// Creates a session; `base_url` is the deployment root, e.g.
    /// `https://ot.dms.dealertrack.com`.
    ///
    /// Fails on a blank URL, username or password.
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = require(base_url, "Url")?;
        let username = require(username, "Username")?;
        let password = require(password, "Password")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            timeout: DEFAULT_TIMEOUT,
            transfer_mode: TransferMode::default(),
            on_send: None,
            on_receive: None,
            on_manual_soap_send: None,
            on_manual_soap_receive: None,
            transport: Arc::new(HttpTransportProvider),
        })
    }

    /// Replaces the STAR transport used by the pipeline
    pub fn with_transport(mut self, provider: impl TransportProvider + 'static) -> Self {
        self.transport = Arc::new(provider);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn transfer_mode(&self) -> TransferMode {
        self.transfer_mode
    }

    pub fn set_transfer_mode(&mut self, mode: TransferMode) {
        self.transfer_mode = mode;
    }

    /// Raw STAR message before it is sent
    pub fn set_on_send(&mut self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.on_send = Some(Arc::new(hook));
    }

    /// Raw STAR message as received
    pub fn set_on_receive(&mut self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.on_receive = Some(Arc::new(hook));
    }

    /// Raw message of [`add_part`](Self::add_part) and
    /// [`service_pricing_lookup`](Self::service_pricing_lookup) before sending
    pub fn set_on_manual_soap_send(&mut self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.on_manual_soap_send = Some(Arc::new(hook));
    }

    pub fn set_on_manual_soap_receive(&mut self, hook: impl Fn(&str) + Send + Sync + 'static) {
        self.on_manual_soap_receive = Some(Arc::new(hook));
    }

    pub fn web_service_url(&self) -> String {
        format!("{}/{}", self.base_url, WEB_SERVICE)
    }

    pub fn service_api_url(&self) -> String {
        format!("{}/{}", self.base_url, SERVICE_API)
    }

    pub fn parts_api_url(&self) -> String {
        format!("{}/{}", self.base_url, PARTS_API)
    }

    fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            url: self.web_service_url(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
            transfer_mode: self.transfer_mode,
            on_send: self.on_send.clone(),
            on_receive: self.on_receive.clone(),
        }
    }

    fn manual_client(&self) -> ManualSoapClient {
        ManualSoapClient::new(self.timeout, self.transfer_mode).with_hooks(
            self.on_manual_soap_send.clone(),
            self.on_manual_soap_receive.clone(),
        )
    }

    fn security_header(&self) -> Header {
        Header {
            security: Some(build_security_header(
                &self.username,
                &self.password,
                Utc::now(),
            )),
            payload_manifest: None,
        }
    }

    /// Sends `request` as a single STAR content part and parses the reply.
    ///
    /// A reply whose first content part carries an `Error` element fails with
    /// [`OpenTrackError::Dms`] and the request's parser is not called.
    pub fn submit_request<R: StarRequest>(&self, request: &R) -> Result<R::Response> {
        let element = request_element(request)?;
        let request_id = Uuid::new_v4().to_string();

        let payload = Payload::single(Content::new(request_id.clone(), element));
        let manifest = PayloadManifest::for_payload(&payload);
        debug!(
            content_id = %request_id,
            element = %manifest.manifests[0].element,
            "Submitting STAR request"
        );

        // Transport ouvert pour cet appel uniquement
        let exchange = {
            let mut transport = self.transport.open(&self.connection_settings())?;
            transport.process_message(&manifest, &payload)?
        };

        let response = exchange
            .payload
            .into_first_element()
            .ok_or(OpenTrackError::EmptyPayload)?;

        if let Some(error) = scan_for_error(&response) {
            warn!(
                content_id = %request_id,
                code = %error.code,
                message = %error.message,
                "OpenTrack returned an error"
            );
            return Err(error.into());
        }

        request.parse_response(&response)
    }

    fn get_table(&self, kind: TableKind, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.submit_request(&TableRequest::new(kind, dealer.clone()))
    }

    pub fn get_opcodes(&self, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.get_table(TableKind::ServiceLaborOpcodes, dealer)
    }

    pub fn get_service_advisors(&self, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.get_table(TableKind::ServiceWriters, dealer)
    }

    pub fn get_technicians(&self, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.get_table(TableKind::ServiceTechs, dealer)
    }

    pub fn get_part_manufacturers(&self, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.get_table(TableKind::PartsManufacturers, dealer)
    }

    pub fn get_parts_stocking_groups(&self, dealer: &DealerInfo) -> Result<Vec<Record>> {
        self.get_table(TableKind::PartsStockingGroups, dealer)
    }

    pub fn find_customers(&self, query: &CustomerLookupRequest) -> Result<Vec<Record>> {
        self.submit_request(query)
    }

    /// The single customer matching `query`
    pub fn get_customer(&self, query: &CustomerLookupRequest) -> Result<Record> {
        let mut customers = self.submit_request(query)?;
        if customers.len() != 1 {
            return Err(OpenTrackError::UnexpectedCount {
                element: "Customer".to_string(),
                expected: "exactly one",
                found: customers.len(),
            });
        }
        Ok(customers.remove(0))
    }

    /// The vehicle matching `query`, if any
    pub fn get_vehicle(&self, query: &VehicleLookupRequest) -> Result<Option<Record>> {
        let mut vehicles = self.submit_request(query)?;
        if vehicles.len() > 1 {
            return Err(OpenTrackError::UnexpectedCount {
                element: "Vehicle".to_string(),
                expected: "at most one",
                found: vehicles.len(),
            });
        }
        Ok(vehicles.pop())
    }

    /// Creates a part through the hand-built STAR envelope
    pub fn add_part(&self, part: &PartAdd) -> Result<PartAddResponse> {
        let content_id = Uuid::new_v4().to_string();

        let element = part.to_element();
        let mut header = self.security_header();
        header.payload_manifest = Some(build_manifest(&content_id, &element.name, ""));
        let payload = Payload::single(Content::new(content_id.clone(), element));
        let envelope = Envelope::new(header, ProcessMessage::new(payload));

        let url = self.web_service_url();
        debug!(url = %url, content_id = %content_id, "Sending PartAdd");
        let response: Envelope<ProcessMessageResponse> = self.manual_client().execute_request(
            &url,
            actions::STAR_PROCESS_MESSAGE,
            &envelope,
        )?;

        let element = response
            .body
            .payload
            .into_first_element()
            .ok_or(OpenTrackError::EmptyPayload)?;
        PartAddResponse::from_element(&element)
    }

    pub fn service_pricing_lookup(
        &self,
        request: &ServicePricingLookupRequest,
    ) -> Result<ServicePricingLookupResult> {
        let envelope = Envelope::new(self.security_header(), request.clone());

        let url = self.service_api_url();
        debug!(url = %url, "Sending ServicePricingLookup");
        let response: Envelope<ServicePricingLookupResponse> = self
            .manual_client()
            .execute_request(&url, actions::SERVICE_PRICING_LOOKUP, &envelope)?;

        Ok(response.body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_validates_arguments() {
        for (url, user, pass) in [
            ("", "user", "pass"),
            ("https://ot.example.com", "  ", "pass"),
            ("https://ot.example.com", "user", ""),
        ] {
            let err = OpenTrackApi::new(url, user, pass).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Argument);
        }
    }

    #[test]
    fn test_defaults_and_urls() {
        let api = OpenTrackApi::new("https://ot.example.com/", "user", "pass").unwrap();

        assert_eq!(api.timeout(), Duration::from_secs(120));
        assert_eq!(api.transfer_mode(), TransferMode::Buffered);
        assert_eq!(api.web_service_url(), "https://ot.example.com/WebService.asmx");
        assert_eq!(api.service_api_url(), "https://ot.example.com/ServiceAPI.asmx");
        assert_eq!(api.parts_api_url(), "https://ot.example.com/PartsAPI.asmx");
    }

    #[test]
    fn test_debug_hides_password() {
        let api = OpenTrackApi::new("https://ot.example.com", "user", "hunter2").unwrap();
        assert!(!format!("{api:?}").contains("hunter2"));
    }
}
