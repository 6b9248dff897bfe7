//! # opentrack - OpenTrack DMS client
//!
//! Blocking client for the OpenTrack dealer management web services.
//!
//! Most operations travel through the STAR `ProcessMessage` transport: the
//! request element is wrapped in a content part with a matching payload
//! manifest, the reply's first content part is scanned for DMS `Error`
//! markers and only then handed to the request's parser. Two operations
//! ([`OpenTrackApi::add_part`], [`OpenTrackApi::service_pricing_lookup`])
//! send a hand-built envelope with an explicit WS-Security header.
//!
//! ## Architecture
//!
//! - [`OpenTrackApi`]: session settings and operations
//! - [`StarRequest`]: request descriptors submitted through the pipeline
//! - [`TransportProvider`] / [`StarTransport`]: one transport per call,
//!   SOAP over HTTP by default
//! - [`ManualSoapClient`]: envelope in, typed envelope out
//! - [`OpenTrackConfigExt`]: settings from `otconfig`
//!
//! Logging goes through `tracing`; install a subscriber in the application
//! to see it.

mod api;
mod config_ext;
mod error;
mod request;
pub mod requests;
mod soap_client;
mod transport;

pub use api::{DEFAULT_TIMEOUT, OpenTrackApi};
pub use config_ext::OpenTrackConfigExt;
pub use error::{ErrorKind, OpenTrackError, Result};
pub use request::{DealerInfo, Record, StarRequest, records};
pub use soap_client::{ManualSoapClient, MessageHook};
pub use transport::{
    ConnectionSettings, HttpStarTransport, HttpTransportProvider, StarExchange, StarTransport,
    TransferMode, TransportProvider,
};

pub use otsoap::{ErrorRecord, Payload, PayloadManifest, SoapFault};
