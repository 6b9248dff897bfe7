//! WS-Security header: username token and validity timestamp

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use uuid::Uuid;
use xmltree::{Element, XMLNode};

use crate::ns;
use crate::xml::text_element;

/// Validity window of a security header
const SECURITY_HEADER_LIFETIME_MINUTES: i64 = 5;

/// `<wsse:Security>` block
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityHeader {
    /// Validity window of the message
    pub timestamp: Timestamp,

    /// Credential
    pub username_token: UsernameToken,
}

/// Validity window, serialized as `Created`/`Expires` attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    pub id: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// `<wsse:UsernameToken>`
#[derive(Debug, Clone, PartialEq)]
pub struct UsernameToken {
    pub id: String,
    pub username: String,
    pub password: Password,
}

/// `<wsse:Password Type="...">`
#[derive(Clone, PartialEq)]
pub struct Password {
    pub value: String,
    pub password_type: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("value", &"***")
            .field("password_type", &self.password_type)
            .finish()
    }
}

/// Builds a fresh security header for one outbound message.
///
/// Both the timestamp id and the token id are new random identifiers on every
/// call. `created` is `now`, `expires` is five minutes later. The password is
/// sent in clear text with the OASIS `PasswordText` type.
pub fn build_security_header(username: &str, password: &str, now: DateTime<Utc>) -> SecurityHeader {
    SecurityHeader {
        timestamp: Timestamp {
            id: Uuid::new_v4().to_string(),
            created: now,
            expires: now + Duration::minutes(SECURITY_HEADER_LIFETIME_MINUTES),
        },
        username_token: UsernameToken {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: Password {
                value: password.to_string(),
                password_type: ns::PASSWORD_TEXT.to_string(),
            },
        },
    }
}

/// ISO-8601 round-trip form used on the wire, always UTC with a `Z` suffix
fn wire_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Timestamp {
    pub fn created_string(&self) -> String {
        wire_time(&self.created)
    }

    pub fn expires_string(&self) -> String {
        wire_time(&self.expires)
    }
}

impl SecurityHeader {
    /// Serializes the block as a `wsse:Security` element
    pub fn to_element(&self) -> Element {
        let mut security = Element::new("wsse:Security");
        security
            .attributes
            .insert("xmlns:wsse".to_string(), ns::WSSE.to_string());
        security
            .attributes
            .insert("xmlns:wsu".to_string(), ns::WSU.to_string());

        let token = &self.username_token;
        let mut token_elem = Element::new("wsse:UsernameToken");
        token_elem
            .attributes
            .insert("wsu:Id".to_string(), token.id.clone());
        token_elem
            .children
            .push(XMLNode::Element(text_element("wsse:Username", &token.username)));

        let mut password = text_element("wsse:Password", &token.password.value);
        password
            .attributes
            .insert("Type".to_string(), token.password.password_type.clone());
        token_elem.children.push(XMLNode::Element(password));
        security.children.push(XMLNode::Element(token_elem));

        let mut timestamp = Element::new("Timestamp");
        timestamp
            .attributes
            .insert("wsu:Id".to_string(), self.timestamp.id.clone());
        timestamp
            .attributes
            .insert("Created".to_string(), self.timestamp.created_string());
        timestamp
            .attributes
            .insert("Expires".to_string(), self.timestamp.expires_string());
        security.children.push(XMLNode::Element(timestamp));

        security
    }
}
