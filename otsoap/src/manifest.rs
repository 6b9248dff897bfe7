//! Payload manifest: tells the receiver how to read each content part

use xmltree::{Element, XMLNode};

use crate::envelope::{Content, Payload};
use crate::ns;
use crate::xml::{child_elements, local_name, namespace_uri};

const DEFAULT_RELATED_ID: &str = "1";
const DEFAULT_VERSION: &str = "1.0";

/// One `<tran:manifest>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Id of the content part this entry describes
    pub content_id: String,

    /// Namespace of the content's root element (may be empty)
    pub namespace_uri: String,

    /// Local name of the content's root element
    pub element: String,

    pub related_id: String,

    pub version: String,
}

/// `<tran:PayloadManifest>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadManifest {
    pub manifests: Vec<Manifest>,
}

impl Manifest {
    pub fn new(
        content_id: impl Into<String>,
        element: impl Into<String>,
        namespace_uri: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            namespace_uri: namespace_uri.into(),
            element: element.into(),
            related_id: DEFAULT_RELATED_ID.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Entry describing `content`, using the local name and namespace of its root element
    pub fn for_content(content: &Content) -> Self {
        Self::new(
            content.id.clone(),
            local_name(&content.element),
            namespace_uri(&content.element),
        )
    }

    fn to_element(&self) -> Element {
        let mut elem = Element::new("tran:manifest");
        let attrs = &mut elem.attributes;
        attrs.insert("contentID".to_string(), self.content_id.clone());
        attrs.insert("namespaceURI".to_string(), self.namespace_uri.clone());
        attrs.insert("element".to_string(), self.element.clone());
        attrs.insert("relatedID".to_string(), self.related_id.clone());
        attrs.insert("version".to_string(), self.version.clone());
        elem
    }

    fn from_element(elem: &Element) -> Self {
        let attr = |name: &str| elem.attributes.get(name).cloned().unwrap_or_default();
        Self {
            content_id: attr("contentID"),
            namespace_uri: attr("namespaceURI"),
            element: attr("element"),
            related_id: attr("relatedID"),
            version: attr("version"),
        }
    }
}

/// Manifest with a single entry, as sent by the hand-built envelopes
pub fn build_manifest(content_id: &str, element: &str, namespace_uri: &str) -> PayloadManifest {
    PayloadManifest {
        manifests: vec![Manifest::new(content_id, element, namespace_uri)],
    }
}

impl PayloadManifest {
    /// One entry per content part of `payload`, in the same order
    pub fn for_payload(payload: &Payload) -> Self {
        Self {
            manifests: payload.content.iter().map(Manifest::for_content).collect(),
        }
    }

    /// Entry describing the content part with id `content_id`
    pub fn entry(&self, content_id: &str) -> Option<&Manifest> {
        self.manifests.iter().find(|m| m.content_id == content_id)
    }

    pub fn to_element(&self) -> Element {
        let mut elem = Element::new("tran:PayloadManifest");
        elem.attributes
            .insert("xmlns:tran".to_string(), ns::STAR_TRANSPORT.to_string());
        for manifest in &self.manifests {
            elem.children.push(XMLNode::Element(manifest.to_element()));
        }
        elem
    }

    /// Reads a `PayloadManifest` element received from the wire
    pub fn from_element(elem: &Element) -> Self {
        Self {
            manifests: child_elements(elem)
                .filter(|child| local_name(child) == "manifest")
                .map(Manifest::from_element)
                .collect(),
        }
    }
}
