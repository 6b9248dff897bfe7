//! Request descriptors for the operations exposed by [`OpenTrackApi`](crate::OpenTrackApi)

mod customer;
mod part_add;
mod service_pricing;
mod table;
mod vehicle;

pub use customer::CustomerLookupRequest;
pub use part_add::{PartAdd, PartAddResponse};
pub use service_pricing::{
    SERVICE_API_NAMESPACE, ServicePricingLookupRequest, ServicePricingLookupResponse,
    ServicePricingLookupResult,
};
pub use table::{TableKind, TableRequest};
pub use vehicle::VehicleLookupRequest;

use xmltree::{Element, XMLNode};

use crate::request::{DealerInfo, push_fields};

/// `<name><Dealer/><LookupParms>criteria</LookupParms></name>`
fn lookup_element(name: &str, dealer: &DealerInfo, criteria: &[(String, String)]) -> Element {
    let mut root = Element::new(name);
    root.children.push(XMLNode::Element(dealer.to_element()));

    let mut parms = Element::new("LookupParms");
    push_fields(&mut parms, criteria);
    root.children.push(XMLNode::Element(parms));
    root
}
