use xmltree::Element;

use crate::error::Result;
use crate::request::{DealerInfo, Record, StarRequest, records};

const CUSTOMER: &str = "Customer";

/// Customer lookup by any combination of criteria
#[derive(Debug, Clone, Default)]
pub struct CustomerLookupRequest {
    pub dealer: DealerInfo,
    pub criteria: Vec<(String, String)>,
}

impl CustomerLookupRequest {
    pub fn new(dealer: DealerInfo) -> Self {
        Self {
            dealer,
            criteria: Vec::new(),
        }
    }

    /// Adds a `LookupParms` criterion, e.g. `("LastName", "Smith")`
    pub fn criterion(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.criteria.push((name.into(), value.into()));
        self
    }

    pub fn customer_number(self, number: impl Into<String>) -> Self {
        self.criterion("CustomerNumber", number)
    }

    pub fn last_name(self, name: impl Into<String>) -> Self {
        self.criterion("LastName", name)
    }

    pub fn phone_number(self, phone: impl Into<String>) -> Self {
        self.criterion("PhoneNumber", phone)
    }
}

impl StarRequest for CustomerLookupRequest {
    type Response = Vec<Record>;

    fn to_element(&self) -> Result<Element> {
        Ok(super::lookup_element(
            "CustomerLookup",
            &self.dealer,
            &self.criteria,
        ))
    }

    fn parse_response(&self, response: &Element) -> Result<Vec<Record>> {
        Ok(records(response, Some(CUSTOMER)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otsoap::xml::child_elements;

    #[test]
    fn test_lookup_element() {
        let request = CustomerLookupRequest::new(DealerInfo::new("QG", "ZE7", "srv"))
            .customer_number("1042")
            .last_name("Smith");

        let elem = request.to_element().unwrap();
        assert_eq!(elem.name, "CustomerLookup");

        let parms = elem.get_child("LookupParms").unwrap();
        let names: Vec<&str> = child_elements(parms).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CustomerNumber", "LastName"]);
    }

    #[test]
    fn test_parse_customers() {
        let response =
            Element::parse(r#"<Customers><Customer id="1"/></Customers>"#.as_bytes()).unwrap();

        let customers = CustomerLookupRequest::default()
            .parse_response(&response)
            .unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].attribute("id"), Some("1"));
    }
}
