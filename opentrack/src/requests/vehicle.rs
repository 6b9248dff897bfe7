use xmltree::Element;

use crate::error::Result;
use crate::request::{DealerInfo, Record, StarRequest, records};

const VEHICLE: &str = "Vehicle";

/// Vehicle lookup by VIN, stock number or any other criterion
#[derive(Debug, Clone, Default)]
pub struct VehicleLookupRequest {
    pub dealer: DealerInfo,
    pub criteria: Vec<(String, String)>,
}

impl VehicleLookupRequest {
    pub fn new(dealer: DealerInfo) -> Self {
        Self {
            dealer,
            criteria: Vec::new(),
        }
    }

    pub fn criterion(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.criteria.push((name.into(), value.into()));
        self
    }

    pub fn vin(self, vin: impl Into<String>) -> Self {
        self.criterion("VIN", vin)
    }

    pub fn stock_number(self, number: impl Into<String>) -> Self {
        self.criterion("StockNumber", number)
    }
}

impl StarRequest for VehicleLookupRequest {
    type Response = Vec<Record>;

    fn to_element(&self) -> Result<Element> {
        Ok(super::lookup_element(
            "VehicleLookup",
            &self.dealer,
            &self.criteria,
        ))
    }

    fn parse_response(&self, response: &Element) -> Result<Vec<Record>> {
        Ok(records(response, Some(VEHICLE)))
    }
}
