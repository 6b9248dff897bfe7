//! Reference tables: opcodes, advisors, technicians, parts setup

use xmltree::{Element, XMLNode};

use crate::error::Result;
use crate::request::{DealerInfo, Record, StarRequest, records};

/// Reference tables the DMS can list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    ServiceLaborOpcodes,
    ServiceWriters,
    ServiceTechs,
    PartsManufacturers,
    PartsStockingGroups,
}

impl TableKind {
    /// Root element name of the table, e.g. `ServiceTechsTable`
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::ServiceLaborOpcodes => "ServiceLaborOpcodesTable",
            Self::ServiceWriters => "ServiceWritersTable",
            Self::ServiceTechs => "ServiceTechsTable",
            Self::PartsManufacturers => "PartsManufacturersTable",
            Self::PartsStockingGroups => "PartsStockingGroupsTable",
        }
    }

    pub fn request_name(&self) -> String {
        format!("{}Request", self.table_name())
    }
}

/// Lists every record of one table for a dealer
#[derive(Debug, Clone)]
pub struct TableRequest {
    pub kind: TableKind,
    pub dealer: DealerInfo,
}

impl TableRequest {
    pub fn new(kind: TableKind, dealer: DealerInfo) -> Self {
        Self { kind, dealer }
    }
}

impl StarRequest for TableRequest {
    type Response = Vec<Record>;

    fn to_element(&self) -> Result<Element> {
        let mut root = Element::new(&self.kind.request_name());
        root.children
            .push(XMLNode::Element(self.dealer.to_element()));
        Ok(root)
    }

    fn parse_response(&self, response: &Element) -> Result<Vec<Record>> {
        Ok(records(response, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_element() {
        let request = TableRequest::new(TableKind::ServiceTechs, DealerInfo::new("QG", "ZE7", "srv"));

        let elem = request.to_element().unwrap();
        assert_eq!(elem.name, "ServiceTechsTableRequest");
        assert!(elem.get_child("Dealer").is_some());
    }

    #[test]
    fn test_parse_table() {
        let request = TableRequest::new(TableKind::ServiceLaborOpcodes, DealerInfo::default());
        let response = Element::parse(
            r#"<ServiceLaborOpcodesTable>
                 <ServiceLaborOpcodeRecord><Opcode>LOF</Opcode><Description>Oil change</Description></ServiceLaborOpcodeRecord>
                 <ServiceLaborOpcodeRecord><Opcode>ROT</Opcode></ServiceLaborOpcodeRecord>
               </ServiceLaborOpcodesTable>"#
                .as_bytes(),
        )
        .unwrap();

        let records = request.parse_response(&response).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("Opcode"), Some("LOF"));
        assert_eq!(records[1].field("Opcode"), Some("ROT"));
    }
}
