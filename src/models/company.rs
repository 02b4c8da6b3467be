use serde::{Deserialize, Serialize};

/// Column names of the constituents table, in source order. Doubles as the
/// CSV export header.
pub const COLUMN_NAMES: [&str; 8] = [
    "Symbol",
    "Security",
    "GICS Sector",
    "GICS Sub-Industry",
    "Headquarters Location",
    "Date added",
    "CIK",
    "Founded",
];

/// One row of the index constituents table. Immutable once loaded; the
/// cached table is shared as `Arc<Vec<CompanyRecord>>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub symbol: String,
    pub security: String,
    pub gics_sector: String,
    pub gics_sub_industry: String,
    pub headquarters: String,
    pub date_added: String,
    pub cik: String,
    pub founded: String,
}
