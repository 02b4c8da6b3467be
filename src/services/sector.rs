use crate::models::CompanyRecord;

/// Distinct GICS sectors present in `table`, sorted for stable presentation.
pub fn distinct_sectors(table: &[CompanyRecord]) -> Vec<String> {
    let mut sectors: Vec<String> = table.iter().map(|r| r.gics_sector.clone()).collect();
    sectors.sort();
    sectors.dedup();
    sectors
}

/// Rows whose sector is in `selected`, source order preserved. An empty
/// selection yields an empty table; unknown sector names match nothing.
pub fn filter_by_sector(table: &[CompanyRecord], selected: &[String]) -> Vec<CompanyRecord> {
    table
        .iter()
        .filter(|r| selected.iter().any(|s| s == &r.gics_sector))
        .cloned()
        .collect()
}

/// Initial selection when the caller picks nothing: the fourth sector from
/// the end of the sorted list, kept from the page this service replaces.
/// Falls back to the last sector when fewer than four exist.
pub fn default_selection(sectors: &[String]) -> Vec<String> {
    if sectors.is_empty() {
        return Vec::new();
    }
    let idx = if sectors.len() >= 4 {
        sectors.len() - 4
    } else {
        sectors.len() - 1
    };
    vec![sectors[idx].clone()]
}
