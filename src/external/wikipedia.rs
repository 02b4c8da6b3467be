use async_trait::async_trait;
use url::Url;

use crate::external::html::first_matching_table;
use crate::external::provider::{ConstituentProvider, ProviderError};
use crate::models::CompanyRecord;

/// Leading columns that identify the constituents table among the several
/// tables on the page. The remaining columns are taken positionally.
const EXPECTED_HEADERS: [&str; 3] = ["Symbol", "Security", "GICS Sector"];

/// Scrapes the index constituents from the configured encyclopedia page:
/// first table whose header row carries the expected signature, first row as
/// header. Schema drift is an error, never a silent wrong-column read.
pub struct WikipediaProvider {
    client: reqwest::Client,
    url: Url,
}

impl WikipediaProvider {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; Sp500Dashboard/0.1)")
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            url,
        }
    }
}

fn header_matches(headers: &[String]) -> bool {
    headers.len() >= EXPECTED_HEADERS.len()
        && EXPECTED_HEADERS
            .iter()
            .zip(headers)
            .all(|(want, got)| got.eq_ignore_ascii_case(want))
}

pub fn parse_constituents(doc: &str) -> Result<Vec<CompanyRecord>, ProviderError> {
    let table = first_matching_table(doc, header_matches).ok_or_else(|| {
        ProviderError::BadResponse("no table with the expected constituent columns".into())
    })?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        // spacer and annotation rows carry too few cells to be companies
        if row.len() < EXPECTED_HEADERS.len() || row[0].is_empty() {
            continue;
        }
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        records.push(CompanyRecord {
            symbol: cell(0),
            security: cell(1),
            gics_sector: cell(2),
            gics_sub_industry: cell(3),
            headquarters: cell(4),
            date_added: cell(5),
            cik: cell(6),
            founded: cell(7),
        });
    }

    if records.is_empty() {
        return Err(ProviderError::BadResponse(
            "constituent table has no data rows".into(),
        ));
    }
    Ok(records)
}

#[async_trait]
impl ConstituentProvider for WikipediaProvider {
    async fn fetch_constituents(&self) -> Result<Vec<CompanyRecord>, ProviderError> {
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        parse_constituents(&body)
    }
}
