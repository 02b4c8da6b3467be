use crate::errors::AppError;
use crate::models::{CompanyRecord, COLUMN_NAMES};

/// Fixed download filename, kept from the page this service replaces.
pub const EXPORT_FILENAME: &str = "SP500.csv";

/// Serialize `records` to CSV: header row plus one row per record, standard
/// quoting. A zero-row table still produces the header.
pub fn to_csv(records: &[CompanyRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(COLUMN_NAMES).map_err(encoding_error)?;
    for r in records {
        writer
            .write_record([
                &r.symbol,
                &r.security,
                &r.gics_sector,
                &r.gics_sub_industry,
                &r.headquarters,
                &r.date_added,
                &r.cik,
                &r.founded,
            ])
            .map_err(encoding_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Encoding(e.to_string()))
}

fn encoding_error(e: csv::Error) -> AppError {
    AppError::Encoding(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(symbol: &str, security: &str, sector: &str) -> CompanyRecord {
        CompanyRecord {
            symbol: symbol.into(),
            security: security.into(),
            gics_sector: sector.into(),
            gics_sub_industry: "Sub".into(),
            headquarters: "City, State".into(),
            date_added: "1999-01-01".into(),
            cik: "0000000001".into(),
            founded: "1900".into(),
        }
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let records = vec![
            company("MMM", "3M", "Industrials"),
            company("ABT", "Abbott Laboratories", "Health Care"),
        ];
        let bytes = to_csv(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            COLUMN_NAMES.to_vec()
        );

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), COLUMN_NAMES.len());
        assert_eq!(&rows[0][0], "MMM");
        assert_eq!(&rows[1][1], "Abbott Laboratories");
    }

    #[test]
    fn zero_rows_yields_header_only() {
        let bytes = to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Symbol,Security,"));
    }

    #[test]
    fn delimiter_in_a_field_survives_the_round_trip() {
        let records = vec![company("BRK.B", "Berkshire Hathaway, Class B", "Financials")];
        let bytes = to_csv(&records).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Berkshire Hathaway, Class B");
    }
}
