use crate::errors::AppError;
use crate::models::PricePoint;

/// Year-to-date percentage return: last close vs first close of the window.
pub fn ytd_return(series: &[PricePoint]) -> Result<f64, AppError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InsufficientData("empty price series".into())),
    };
    if first.close == 0.0 {
        return Err(AppError::InsufficientData(
            "first close of the window is zero".into(),
        ));
    }
    Ok((last.close - first.close) / first.close * 100.0)
}

/// Display form at the fixed precision of two decimals, e.g. "-10.00%".
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.2}%")
}

/// Round to the display precision for payloads carrying the raw number.
pub fn round_pct(pct: f64) -> f64 {
    (pct * 100.0).round() / 100.0
}
