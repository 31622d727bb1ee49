//! Timestamp helpers for the DPC `data` column.

/// Reduces a `YYYY-MM-DDThh:mm:ss` timestamp to `YYYY-MM-DD`.
///
/// Works on fixed byte positions and does not validate the input; a
/// differently shaped string gives a garbled result, with missing pieces left
/// empty.
pub fn str2date(s: &str) -> String {
    let year = s.get(0..4).unwrap_or("");
    let month = s.get(5..7).unwrap_or("");
    let day = s.get(8..10).unwrap_or("");
    format!("{}-{}-{}", year, month, day)
}
