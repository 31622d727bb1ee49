//! CSV parser for the DPC regional daily files.

use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::observation::{ColumnMap, Observation};

/// Reads one regional CSV file into observations, in file order.
///
/// The first line is the header; it is only used to locate columns.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not valid UTF-8, or a
/// row is too short to contain the required columns.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<Observation>> {
    let file = File::open(path.as_ref())?;
    let observations = parse_reader(file)?;
    debug!(rows = observations.len(), "File parsed");
    Ok(observations)
}

/// Same as [`parse`] over any reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_header(rdr.headers()?);

    let mut observations = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        observations.push(Observation::from_record(&record, &columns, i + 1)?);
    }

    Ok(observations)
}

/// Parses several files (typically one per date) and concatenates the
/// results, keeping file order and then row order. Duplicates are kept.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();
    for path in paths {
        observations.extend(parse(path.as_ref())?);
    }
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    const HEADER: &str = "data,stato,codice_regione,denominazione_regione,lat,long,ricoverati_con_sintomi,terapia_intensiva,totale_ospedalizzati,isolamento_domiciliare,totale_positivi,variazione_totale_positivi,nuovi_positivi,dimessi_guariti,deceduti,totale_casi,tamponi,casi_testati,note\n";

    #[test]
    fn test_parse_header_only_is_empty() {
        let result = parse_reader(HEADER.as_bytes()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_rows_in_order() {
        let data = format!(
            "{HEADER}\
2020-06-15T17:00:00,ITA,13,Abruzzo,42.35,13.39,40,2,42,354,396,-10,1,2367,455,3218,81024,,\n\
2020-06-15T17:00:00,ITA,17,Basilicata,40.63,15.80,2,0,2,11,13,-1,0,332,27,372,32312,,\n\
2020-06-15T17:00:00,ITA,12,Lazio,41.89,12.48,350,21,371,1061,1432,-12,8,5491,782,7705,280451,,\n"
        );
        let result = parse_reader(data.as_bytes()).unwrap();

        let regions: Vec<_> = result.iter().map(|o| o.region.as_str()).collect();
        assert_eq!(regions, ["Abruzzo", "Basilicata", "Lazio"]);
        assert_eq!(result[2].deaths, Some(782));
    }

    #[test]
    fn test_parse_keeps_non_numeric_fields_as_none() {
        let data = format!(
            "{HEADER}2020-06-15T17:00:00,ITA,13,Abruzzo,42.35,13.39,40,n/a,42,354,396,-10,,2367,455,3218,81024,,\n"
        );
        let result = parse_reader(data.as_bytes()).unwrap();

        assert_eq!(result[0].icu, None);
        assert_eq!(result[0].new_cases, None);
        assert_eq!(result[0].tests, Some(81024));
    }

    #[test]
    fn test_parse_short_row_fails() {
        let data = format!("{HEADER}2020-06-15T17:00:00,ITA,13,Abruzzo\n");
        let result = parse_reader(data.as_bytes());
        assert!(matches!(result, Err(ReportError::RowTooShort { row: 1, .. })));
    }

    #[test]
    fn test_parse_invalid_utf8_fails() {
        let mut data = HEADER.as_bytes().to_vec();
        data.extend_from_slice(
            b"2020-06-15T17:00:00,ITA,13,Abr\xFFzzo,1,2,3,4,5,6,7,8,9,10,11,12,13,14,\n",
        );
        assert!(parse_reader(data.as_slice()).is_err());
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse("/nonexistent/dpc-covid19-ita-regioni-19700101.csv");
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
