//! Daily regional observations and the CSV columns they are built from.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReportError, Result};

/// Converts a raw CSV field into an integer.
///
/// Anything that is not a plain (optionally signed) integer after trimming
/// whitespace yields `None`.
pub fn coerce(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// One row of the regional CSV: a single region on a single date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Raw timestamp, `YYYY-MM-DDThh:mm:ss` in the DPC files.
    pub date: String,
    pub region: String,
    pub icu: Option<i64>,
    pub new_cases: Option<i64>,
    pub deaths: Option<i64>,
    pub total_cases: Option<i64>,
    pub tests: Option<i64>,
}

impl Observation {
    /// Builds an observation from a CSV record. `row` is the 1-based data row
    /// number, only used for error reporting.
    pub fn from_record(record: &StringRecord, columns: &ColumnMap, row: usize) -> Result<Self> {
        let field = |column: &'static str, index: usize| {
            record.get(index).ok_or(ReportError::RowTooShort {
                row,
                column,
                index,
                width: record.len(),
            })
        };

        Ok(Observation {
            date: field("date", columns.date)?.to_string(),
            region: field("region", columns.region)?.to_string(),
            icu: coerce(field("icu", columns.icu)?),
            new_cases: coerce(field("new_cases", columns.new_cases)?),
            deaths: coerce(field("deaths", columns.deaths)?),
            total_cases: coerce(field("total_cases", columns.total_cases)?),
            tests: coerce(field("tests", columns.tests)?),
        })
    }

    /// Returns the attribute value, or a [`ReportError::MissingValue`] naming
    /// this observation when the field did not hold a number.
    pub fn require(&self, attribute: Attribute) -> Result<i64> {
        attribute
            .value(self)
            .ok_or_else(|| ReportError::MissingValue {
                region: self.region.clone(),
                date: self.date.clone(),
                attribute: attribute.name(),
            })
    }

    /// Deaths divided by total cases.
    pub fn death_ratio(&self) -> Result<f64> {
        let deaths = self.require(Attribute::Deaths)?;
        let total = self.require(Attribute::TotalCases)?;
        if total == 0 {
            return Err(ReportError::DivisionByZero {
                region: self.region.clone(),
                date: self.date.clone(),
            });
        }
        Ok(deaths as f64 / total as f64)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region: {}, Total: {}, Deaths: {}, Tests: {}",
            self.region,
            Nan(self.total_cases),
            Nan(self.deaths),
            Nan(self.tests)
        )
    }
}

struct Nan(Option<i64>);

impl fmt::Display for Nan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("nan"),
        }
    }
}

/// Numeric attributes that can be plotted on a timeline.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// spellings as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Attribute {
    #[serde(rename = "ICU")]
    Icu,
    NewCases,
    Deaths,
    TotalCases,
    Tests,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Icu,
        Attribute::NewCases,
        Attribute::Deaths,
        Attribute::TotalCases,
        Attribute::Tests,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Icu => "ICU",
            Attribute::NewCases => "NewCases",
            Attribute::Deaths => "Deaths",
            Attribute::TotalCases => "TotalCases",
            Attribute::Tests => "Tests",
        }
    }

    pub fn value(self, observation: &Observation) -> Option<i64> {
        match self {
            Attribute::Icu => observation.icu,
            Attribute::NewCases => observation.new_cases,
            Attribute::Deaths => observation.deaths,
            Attribute::TotalCases => observation.total_cases,
            Attribute::Tests => observation.tests,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "icu" => Ok(Attribute::Icu),
            "newcases" => Ok(Attribute::NewCases),
            "deaths" => Ok(Attribute::Deaths),
            "totalcases" => Ok(Attribute::TotalCases),
            "tests" => Ok(Attribute::Tests),
            _ => Err(ReportError::UnknownAttribute(s.to_string())),
        }
    }
}

impl TryFrom<String> for Attribute {
    type Error = ReportError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Positions of the fields an [`Observation`] is built from.
///
/// Resolved by header name; a name missing from the header falls back to the
/// column position used by the DPC regional files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub region: usize,
    pub icu: usize,
    pub total_cases: usize,
    pub new_cases: usize,
    pub deaths: usize,
    pub tests: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            date: 0,
            region: 3,
            icu: 7,
            total_cases: 10,
            new_cases: 12,
            deaths: 14,
            tests: 16,
        }
    }
}

impl ColumnMap {
    pub fn from_header(header: &StringRecord) -> Self {
        let defaults = ColumnMap::default();
        let find = |name: &str, fallback: usize| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .unwrap_or(fallback)
        };

        ColumnMap {
            date: find("data", defaults.date),
            region: find("denominazione_regione", defaults.region),
            icu: find("terapia_intensiva", defaults.icu),
            total_cases: find("totale_positivi", defaults.total_cases),
            new_cases: find("nuovi_positivi", defaults.new_cases),
            deaths: find("deceduti", defaults.deaths),
            tests: find("tamponi", defaults.tests),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dpc_header() -> StringRecord {
        StringRecord::from(vec![
            "data",
            "stato",
            "codice_regione",
            "denominazione_regione",
            "lat",
            "long",
            "ricoverati_con_sintomi",
            "terapia_intensiva",
            "totale_ospedalizzati",
            "isolamento_domiciliare",
            "totale_positivi",
            "variazione_totale_positivi",
            "nuovi_positivi",
            "dimessi_guariti",
            "deceduti",
            "totale_casi",
            "tamponi",
            "casi_testati",
            "note",
        ])
    }

    fn dpc_row() -> StringRecord {
        StringRecord::from(vec![
            "2020-06-15T17:00:00",
            "ITA",
            "12",
            "Lazio",
            "41.89",
            "12.48",
            "350",
            "21",
            "371",
            "1061",
            "1432",
            "-12",
            "8",
            "5491",
            "782",
            "7705",
            "280451",
            "",
            "",
        ])
    }

    #[test]
    fn test_coerce_integers() {
        assert_eq!(coerce("42"), Some(42));
        assert_eq!(coerce("0"), Some(0));
        assert_eq!(coerce("-12"), Some(-12));
        assert_eq!(coerce(" 7 "), Some(7));
    }

    #[test]
    fn test_coerce_non_numeric_is_none() {
        assert_eq!(coerce(""), None);
        assert_eq!(coerce("abc"), None);
        assert_eq!(coerce("1.5"), None);
        assert_eq!(coerce("12a"), None);
        assert_eq!(coerce("99999999999999999999999"), None);
    }

    #[test]
    fn test_default_columns_match_dpc_header() {
        assert_eq!(ColumnMap::from_header(&dpc_header()), ColumnMap::default());
    }

    #[test]
    fn test_columns_follow_header_names() {
        let header = StringRecord::from(vec![
            "denominazione_regione",
            "data",
            "deceduti",
            "totale_positivi",
            "nuovi_positivi",
            "terapia_intensiva",
            "tamponi",
        ]);
        let columns = ColumnMap::from_header(&header);

        assert_eq!(columns.region, 0);
        assert_eq!(columns.date, 1);
        assert_eq!(columns.deaths, 2);
        assert_eq!(columns.tests, 6);
    }

    #[test]
    fn test_from_record() {
        let columns = ColumnMap::from_header(&dpc_header());
        let obs = Observation::from_record(&dpc_row(), &columns, 1).unwrap();

        assert_eq!(obs.date, "2020-06-15T17:00:00");
        assert_eq!(obs.region, "Lazio");
        assert_eq!(obs.icu, Some(21));
        assert_eq!(obs.total_cases, Some(1432));
        assert_eq!(obs.new_cases, Some(8));
        assert_eq!(obs.deaths, Some(782));
        assert_eq!(obs.tests, Some(280451));
    }

    #[test]
    fn test_from_record_short_row() {
        let row = StringRecord::from(vec!["2020-06-15T17:00:00", "ITA", "12", "Lazio"]);
        let err = Observation::from_record(&row, &ColumnMap::default(), 4).unwrap_err();

        match err {
            ReportError::RowTooShort { row, width, .. } => {
                assert_eq!(row, 4);
                assert_eq!(width, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_death_ratio() {
        let columns = ColumnMap::default();
        let obs = Observation::from_record(&dpc_row(), &columns, 1).unwrap();
        let ratio = obs.death_ratio().unwrap();
        assert!((ratio - 782.0 / 1432.0).abs() < 1e-12);
    }

    #[test]
    fn test_death_ratio_zero_total() {
        let mut obs = Observation::from_record(&dpc_row(), &ColumnMap::default(), 1).unwrap();
        obs.total_cases = Some(0);
        assert!(matches!(
            obs.death_ratio(),
            Err(ReportError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_death_ratio_missing_deaths() {
        let mut obs = Observation::from_record(&dpc_row(), &ColumnMap::default(), 1).unwrap();
        obs.deaths = None;
        assert!(matches!(
            obs.death_ratio(),
            Err(ReportError::MissingValue { attribute: "Deaths", .. })
        ));
    }

    #[test]
    fn test_display_marks_missing_as_nan() {
        let mut obs = Observation::from_record(&dpc_row(), &ColumnMap::default(), 1).unwrap();
        obs.tests = None;
        assert_eq!(
            obs.to_string(),
            "Region: Lazio, Total: 1432, Deaths: 782, Tests: nan"
        );
    }

    #[test]
    fn test_attribute_from_str() {
        assert_eq!("ICU".parse::<Attribute>().unwrap(), Attribute::Icu);
        assert_eq!("NewCases".parse::<Attribute>().unwrap(), Attribute::NewCases);
        assert_eq!("new-cases".parse::<Attribute>().unwrap(), Attribute::NewCases);
        assert_eq!("total_cases".parse::<Attribute>().unwrap(), Attribute::TotalCases);
        assert!("recovered".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_attribute_names_round_trip() {
        for attr in Attribute::ALL {
            assert_eq!(attr.name().parse::<Attribute>().unwrap(), attr);
        }
    }

    #[test]
    fn test_attribute_serde_matches_from_str() {
        for name in ["ICU", "icu", "NEW-CASES", "newcases", "new_cases", "Total-Cases"] {
            let json = format!("\"{}\"", name);
            let from_json: Attribute = serde_json::from_str(&json).unwrap();
            assert_eq!(from_json, name.parse::<Attribute>().unwrap(), "{}", name);
        }
        assert!(serde_json::from_str::<Attribute>("\"recovered\"").is_err());

        for attr in Attribute::ALL {
            let json = serde_json::to_string(&attr).unwrap();
            assert_eq!(json, format!("\"{}\"", attr.name()));
            assert_eq!(serde_json::from_str::<Attribute>(&json).unwrap(), attr);
        }
    }
}
