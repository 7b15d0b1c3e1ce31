use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};

use super::error::{LoadError, ParseError};
use super::filter::filter_valid_coordinates;
use super::model::{Dataset, ParsedRow, RawTable};
use crate::config::{
    BoundingBox, COL_INCIDENT_CATEGORY, COL_INCIDENT_DATE, COL_LATITUDE, COL_LONGITUDE,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Resolve, read, validate, parse and filter the incident file.
///
/// Stages run in order and the first failure is returned as-is:
/// 1. [`resolve_path`]  – first existing candidate
/// 2. [`parse_rows`]    – CSV → [`RawTable`]
/// 3. [`validate_schema`]
/// 4. [`parse_records`] – dates and coordinates
/// 5. [`filter_valid_coordinates`]
pub fn load<P: AsRef<Path>>(
    candidates: &[P],
    required: &[&str],
    bounds: &BoundingBox,
) -> Result<Dataset, LoadError> {
    let path = resolve_path(candidates)?;
    info!("Found data file at {}", path.display());

    let table = parse_rows(&path)?;
    debug!("read {} rows, {} columns", table.len(), table.headers.len());

    let table = validate_schema(table, required)?;
    let rows = parse_records(&table)?;
    let records = filter_valid_coordinates(rows, bounds);

    info!("Loaded {} valid records after cleaning coordinates", records.len());
    Ok(Dataset::new(path, records))
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// First candidate that exists on disk.
///
/// The check is advisory only: if the file vanishes before it is read, the
/// read fails on its own and the remaining candidates are not tried.
pub fn resolve_path<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf, LoadError> {
    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| LoadError::DataSourceNotFound {
            candidates: candidates.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        })
}

/// Read a comma-delimited file with a header row.
pub fn parse_rows(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |e: csv::Error| csv_error(path, e);

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(parse_err)?;

    Ok(RawTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// I/O failures while the reader pulls bytes are read errors; everything else
/// the csv reader reports is malformed input.
fn csv_error(path: &Path, e: csv::Error) -> LoadError {
    if let csv::ErrorKind::Io(io) = e.kind() {
        return LoadError::Read {
            path: path.to_path_buf(),
            source: io::Error::new(io.kind(), io.to_string()),
        };
    }
    LoadError::Parse {
        path: path.to_path_buf(),
        source: ParseError::Csv(e),
    }
}

/// Fail with every required column the header lacks.
pub fn validate_schema(table: RawTable, required: &[&str]) -> Result<RawTable, LoadError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| table.column_index(col).is_none())
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(table)
    } else {
        Err(LoadError::Schema { missing })
    }
}

/// Turn raw rows into [`ParsedRow`]s.
///
/// The date column must parse on every row; a single bad value aborts the
/// load. Coordinate cells may be empty or a null marker (→ `None`), but any
/// other non-numeric text is a parse error.
pub fn parse_records(table: &RawTable) -> Result<Vec<ParsedRow>, LoadError> {
    let date_idx = required_index(table, COL_INCIDENT_DATE)?;
    let lat_idx = required_index(table, COL_LATITUDE)?;
    let lon_idx = required_index(table, COL_LONGITUDE)?;
    let cat_idx = required_index(table, COL_INCIDENT_CATEGORY)?;
    let core = [date_idx, lat_idx, lon_idx, cat_idx];

    let parse_err = |source: ParseError| LoadError::Parse {
        path: table.path.clone(),
        source,
    };

    let mut rows = Vec::with_capacity(table.len());

    for (i, record) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let raw_date = cell(date_idx);
        let incident_date = parse_date(raw_date).ok_or_else(|| {
            parse_err(ParseError::Date {
                row: row_no,
                column: COL_INCIDENT_DATE.to_string(),
                value: raw_date.to_string(),
            })
        })?;

        let latitude = parse_coordinate(cell(lat_idx), row_no, COL_LATITUDE).map_err(parse_err)?;
        let longitude =
            parse_coordinate(cell(lon_idx), row_no, COL_LONGITUDE).map_err(parse_err)?;

        let extra: BTreeMap<String, String> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !core.contains(idx))
            .map(|(idx, name)| (name.clone(), cell(idx).to_string()))
            .collect();

        rows.push(ParsedRow {
            incident_date,
            latitude,
            longitude,
            incident_category: cell(cat_idx).to_string(),
            extra,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Cell contents read as "no value".
const NULL_MARKERS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
];

/// Parse a calendar date, discarding any time-of-day part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn parse_coordinate(value: &str, row: usize, column: &str) -> Result<Option<f64>, ParseError> {
    let value = value.trim();
    if NULL_MARKERS.contains(&value) {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ParseError::Number {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

fn required_index(table: &RawTable, name: &str) -> Result<usize, LoadError> {
    table.column_index(name).ok_or_else(|| LoadError::Schema {
        missing: vec![name.to_string()],
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::config::{REQUIRED_COLUMNS, SF_BOUNDS};

    const HEADER: &str = "Incident ID,Incident Date,Incident Category,Latitude,Longitude";

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn resolve_path_takes_first_existing_candidate() {
        let dir = TempDir::new().unwrap();
        let second = write_csv(&dir, "second.csv", HEADER);
        let third = write_csv(&dir, "third.csv", HEADER);
        let candidates = [dir.path().join("missing.csv"), second.clone(), third];

        assert_eq!(resolve_path(&candidates).unwrap(), second);
    }

    #[test]
    fn resolve_path_lists_all_candidates_when_none_exist() {
        let dir = TempDir::new().unwrap();
        let candidates = [dir.path().join("a.csv"), dir.path().join("b.csv")];

        match resolve_path(&candidates) {
            Err(LoadError::DataSourceNotFound { candidates: tried }) => {
                assert_eq!(tried, candidates.to_vec());
            }
            other => panic!("expected DataSourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_without_candidates_fails_before_parsing() {
        let dir = TempDir::new().unwrap();
        let candidates = [dir.path().join("nope.csv")];
        let err = load(&candidates, &REQUIRED_COLUMNS, &SF_BOUNDS).unwrap_err();
        assert!(matches!(err, LoadError::DataSourceNotFound { .. }));
    }

    #[test]
    fn parse_rows_reads_header_and_records() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            &format!("{HEADER}\n1,2023-01-01,Assault,37.75,-122.45\n2,2023-01-02,Arson,,\n"),
        );
        let table = parse_rows(&path).unwrap();
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_index("Latitude"), Some(3));
        assert_eq!(&table.rows[1][2], "Arson");
    }

    #[test]
    fn parse_rows_rejects_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "ragged.csv",
            &format!("{HEADER}\n1,2023-01-01,Assault,37.75\n"),
        );
        let err = parse_rows(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                source: ParseError::Csv(_),
                ..
            }
        ));
    }

    #[test]
    fn validate_schema_names_exactly_the_missing_columns() {
        let table = RawTable {
            path: PathBuf::from("x.csv"),
            headers: vec!["Incident Date".into(), "Longitude".into(), "Other".into()],
            rows: Vec::new(),
        };
        match validate_schema(table, &REQUIRED_COLUMNS) {
            Err(LoadError::Schema { missing }) => {
                assert_eq!(missing, ["Latitude", "Incident Category"]);
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            "Incident Date,Latitude\n2023-01-01,37.75\n",
        );
        match load(&[path], &REQUIRED_COLUMNS, &SF_BOUNDS) {
            Err(LoadError::Schema { missing }) => {
                assert_eq!(missing, ["Longitude", "Incident Category"]);
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn parse_date_accepts_common_shapes() {
        let d = NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        for s in [
            "2023-03-09",
            " 2023-03-09 ",
            "2023/03/09",
            "03/09/2023",
            "2023-03-09 14:30:00",
            "2023-03-09T14:30:00",
            "2023-03-09T14:30:00.250",
            "2023/03/09 02:30:00 PM",
            "03/09/2023 11:05:00 AM",
            "2023-03-09T14:30:00-08:00",
        ] {
            assert_eq!(parse_date(s), Some(d), "{s}");
        }
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn malformed_date_aborts_load() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            &format!(
                "{HEADER}\n1,2023-01-01,Assault,37.75,-122.45\n2,not-a-date,Arson,37.75,-122.45\n"
            ),
        );
        match load(&[path], &REQUIRED_COLUMNS, &SF_BOUNDS) {
            Err(LoadError::Parse {
                source: ParseError::Date { row, value, .. },
                ..
            }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected date parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_coordinate_aborts_load() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "data.csv",
            &format!("{HEADER}\n1,2023-01-01,Assault,north,-122.45\n"),
        );
        let err = load(&[path], &REQUIRED_COLUMNS, &SF_BOUNDS).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                source: ParseError::Number { .. },
                ..
            }
        ));
    }

    #[test]
    fn null_markers_become_missing_coordinates() {
        assert_eq!(parse_coordinate("", 1, "Latitude").unwrap(), None);
        assert_eq!(parse_coordinate("NaN", 1, "Latitude").unwrap(), None);
        assert_eq!(parse_coordinate(" NA ", 1, "Latitude").unwrap(), None);
        assert_eq!(parse_coordinate("37.5", 1, "Latitude").unwrap(), Some(37.5));
    }

    #[test]
    fn load_keeps_valid_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let body = format!(
            "{HEADER}\n\
             1,2023-01-01,Assault,37.75,-122.45\n\
             2,2023-01-01,Arson,,-122.45\n\
             3,2023-01-02,Burglary,37.70,-122.50\n\
             4,2023-01-02,Fraud,37.76,-122.42\n\
             5,2023-01-03,Robbery,38.00,-122.45\n\
             6,2023-01-03,Vandalism,37.80,-122.40\n\
             7,2023-01-04,Assault,37.72,-122.48\n\
             8,2023-01-04,Arson,37.75,NaN\n\
             9,2023-01-05,Larceny Theft,37.77,-122.41\n\
             10,2023-01-05,Burglary,37.78,-122.44\n"
        );
        let path = write_csv(&dir, "data.csv", &body);

        let dataset = load(&[path.clone()], &REQUIRED_COLUMNS, &SF_BOUNDS).unwrap();
        assert_eq!(dataset.len(), 7);
        assert_eq!(dataset.source, path);

        let ids: Vec<&str> = dataset
            .iter()
            .map(|r| r.extra["Incident ID"].as_str())
            .collect();
        assert_eq!(ids, ["1", "3", "4", "6", "7", "9", "10"]);
        assert!(dataset.iter().all(|r| !r.extra.contains_key("Latitude")));
    }

    #[test]
    fn unreadable_path_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        // A directory passes the existence check but is not a readable file.
        let err = load(&[dir.path()], &REQUIRED_COLUMNS, &SF_BOUNDS).unwrap_err();
        match err {
            LoadError::Read { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
