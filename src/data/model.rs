use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

// ---------------------------------------------------------------------------
// RawTable – the CSV exactly as read
// ---------------------------------------------------------------------------

/// Header plus untyped rows, before any validation.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Position of a header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ParsedRow – typed, but coordinates may still be missing
// ---------------------------------------------------------------------------

/// One input row after date and number parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub incident_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub incident_category: String,
    /// Columns the pipeline does not inspect: column_name → raw text.
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// IncidentRecord – one accepted row
// ---------------------------------------------------------------------------

/// A validated incident. Coordinates are present and inside the bounding box
/// used when the dataset was loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub incident_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub incident_category: String,
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete validated collection
// ---------------------------------------------------------------------------

/// Accepted records in input order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub records: Vec<IncidentRecord>,
}

impl Dataset {
    pub fn new(source: impl AsRef<Path>, records: Vec<IncidentRecord>) -> Self {
        Dataset {
            source: source.as_ref().to_path_buf(),
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IncidentRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a IncidentRecord;
    type IntoIter = std::slice::Iter<'a, IncidentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
