use std::path::PathBuf;

use crate::color::generate_palette;

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

pub const COL_INCIDENT_DATE: &str = "Incident Date";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_INCIDENT_CATEGORY: &str = "Incident Category";

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_INCIDENT_DATE,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_INCIDENT_CATEGORY,
];

/// Where to look for the dataset, first match wins.
pub const DATA_CANDIDATES: [&str; 3] = [
    "data/crime_data_cleaned.csv",
    "../data/crime_data_cleaned.csv",
    "./data/crime_data_cleaned.csv",
];

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

/// Sanity box for San Francisco coordinates.
pub const SF_BOUNDS: BoundingBox = BoundingBox {
    lat_min: 37.7,
    lat_max: 37.8,
    lon_min: -122.5,
    lon_max: -122.4,
};

/// Map center (city hall area).
pub const SF_CENTER: (f64, f64) = (37.7749, -122.4194);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub const OUTPUT_DIR: &str = "assets/images";
pub const TIME_SERIES_FILE: &str = "time_series.png";
pub const CRIME_MAP_FILE: &str = "crime_map.html";
pub const CATEGORY_CHART_FILE: &str = "interactive_viz.html";

pub const MAP_SAMPLE_SIZE: usize = 500;
pub const MAP_SAMPLE_SEED: u64 = 42;
pub const MAP_ZOOM: u8 = 12;
pub const TOP_CATEGORIES: usize = 10;

// ---------------------------------------------------------------------------
// Theme: built once at startup, read-only afterwards
// ---------------------------------------------------------------------------

/// Visual settings shared by all renderers.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Evenly spaced hues, `#rrggbb`.
    pub palette: Vec<String>,
    pub trend_color: String,
    pub marker_color: String,
    pub image_size: (u32, u32),
    pub chart_size: (u32, u32),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: generate_palette(TOP_CATEGORIES),
            trend_color: "#ff0000".to_string(),
            marker_color: "red".to_string(),
            image_size: (1800, 900),
            chart_size: (800, 400),
        }
    }
}

impl Theme {
    /// Palette entry for index `i`, wrapping around.
    pub fn color(&self, i: usize) -> &str {
        if self.palette.is_empty() {
            return "#1f77b4";
        }
        &self.palette[i % self.palette.len()]
    }
}

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MapSettings {
    pub center: (f64, f64),
    pub zoom: u8,
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: SF_CENTER,
            zoom: MAP_ZOOM,
            sample_size: MAP_SAMPLE_SIZE,
            seed: MAP_SAMPLE_SEED,
        }
    }
}

/// Everything one run needs. `Default` reproduces the fixed CLI behaviour.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub candidates: Vec<PathBuf>,
    pub bounds: BoundingBox,
    pub output_dir: PathBuf,
    pub map: MapSettings,
    pub top_categories: usize,
    pub theme: Theme,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            candidates: DATA_CANDIDATES.iter().map(PathBuf::from).collect(),
            bounds: SF_BOUNDS,
            output_dir: PathBuf::from(OUTPUT_DIR),
            map: MapSettings::default(),
            top_categories: TOP_CATEGORIES,
            theme: Theme::default(),
        }
    }
}

impl PipelineConfig {
    pub fn time_series_path(&self) -> PathBuf {
        self.output_dir.join(TIME_SERIES_FILE)
    }

    pub fn crime_map_path(&self) -> PathBuf {
        self.output_dir.join(CRIME_MAP_FILE)
    }

    pub fn category_chart_path(&self) -> PathBuf {
        self.output_dir.join(CATEGORY_CHART_FILE)
    }
}
