use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sf_crime_viz::config::{
    COL_INCIDENT_CATEGORY, COL_INCIDENT_DATE, COL_LATITUDE, COL_LONGITUDE, DATA_CANDIDATES,
    SF_BOUNDS,
};

const ROWS: usize = 5000;
const DAYS: u64 = 120;

/// Category names with relative weights, roughly the SFPD mix.
const CATEGORIES: [(&str, u32); 14] = [
    ("Larceny Theft", 30),
    ("Other Miscellaneous", 10),
    ("Malicious Mischief", 8),
    ("Assault", 7),
    ("Non-Criminal", 6),
    ("Burglary", 6),
    ("Motor Vehicle Theft", 5),
    ("Recovered Vehicle", 4),
    ("Fraud", 4),
    ("Warrant", 3),
    ("Drug Offense", 3),
    ("Robbery", 2),
    ("Missing Person", 2),
    ("Arson", 1),
];

const DISTRICTS: [&str; 10] = [
    "Bayview", "Central", "Ingleside", "Mission", "Northern", "Park", "Richmond", "Southern",
    "Taraval", "Tenderloin",
];

fn pick_category(rng: &mut StdRng) -> &'static str {
    let total: u32 = CATEGORIES.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (name, weight) in CATEGORIES {
        if roll < weight {
            return name;
        }
        roll -= weight;
    }
    CATEGORIES[0].0
}

/// Mostly valid coordinates; ~5% blank and ~5% outside the city box so the
/// loader's filter has something to do.
fn pick_coordinates(rng: &mut StdRng) -> (String, String) {
    let roll: f64 = rng.gen();
    if roll < 0.05 {
        return (String::new(), String::new());
    }
    let (lat, lon) = if roll < 0.10 {
        (rng.gen_range(37.0..37.69), rng.gen_range(-123.0..-122.51))
    } else {
        (
            rng.gen_range(SF_BOUNDS.lat_min..=SF_BOUNDS.lat_max),
            rng.gen_range(SF_BOUNDS.lon_min..=SF_BOUNDS.lon_max),
        )
    };
    (format!("{lat:.6}"), format!("{lon:.6}"))
}

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;

    let output_path = Path::new(DATA_CANDIDATES[0]);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "Incident ID",
        "Incident Datetime",
        COL_INCIDENT_DATE,
        "Incident Day of Week",
        COL_INCIDENT_CATEGORY,
        "Police District",
        COL_LATITUDE,
        COL_LONGITUDE,
    ])?;

    for id in 0..ROWS {
        let date = start + Days::new(rng.gen_range(0..DAYS));
        let time = NaiveTime::from_hms_opt(rng.gen_range(0..24), rng.gen_range(0..60), 0)
            .context("invalid time")?;
        let (lat, lon) = pick_coordinates(&mut rng);
        let district = DISTRICTS[rng.gen_range(0..DISTRICTS.len())];

        writer.write_record([
            (1_000_000 + id).to_string(),
            date.and_time(time).format("%Y/%m/%d %I:%M:%S %p").to_string(),
            date.format("%Y-%m-%d").to_string(),
            date.weekday().to_string(),
            pick_category(&mut rng).to_string(),
            district.to_string(),
            lat,
            lon,
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} incidents over {DAYS} days to {}", output_path.display());
    Ok(())
}
