//! Load San Francisco crime incidents, drop rows with unusable coordinates,
//! and write three visualizations: a daily time series (PNG), a sampled
//! point map (HTML) and a top-categories bar chart (HTML).

pub mod color;
pub mod config;
pub mod data;
pub mod render;

use anyhow::{Context, Result};
use log::info;

use config::{PipelineConfig, REQUIRED_COLUMNS};
use data::aggregate::{daily_counts, linear_trend, sample_records, top_categories};

/// Run the whole pipeline once. The first failing stage aborts the run and
/// is named in the error context.
pub fn run(config: &PipelineConfig) -> Result<()> {
    render::ensure_output_dir(&config.output_dir).context("creating output directory")?;

    info!("Loading data...");
    let dataset = data::load(&config.candidates, &REQUIRED_COLUMNS, &config.bounds)
        .context("loading data")?;

    info!("Creating time series visualization...");
    let counts = daily_counts(&dataset);
    let trend = linear_trend(&counts);
    render::time_series::render(
        &counts,
        trend.as_ref(),
        &config.time_series_path(),
        &config.theme,
    )
    .context("creating time series plot")?;

    info!("Creating crime map...");
    let sample = sample_records(&dataset, config.map.sample_size, config.map.seed);
    render::crime_map::render(&sample, &config.crime_map_path(), &config.map, &config.theme)
        .context("creating crime map")?;

    info!("Creating interactive visualization...");
    let top = top_categories(&dataset, config.top_categories);
    render::category_chart::render(&top, &config.category_chart_path(), &config.theme)
        .context("creating interactive visualization")?;

    info!("All visualizations created successfully!");
    Ok(())
}
