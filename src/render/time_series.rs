use std::path::Path;

use chrono::{Days, NaiveDate};
use log::debug;
use plotters::prelude::*;

use super::RenderError;
use crate::color::hex_to_rgb;
use crate::config::Theme;
use crate::data::aggregate::{DailyCount, Trend};

const TITLE: &str = "Daily Crime Incidents in San Francisco";

/// Draw daily counts as a line with the fitted trend dashed on top, and save
/// it as a PNG at `path`.
///
/// The x axis counts days since the first date, so calendar gaps stay visible.
/// The trend was fitted on the point index, so it is evaluated per index and
/// drawn at that point's date.
pub fn render(
    counts: &[DailyCount],
    trend: Option<&Trend>,
    path: &Path,
    theme: &Theme,
) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, theme.image_size).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let first = counts.first().map(|c| c.date);
    let offsets = day_offsets(counts);
    let x_last = offsets.last().copied().unwrap_or(0.0);
    let i_last = counts.len().saturating_sub(1) as f64;
    let y_peak = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;
    let y_top = trend
        .map(|t| t.at(0.0).max(t.at(i_last)))
        .unwrap_or(0.0)
        .max(y_peak)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 36))
        .margin(30)
        .x_label_area_size(90)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_last.max(1.0), 0f64..y_top)
        .map_err(chart_err)?;

    let date_label = |x: &f64| first.map(|f| date_at(f, *x)).unwrap_or_default();

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Number of Incidents")
        .x_labels(12)
        .x_label_formatter(&date_label)
        .light_line_style(BLACK.mix(0.04))
        .bold_line_style(BLACK.mix(0.12))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            offsets.iter().zip(counts).map(|(&x, c)| (x, c.count as f64)),
            rgb(theme.color(0)).stroke_width(2),
        ))
        .map_err(chart_err)?;

    if let Some(trend) = trend {
        let fitted: Vec<(f64, f64)> = offsets
            .iter()
            .enumerate()
            .map(|(i, &x)| (x, trend.at(i as f64)))
            .collect();
        chart
            .draw_series(DashedLineSeries::new(
                fitted,
                12,
                8,
                rgb(&theme.trend_color).mix(0.8).stroke_width(2),
            ))
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    debug!("wrote {} daily points to {}", counts.len(), path.display());
    Ok(())
}

/// Days since the first point for each point.
fn day_offsets(counts: &[DailyCount]) -> Vec<f64> {
    let Some(first) = counts.first().map(|c| c.date) else {
        return Vec::new();
    };
    counts
        .iter()
        .map(|c| (c.date - first).num_days() as f64)
        .collect()
}

/// Tick label for day offset `x` from `first`; blank between whole days.
fn date_at(first: NaiveDate, x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    first
        .checked_add_days(Days::new(rounded as u64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn rgb(hex: &str) -> RGBColor {
    let (r, g, b) = hex_to_rgb(hex).unwrap_or((31, 119, 180));
    RGBColor(r, g, b)
}

fn chart_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::data::aggregate::linear_trend;

    fn series(values: &[usize]) -> Vec<DailyCount> {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &count)| DailyCount {
                date: start + chrono::Days::new(i as u64),
                count,
            })
            .collect()
    }

    fn small_theme() -> Theme {
        Theme {
            image_size: (640, 320),
            ..Theme::default()
        }
    }

    #[test]
    fn writes_png_with_configured_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("time_series.png");
        let counts = series(&[4, 7, 5, 9, 6, 8]);
        let trend = linear_trend(&counts);

        render(&counts, trend.as_ref(), &path, &small_theme()).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (640, 320));
        assert!(has_ink(&path, 30..60), "title band is blank");
    }

    #[test]
    fn empty_series_still_renders() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        render(&[], None, &path, &small_theme()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn tick_labels_only_on_whole_days() {
        let first = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        assert_eq!(date_at(first, 0.0), "2023-06-01");
        assert_eq!(date_at(first, 2.0), "2023-06-03");
        assert_eq!(date_at(first, 45.0), "2023-07-16");
        assert_eq!(date_at(first, 1.5), "");
        assert_eq!(date_at(first, -1.0), "");
    }

    #[test]
    fn calendar_gaps_widen_the_x_axis() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 30).unwrap();
        let counts: Vec<DailyCount> = [0, 1, 5, 33]
            .iter()
            .map(|&d| DailyCount {
                date: start + chrono::Days::new(d),
                count: 3,
            })
            .collect();

        assert_eq!(day_offsets(&counts), [0.0, 1.0, 5.0, 33.0]);
        assert!(day_offsets(&[]).is_empty());
    }

    #[test]
    fn gapped_series_renders() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gapped.png");
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let counts: Vec<DailyCount> = [(0, 4), (1, 6), (20, 5), (21, 9)]
            .iter()
            .map(|&(d, count)| DailyCount {
                date: start + chrono::Days::new(d),
                count,
            })
            .collect();
        let trend = linear_trend(&counts);

        render(&counts, trend.as_ref(), &path, &small_theme()).unwrap();
        assert!(has_ink(&path, 30..60));
    }

    /// Any non-white pixel in rows `rows` of the PNG at `path`.
    fn has_ink(path: &Path, rows: std::ops::Range<u32>) -> bool {
        let img = image::open(path).unwrap().to_rgba8();
        rows.flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .any(|(x, y)| img.get_pixel(x, y).0[..3] != [255, 255, 255])
    }
}
