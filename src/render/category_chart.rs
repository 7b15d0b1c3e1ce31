use std::path::Path;

use log::debug;
use serde::Serialize;

use super::{escape_html, script_json, write_file, RenderError};
use crate::color::CategoryColors;
use crate::config::Theme;
use crate::data::aggregate::CategoryCount;

/// Column data handed to Plotly: parallel arrays, one entry per bar.
#[derive(Debug, Serialize)]
struct BarData<'a> {
    categories: Vec<&'a str>,
    counts: Vec<usize>,
    colors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Layout {
    title: String,
    width: u32,
    height: u32,
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
</head>
<body>
<div id="chart"></div>
<script>
  const source = __DATA__;
  const size = __LAYOUT__;
  const bars = {
    type: 'bar',
    x: source.categories,
    y: source.counts,
    width: 0.8,
    marker: { color: source.colors },
    customdata: source.categories,
    hovertemplate: 'Category: %{customdata}<br>Count: %{y}<extra></extra>'
  };
  const layout = {
    title: { text: size.title, font: { size: 18 } },
    width: size.width,
    height: size.height,
    xaxis: { title: { text: 'Crime Category' }, tickangle: -45 },
    yaxis: { title: { text: 'Number of Incidents' } },
    margin: { b: 140 }
  };
  Plotly.newPlot('chart', [bars], layout, { responsive: true });
</script>
</body>
</html>
"#;

pub fn title_for(n: usize) -> String {
    format!("Top {n} Crime Categories in San Francisco")
}

/// Build the standalone bar-chart page for an already ranked category list.
pub fn build_html(top: &[CategoryCount], theme: &Theme) -> Result<String, RenderError> {
    let colors = CategoryColors::new(top.iter().map(|c| c.category.as_str()), &theme.palette);
    let data = BarData {
        categories: top.iter().map(|c| c.category.as_str()).collect(),
        counts: top.iter().map(|c| c.count).collect(),
        colors: top
            .iter()
            .map(|c| colors.color_for(&c.category).to_string())
            .collect(),
    };
    let title = title_for(top.len());
    let layout = Layout {
        title: title.clone(),
        width: theme.chart_size.0,
        height: theme.chart_size.1,
    };

    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(&title))
        .replace("__DATA__", &script_json(&data)?)
        .replace("__LAYOUT__", &script_json(&layout)?))
}

/// Write the interactive bar chart to `path`.
pub fn render(top: &[CategoryCount], path: &Path, theme: &Theme) -> Result<(), RenderError> {
    let html = build_html(top, theme)?;
    write_file(path, &html)?;
    debug!("wrote {} category bars to {}", top.len(), path.display());
    Ok(())
}
