//! Interactive (time x category x value) chart as a self-contained HTML page.
//!
//! The page loads plotly.js from its CDN and animates one frame per time
//! bucket, with a slider and play/pause buttons. Categories keep the same
//! position in every frame.

use super::style;
use crate::error::RenderError;
use crate::shape::{DenseGrid, NormalizedResultSet, Series};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value as Json, json};
use std::fs;
use std::path::{Path, PathBuf};

pub const INTERACTIVE_FILENAME: &str = "interactive_gmv_by_category.html";
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Label format of a frame, and of its slider step.
const FRAME_FORMAT: &str = "%Y-%m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveRenderer {
    pub width: u32,
    pub height: u32,
    pub frame_duration_ms: u32,
}

impl Default for InteractiveRenderer {
    fn default() -> Self {
        Self {
            width: 1100,
            height: 600,
            frame_duration_ms: 500,
        }
    }
}

impl InteractiveRenderer {
    /// Writes the page to `destination`.
    ///
    /// An empty grid is not an error: nothing is written and `Ok(None)`
    /// comes back.
    pub fn render(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<Option<PathBuf>, RenderError> {
        let Series::Grid(grid) = &data.series else {
            return Err(super::unexpected_series("interactive", data));
        };
        if grid.is_empty() {
            debug!("Empty grid, skipping {}", destination.display());
            return Ok(None);
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let figure = self.figure(grid, title, &data.axis.x, &data.axis.y);
        fs::write(destination, page(title, &figure)?)?;
        Ok(Some(destination.to_path_buf()))
    }

    /// The plotly figure: traces, layout and animation frames.
    pub fn figure(&self, grid: &DenseGrid, title: &str, x_title: &str, y_title: &str) -> Json {
        let ceiling = style::value_ceiling(grid.max_value().to_f64().unwrap_or(0.0));
        let frame_names: Vec<String> = grid
            .frames
            .iter()
            .map(|frame| frame.bucket.format(FRAME_FORMAT).to_string())
            .collect();

        let traces = |values: &[rust_decimal::Decimal]| -> Vec<Json> {
            grid.categories
                .iter()
                .zip(values)
                .enumerate()
                .map(|(index, (category, value))| {
                    let color = style::PALETTE[index % style::PALETTE.len()];
                    json!({
                        "type": "bar",
                        "name": category,
                        "x": [category],
                        "y": [value.to_f64().unwrap_or(0.0)],
                        "marker": { "color": color.to_string() },
                        "showlegend": true,
                    })
                })
                .collect()
        };

        let frames: Vec<Json> = grid
            .frames
            .iter()
            .zip(&frame_names)
            .map(|(frame, name)| json!({ "name": name, "data": traces(&frame.values) }))
            .collect();

        let steps: Vec<Json> = frame_names
            .iter()
            .map(|name| {
                json!({
                    "label": name,
                    "method": "animate",
                    "args": [[name], {
                        "mode": "immediate",
                        "frame": { "duration": 0, "redraw": true },
                        "transition": { "duration": 0 },
                    }],
                })
            })
            .collect();

        let first = grid
            .frames
            .first()
            .map(|frame| traces(&frame.values))
            .unwrap_or_default();

        json!({
            "data": first,
            "layout": {
                "title": { "text": title },
                "autosize": false,
                "width": self.width,
                "height": self.height,
                "bargap": 0.25,
                "margin": { "l": 40, "r": 220, "t": 60, "b": 80 },
                "legend": { "title": { "text": "Category" } },
                "xaxis": {
                    "title": { "text": x_title },
                    "tickangle": -35,
                    "categoryorder": "array",
                    "categoryarray": grid.categories,
                },
                "yaxis": { "title": { "text": y_title }, "range": [0.0, ceiling] },
                "updatemenus": [{
                    "type": "buttons",
                    "direction": "left",
                    "showactive": false,
                    "x": 0.1, "y": 0, "xanchor": "right", "yanchor": "top",
                    "pad": { "t": 70, "r": 10 },
                    "buttons": [
                        {
                            "label": "Play",
                            "method": "animate",
                            "args": [null, {
                                "frame": { "duration": self.frame_duration_ms, "redraw": true },
                                "fromcurrent": true,
                                "transition": { "duration": self.frame_duration_ms / 2 },
                            }],
                        },
                        {
                            "label": "Pause",
                            "method": "animate",
                            "args": [[null], {
                                "mode": "immediate",
                                "frame": { "duration": 0, "redraw": true },
                                "transition": { "duration": 0 },
                            }],
                        },
                    ],
                }],
                "sliders": [{
                    "active": 0,
                    "x": 0.1, "len": 0.9,
                    "pad": { "t": 60, "b": 10 },
                    "currentvalue": { "prefix": "month: " },
                    "steps": steps,
                }],
            },
            "frames": frames,
        })
    }
}

fn page(title: &str, figure: &Json) -> Result<String, RenderError> {
    // keep category names from closing the script element
    let figure = serde_json::to_string(figure)?.replace("</", "<\\/");
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout).then(function () {{
  Plotly.addFrames("chart", figure.frames);
}});
</script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        figure = figure,
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::shape::{AxisLabels, GridFrame};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn grid() -> DenseGrid {
        DenseGrid {
            categories: vec!["toys".into(), "Other".into()],
            frames: vec![
                GridFrame {
                    bucket: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                    values: vec![Decimal::from(3), Decimal::ZERO],
                },
                GridFrame {
                    bucket: NaiveDate::from_ymd_opt(2017, 2, 1).unwrap(),
                    values: vec![Decimal::ZERO, Decimal::from(4)],
                },
            ],
        }
    }

    #[test]
    fn every_frame_carries_every_category_in_order() {
        let figure = InteractiveRenderer::default().figure(&grid(), "t", "category", "gmv");
        let frames = figure["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1]["name"], "2017-02");
        for frame in frames {
            let names: Vec<&str> = frame["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|trace| trace["name"].as_str().unwrap())
                .collect();
            assert_eq!(names, vec!["toys", "Other"]);
        }
        assert_eq!(figure["layout"]["xaxis"]["categoryarray"][1], "Other");
        assert_eq!(figure["layout"]["sliders"][0]["steps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn page_escapes_markup() {
        let html = page("<b>GMV</b>", &json!({ "name": "</script>" })).unwrap();
        assert!(html.contains("&lt;b&gt;GMV&lt;/b&gt;"));
        assert!(!html.contains("\"</script>\""));
        assert!(html.contains(PLOTLY_CDN));
    }

    #[test]
    fn empty_grid_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join(INTERACTIVE_FILENAME);
        let data = NormalizedResultSet {
            kind: ChartKind::AnimatedBar,
            row_count: 0,
            axis: AxisLabels::default(),
            series: Series::Grid(DenseGrid::default()),
        };
        let written = InteractiveRenderer::default()
            .render(&data, "empty", &destination)
            .unwrap();
        assert!(written.is_none());
        assert!(!destination.exists());
    }
}
