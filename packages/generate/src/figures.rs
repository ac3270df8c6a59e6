//! Chart figure builders.
//!
//! Each builder returns a `{ "data": [...], "layout": {...} }` figure in the
//! plotly JSON schema. Colors, marker opacity, and map projection are part
//! of the output so the rendered charts match the reference styling.

use serde_json::{Value, json};
use terror_map_analytics_models::{MapPoint, MapView, RegionRate, YearlyCounts};
use terror_map_incident_models::CasualtyClass;

/// Accent color shared by the fatal markers, the yearly line, and the top
/// of the choropleth scale.
pub const ACCENT_COLOR: &str = "rgb(240, 140, 45)";

/// Color of non-fatal markers.
pub const INJURY_COLOR: &str = "rgb(20, 150, 187)";

/// Bottom of the choropleth scale.
pub const CHOROPLETH_LOW_COLOR: &str = "rgb(252, 232, 213)";

/// Upper bound of the yearly chart's y-axis.
const YEAR_AXIS_MAX: f64 = 425.0;

/// Values interpolated into chart titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartContext {
    /// Country name, e.g. `"United States"`.
    pub country: String,
    /// Year span, e.g. `"1970-2015"`.
    pub span: String,
}

impl ChartContext {
    fn title(&self, what: &str) -> String {
        format!("Terrorist Attacks {what} in {} ({})", self.country, self.span)
    }
}

fn map_series(points: &[MapPoint], class: CasualtyClass) -> Value {
    let (name, opacity, color) = match class {
        CasualtyClass::Fatal => ("Fatalities", 0.95, ACCENT_COLOR),
        CasualtyClass::NonFatal => ("Injuries", 0.85, INJURY_COLOR),
    };

    json!({
        "type": "scattergeo",
        "locationmode": "USA-states",
        "lon": points.iter().map(|p| p.longitude).collect::<Vec<_>>(),
        "lat": points.iter().map(|p| p.latitude).collect::<Vec<_>>(),
        "text": points.iter().map(|p| p.text.as_str()).collect::<Vec<_>>(),
        "mode": "markers",
        "name": name,
        "hoverinfo": "text+name",
        "marker": {
            "size": points.iter().map(|p| p.size).collect::<Vec<_>>(),
            "opacity": opacity,
            "color": color,
        },
    })
}

/// Scatter map with one series per casualty class.
#[must_use]
pub fn map_figure(view: &MapView, context: &ChartContext) -> Value {
    let data: Vec<Value> = CasualtyClass::all()
        .iter()
        .map(|&class| map_series(view.series(class), class))
        .collect();

    json!({
        "data": data,
        "layout": {
            "title": context.title("by Latitude/Longitude"),
            "showlegend": true,
            "legend": { "x": 0.85, "y": 0.4 },
            "geo": {
                "scope": "usa",
                "projection": { "type": "albers usa" },
                "showland": true,
                "landcolor": "rgb(250, 250, 250)",
                "subunitwidth": 1,
                "subunitcolor": "rgb(217, 217, 217)",
                "countrywidth": 1,
                "countrycolor": "rgb(217, 217, 217)",
                "showlakes": true,
                "lakecolor": "rgb(255, 255, 255)",
            },
        },
    })
}

/// Line chart of incidents per year over the declared axis.
#[must_use]
pub fn years_figure(years: &YearlyCounts, context: &ChartContext) -> Value {
    json!({
        "data": [{
            "type": "scatter",
            "x": years.axis,
            "y": years.series(),
            "mode": "lines",
            "line": { "color": ACCENT_COLOR, "width": 3 },
        }],
        "layout": {
            "title": context.title("by Year"),
            "xaxis": {
                "rangeslider": { "thickness": 0.05 },
                "showline": true,
                "showgrid": false,
            },
            "yaxis": {
                "range": [0.1, YEAR_AXIS_MAX],
                "showline": true,
                "showgrid": false,
            },
        },
    })
}

/// Choropleth of incidents per 100,000 people by region.
#[must_use]
pub fn states_figure(rates: &[RegionRate], context: &ChartContext) -> Value {
    json!({
        "data": [{
            "type": "choropleth",
            "autocolorscale": false,
            "colorscale": [[0, CHOROPLETH_LOW_COLOR], [1, ACCENT_COLOR]],
            "showscale": false,
            "locations": rates.iter().map(|r| r.code.as_str()).collect::<Vec<_>>(),
            "locationmode": "USA-states",
            "z": rates.iter().map(|r| r.rate).collect::<Vec<_>>(),
            "marker": {
                "line": { "color": "rgb(255, 255, 255)", "width": 2 },
            },
        }],
        "layout": {
            "title": context.title("per 100,000 People"),
            "geo": {
                "scope": "usa",
                "projection": { "type": "albers usa" },
                "countrycolor": "rgb(255, 255, 255)",
                "showlakes": true,
                "lakecolor": "rgb(255, 255, 255)",
            },
        },
    })
}
