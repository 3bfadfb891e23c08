//! Summary statistics over provider data: a flattened attribute table for one response and
//! per-column statistics for a forecast table.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::forecast::ForecastTable;

/// Flatten nested objects into dotted keys, sorted by key.
///
/// Arrays are not descended into; they are rendered as their JSON text, as are other scalars
/// that are not strings.
pub fn flatten_attributes(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(&mut out, String::new(), value);
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn flatten_into(out: &mut Vec<(String, String)>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (k, v) in map {
                let key = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                flatten_into(out, key, v);
            }
        }
        Value::String(s) => out.push((prefix, s.clone())),
        other => out.push((prefix, other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent below two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn from_values(column: &'static str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = (count > 1).then(|| {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        });
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self { column, count, mean, std_dev, min, max })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub column: &'static str,
    pub count: usize,
    pub distinct: usize,
    /// Most frequent value and its count; ties go to the value seen first.
    pub top: Option<(String, usize)>,
}

impl TextSummary {
    pub fn from_values<'a>(column: &'static str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut count = 0;

        for v in values {
            count += 1;
            let c = counts.entry(v).or_insert(0);
            if *c == 0 {
                order.push(v);
            }
            *c += 1;
        }

        let mut top: Option<(&str, usize)> = None;
        for v in &order {
            let c = counts[v];
            if top.is_none_or(|(_, best)| c > best) {
                top = Some((*v, c));
            }
        }

        Self {
            column,
            count,
            distinct: order.len(),
            top: top.map(|(v, c)| (v.to_string(), c)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastProfile {
    pub rows: usize,
    pub numeric: Vec<NumericSummary>,
    pub text: Vec<TextSummary>,
}

pub fn profile_forecast(table: &ForecastTable) -> ForecastProfile {
    let rows = &table.rows;

    let column = |f: fn(&crate::forecast::ForecastRow) -> f64| -> Vec<f64> {
        rows.iter().map(f).collect()
    };

    let numeric = [
        ("Temperature (°C)", column(|r| r.entry.temperature_c)),
        ("Humidity (%)", column(|r| f64::from(r.entry.humidity_pct))),
        ("Wind Speed (m/s)", column(|r| r.entry.wind_speed_ms)),
        ("Rainfall 3h (mm)", column(|r| r.entry.rainfall_mm_3h)),
    ]
    .into_iter()
    .filter_map(|(name, values)| NumericSummary::from_values(name, &values))
    .collect();

    let text = vec![
        TextSummary::from_values("Weather", rows.iter().map(|r| r.entry.description.as_str())),
        TextSummary::from_values("HVAC Recommendation", rows.iter().map(|r| r.recommendation.hvac.as_str())),
        TextSummary::from_values(
            "Irrigation Recommendation",
            rows.iter().map(|r| r.recommendation.irrigation.as_str()),
        ),
    ];

    ForecastProfile { rows: rows.len(), numeric, text }
}
