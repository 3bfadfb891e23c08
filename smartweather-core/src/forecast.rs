use serde::{Deserialize, Serialize};

use crate::model::ForecastEntry;
use crate::recommend::Recommendation;

/// A forecast entry with the recommendation computed from its own values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub entry: ForecastEntry,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    pub rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row per entry, provider order preserved.
pub fn aggregate(entries: Vec<ForecastEntry>) -> ForecastTable {
    let rows = entries
        .into_iter()
        .map(|entry| {
            let recommendation = Recommendation::for_conditions(
                entry.temperature_c,
                entry.humidity_pct,
                entry.rainfall_mm_3h,
            );
            ForecastRow { entry, recommendation }
        })
        .collect();

    ForecastTable { rows }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::recommend::{HvacAction, IrrigationAction, irrigation_decision, optimize_hvac};
    use chrono::{DateTime, Utc};

    pub(crate) fn entry(ts: i64, temp: f64, humidity: u8, rain: f64, desc: &str) -> ForecastEntry {
        let timestamp = DateTime::<Utc>::from_timestamp(ts, 0).expect("valid timestamp");
        ForecastEntry {
            timestamp,
            date: timestamp.date_naive(),
            time: timestamp.time(),
            temperature_c: temp,
            humidity_pct: humidity,
            wind_speed_ms: 3.5,
            rainfall_mm_3h: rain,
            description: desc.to_string(),
        }
    }

    #[test]
    fn each_row_uses_its_own_values() {
        let entries = vec![
            entry(1_700_000_000, 34.0, 30, 0.0, "clear sky"),
            entry(1_700_010_800, 15.0, 65, 7.5, "moderate rain"),
            entry(1_700_021_600, 24.0, 80, 1.0, "light rain"),
        ];

        let table = aggregate(entries.clone());

        assert_eq!(table.len(), entries.len());
        for (row, original) in table.rows.iter().zip(&entries) {
            assert_eq!(&row.entry, original);
            assert_eq!(
                row.recommendation.hvac,
                optimize_hvac(original.temperature_c, original.humidity_pct)
            );
            assert_eq!(
                row.recommendation.irrigation,
                irrigation_decision(original.rainfall_mm_3h, original.humidity_pct)
            );
        }

        assert_eq!(table.rows[0].recommendation.hvac, HvacAction::IncreaseCooling);
        assert_eq!(
            table.rows[1].recommendation.irrigation,
            IrrigationAction::NoIrrigationRainSufficient
        );
        assert_eq!(table.rows[2].recommendation.hvac, HvacAction::ActivateDehumidifier);
    }

    #[test]
    fn duplicates_and_odd_counts_are_kept() {
        let entries = vec![
            entry(1_700_000_000, 20.0, 50, 0.0, "clouds"),
            entry(1_700_000_000, 20.0, 50, 0.0, "clouds"),
            entry(1_699_990_000, 21.0, 50, 0.0, "clouds"),
        ];

        let table = aggregate(entries);

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[2].entry.temperature_c, 21.0);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
