// src/model/time_series.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Positive-ratio history across sessions. `dates` and
/// `overall_positive_percents` are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub overall_positive_percents: Vec<f64>,
    #[serde(default)]
    pub category_positive_percents: BTreeMap<String, Vec<CategoryPoint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub percent: Option<f64>,
}

impl TimeSeriesData {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Per-category percentages laid out on the shared date axis.
    ///
    /// Points are matched to `dates` by their date string. A point without a
    /// date falls back to its own position. The result always has one slot per date.
    pub fn aligned_category(&self, category: &str) -> Vec<Option<f64>> {
        let mut slots = vec![None; self.dates.len()];
        let Some(points) = self.category_positive_percents.get(category) else {
            return slots;
        };

        for (position, point) in points.iter().enumerate() {
            let index = match &point.date {
                Some(date) => self.dates.iter().position(|d| d == date),
                None => Some(position),
            };
            if let Some(slot) = index.and_then(|i| slots.get_mut(i)) {
                *slot = point.percent;
            }
        }
        slots
    }

    /// Overall percentages, one slot per date even when the lists disagree in length.
    pub fn aligned_overall(&self) -> Vec<Option<f64>> {
        (0..self.dates.len())
            .map(|i| self.overall_positive_percents.get(i).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimeSeriesData {
        serde_json::from_str(
            r#"{
                "dates": ["2024-05-01T09:00:00", "2024-05-08T09:00:00", "2024-05-15T09:00:00"],
                "overall_positive_percents": [55.0, 60.5, 71.2],
                "category_positive_percents": {
                    "授業": [
                        {"date": "2024-05-01T09:00:00", "percent": 50.0},
                        {"date": "2024-05-15T09:00:00", "percent": 80.0}
                    ],
                    "設備": [
                        {"date": "2024-05-01T09:00:00", "percent": 10.0},
                        {"date": "2024-05-08T09:00:00", "percent": 20.0},
                        {"date": "2024-05-15T09:00:00", "percent": 30.0},
                        {"date": "2099-01-01T00:00:00", "percent": 99.0}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn category_series_has_one_slot_per_date() {
        let data = sample();
        assert_eq!(data.aligned_category("授業"), vec![Some(50.0), None, Some(80.0)]);
        assert_eq!(data.aligned_category("設備"), vec![Some(10.0), Some(20.0), Some(30.0)]);
        assert_eq!(data.aligned_category("missing"), vec![None, None, None]);
    }

    #[test]
    fn overall_series_tolerates_short_lists() {
        let mut data = sample();
        data.overall_positive_percents.truncate(1);
        assert_eq!(data.aligned_overall(), vec![Some(55.0), None, None]);

        data.overall_positive_percents = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(data.aligned_overall().len(), 3);
    }

    #[test]
    fn undated_points_use_their_position() {
        let mut data = sample();
        data.category_positive_percents.insert(
            "その他".to_string(),
            vec![CategoryPoint { date: None, percent: Some(5.0) }; 5],
        );
        assert_eq!(data.aligned_category("その他"), vec![Some(5.0); 3]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let data: TimeSeriesData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
        assert!(data.aligned_overall().is_empty());
    }
}
