use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct ClassifyRequest {
    pub comment: String,
}

/// Raw wire shape of a classify response. Every field is optional because
/// the service reports application errors inside a 200 body.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    pub category: Option<String>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub all_predictions: Option<BTreeMap<String, LabelPrediction>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelPrediction {
    pub predicted: u8,
    pub confidence: f64,
}

/// A successfully classified comment. `confidence` is a percentage in 0..=100.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    pub all_predictions: Option<BTreeMap<String, LabelPrediction>>,
}

impl Classification {
    /// Per-label breakdown ordered by descending confidence.
    pub fn ranked_predictions(&self) -> Vec<(&str, &LabelPrediction)> {
        let mut ranked: Vec<_> = self
            .all_predictions
            .iter()
            .flatten()
            .map(|(label, prediction)| (label.as_str(), prediction))
            .collect();
        ranked.sort_by(|a, b| b.1.confidence.total_cmp(&a.1.confidence));
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub models_loaded: Option<bool>,
    #[serde(default)]
    pub available_labels: Option<Vec<String>>,
}

impl HealthReport {
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("service status: {}", self.status)];
        if let Some(loaded) = self.models_loaded {
            lines.push(format!("models loaded: {loaded}"));
        }
        if let Some(labels) = &self.available_labels {
            lines.push(format!("available labels: {}", labels.join(", ")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_classify_response() {
        let body = r#"{
            "category": "toxic",
            "confidence": 87.4,
            "all_predictions": {
                "toxic": {"predicted": 1, "confidence": 87.4},
                "obscene": {"predicted": 0, "confidence": 12.1}
            }
        }"#;
        let response: ClassifyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.category.as_deref(), Some("toxic"));
        assert_eq!(response.confidence, Some(87.4));
        let predictions = response.all_predictions.unwrap();
        assert_eq!(predictions["toxic"].predicted, 1);
        assert_eq!(predictions["obscene"].confidence, 12.1);
        assert!(response.error.is_none());
    }

    #[test]
    fn deserializes_minimal_classify_response() {
        let body = r#"{"category": "non_toxic", "confidence": 95.0}"#;
        let response: ClassifyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.category.as_deref(), Some("non_toxic"));
        assert!(response.all_predictions.is_none());
    }

    #[test]
    fn deserializes_error_only_response() {
        let body = r#"{"error": "Models not loaded properly"}"#;
        let response: ClassifyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.as_deref(), Some("Models not loaded properly"));
        assert!(response.category.is_none());
        assert!(response.confidence.is_none());
    }

    #[test]
    fn ranked_predictions_orders_by_confidence() {
        let classification = Classification {
            category: "toxic".to_string(),
            confidence: 87.4,
            all_predictions: Some(BTreeMap::from([
                (
                    "obscene".to_string(),
                    LabelPrediction {
                        predicted: 0,
                        confidence: 12.1,
                    },
                ),
                (
                    "toxic".to_string(),
                    LabelPrediction {
                        predicted: 1,
                        confidence: 87.4,
                    },
                ),
                (
                    "insult".to_string(),
                    LabelPrediction {
                        predicted: 0,
                        confidence: 43.9,
                    },
                ),
            ])),
        };
        let ranked = classification.ranked_predictions();
        let labels: Vec<&str> = ranked.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["toxic", "insult", "obscene"]);
    }

    #[test]
    fn ranked_predictions_empty_without_breakdown() {
        let classification = Classification {
            category: "clean".to_string(),
            confidence: 99.0,
            all_predictions: None,
        };
        assert!(classification.ranked_predictions().is_empty());
    }

    #[test]
    fn deserializes_health_report_variants() {
        let full: HealthReport = serde_json::from_str(
            r#"{"status": "healthy", "models_loaded": true, "available_labels": ["toxic", "obscene"]}"#,
        )
        .unwrap();
        assert_eq!(full.status, "healthy");
        assert_eq!(full.models_loaded, Some(true));

        let minimal: HealthReport = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(minimal.status, "ok");
        assert!(minimal.models_loaded.is_none());
        assert!(minimal.available_labels.is_none());
    }

    #[test]
    fn health_summary_includes_optional_fields() {
        let report = HealthReport {
            status: "healthy".to_string(),
            models_loaded: Some(true),
            available_labels: Some(vec!["toxic".to_string(), "threat".to_string()]),
        };
        assert_eq!(
            report.summary(),
            "service status: healthy\nmodels loaded: true\navailable labels: toxic, threat"
        );

        let minimal = HealthReport {
            status: "ok".to_string(),
            models_loaded: None,
            available_labels: None,
        };
        assert_eq!(minimal.summary(), "service status: ok");
    }
}
