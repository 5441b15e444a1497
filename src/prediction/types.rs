//! Data types for prediction requests and results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classifier selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Binary POSITIVE / NEGATIVE classifier
    Single,
    /// Multi-label disease probabilities
    Multi,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Single
    }
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single Label",
            Self::Multi => "Multi-Label",
        }
    }

    pub fn model_title(&self) -> &'static str {
        match self {
            Self::Single => "Binary Classification Model",
            Self::Multi => "Multi-Label Classification Model",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Single => {
                "Classifies sequences as POSITIVE or NEGATIVE for disease markers."
            }
            Self::Multi => "Predicts multiple diseases with probabilities.",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// Top-level navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Input,
    Predictions,
    Analysis,
}

impl Default for Tab {
    fn default() -> Self {
        Self::Input
    }
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Input, Tab::Predictions, Tab::Analysis];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Sequence Input",
            Self::Predictions => "Disease Predictions",
            Self::Analysis => "Analysis Details",
        }
    }
}

/// The two service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Predict,
    Shap,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Predict => "/predict",
            Self::Shap => "/shap",
        }
    }
}

/// Body of both outbound requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub sequence: String,
    pub mode: Mode,
}

/// Binary classifier output. Confidence is pre-formatted by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleLabelResult {
    pub result: String,
    pub confidence: String,
}

impl SingleLabelResult {
    pub fn is_positive(&self) -> bool {
        self.result.eq_ignore_ascii_case("positive")
    }
}

/// Multi-label classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLabelResult {
    pub top_results: Vec<(String, f64)>,
    pub detected: Vec<String>,
}

/// One row of the ranked probability table
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub disease: String,
    pub probability: f64,
    pub percentage: String,
}

impl MultiLabelResult {
    /// Rows in server order, ranked from 1
    pub fn ranked_rows(&self) -> Vec<RankedRow> {
        self.top_results
            .iter()
            .enumerate()
            .map(|(i, (disease, probability))| RankedRow {
                rank: i + 1,
                disease: disease.clone(),
                probability: *probability,
                percentage: format_percentage(*probability),
            })
            .collect()
    }
}

/// Prediction outcome, shaped by the mode the request was sent with
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Single(SingleLabelResult),
    Multi(MultiLabelResult),
}

impl PredictionResult {
    /// Decode a `/predict` response body. The payload carries no
    /// discriminator, so the caller's mode picks the shape.
    pub fn decode(mode: Mode, body: serde_json::Value) -> Result<Self, serde_json::Error> {
        match mode {
            Mode::Single => serde_json::from_value(body).map(Self::Single),
            Mode::Multi => serde_json::from_value(body).map(Self::Multi),
        }
    }
}

/// Feature-importance report returned by `/shap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub plots: Vec<String>,
}

impl ShapReport {
    pub fn plot_count_label(&self) -> String {
        let n = self.plots.len();
        format!("{} visualization{} generated", n, if n == 1 { "" } else { "s" })
    }
}

/// Probability in [0, 1] as a percentage with two decimals
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Display caption for a plot URL: last path segment, underscores as
/// spaces, trailing `.png` dropped.
pub fn plot_caption(url: &str) -> String {
    let filename = url.rsplit('/').next().unwrap_or("");
    let filename = filename.strip_suffix(".png").unwrap_or(filename);
    filename.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = AnalysisRequest {
            sequence: "ACGT".to_string(),
            mode: Mode::Multi,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "sequence": "ACGT", "mode": "multi" }));
    }

    #[test]
    fn test_decode_single() {
        let body = json!({ "result": "negative", "confidence": "0.93" });
        let result = PredictionResult::decode(Mode::Single, body).unwrap();
        let PredictionResult::Single(single) = result else {
            panic!("expected single-label result");
        };
        assert_eq!(single.result, "negative");
        assert_eq!(single.confidence, "0.93");
        assert!(!single.is_positive());
    }

    #[test]
    fn test_decode_multi_ranked_rows() {
        let body = json!({
            "top_results": [["BRCA1", 0.8732], ["LYNCH", 0.41]],
            "detected": ["BRCA1"]
        });
        let result = PredictionResult::decode(Mode::Multi, body).unwrap();
        let PredictionResult::Multi(multi) = result else {
            panic!("expected multi-label result");
        };
        let rows = multi.ranked_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].disease, "BRCA1");
        assert_eq!(rows[0].percentage, "87.32%");
        assert_eq!(rows[1].disease, "LYNCH");
        assert_eq!(rows[1].percentage, "41.00%");
        assert_eq!(multi.detected, vec!["BRCA1".to_string()]);
    }

    #[test]
    fn test_decode_uses_caller_mode() {
        // A single-label body cannot be read as multi-label
        let body = json!({ "result": "positive", "confidence": "0.8" });
        assert!(PredictionResult::decode(Mode::Multi, body).is_err());
    }

    #[test]
    fn test_is_positive_ignores_case() {
        let single = SingleLabelResult {
            result: "PoSiTiVe".to_string(),
            confidence: "high".to_string(),
        };
        assert!(single.is_positive());
    }

    #[test]
    fn test_shap_report_optional_fields() {
        let report: ShapReport =
            serde_json::from_value(json!({ "plots": ["http://x/a_b.png"] })).unwrap();
        assert!(report.summary.is_none());
        assert!(report.message.is_empty());
        assert_eq!(report.plot_count_label(), "1 visualization generated");

        let missing_plots = serde_json::from_value::<ShapReport>(json!({ "message": "ok" }));
        assert!(missing_plots.is_err());
    }

    #[test]
    fn test_plot_caption() {
        assert_eq!(
            plot_caption("https://host/static/plots/shap_waterfall_BRCA1.png"),
            "shap waterfall BRCA1"
        );
        assert_eq!(plot_caption("summary_bar.png"), "summary bar");
        assert_eq!(plot_caption("https://host/plots/force.svg"), "force.svg");
        assert_eq!(plot_caption("https://host/plots/"), "");
    }
}
