//! Violation report types shared by the gateway and its clients

use serde::{Deserialize, Serialize};

/// Traffic-rule infraction categories the model is asked to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    HelmetViolation,
    RedLightViolation,
    SpeedViolation,
    LaneViolation,
    WrongWay,
}

impl ViolationType {
    pub const ALL: [ViolationType; 5] = [
        ViolationType::HelmetViolation,
        ViolationType::RedLightViolation,
        ViolationType::SpeedViolation,
        ViolationType::LaneViolation,
        ViolationType::WrongWay,
    ];

    /// Wire name, e.g. `RED_LIGHT_VIOLATION`
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::HelmetViolation => "HELMET_VIOLATION",
            ViolationType::RedLightViolation => "RED_LIGHT_VIOLATION",
            ViolationType::SpeedViolation => "SPEED_VIOLATION",
            ViolationType::LaneViolation => "LANE_VIOLATION",
            ViolationType::WrongWay => "WRONG_WAY",
        }
    }

    /// Human label used when displaying a single report
    pub fn label(&self) -> &'static str {
        match self {
            ViolationType::HelmetViolation => "Helmet Violation",
            ViolationType::RedLightViolation => "Red Light Violation",
            ViolationType::SpeedViolation => "Speed Violation",
            ViolationType::LaneViolation => "Lane Violation",
            ViolationType::WrongWay => "Wrong Way",
        }
    }

}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// One detected violation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub confidence: f64,
    pub description: String,
    pub location: String,
    pub severity: Severity,
    /// Any further keys the model attached, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ViolationReport {
    /// Check constraints serde cannot express
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "confidence {} outside [0.0, 1.0] for {}",
                self.confidence, self.violation_type
            ));
        }
        Ok(())
    }

    /// Confidence as a whole percentage
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Decode and validate a JSON array of reports.
///
/// Fails on a non-array value, on any element that does not match the
/// report shape, and on any element whose confidence is out of range.
pub fn parse_reports(
    value: serde_json::Value,
) -> std::result::Result<Vec<ViolationReport>, String> {
    if !value.is_array() {
        return Err(format!("expected a JSON array, found {}", json_type_name(&value)));
    }

    let reports: Vec<ViolationReport> =
        serde_json::from_value(value).map_err(|e| format!("invalid violation record: {}", e))?;

    for (i, report) in reports.iter().enumerate() {
        report.validate().map_err(|e| format!("record {}: {}", i, e))?;
    }

    Ok(reports)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Outcome of one analysis: either data or an error, never both
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success { violations: Vec<ViolationReport> },
    Failure { error: String },
}

impl AnalysisResult {
    pub fn success(violations: Vec<ViolationReport>) -> Self {
        AnalysisResult::Success { violations }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisResult::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success { .. })
    }

    /// Reported violations; always empty on failure
    pub fn violations(&self) -> &[ViolationReport] {
        match self {
            AnalysisResult::Success { violations } => violations,
            AnalysisResult::Failure { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success { .. } => None,
            AnalysisResult::Failure { error } => Some(error),
        }
    }
}

/// JSON body exchanged between gateway and client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub violations: Vec<ViolationReport>,
}

impl From<&AnalysisResult> for DetectionResponse {
    fn from(result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Success { violations } => Self {
                error: None,
                violations: violations.clone(),
            },
            AnalysisResult::Failure { error } => Self {
                error: Some(error.clone()),
                violations: Vec::new(),
            },
        }
    }
}
