//! User-facing notifications for completed analyses

use roadwatch_detect::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    /// Pick the copy for a result; failures and detections are destructive
    pub fn for_result(result: &AnalysisResult) -> Self {
        match result {
            AnalysisResult::Failure { error } => Self {
                title: "Analysis failed".to_string(),
                description: error.clone(),
                variant: Variant::Destructive,
            },
            AnalysisResult::Success { violations } if violations.is_empty() => Self {
                title: "Analysis complete".to_string(),
                description: "No violations detected in this frame".to_string(),
                variant: Variant::Default,
            },
            AnalysisResult::Success { violations } => Self {
                title: "Violations detected!".to_string(),
                description: format!("Found {} violation(s)", violations.len()),
                variant: Variant::Destructive,
            },
        }
    }
}
