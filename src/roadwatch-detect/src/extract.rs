//! Pull the violation array out of free-form model text

use crate::error::{DetectError, Result};
use crate::violation::{parse_reports, ViolationReport};
use tracing::{debug, warn};

/// Locate and parse the JSON array in a model reply.
///
/// The candidate runs from the first `[` to the last `]`, so prose around
/// the array is ignored. Without such a pair the whole text is parsed.
pub fn extract_json(text: &str) -> Result<serde_json::Value> {
    let candidate = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            debug!("no bracketed array in model reply, parsing whole text");
            text
        }
    };

    serde_json::from_str(candidate).map_err(|e| DetectError::Parse(e.to_string()))
}

/// Extract and validate violation reports from a model reply
pub fn extract_violations(text: &str) -> Result<Vec<ViolationReport>> {
    let value = extract_json(text)?;
    let reports = parse_reports(value).map_err(DetectError::Parse)?;

    for report in &reports {
        if report.description.trim().is_empty() || report.location.trim().is_empty() {
            warn!(
                "{} report has an empty description or location",
                report.violation_type
            );
        }
    }

    Ok(reports)
}
