//! Running totals for one analysis session

use chrono::{DateTime, Utc};
use roadwatch_detect::{AnalysisResult, ViolationType};
use serde::{Deserialize, Serialize};

/// One entry of the recent-violation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentViolation {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub timestamp: DateTime<Utc>,
}

/// Session totals; lives as long as the session and is never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_analyses: u64,
    pub total_violations: u64,
    /// Newest first
    pub recent_violations: Vec<RecentViolation>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed analysis into the totals.
    ///
    /// A failure leaves the stats untouched. A success counts one analysis
    /// and prepends one log entry per violation, in the order reported.
    pub fn record(mut self, result: &AnalysisResult, at: DateTime<Utc>) -> Self {
        let violations = match result {
            AnalysisResult::Success { violations } => violations,
            AnalysisResult::Failure { .. } => return self,
        };

        self.total_analyses += 1;

        if !violations.is_empty() {
            self.total_violations += violations.len() as u64;

            let mut recent: Vec<RecentViolation> = violations
                .iter()
                .map(|v| RecentViolation {
                    violation_type: v.violation_type,
                    timestamp: at,
                })
                .collect();
            recent.append(&mut self.recent_violations);
            self.recent_violations = recent;
        }

        self
    }

    /// The newest `limit` log entries
    pub fn recent(&self, limit: usize) -> &[RecentViolation] {
        &self.recent_violations[..self.recent_violations.len().min(limit)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use roadwatch_detect::{Severity, ViolationReport};

    fn report(violation_type: ViolationType) -> ViolationReport {
        ViolationReport {
            violation_type,
            confidence: 0.8,
            description: "d".to_string(),
            location: "l".to_string(),
            severity: Severity::Medium,
            extra: Default::default(),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_three_analyses_fold_in_order() {
        let first = AnalysisResult::success(vec![]);
        let second = AnalysisResult::success(vec![
            report(ViolationType::HelmetViolation),
            report(ViolationType::SpeedViolation),
        ]);
        let third = AnalysisResult::success(vec![report(ViolationType::WrongWay)]);

        let stats = SessionStats::new()
            .record(&first, at(0))
            .record(&second, at(1))
            .record(&third, at(2));

        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.total_violations, 3);

        let types: Vec<_> = stats.recent_violations.iter().map(|r| r.violation_type).collect();
        assert_eq!(
            types,
            vec![
                ViolationType::WrongWay,
                ViolationType::HelmetViolation,
                ViolationType::SpeedViolation,
            ]
        );
        assert_eq!(stats.recent_violations[0].timestamp, at(2));
        assert_eq!(stats.recent_violations[2].timestamp, at(1));
    }

    #[test]
    fn test_failure_changes_nothing() {
        let before = SessionStats::new().record(
            &AnalysisResult::success(vec![report(ViolationType::LaneViolation)]),
            at(0),
        );
        let after = before
            .clone()
            .record(&AnalysisResult::failure("AI API error: 500"), at(1));
        assert_eq!(before, after);
    }

    #[test]
    fn test_recent_limit() {
        let many = AnalysisResult::success(
            (0..7).map(|_| report(ViolationType::RedLightViolation)).collect(),
        );
        let stats = SessionStats::new().record(&many, at(0));
        assert_eq!(stats.recent(5).len(), 5);
        assert_eq!(stats.recent(50).len(), 7);
    }
}
