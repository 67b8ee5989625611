//! Dashboard summary derived from session stats

use crate::stats::SessionStats;
use chrono::Local;
use std::fmt;

/// Number of recent violations shown by default
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    /// Violation type with underscores replaced by spaces
    pub label: String,
    /// Local wall-clock time, `HH:MM:SS`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_analyses: u64,
    pub total_violations: u64,
    /// Violations per analysis as a rounded percentage
    pub violation_rate: u64,
    pub clean_frames: u64,
    pub recent: Vec<RecentEntry>,
}

impl DashboardSummary {
    pub fn from_stats(stats: &SessionStats, recent_limit: usize) -> Self {
        let violation_rate = if stats.total_analyses > 0 {
            (stats.total_violations as f64 / stats.total_analyses as f64 * 100.0).round() as u64
        } else {
            0
        };

        let recent = stats
            .recent(recent_limit)
            .iter()
            .map(|entry| RecentEntry {
                label: entry.violation_type.as_str().replace('_', " "),
                time: entry
                    .timestamp
                    .with_timezone(&Local)
                    .format("%H:%M:%S")
                    .to_string(),
            })
            .collect();

        Self {
            total_analyses: stats.total_analyses,
            total_violations: stats.total_violations,
            violation_rate,
            clean_frames: stats.total_analyses.saturating_sub(stats.total_violations),
            recent,
        }
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total analyses:   {}", self.total_analyses)?;
        writeln!(f, "violations found: {}", self.total_violations)?;
        writeln!(f, "violation rate:   {}%", self.violation_rate)?;
        writeln!(f, "clean frames:     {}", self.clean_frames)?;

        if !self.recent.is_empty() {
            writeln!(f, "\nrecent violations:")?;
            for entry in &self.recent {
                writeln!(f, "  {:<20} {}", entry.label, entry.time)?;
            }
        }
        Ok(())
    }
}
