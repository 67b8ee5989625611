//! Capture session: one request in flight, totals folded on completion

use crate::client::FrameSubmitter;
use crate::error::SessionError;
use crate::notification::Notification;
use crate::stats::SessionStats;
use chrono::Utc;
use roadwatch_detect::{AnalysisResult, Frame, ViolationReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// What one capture produced
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub result: AnalysisResult,
    pub notification: Notification,
}

#[derive(Debug, Default)]
struct SessionState {
    stats: SessionStats,
    latest: Vec<ViolationReport>,
}

/// Client-side analysis session.
///
/// At most one analysis request is outstanding; a capture attempted while
/// one is in flight is refused without sending anything.
pub struct Session<S> {
    submitter: S,
    analyzing: AtomicBool,
    state: Mutex<SessionState>,
}

/// Clears the in-flight flag even if the capture future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: FrameSubmitter> Session<S> {
    pub fn new(submitter: S) -> Self {
        Self {
            submitter,
            analyzing: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Whether a request is currently outstanding
    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }

    /// Submit a frame and fold the result into the session
    pub async fn capture(&self, frame: Frame) -> Result<CaptureOutcome, SessionError> {
        if self
            .analyzing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("capture refused, analysis in progress");
            return Err(SessionError::Busy);
        }
        let _in_flight = InFlight(&self.analyzing);

        let result = self.submitter.submit_frame(&frame).await;
        drop(frame);

        match &result {
            AnalysisResult::Success { violations } => {
                info!("analysis complete: {} violation(s)", violations.len());
                let mut state = self.lock_state();
                let stats = std::mem::take(&mut state.stats);
                state.stats = stats.record(&result, Utc::now());
                state.latest = violations.clone();
            }
            AnalysisResult::Failure { error } => {
                warn!("analysis failed: {}", error);
            }
        }

        let notification = Notification::for_result(&result);
        Ok(CaptureOutcome {
            result,
            notification,
        })
    }

    /// Snapshot of the running totals
    pub fn stats(&self) -> SessionStats {
        self.lock_state().stats.clone()
    }

    /// Violations from the most recent successful analysis
    pub fn latest_violations(&self) -> Vec<ViolationReport> {
        self.lock_state().latest.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // state is only ever replaced whole, so a poisoned lock still holds consistent data
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
