//! Shared application state

use roadwatch_detect::Detector;

/// Shared state across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Stateless detection pipeline (classifier + timeout)
    pub detector: Detector,
}

impl AppState {
    /// Create new application state
    pub fn new(detector: Detector) -> Self {
        Self { detector }
    }
}
