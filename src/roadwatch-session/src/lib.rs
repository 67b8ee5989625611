//! roadwatch-session - Client side of a Roadwatch analysis session
//!
//! Submits frames to the detection gateway one at a time, folds each
//! result into running totals and derives the dashboard and notification
//! copy shown to the user.

mod client;
mod dashboard;
mod error;
mod notification;
mod session;
mod stats;

pub use client::{
    interpret_response, FrameSubmitter, GatewayClient, DEFAULT_CLIENT_TIMEOUT, DEFAULT_GATEWAY_URL,
};
pub use dashboard::{DashboardSummary, RecentEntry, DEFAULT_RECENT_LIMIT};
pub use error::SessionError;
pub use notification::{Notification, Variant};
pub use session::{CaptureOutcome, Session};
pub use stats::{RecentViolation, SessionStats};
