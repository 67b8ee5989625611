//! Session error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Another analysis is still outstanding
    #[error("an analysis is already in progress")]
    Busy,
}
