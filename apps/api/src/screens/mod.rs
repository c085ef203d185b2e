//! Screen state for the non-interview features.
//!
//! Each screen owns its inputs, loading flag and last result. Model calls are
//! made by the host between `begin` and `complete` with no session lock held.

use thiserror::Error;

pub mod assessments;
pub mod dashboard;
pub mod handlers;
pub mod learning_path;
pub mod onboarding;
pub mod pricing;
pub mod report;
pub mod resume;
pub mod single_shot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Required input missing. The message is shown inline.
    #[error("{0}")]
    Invalid(&'static str),

    /// The model call could not be made. The message is shown inline.
    #[error("{0}")]
    Failed(&'static str),

    #[error("A request for this screen is already in progress")]
    Busy,

    /// A result arrived after the screen was reset or left.
    #[error("The screen is no longer waiting for this result")]
    Stale,
}
