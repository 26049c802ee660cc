//! Progress reporting for network calls.
//!
//! Flows report "work in flight" through [`ProgressCallback`] so the
//! terminal front end can show a spinner while tests stay silent.

/// Trait for reporting progress of a pending remote call.
pub trait ProgressCallback: Send + Sync {
    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete and remove the progress indicator.
    fn finish_and_clear(&self);
}

/// A no-op implementation of [`ProgressCallback`].
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_message(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}
