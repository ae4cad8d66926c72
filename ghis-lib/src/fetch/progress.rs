/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Fetching", "Writing").
    fn set_phase(&self, phase: &str);

    /// Configure indeterminate progress reporting.
    ///
    /// The callback should return a message string. Fetching pages is always
    /// indeterminate since the number of pages is unknown until the last one.
    fn set_indeterminate(&self, callback: Box<dyn Fn() -> String + Send + Sync + 'static>);

    /// Finish and clear the progress indicator.
    fn done(&self);
}
