/// A trait for reporting progress of the document export.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Listing", "Fetching").
    fn set_phase(&self, phase: &str);

    /// Switch to determinate progress over `total` steps.
    fn set_total(&self, total: u64);

    /// Record one completed step.
    fn advance(&self, message: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}
