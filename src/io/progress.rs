/// Receives progress of long-running operations.
///
/// `set_progress` values never decrease within one task.
pub trait ProgressObserver {
    /// Starts a task of `total` steps.
    fn start(&mut self, total: usize, description: &str);

    fn set_progress(&mut self, progress: usize);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn start(&mut self, _total: usize, _description: &str) {}

    fn set_progress(&mut self, _progress: usize) {}
}

/// Keeps every reported step; useful for inspecting what an operation
/// reported.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    pub tasks: Vec<(String, usize)>,
    pub steps: Vec<usize>,
}

impl ProgressObserver for ProgressLog {
    fn start(&mut self, total: usize, description: &str) {
        self.tasks.push((description.to_owned(), total));
        self.steps.clear();
    }

    fn set_progress(&mut self, progress: usize) {
        self.steps.push(progress);
    }
}
