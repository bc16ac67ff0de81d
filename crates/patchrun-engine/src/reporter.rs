use anyhow::Error;

pub trait ProgressReporter: Send + Sync {
    fn initialize(&self) -> anyhow::Result<()>;

    fn initializing_fail(&self, error: &Error);

    fn report_unpacking_progress(&self, percentage: f32, file_name: &str);

    fn report_operation_progress(&self, percentage: f32, message: &str);

    // The returned boolean decides whether the engine terminates.
    fn fail(&self, error: &Error) -> bool;

    // May be invoked twice in one run.
    fn terminate(&self);
}
