use crate::operation::Operation;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    done: u64,
    total: u64,
    multiplier: f32,
}

impl ProgressState {
    pub fn plan(staged_file_count: u64, operations: &[Operation]) -> Self {
        let tracked = operations
            .iter()
            .filter(|operation| operation.tracked_for_progress())
            .count() as u64;
        let has_work = staged_file_count != 0 || !operations.is_empty();
        let multiplier = if has_work { 50.0 } else { 100.0 };
        let mut total = staged_file_count + tracked;
        if has_work {
            total = total.max(1);
        }
        Self {
            done: 0,
            total,
            multiplier,
        }
    }

    pub fn advance(&mut self) -> f32 {
        self.done = self.done.saturating_add(1).min(self.total);
        self.percentage()
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f32 / self.total as f32) * self.multiplier
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }
}
