use crate::candidate::Candidate;

/// Lifecycle of a job slot. Moves only forward: `Idle -> Running -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Point-in-time view of one job slot, handed to pollers by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobProgress {
    pub state: JobState,
    /// Pool size once known.
    pub total: usize,
    /// Probes completed so far. Never exceeds `total`.
    pub done: usize,
    /// Passing candidates in completion order.
    pub results: Vec<Candidate>,
    pub cancel_requested: bool,
    /// Final ranked output, filled when the job completes.
    pub output: Vec<Candidate>,
}

impl JobProgress {
    pub fn running(&self) -> bool {
        self.state == JobState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Completed
    }
}
