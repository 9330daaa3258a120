/// Lifecycle of a single launch request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchState {
    #[default]
    Idle,
    Launching,
    Running,
    Done,
    Cancelled,
}

impl LaunchState {
    pub fn can_advance_to(self, next: LaunchState) -> bool {
        use LaunchState::*;
        matches!(
            (self, next),
            (Idle, Launching)
                | (Launching, Running)
                | (Running, Done)
                | (Idle, Cancelled)
                | (Launching, Cancelled)
        )
    }
}
