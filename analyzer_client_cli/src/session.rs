use std::time::{Duration, Instant};

use crate::error::ClientError;
use crate::{StatusResponse, TaskStatus};

/// Client-side view of an upload task:
/// `Idle -> Uploading -> Processing -> {Completed | Failed}`, with both
/// terminal phases returning to `Idle` on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Uploading,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct TaskSession {
    pub phase: SessionPhase,
    pub task_id: Option<String>,
    pub progress: u8,
    pub processed_rows: Option<u64>,
    pub total_rows: Option<u64>,
    pub error: Option<String>,
    last_progress_at: Instant,
}

impl TaskSession {
    pub fn new() -> Self {
        TaskSession {
            phase: SessionPhase::Idle,
            task_id: None,
            progress: 0,
            processed_rows: None,
            total_rows: None,
            error: None,
            last_progress_at: Instant::now(),
        }
    }

    pub fn begin_upload(&mut self) -> Result<(), ClientError> {
        if self.phase != SessionPhase::Idle {
            return Err(ClientError::InvalidTransition(
                "upload may only start from an idle session",
            ));
        }
        self.phase = SessionPhase::Uploading;
        Ok(())
    }

    pub fn uploaded(&mut self, task_id: String) -> Result<(), ClientError> {
        if self.phase != SessionPhase::Uploading {
            return Err(ClientError::InvalidTransition(
                "task id arrives only while uploading",
            ));
        }
        self.phase = SessionPhase::Processing;
        self.task_id = Some(task_id);
        self.progress = 0;
        self.last_progress_at = Instant::now();
        Ok(())
    }

    /// Folds one poll response into the session. Progress that moved forward
    /// resets the stall clock; a terminal status ends the session.
    pub fn apply_status(&mut self, status: &StatusResponse, now: Instant) {
        if self.phase != SessionPhase::Processing {
            return;
        }

        if status.progress > self.progress {
            self.progress = status.progress.min(100);
            self.last_progress_at = now;
        }
        if status.processed_rows.is_some() {
            self.processed_rows = status.processed_rows;
        }
        if status.total_rows.is_some() {
            self.total_rows = status.total_rows;
        }

        match status.status {
            TaskStatus::Completed => self.phase = SessionPhase::Completed,
            TaskStatus::Failed | TaskStatus::Expired => {
                self.phase = SessionPhase::Failed;
                self.error = status
                    .error
                    .clone()
                    .or_else(|| status.details.clone())
                    .or_else(|| Some("task failed".to_string()));
            }
            TaskStatus::Pending | TaskStatus::Processing => {}
        }
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.phase = SessionPhase::Failed;
        self.error = Some(reason.into());
    }

    pub fn is_stalled(&self, now: Instant, stall_timeout: Duration) -> bool {
        self.phase == SessionPhase::Processing
            && now.duration_since(self.last_progress_at) >= stall_timeout
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed | SessionPhase::Failed)
    }

    pub fn reset(&mut self) {
        *self = TaskSession::new();
    }
}

impl Default for TaskSession {
    fn default() -> Self {
        TaskSession::new()
    }
}
