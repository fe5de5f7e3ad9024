use crate::client::ClientEvent;
use crate::types::{Classification, HealthReport};
use chrono::{DateTime, Local};

/// Where the current classification attempt stands. Holding the outcome
/// inside the variant keeps a stale result from outliving its phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Success(Classification),
    Failed(String),
}

impl Phase {
    pub fn is_pending(&self) -> bool {
        matches!(self, Phase::Pending)
    }
}

/// Last known reachability of the service, refreshed only on demand.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Checking,
    Reachable {
        report: HealthReport,
        at: DateTime<Local>,
    },
    Unreachable {
        message: String,
        at: DateTime<Local>,
    },
}

#[derive(Debug, Default)]
pub struct AppState {
    pub comment: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
    pub phase: Phase,
    pub service: ServiceStatus,
    pub classified: u64,
    pub ticks: u64,
    pub should_quit: bool,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    fn byte_cursor(&self) -> usize {
        self.comment
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.comment.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_cursor();
        self.comment.insert(at, c);
        self.cursor += 1;
        self.clear_outcome();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_cursor();
        self.comment.remove(at);
        self.clear_outcome();
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.comment.chars().count() {
            return;
        }
        let at = self.byte_cursor();
        self.comment.remove(at);
        self.clear_outcome();
    }

    pub fn clear_input(&mut self) {
        if self.comment.is_empty() {
            return;
        }
        self.comment.clear();
        self.cursor = 0;
        self.clear_outcome();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.comment.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.comment.chars().count();
    }

    /// Editing discards a displayed outcome but never interrupts a request
    /// that is already in flight.
    fn clear_outcome(&mut self) {
        if matches!(self.phase, Phase::Success(_) | Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Returns the trimmed comment to send, or `None` when there is
    /// nothing to submit or a request is already running.
    pub fn submit(&mut self) -> Option<String> {
        if self.phase.is_pending() {
            return None;
        }
        let trimmed = self.comment.trim();
        if trimmed.is_empty() {
            return None;
        }
        let comment = trimmed.to_string();
        self.phase = Phase::Pending;
        Some(comment)
    }

    /// Returns false when a check is already running.
    pub fn begin_health_check(&mut self) -> bool {
        if matches!(self.service, ServiceStatus::Checking) {
            return false;
        }
        self.service = ServiceStatus::Checking;
        true
    }

    pub fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Classified(outcome) => self.finish_classification(outcome),
            ClientEvent::HealthChecked(outcome) => self.finish_health_check(outcome),
        }
    }

    fn finish_classification(
        &mut self,
        outcome: Result<Classification, crate::client::ClientError>,
    ) {
        match outcome {
            Ok(classification) => {
                if !crate::verdict::category_reads_benign(&classification.category)
                    && crate::verdict::confidence_is_low(classification.confidence)
                {
                    tracing::warn!(
                        category = %classification.category,
                        confidence = classification.confidence,
                        "low confidence overrides a flagged category"
                    );
                }
                self.classified += 1;
                self.phase = Phase::Success(classification);
            }
            Err(error) => {
                self.phase = Phase::Failed(error.to_string());
            }
        }
    }

    fn finish_health_check(
        &mut self,
        outcome: Result<HealthReport, crate::client::ClientError>,
    ) {
        let at = Local::now();
        self.service = match outcome {
            Ok(report) => ServiceStatus::Reachable { report, at },
            Err(error) => ServiceStatus::Unreachable {
                message: error.to_string(),
                at,
            },
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }
}
