//! Submission state machine.

use super::SubmitError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Drives one form's submit lifecycle. The controller is not reentrant:
/// while `Submitting`, `begin` refuses and the caller must treat the submit
/// action as a no-op. Each accepted attempt gets a sequence number; a
/// completion only applies if its number still matches, so an abandoned
/// call that straggles in late is dropped instead of overwriting a newer
/// result.
pub struct SubmissionController {
    success_message: &'static str,
    state: SubmissionState,
    attempt: u64,
    error: Option<String>,
    success: Option<String>,
    response: Option<String>,
    missing: Vec<&'static str>,
}

impl SubmissionController {
    pub fn new(success_message: &'static str) -> Self {
        Self {
            success_message,
            state: SubmissionState::Idle,
            attempt: 0,
            error: None,
            success: None,
            response: None,
            missing: Vec::new(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// The current attempt's report text. Cleared when a new attempt begins.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// Field ids behind the last validation rejection.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Rejects a submit action before any request is issued (missing
    /// required fields, no image selected). Leaves the machine out of
    /// `Submitting` so the user can fix the input and resubmit.
    pub fn reject(&mut self, error: SubmitError) {
        let missing = match &error {
            SubmitError::MissingRequired(ids) => ids.clone(),
            _ => Vec::new(),
        };
        self.reject_with(error.to_string(), missing);
    }

    /// Like `reject`, but with a caller-supplied inline message — the
    /// validation string differs per form.
    pub fn reject_with(&mut self, message: String, missing: Vec<&'static str>) {
        debug_assert!(!self.is_submitting());
        self.success = None;
        self.response = None;
        self.missing = missing;
        self.error = Some(message);
        self.state = SubmissionState::Idle;
    }

    /// Enters `Submitting` and returns the new attempt number, or `None`
    /// when a request is already outstanding.
    pub fn begin(&mut self) -> Option<u64> {
        if self.is_submitting() {
            debug!("submit while submitting ignored");
            return None;
        }
        self.error = None;
        self.success = None;
        self.response = None;
        self.missing.clear();
        self.attempt += 1;
        self.state = SubmissionState::Submitting;
        Some(self.attempt)
    }

    /// Applies an attempt's outcome. Returns false (and changes nothing)
    /// when the attempt is stale — superseded by a newer `begin` or by a
    /// `reset` since it was issued.
    pub fn complete(&mut self, attempt: u64, outcome: Result<String, SubmitError>) -> bool {
        if !self.is_submitting() || attempt != self.attempt {
            debug!(attempt, current = self.attempt, "dropping stale completion");
            return false;
        }
        match outcome {
            Ok(text) => {
                self.response = Some(text);
                self.success = Some(self.success_message.to_string());
                self.state = SubmissionState::Succeeded;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.state = SubmissionState::Failed;
            }
        }
        true
    }

    /// Back to `Idle` from any state, clearing messages and the displayed
    /// response. An in-flight attempt becomes stale.
    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
        self.error = None;
        self.success = None;
        self.response = None;
        self.missing.clear();
    }
}
