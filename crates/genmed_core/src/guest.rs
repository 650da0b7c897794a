use crate::{Language, QuestionRequest, RequestId};

/// Anonymous question/answer screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestPanel {
    question: String,
    recording: bool,
    pending: Option<RequestId>,
    answer: Option<String>,
    error: Option<String>,
}

impl GuestPanel {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_question(&mut self, question: String) {
        self.question = question;
    }

    pub(crate) fn toggle_recording(&mut self) {
        self.recording = !self.recording;
    }

    pub(crate) fn submission(&self, language: Language) -> Option<QuestionRequest> {
        if self.pending.is_some() || self.question.trim().is_empty() {
            return None;
        }
        Some(QuestionRequest {
            question: self.question.trim().to_string(),
            language,
        })
    }

    pub(crate) fn mark_pending(&mut self, request_id: RequestId) {
        self.pending = Some(request_id);
        self.answer = None;
        self.error = None;
    }

    pub(crate) fn is_waiting_for(&self, request_id: RequestId) -> bool {
        self.pending == Some(request_id)
    }

    pub(crate) fn complete(&mut self, result: Result<String, String>) {
        self.pending = None;
        match result {
            Ok(answer) => self.answer = Some(answer),
            Err(message) => self.error = Some(message),
        }
    }

    pub(crate) fn reset(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.question.clear();
        self.answer = None;
        self.error = None;
    }
}
