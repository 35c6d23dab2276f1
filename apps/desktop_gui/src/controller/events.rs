//! Backend-to-UI events and error modeling for the desktop GUI.

use form_core::{FormController, Notice};
use storage::DiagnosisStore;

pub enum UiEvent {
    Info(String),
    FormUpdated(FormSnapshot),
    Error(UiError),
}

/// Copy of the controller's user-facing state, taken after each action.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub display: String,
    pub notice: Option<Notice>,
}

impl FormSnapshot {
    pub fn capture<S: DiagnosisStore>(form: &FormController<S>) -> Self {
        Self {
            display: form.display().to_string(),
            notice: form.notice(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let label = match self.context {
            UiErrorContext::BackendStartup => "Startup",
            UiErrorContext::CommandQueue => "Unavailable",
        };
        format!("{label}: {}", self.message)
    }
}
