#[cfg(test)]
use std::collections::VecDeque;

pub const QUANTITY_PROMPT: &str = "Enter quantity (1-99):";
pub const QUANTITY_DEFAULT: &str = "1";

/// Request/response dialogs used by the controller.
///
/// Implementations decide how the question is put to the user; the cart logic
/// only sees the answers.
pub trait Prompter {
    /// Returns `None` when the user dismisses the dialog.
    fn ask(&mut self, message: &str, default: &str) -> anyhow::Result<Option<String>>;
    fn confirm(&mut self, message: &str) -> anyhow::Result<bool>;
    fn notify(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Replays canned answers and records every notification.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    pub(crate) asked: Vec<String>,
    pub(crate) confirm_requests: Vec<String>,
    pub(crate) notifications: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn answer(mut self, answer: impl Into<String>) -> Self {
        self.answers.push_back(Some(answer.into()));
        self
    }

    pub(crate) fn dismiss(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub(crate) fn confirming(mut self, accept: bool) -> Self {
        self.confirmations.push_back(accept);
        self
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str, _default: &str) -> anyhow::Result<Option<String>> {
        self.asked.push(message.to_owned());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer for: {message}"))
    }

    fn confirm(&mut self, message: &str) -> anyhow::Result<bool> {
        self.confirm_requests.push(message.to_owned());
        self.confirmations
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted confirmation for: {message}"))
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        self.notifications.push(message.to_owned());
        Ok(())
    }
}
