use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use pausewatch::prompt::Prompter;

/// A scripted answer.
#[derive(Debug, Clone)]
pub enum Answer {
    Text(String),
    Confirm(bool),
}

/// Prompter that replays canned answers and records the prompts it saw.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(Answer::Text(text)) => Ok(text),
            other => Err(anyhow!("expected a text answer for {prompt:?}, got {other:?}")),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(Answer::Confirm(value)) => Ok(value),
            other => Err(anyhow!("expected a yes/no answer for {prompt:?}, got {other:?}")),
        }
    }
}
