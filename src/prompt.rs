// src/prompt.rs

//! Interactive collection of a watch request.

use anyhow::Result;
use dialoguer::{Confirm, Input};

use crate::request::{ActionSource, WatchRequest};

/// Interactive-input surface.
pub trait Prompter {
    /// Free text; an empty answer is allowed.
    fn text(&mut self, prompt: &str) -> Result<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts via `dialoguer`.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }
}

/// Ask for paths until an empty answer, then the action, then the two
/// switches.
pub fn collect_request(prompter: &mut dyn Prompter) -> Result<WatchRequest> {
    let mut paths = Vec::new();
    loop {
        let path = prompter.text("File or directory to watch (empty to finish)")?;
        if path.trim().is_empty() {
            break;
        }
        paths.push(path);
    }

    let action = prompter.text("Action to run on change")?;
    let watch_for_creations = prompter.confirm("Trigger on file creations?", true)?;
    let recursive = prompter.confirm("Watch directories recursively?", true)?;

    Ok(WatchRequest {
        paths,
        action: ActionSource::Text(action),
        watch_for_creations,
        recursive,
    })
}
