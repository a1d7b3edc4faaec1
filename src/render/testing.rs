//! Scripted prompter for exercising controls and sessions

use miette::{miette, Result};
use std::collections::VecDeque;

use crate::render::prompt::{InputRequest, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Text(&'static str),
    Choice(usize),
    Toggle(bool),
    /// Leave the control untouched
    Skip,
}

/// Answers prompts from a fixed script and records every prompt it saw
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<Answer> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| miette!("script exhausted at prompt '{}'", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, request: &InputRequest<'_>) -> Result<Option<String>> {
        match self.next(request.prompt)? {
            Answer::Text(text) => Ok(Some(text.to_string())),
            Answer::Skip => Ok(None),
            other => Err(miette!("expected text for '{}', script has {:?}", request.prompt, other)),
        }
    }

    fn choose(&mut self, prompt: &str, items: &[String], _current: Option<usize>) -> Result<Option<usize>> {
        match self.next(prompt)? {
            Answer::Choice(idx) if idx < items.len() => Ok(Some(idx)),
            Answer::Skip => Ok(None),
            other => Err(miette!("bad choice for '{}': {:?}", prompt, other)),
        }
    }

    fn toggle(&mut self, prompt: &str, _current: bool) -> Result<Option<bool>> {
        match self.next(prompt)? {
            Answer::Toggle(value) => Ok(Some(value)),
            Answer::Skip => Ok(None),
            other => Err(miette!("expected toggle for '{}', script has {:?}", prompt, other)),
        }
    }
}
