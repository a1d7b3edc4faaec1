//! Terminal input behind a small trait
//!
//! Controls never talk to the terminal directly. They ask a [`Prompter`],
//! which answers `Ok(None)` when the user makes no edit. The dialoguer
//! implementation drives a real terminal; [`StaticPrompter`] never edits and
//! is what previews render with.

use chrono::NaiveDate;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Editor, Input, Password, Select};
use miette::{IntoDiagnostic, Result};

/// Canonical calendar-date format stored by date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a single input should be collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStyle {
    Plain,
    Masked,
    Multiline,
    Numeric,
    Date,
}

/// A request for free-form input
#[derive(Debug, Clone)]
pub struct InputRequest<'a> {
    pub prompt: &'a str,
    pub initial: &'a str,
    pub placeholder: Option<&'a str>,
    pub style: InputStyle,
}

/// Source of user edits for field controls
pub trait Prompter {
    /// Ask for free-form text
    fn input(&mut self, request: &InputRequest<'_>) -> Result<Option<String>>;

    /// Ask for one of `items`
    fn choose(&mut self, prompt: &str, items: &[String], current: Option<usize>) -> Result<Option<usize>>;

    /// Ask for a yes/no toggle
    fn toggle(&mut self, prompt: &str, current: bool) -> Result<Option<bool>>;

    /// Whether this prompter can produce edits at all
    fn is_interactive(&self) -> bool {
        true
    }
}

/// A prompter that never edits anything
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticPrompter;

impl Prompter for StaticPrompter {
    fn input(&mut self, _request: &InputRequest<'_>) -> Result<Option<String>> {
        Ok(None)
    }

    fn choose(&mut self, _prompt: &str, _items: &[String], _current: Option<usize>) -> Result<Option<usize>> {
        Ok(None)
    }

    fn toggle(&mut self, _prompt: &str, _current: bool) -> Result<Option<bool>> {
        Ok(None)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prompts on the terminal with dialoguer
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn decorated(request: &InputRequest<'_>) -> String {
        match request.placeholder {
            Some(placeholder) if request.initial.is_empty() => {
                format!("{} ({})", request.prompt, style(placeholder).dim())
            }
            _ => request.prompt.to_string(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&mut self, request: &InputRequest<'_>) -> Result<Option<String>> {
        let prompt = Self::decorated(request);

        let value = match request.style {
            InputStyle::Masked => Password::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .into_diagnostic()?,

            InputStyle::Multiline => {
                println!("{} {}", style("?").yellow(), prompt);
                let edited = Editor::new().edit(request.initial).into_diagnostic()?;
                match edited {
                    Some(text) => text.trim_end_matches(&['\r', '\n'][..]).to_string(),
                    // Editor closed without saving
                    None => return Ok(None),
                }
            }

            InputStyle::Numeric => Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .with_initial_text(request.initial)
                .allow_empty(true)
                .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                    let trimmed = input.trim();
                    if trimmed.is_empty() || trimmed.parse::<f64>().is_ok() {
                        Ok(())
                    } else {
                        Err("Enter a number, or leave empty")
                    }
                })
                .interact_text()
                .into_diagnostic()?,

            InputStyle::Date => Input::<String>::with_theme(&self.theme)
                .with_prompt(format!("{} ({})", prompt, style("YYYY-MM-DD").dim()))
                .with_initial_text(request.initial)
                .allow_empty(true)
                .validate_with(|input: &String| -> std::result::Result<(), &'static str> {
                    let trimmed = input.trim();
                    if trimmed.is_empty() || NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok() {
                        Ok(())
                    } else {
                        Err("Enter a calendar date as YYYY-MM-DD")
                    }
                })
                .interact_text()
                .into_diagnostic()?,

            InputStyle::Plain => Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .with_initial_text(request.initial)
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?,
        };

        Ok(Some(value))
    }

    fn choose(&mut self, prompt: &str, items: &[String], current: Option<usize>) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(current.unwrap_or(0))
            .interact()
            .into_diagnostic()?;
        Ok(Some(selection))
    }

    fn toggle(&mut self, prompt: &str, current: bool) -> Result<Option<bool>> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(current)
            .interact()
            .into_diagnostic()?;
        Ok(Some(answer))
    }
}
