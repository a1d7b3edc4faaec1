//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// dynform configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor command for `dynform edit`
    pub editor: Option<String>,

    /// Default output format for submitted values (json or yaml)
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dynform/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match std::fs::read_to_string(&global_path) {
                    Ok(contents) => match Self::from_yaml(&contents) {
                        Ok(global) => config.merge(global),
                        Err(err) => tracing::warn!(
                            path = %global_path.display(),
                            error = %err,
                            "ignoring unreadable config file"
                        ),
                    },
                    Err(err) => tracing::warn!(
                        path = %global_path.display(),
                        error = %err,
                        "failed to read config file"
                    ),
                }
            }
        }

        // 3. Environment variables
        if let Ok(editor) = std::env::var("DYNFORM_EDITOR") {
            config.editor = Some(editor);
        }
        if let Ok(format) = std::env::var("DYNFORM_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    /// Parse a config layer from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dynform")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(&self, file_path: &std::path::Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        let Some((cmd, args)) = parts.split_first() else {
            return std::process::Command::new("vi").arg(file_path).status();
        };

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}
