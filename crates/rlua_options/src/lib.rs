//! rlua_options: configuration for the `rlua` driver.
//!
//! Options are read from a JSON file (camelCase keys, every key optional) and
//! merged over the built-in defaults. Command-line flags are applied on top by
//! the driver.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default prompt printed before each REPL line.
pub const DEFAULT_PROMPT: &str = "lua> ";

/// Default line that ends a REPL session.
pub const DEFAULT_EXIT_COMMAND: &str = "exit";

/// How scanned tokens are echoed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoFormat {
    /// `{Type:local Literal:local Line:1 Column:1}`
    #[default]
    Debug,
    /// One JSON object per token.
    Json,
}

/// The options file structure. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsFile {
    pub prompt: Option<String>,
    pub echo_format: Option<EchoFormat>,
    pub show_diagnostics: Option<bool>,
    pub exit_command: Option<String>,
}

/// Resolved driver options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplOptions {
    pub prompt: String,
    pub echo_format: EchoFormat,
    pub show_diagnostics: bool,
    pub exit_command: String,
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            echo_format: EchoFormat::Debug,
            show_diagnostics: false,
            exit_command: DEFAULT_EXIT_COMMAND.to_string(),
        }
    }
}

impl ReplOptions {
    /// Overlay the values present in `file` onto these options.
    pub fn merge(mut self, file: OptionsFile) -> Self {
        if let Some(prompt) = file.prompt {
            self.prompt = prompt;
        }
        if let Some(echo_format) = file.echo_format {
            self.echo_format = echo_format;
        }
        if let Some(show_diagnostics) = file.show_diagnostics {
            self.show_diagnostics = show_diagnostics;
        }
        if let Some(exit_command) = file.exit_command {
            self.exit_command = exit_command;
        }
        self
    }
}

/// Errors raised while loading an options file.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("cannot read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse an options file from a string.
pub fn parse_options(content: &str) -> Result<OptionsFile, serde_json::Error> {
    serde_json::from_str(content)
}

/// Load an options file and merge it over the defaults.
pub fn load_options(path: &Path) -> Result<ReplOptions, OptionsError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: display.clone(),
        source,
    })?;
    let file = parse_options(&content).map_err(|source| OptionsError::Parse {
        path: display,
        source,
    })?;
    Ok(ReplOptions::default().merge(file))
}
