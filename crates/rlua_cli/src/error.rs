use rlua_options::OptionsError;
use std::io;

/// Failures of the driver itself. Malformed Lua input is never one of these.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode token as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
