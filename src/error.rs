use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Render error: {0}")]
    Render(String),

    /// The dialog executable could not be located.
    #[error("Executable not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dialog exited with a status the caller did not expect.
    #[error("Dialog exited with status {status}: {output}")]
    Exit { status: i32, output: String },

    /// A progress update was written while no progress dialog was open.
    #[error("No progress dialog is open")]
    NoProgress,

    #[error("Configuration error: {0}")]
    Config(String),
}
