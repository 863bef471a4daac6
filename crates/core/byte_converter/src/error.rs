use camino::Utf8PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConverterError {
    #[error("The converter worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("The converter worker has been aborted")]
    WorkerAborted,
}

impl From<tokio::task::JoinError> for ConverterError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            ConverterError::WorkerPanicked(err.to_string())
        } else {
            ConverterError::WorkerAborted
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read the config file '{path}': {source}")]
    Unreadable {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Toml syntax error in the config file '{path}': {reason}")]
    InvalidSyntax { path: Utf8PathBuf, reason: String },

    #[error("Invalid log level: {name:?}, supported levels are trace, debug, info, warn and error")]
    InvalidLogLevel { name: String },

    #[error("Invalid resume interval {value:?}: {reason}")]
    InvalidResumeInterval { value: String, reason: String },
}
