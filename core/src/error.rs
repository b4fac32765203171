use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn command: {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for child process: {command}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to terminate child process: {command}")]
    Terminate {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture stdout of: {0}")]
    MissingStdout(String),

    #[error("Failed to forward child output")]
    Output(#[source] std::io::Error),

    #[error("Output forwarding task panicked")]
    Forwarder(#[from] tokio::task::JoinError),
}
