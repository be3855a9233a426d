//! Error types for gesture configuration and action dispatch

use std::path::PathBuf;

use thiserror::Error;

use crate::actions::Action;
use crate::input::GestureEvent;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to render config: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("bad touch trace at line {line}: {source}")]
    Trace {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("event loop error: {0}")]
    EventLoop(#[from] calloop::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Why an external collaborator could not carry out an action
#[derive(Error, Debug)]
pub enum ActionFailure {
    #[error("no command configured")]
    Unbound,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}", describe_exit(.code))]
    Exit { command: String, code: Option<i32> },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("no authenticator configured")]
    AuthenticationUnavailable,

    #[error("authentication failed")]
    AuthenticationFailed,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// A bound action failed; identifies which one
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("action {action} for {gesture} failed: {source}")]
    ActionFailed {
        action: Action,
        gesture: GestureEvent,
        #[source]
        source: ActionFailure,
    },
}

impl DispatchError {
    pub fn action(&self) -> Action {
        match self {
            DispatchError::ActionFailed { action, .. } => *action,
        }
    }
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
