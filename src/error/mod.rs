// gitconductor: GitLab Group Mirror Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             ConductorError (~24 bytes)
//!                     |
//!   +------+------+---+---+-------+------+----+
//!   |      |      |       |       |      |    |
//!   v      v      v       v       v      v    v
//! Bail   Git   Remote   Tree   State  Dispatch Cfg/Io/Other
//!        Box    Box     Box     Box    Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Git      CommandFailed, CloneFailed, NotCloned, TimedOut, Interrupted, Gix
//!   Remote   GroupNotFound, HttpError, Unauthorized, Decode
//!   Tree     PathCollision
//!   State    NotFound, NotFoundUpToRoot, Corrupt, Locked
//!   Dispatch UnknownCommand, MissingArgument
//!   Config   ParseError, InvalidValue, NotFound
//! ```
//!
//! Wrappers embed the inner message in their own and do not expose it as a
//! `source`, so `{e:#}` prints each message once.
//!
//! # Fatal vs. local
//!
//! Every variant here aborts an invocation when it reaches `main`. Failures
//! of a single repository during a fan-out never get that far: the
//! dispatcher turns them into a failed result row and keeps going.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ConductorError`].
pub type ConductorResult<T> = std::result::Result<T, ConductorError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ConductorError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(Box<GitError>),

    /// Remote hierarchy lookup failed.
    #[error("remote error: {0}")]
    Remote(Box<RemoteError>),

    /// The local tree could not be built from the remote listing.
    #[error("tree error: {0}")]
    Tree(Box<TreeError>),

    /// State file could not be found, read or written.
    #[error("state error: {0}")]
    State(Box<StateError>),

    /// Command could not be dispatched at all.
    #[error("dispatch error: {0}")]
    Dispatch(Box<DispatchError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`ConductorError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> ConductorError {
    ConductorError::Bailed(message.into().into_boxed_str())
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ConductorError {
                fn from(err: $error) -> Self {
                    ConductorError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    RemoteError => Remote,
    TreeError => Tree,
    StateError => State,
    DispatchError => Dispatch,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// No working tree exists at the project's local path.
    #[error("not cloned: no git working tree at {path}")]
    NotCloned { path: PathBuf },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// A git process ran past its time limit and was killed.
    #[error("timed out after {secs}s: {command}")]
    TimedOut { command: String, secs: u64 },

    /// A git process was killed because the run was cancelled.
    #[error("interrupted: {command}")]
    Interrupted { command: String },

    /// The git executable is not available.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },
}

// --- Remote Errors ---

/// Remote hierarchy lookup errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The named group does not exist (or is invisible to the caller).
    #[error("group not found: {group}")]
    GroupNotFound { group: String },

    /// Credentials were rejected.
    #[error("unauthorized (http {status}): {url}")]
    Unauthorized { status: u16, url: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Response body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(reqwest::Error),

    /// Request timed out.
    #[error("request timed out: {url}")]
    Timeout { url: String },
}

// --- Tree Errors ---

/// Errors raised while mapping the remote hierarchy onto local paths.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Two nodes resolved to the same directory.
    #[error("'{first}' and '{second}' both resolve to {path}")]
    PathCollision {
        first: String,
        second: String,
        path: PathBuf,
    },
}

// --- State Errors ---

/// State file errors.
#[derive(Debug, Error)]
pub enum StateError {
    /// No state file in the working directory or any of its ancestors.
    #[error("no state file \"{file_name}\" found from {start} up to root")]
    NotFoundUpToRoot { file_name: String, start: PathBuf },

    /// An explicitly provided state file does not exist.
    #[error("the provided state file \"{path}\" does not exist")]
    NotFound { path: PathBuf },

    /// An explicitly provided state path exists but is not a regular file.
    #[error("the provided state path \"{path}\" is not a regular file")]
    InvalidPath { path: PathBuf },

    /// The state file exists but cannot be decoded.
    #[error("state file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Another invocation holds the lock on this tree.
    #[error("state file {path} is locked by another gitconductor process")]
    Locked { path: PathBuf },

    /// I/O error while reading or writing state.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Dispatch Errors ---

/// Errors that abort a dispatch before any repository is touched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Command name is not part of the operation set.
    #[error("command \"{name}\" not recognised")]
    UnknownCommand { name: String },

    /// Command requires an argument that was not supplied.
    #[error("command \"{command}\" requires {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests;
