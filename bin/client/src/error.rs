//! Domain error types for console operations.

use std::fmt;

/// Errors from parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command.
    Unknown { command: String },
    /// The command's arguments are missing or malformed.
    Usage { usage: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { command } => {
                write!(f, "unknown command '{command}', try 'help'")
            }
            Self::Usage { usage } => write!(f, "usage: {usage}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Errors from running a console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The command needs a signed-in user.
    NotSignedIn,
    /// The command needs an open chat.
    NoOpenChat,
    /// No listed user has this email.
    UnknownUser { email: String },
    /// No listed group has this id or name.
    UnknownGroup { key: String },
    /// The image file could not be read.
    ReadImage { path: String, reason: String },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSignedIn => write!(f, "sign in first"),
            Self::NoOpenChat => write!(f, "open a chat first"),
            Self::UnknownUser { email } => write!(f, "no user '{email}'"),
            Self::UnknownGroup { key } => write!(f, "no group '{key}'"),
            Self::ReadImage { path, reason } => {
                write!(f, "could not read image '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConsoleError {}
