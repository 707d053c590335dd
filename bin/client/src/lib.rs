//! pingster terminal client.
//!
//! This crate provides a line-oriented console over the pingster libraries,
//! standing in for the mobile app's sign-in, home and chat screens.

pub mod command;
pub mod config;
pub mod console;
pub mod error;

pub use command::Command;
pub use config::{BackendConfig, ClientConfig};
pub use console::{Console, Flow, Output};
pub use error::{CommandError, ConsoleError};
