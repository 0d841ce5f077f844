//! Host command recognition and execution for the assistant.
//!
//! `classify` is a pure lookup from an utterance to an [`Action`];
//! [`SystemExecutor`] performs the action through a [`ProcessRunner`].

pub mod classifier;
pub mod error;
pub mod executor;
pub mod runner;

pub use classifier::{Action, classify};
pub use error::CommandError;
pub use executor::{Clock, CommandExecutor, Launchers, SystemExecutor};
pub use runner::{CommandOutput, CommandSpec, HostProcessRunner, ProcessRunner};
