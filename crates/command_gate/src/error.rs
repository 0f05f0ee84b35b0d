//! Error types for command_gate
//!
//! This module defines the error hierarchy for the command_gate crate using `thiserror`.
//! Every fallible operation returns `Result<T, GateError>`.
//!
//! # Error Variants
//!
//! Configuration errors (raised while wiring subcommands at startup):
//!
//! - [`GateError::UnmarkedHandler`]: a permission gate was set on a handler without `#[permission]`
//! - [`GateError::DuplicateSubcommand`]: two subcommands share a name under one parent
//! - [`GateError::InvalidSubcommandName`]: empty name or a name containing whitespace
//! - [`GateError::ForeignSubcommand`]: subcommand built for a different parent command
//!
//! Runtime errors:
//!
//! - [`GateError::Execution`]: a subcommand handler failed
//! - [`GateError::VersionFetch`]: the update checker could not obtain a remote version
//! - [`GateError::Io`]: I/O failures from a version source (auto-converts from `std::io::Error`)
//!
//! Permission denial is not an error. It is reported to the user and `perform`
//! returns `Ok(())`.
//!
//! # Example
//!
//! ```rust
//! use command_gate::error::GateError;
//!
//! let err = GateError::UnmarkedHandler {
//!     subcommand: "ban".to_string(),
//! };
//! assert!(err.is_configuration());
//! ```

use thiserror::Error;

/// The main error type for all command_gate operations
#[derive(Error, Debug)]
pub enum GateError {
    /// A permission gate was assigned to a handler that never opted in
    ///
    /// The handler's `impl SubcommandHandler` block must carry the
    /// `#[permission]` marker (or override `requires_permission_gate`).
    #[error(
        "permission gate requires handler to opt in via marker: add #[permission] to the SubcommandHandler impl of '{subcommand}'"
    )]
    UnmarkedHandler {
        /// Name of the offending subcommand
        subcommand: String,
    },

    /// A subcommand with the same name is already registered under the parent
    #[error("subcommand '{name}' is already registered")]
    DuplicateSubcommand {
        /// The conflicting name
        name: String,
    },

    /// The subcommand name cannot be used as an invocation keyword
    #[error("invalid subcommand name '{name}': must be non-empty and contain no whitespace")]
    InvalidSubcommandName {
        /// The rejected name
        name: String,
    },

    /// The subcommand was constructed for a different parent command
    #[error("subcommand '{subcommand}' belongs to '{found}', not '{expected}'")]
    ForeignSubcommand {
        /// Name of the subcommand being registered
        subcommand: String,
        /// Parent the registry belongs to
        expected: String,
        /// Parent the subcommand was built with
        found: String,
    },

    /// Subcommand handler failed
    ///
    /// Returned by handlers and passed through `perform` unchanged.
    #[error("Subcommand execution failed: {0}")]
    Execution(String),

    /// Remote version lookup failed
    #[error("Cannot look for updates: {0}")]
    VersionFetch(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    /// Returns `true` for errors that indicate a wiring mistake in the host
    ///
    /// These surface at startup and should never be swallowed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GateError::UnmarkedHandler { .. }
                | GateError::DuplicateSubcommand { .. }
                | GateError::InvalidSubcommandName { .. }
                | GateError::ForeignSubcommand { .. }
        )
    }
}
