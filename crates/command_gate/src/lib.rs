//! command_gate - permission-gated subcommand dispatch
//!
//! This crate lets a host application group named subcommands under one
//! parent command and enforces an optional permission check before each
//! subcommand's handler runs.
//!
//! # Overview
//!
//! - Handlers implement [`SubcommandHandler`](subcommand::SubcommandHandler)
//! - [`Subcommand`](subcommand::Subcommand) wraps a handler with its parent
//!   and an optional [`PermissionGate`](subcommand::PermissionGate)
//! - The `#[permission]` marker opts a handler into gating; gates on
//!   unmarked handlers are refused at configuration time
//! - [`SubcommandRegistry`](registry::SubcommandRegistry) keeps one parent's
//!   subcommands and routes invocations to them
//!
//! # Architecture
//!
//! - `subcommand`: handler contract and gate evaluation
//! - `registry`: per-parent subcommand set and routing
//! - `command`: parent command identity
//! - `user`: the caller capability supplied by the host
//! - `color`: legacy `&` colour-code translation
//! - `updater`: background update checks
//! - `error`: error types
//!
//! # Example
//!
//! ```rust
//! use command_gate::prelude::*;
//! use std::cell::RefCell;
//!
//! struct Ban;
//!
//! #[permission]
//! impl SubcommandHandler for Ban {
//!     fn name(&self) -> &str {
//!         "ban"
//!     }
//!
//!     fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
//!         user.send_message(&format!("banned {}", args[1]));
//!         Ok(())
//!     }
//! }
//!
//! struct Player {
//!     inbox: RefCell<Vec<String>>,
//! }
//!
//! impl User for Player {
//!     fn has_permission(&self, _permission: &str) -> bool {
//!         false
//!     }
//!
//!     fn send_message(&self, text: &str) {
//!         self.inbox.borrow_mut().push(text.to_string());
//!     }
//! }
//!
//! # fn main() -> Result<(), GateError> {
//! let mut ban = Subcommand::new(CommandRef::new("admin"), Ban);
//! ban.set_permission_gate("admin.ban", "&cNo permission")?;
//!
//! let player = Player { inbox: RefCell::new(Vec::new()) };
//! ban.perform(&player, &["ban".to_string(), "steve".to_string()])?;
//! assert_eq!(*player.inbox.borrow(), vec!["§cNo permission".to_string()]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Lets macro output name `::command_gate` from inside this crate too
extern crate self as command_gate;

// Re-export macros from command_gate_macros
pub use command_gate_macros::*;

/// Subcommand contract, gate evaluation and the gated wrapper
pub mod subcommand;

/// Subcommands registered under one parent command
pub mod registry;

/// Parent command identity
pub mod command;

/// The caller capability the host supplies
pub mod user;

/// Legacy colour-code translation
pub mod color;

/// Background update checks
///
/// Fetches a remote version on a tokio task and exposes the comparison
/// through a synchronous read.
pub mod updater;

/// Error types
///
/// This module defines the `GateError` enum. Configuration errors
/// (`UnmarkedHandler`, `DuplicateSubcommand`, `InvalidSubcommandName`,
/// `ForeignSubcommand`) indicate a wiring mistake; `Execution` carries
/// handler failures.
pub mod error;

// Prelude module for common imports
pub mod prelude {
    //! Common imports for command_gate users
    //!
    //! Use `use command_gate::prelude::*;` to import commonly used types.

    pub use crate::color::translate_color_codes;
    pub use crate::command::CommandRef;
    pub use crate::error::GateError;
    pub use crate::permission;
    pub use crate::registry::{Dispatch, SubcommandRegistry};
    pub use crate::subcommand::{GateDecision, PermissionGate, Subcommand, SubcommandHandler};
    pub use crate::updater::{UpdateChecker, UpdateCheckerOptions, VersionSource};
    pub use crate::user::User;
}
