//! Permission-gated subcommands.
//!
//! A [`Subcommand`] binds a [`SubcommandHandler`] to its parent command and
//! an optional [`PermissionGate`]. Callers go through [`Subcommand::perform`],
//! which evaluates the gate before the handler runs:
//!
//! 1. **No gate** - the handler always runs
//! 2. **Gate, permission held** - the handler runs, nothing is sent
//! 3. **Gate, permission missing** - the colour-translated denial message is
//!    sent once and the handler is skipped
//!
//! The permission is looked up on every call, so changes to a user's
//! permissions take effect immediately.
//!
//! # Opting in
//!
//! A gate can only be attached to handlers marked with `#[permission]`.
//! Setting one on an unmarked handler fails with
//! [`GateError::UnmarkedHandler`](crate::error::GateError::UnmarkedHandler)
//! instead of silently guarding nothing.
//!
//! ```rust
//! use command_gate::prelude::*;
//!
//! struct Reload;
//!
//! impl SubcommandHandler for Reload {
//!     fn name(&self) -> &str {
//!         "reload"
//!     }
//!
//!     fn handle_subcommand(&self, _user: &dyn User, _args: &[String]) -> Result<(), GateError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut reload = Subcommand::new(CommandRef::new("myplugin"), Reload);
//! assert!(reload.set_permission_gate("myplugin.reload", "&cNo permission").is_err());
//! assert!(reload.permission_gate().is_none());
//! ```

mod gate;
mod handler;

pub use gate::{GateDecision, PermissionGate};
pub use handler::{DynSubcommand, Subcommand, SubcommandHandler};
