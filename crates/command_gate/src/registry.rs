//! One parent command's set of subcommands.
//!
//! [`SubcommandRegistry`] owns the subcommands registered under a single
//! [`CommandRef`], keeps their names unique and routes `args[0]` to the
//! matching subcommand.
//!
//! # Example
//!
//! ```rust
//! use command_gate::prelude::*;
//!
//! struct Ban;
//!
//! #[permission(node = "admin.ban", message = "&cNo permission")]
//! impl SubcommandHandler for Ban {
//!     fn name(&self) -> &str {
//!         "ban"
//!     }
//!
//!     fn handle_subcommand(&self, _user: &dyn User, _args: &[String]) -> Result<(), GateError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), GateError> {
//! let admin = CommandRef::new("admin");
//! let mut registry = SubcommandRegistry::new(admin.clone());
//! registry.register(Subcommand::new(admin, Ban))?;
//!
//! // the gate declared on the marker was applied during registration
//! let ban = registry.get("BAN").unwrap();
//! assert_eq!(ban.permission_gate().unwrap().permission(), "admin.ban");
//! # Ok(())
//! # }
//! ```

use crate::command::CommandRef;
use crate::error::GateError;
use crate::subcommand::{DynSubcommand, Subcommand, SubcommandHandler};
use crate::user::User;
use tracing::{debug, warn};

/// Result of routing an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A subcommand matched and `perform` ran (the gate may have denied it)
    Performed,
    /// No subcommand name was given
    Missing,
    /// Nothing is registered under the given name
    Unknown(String),
}

/// Subcommands registered under one parent command
pub struct SubcommandRegistry {
    parent: CommandRef,
    /// Registration order is kept for listing
    subcommands: Vec<DynSubcommand>,
}

impl SubcommandRegistry {
    /// Create an empty registry for `parent`
    pub fn new(parent: CommandRef) -> Self {
        Self {
            parent,
            subcommands: Vec::new(),
        }
    }

    /// The parent command
    pub fn parent(&self) -> &CommandRef {
        &self.parent
    }

    /// Register a subcommand
    ///
    /// Rejects empty names, names containing whitespace, names already taken
    /// (ignoring ASCII case) and subcommands built for another parent. A gate
    /// declared by the handler's marker is installed here unless a gate was
    /// already set with [`Subcommand::set_permission_gate`]. Nothing is
    /// registered when an error is returned.
    pub fn register<H>(&mut self, subcommand: Subcommand<H>) -> Result<(), GateError>
    where
        H: SubcommandHandler + 'static,
    {
        let mut subcommand = subcommand.boxed();
        let name = subcommand.name().to_string();

        if let Err(err) = self.validate(&subcommand) {
            warn!(parent = self.parent.name(), subcommand = %name, error = %err, "subcommand rejected");
            return Err(err);
        }

        // a gate set by hand wins over the declared one
        if subcommand.permission_gate().is_none() {
            if let Some(gate) = subcommand.handler().declared_permission_gate() {
                subcommand.install_gate(gate)?;
            }
        }

        debug!(parent = self.parent.name(), subcommand = %name, "subcommand registered");
        self.subcommands.push(subcommand);
        Ok(())
    }

    fn validate(&self, subcommand: &DynSubcommand) -> Result<(), GateError> {
        let name = subcommand.name();

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(GateError::InvalidSubcommandName {
                name: name.to_string(),
            });
        }

        if !subcommand.parent_command().same_command(&self.parent) {
            return Err(GateError::ForeignSubcommand {
                subcommand: name.to_string(),
                expected: self.parent.name().to_string(),
                found: subcommand.parent_command().name().to_string(),
            });
        }

        if self.get(name).is_some() {
            return Err(GateError::DuplicateSubcommand {
                name: name.to_string(),
            });
        }

        Ok(())
    }

    /// Look up a subcommand by name, ignoring ASCII case
    pub fn get(&self, name: &str) -> Option<&DynSubcommand> {
        self.subcommands
            .iter()
            .find(|sub| sub.name().eq_ignore_ascii_case(name))
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subcommands.iter().map(|sub| sub.name())
    }

    /// Number of registered subcommands
    pub fn len(&self) -> usize {
        self.subcommands.len()
    }

    /// Whether no subcommand is registered
    pub fn is_empty(&self) -> bool {
        self.subcommands.is_empty()
    }

    /// Route `args[0]` to its subcommand and perform it with the full `args`
    ///
    /// Handler errors are returned unchanged.
    pub fn dispatch(&self, user: &dyn User, args: &[String]) -> Result<Dispatch, GateError> {
        let Some(name) = args.first() else {
            return Ok(Dispatch::Missing);
        };

        let Some(subcommand) = self.get(name) else {
            debug!(parent = self.parent.name(), subcommand = %name, "unknown subcommand");
            return Ok(Dispatch::Unknown(name.clone()));
        };

        debug!(parent = self.parent.name(), subcommand = subcommand.name(), "dispatching");
        subcommand.perform(user, args)?;
        Ok(Dispatch::Performed)
    }
}
