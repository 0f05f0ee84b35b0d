//! Parent command identity.

use std::fmt;
use std::sync::Arc;

/// Handle to the command a subcommand belongs to
///
/// Cloning is cheap and every clone refers to the same command. Equality is
/// identity: two separately created commands with the same name are different.
///
/// ```
/// use command_gate::command::CommandRef;
///
/// let admin = CommandRef::new("admin");
/// let alias = admin.clone();
/// assert_eq!(admin, alias);
/// assert_ne!(admin, CommandRef::new("admin"));
/// ```
#[derive(Clone)]
pub struct CommandRef {
    inner: Arc<CommandMeta>,
}

struct CommandMeta {
    name: String,
}

impl CommandRef {
    /// Create a new parent command identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CommandMeta { name: name.into() }),
        }
    }

    /// The parent command's name (`/name ...`)
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether both handles refer to the same command
    pub fn same_command(&self, other: &CommandRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for CommandRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_command(other)
    }
}

impl Eq for CommandRef {}

impl fmt::Debug for CommandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandRef").field(&self.inner.name).finish()
    }
}
