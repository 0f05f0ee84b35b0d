//! Permission gate evaluation.

use crate::color::{ALTERNATE_COLOR_CHAR, translate_color_codes};
use crate::user::User;
use serde::Deserialize;
use tracing::debug;

/// The (required permission, denial message) pair guarding a subcommand
///
/// Both halves always travel together. The message may contain `&` colour
/// codes; they are translated when the message is sent.
///
/// Gates can be loaded from host configuration:
///
/// ```
/// use command_gate::subcommand::PermissionGate;
///
/// let gate: PermissionGate = serde_json::from_str(
///     r#"{"permission": "admin.ban", "message": "&cNo permission"}"#,
/// ).unwrap();
/// assert_eq!(gate.permission(), "admin.ban");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionGate {
    permission: String,
    message: String,
}

/// Outcome of evaluating a gate against a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The handler may run
    Allowed,
    /// The user lacked the permission and has been told so
    Denied,
}

impl GateDecision {
    /// Shorthand for `== GateDecision::Allowed`
    pub fn is_allowed(self) -> bool {
        self == GateDecision::Allowed
    }
}

impl PermissionGate {
    /// Create a gate requiring `permission`, answering `message` on denial
    pub fn new(permission: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
            message: message.into(),
        }
    }

    /// The permission node the user must hold
    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// The untranslated denial message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The denial message with colour codes resolved
    pub fn rendered_message(&self) -> String {
        translate_color_codes(ALTERNATE_COLOR_CHAR, &self.message)
    }

    /// Query `user` and notify them on denial
    ///
    /// The permission is asked for on every call; results are never cached.
    pub fn evaluate(&self, user: &dyn User) -> GateDecision {
        if user.has_permission(&self.permission) {
            return GateDecision::Allowed;
        }

        debug!(permission = %self.permission, "permission denied");
        user.send_message(&self.rendered_message());
        GateDecision::Denied
    }
}

/// Evaluate an optional gate; no gate means unconditional access
pub(crate) fn evaluate(gate: Option<&PermissionGate>, user: &dyn User) -> GateDecision {
    match gate {
        Some(gate) => gate.evaluate(user),
        None => GateDecision::Allowed,
    }
}
