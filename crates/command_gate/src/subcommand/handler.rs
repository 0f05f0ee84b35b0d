//! The subcommand contract and its gated wrapper.

use super::gate::{self, GateDecision, PermissionGate};
use crate::command::CommandRef;
use crate::error::GateError;
use crate::user::User;
use tracing::{debug, warn};

/// Business logic of one subcommand
///
/// Implementors supply the name and [`handle_subcommand`](Self::handle_subcommand).
/// Permission gating is opt-in: put `#[permission]` on the impl block so
/// that [`Subcommand::set_permission_gate`] accepts a gate.
///
/// # Example
///
/// ```
/// use command_gate::prelude::*;
///
/// struct Ban;
///
/// #[permission(node = "admin.ban", message = "&cNo permission")]
/// impl SubcommandHandler for Ban {
///     fn name(&self) -> &str {
///         "ban"
///     }
///
///     fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
///         let target = args.get(1).ok_or_else(|| GateError::Execution("usage: ban <player>".into()))?;
///         user.send_message(&format!("Banned {}", target));
///         Ok(())
///     }
/// }
///
/// assert!(Ban.requires_permission_gate());
/// ```
pub trait SubcommandHandler: Send + Sync {
    /// Invocation keyword (`/parent <name>`)
    fn name(&self) -> &str;

    /// Run the subcommand
    ///
    /// `args[0]` is the subcommand name as typed by the user. When a gate is
    /// configured it has already passed by the time this runs.
    fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError>;

    /// Whether this handler accepts a permission gate
    ///
    /// Generated as `true` by `#[permission]`.
    fn requires_permission_gate(&self) -> bool {
        false
    }

    /// Gate declared alongside the marker, applied on registration
    fn declared_permission_gate(&self) -> Option<PermissionGate> {
        None
    }
}

impl<H: SubcommandHandler + ?Sized> SubcommandHandler for Box<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
        (**self).handle_subcommand(user, args)
    }

    fn requires_permission_gate(&self) -> bool {
        (**self).requires_permission_gate()
    }

    fn declared_permission_gate(&self) -> Option<PermissionGate> {
        (**self).declared_permission_gate()
    }
}

/// Type-erased subcommand, as stored by a registry
pub type DynSubcommand = Subcommand<Box<dyn SubcommandHandler>>;

/// A handler bound to its parent command, with an optional permission gate
///
/// [`perform`](Self::perform) is the only entry point callers should use; it
/// runs the gate before the handler so that no subcommand can skip the check.
pub struct Subcommand<H> {
    parent: CommandRef,
    gate: Option<PermissionGate>,
    handler: H,
}

impl<H: SubcommandHandler> Subcommand<H> {
    /// Bind `handler` to `parent` with no gate
    pub fn new(parent: CommandRef, handler: H) -> Self {
        Self {
            parent,
            gate: None,
            handler,
        }
    }

    /// Invocation keyword of the wrapped handler
    pub fn name(&self) -> &str {
        self.handler.name()
    }

    /// The command this subcommand belongs to
    pub fn parent_command(&self) -> &CommandRef {
        &self.parent
    }

    /// The wrapped handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The configured gate, if any
    pub fn permission_gate(&self) -> Option<&PermissionGate> {
        self.gate.as_ref()
    }

    /// Require `permission` before the handler runs
    ///
    /// Fails with [`GateError::UnmarkedHandler`] unless the handler carries the
    /// `#[permission]` marker; the existing gate is left untouched in that case.
    /// Calling again replaces the previous gate.
    pub fn set_permission_gate(
        &mut self,
        permission: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), GateError> {
        self.install_gate(PermissionGate::new(permission, message))
    }

    pub(crate) fn install_gate(&mut self, gate: PermissionGate) -> Result<(), GateError> {
        if !self.handler.requires_permission_gate() {
            warn!(
                subcommand = self.name(),
                permission = gate.permission(),
                "refusing permission gate on unmarked handler"
            );
            return Err(GateError::UnmarkedHandler {
                subcommand: self.name().to_string(),
            });
        }

        debug!(
            subcommand = self.name(),
            permission = gate.permission(),
            "permission gate configured"
        );
        self.gate = Some(gate);
        Ok(())
    }

    /// Evaluate the gate for `user` without running the handler
    ///
    /// On denial the user has already received the denial message.
    pub fn check(&self, user: &dyn User) -> GateDecision {
        gate::evaluate(self.gate.as_ref(), user)
    }

    /// Run the subcommand for `user`
    ///
    /// Denial is reported to the user and yields `Ok(())`. Handler errors are
    /// returned unchanged.
    pub fn perform(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
        match self.check(user) {
            GateDecision::Denied => Ok(()),
            GateDecision::Allowed => self.handler.handle_subcommand(user, args),
        }
    }
}

impl<H: SubcommandHandler + 'static> Subcommand<H> {
    /// Erase the handler type, keeping parent and gate
    pub fn boxed(self) -> DynSubcommand {
        Subcommand {
            parent: self.parent,
            gate: self.gate,
            handler: Box::new(self.handler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestUser {
        permissions: RefCell<Vec<String>>,
        messages: RefCell<Vec<String>>,
        checks: Cell<usize>,
    }

    impl TestUser {
        fn with(permissions: &[&str]) -> Self {
            Self {
                permissions: RefCell::new(permissions.iter().map(|p| p.to_string()).collect()),
                messages: RefCell::new(Vec::new()),
                checks: Cell::new(0),
            }
        }

        fn grant(&self, permission: &str) {
            self.permissions.borrow_mut().push(permission.to_string());
        }

        fn revoke(&self, permission: &str) {
            self.permissions.borrow_mut().retain(|p| p != permission);
        }
    }

    impl User for TestUser {
        fn has_permission(&self, permission: &str) -> bool {
            self.checks.set(self.checks.get() + 1);
            self.permissions.borrow().iter().any(|p| p == permission)
        }

        fn send_message(&self, text: &str) {
            self.messages.borrow_mut().push(text.to_string());
        }
    }

    #[derive(Default)]
    struct Plain {
        calls: AtomicUsize,
    }

    impl SubcommandHandler for Plain {
        fn name(&self) -> &str {
            "reload"
        }

        fn handle_subcommand(&self, _user: &dyn User, _args: &[String]) -> Result<(), GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Marked {
        calls: AtomicUsize,
        seen: Mutex<Vec<Vec<String>>>,
    }

    impl SubcommandHandler for Marked {
        fn name(&self) -> &str {
            "ban"
        }

        fn handle_subcommand(&self, _user: &dyn User, args: &[String]) -> Result<(), GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(args.to_vec());
            Ok(())
        }

        fn requires_permission_gate(&self) -> bool {
            true
        }
    }

    struct Failing;

    impl SubcommandHandler for Failing {
        fn name(&self) -> &str {
            "explode"
        }

        fn handle_subcommand(&self, _user: &dyn User, _args: &[String]) -> Result<(), GateError> {
            Err(GateError::Execution("kaboom".to_string()))
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accessors() {
        let parent = CommandRef::new("pl");
        let sub = Subcommand::new(parent.clone(), Plain::default());

        assert_eq!(sub.name(), "reload");
        assert_eq!(sub.parent_command(), &parent);
        assert!(sub.permission_gate().is_none());
    }

    #[test]
    fn test_no_gate_always_runs_handler() {
        let sub = Subcommand::new(CommandRef::new("pl"), Plain::default());
        let user = TestUser::with(&[]);

        sub.perform(&user, &args(&["reload"])).unwrap();

        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 1);
        assert_eq!(user.checks.get(), 0);
        assert!(user.messages.borrow().is_empty());
    }

    #[test]
    fn test_unmarked_handler_rejects_gate() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Plain::default());

        let err = sub
            .set_permission_gate("admin.reload", "&cNo permission")
            .unwrap_err();
        assert!(matches!(err, GateError::UnmarkedHandler { ref subcommand } if subcommand == "reload"));
        assert!(sub.permission_gate().is_none());

        // still behaves as ungated
        let user = TestUser::with(&[]);
        sub.perform(&user, &args(&["reload"])).unwrap();
        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 1);
        assert!(user.messages.borrow().is_empty());
    }

    #[test]
    fn test_gate_denies_without_permission() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Marked::default());
        sub.set_permission_gate("admin.ban", "&cNo permission").unwrap();
        let user = TestUser::with(&[]);

        sub.perform(&user, &args(&["ban", "steve"])).unwrap();

        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 0);
        assert_eq!(*user.messages.borrow(), vec!["§cNo permission".to_string()]);
    }

    #[test]
    fn test_gate_allows_with_permission() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Marked::default());
        sub.set_permission_gate("admin.ban", "&cNo permission").unwrap();
        let user = TestUser::with(&["admin.ban"]);

        sub.perform(&user, &args(&["ban", "steve"])).unwrap();

        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *sub.handler().seen.lock().unwrap(),
            vec![args(&["ban", "steve"])]
        );
        assert!(user.messages.borrow().is_empty());
    }

    #[test]
    fn test_permission_reevaluated_each_call() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Marked::default());
        sub.set_permission_gate("admin.ban", "&cNo permission").unwrap();
        let user = TestUser::with(&[]);

        sub.perform(&user, &args(&["ban"])).unwrap();
        user.grant("admin.ban");
        sub.perform(&user, &args(&["ban"])).unwrap();
        user.revoke("admin.ban");
        sub.perform(&user, &args(&["ban"])).unwrap();

        assert_eq!(user.checks.get(), 3);
        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 1);
        assert_eq!(user.messages.borrow().len(), 2);
    }

    #[test]
    fn test_second_gate_replaces_first() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Marked::default());
        sub.set_permission_gate("a", "&cA").unwrap();
        sub.set_permission_gate("b", "&cB").unwrap();

        let gate = sub.permission_gate().unwrap();
        assert_eq!(gate.permission(), "b");
        assert_eq!(gate.message(), "&cB");
    }

    #[test]
    fn test_check_reports_decision() {
        let mut sub = Subcommand::new(CommandRef::new("pl"), Marked::default());
        let user = TestUser::with(&[]);
        assert_eq!(sub.check(&user), GateDecision::Allowed);

        sub.set_permission_gate("admin.ban", "nope").unwrap();
        assert_eq!(sub.check(&user), GateDecision::Denied);
        assert_eq!(sub.handler().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_error_propagates() {
        let sub = Subcommand::new(CommandRef::new("pl"), Failing);
        let user = TestUser::with(&[]);

        let err = sub.perform(&user, &args(&["explode"])).unwrap_err();
        assert!(matches!(err, GateError::Execution(ref m) if m == "kaboom"));
    }

    #[test]
    fn test_boxed_keeps_gate_and_parent() {
        let parent = CommandRef::new("pl");
        let mut sub = Subcommand::new(parent.clone(), Marked::default());
        sub.set_permission_gate("admin.ban", "no").unwrap();

        let boxed = sub.boxed();
        assert_eq!(boxed.name(), "ban");
        assert!(boxed.handler().requires_permission_gate());
        assert_eq!(boxed.parent_command(), &parent);
        assert_eq!(boxed.permission_gate().unwrap().permission(), "admin.ban");
    }
}
