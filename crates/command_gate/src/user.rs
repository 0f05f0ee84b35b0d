//! The caller capability consumed by the dispatcher.

/// Anyone able to invoke a subcommand
///
/// The host adapts its own sender type (a player, a console, a bot account)
/// to this trait. The dispatcher only borrows a `User` for the duration of one
/// `perform` call.
///
/// # Example
///
/// ```
/// use command_gate::user::User;
///
/// struct Console;
///
/// impl User for Console {
///     fn has_permission(&self, _permission: &str) -> bool {
///         true
///     }
///
///     fn send_message(&self, text: &str) {
///         println!("{}", text);
///     }
/// }
/// ```
pub trait User {
    /// Whether this user currently holds `permission`
    fn has_permission(&self, permission: &str) -> bool;

    /// Deliver `text` to this user
    fn send_message(&self, text: &str);
}

impl<U: User + ?Sized> User for &U {
    fn has_permission(&self, permission: &str) -> bool {
        (**self).has_permission(permission)
    }

    fn send_message(&self, text: &str) {
        (**self).send_message(text)
    }
}
